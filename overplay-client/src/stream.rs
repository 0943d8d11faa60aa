//! HTTP client for the stream lifecycle API.

use async_trait::async_trait;
use overplay_core::config::ApiConfig;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::errors::ClientError;
use crate::types::{ApiEnvelope, StreamStatus};
use crate::StreamLifecycle;

/// Checks an RTSP URL before any network call is made.
///
/// # Errors
///
/// - `ClientError::InvalidRtspUrl` - Empty or not an `rtsp://` URL
pub fn validate_rtsp_url(url: &str) -> Result<(), ClientError> {
    let trimmed = url.trim();
    if trimmed.is_empty() || !trimmed.to_lowercase().starts_with("rtsp://") {
        return Err(ClientError::InvalidRtspUrl {
            url: url.to_string(),
        });
    }
    Ok(())
}

#[derive(Serialize)]
struct RtspRequest<'a> {
    rtsp_url: &'a str,
}

/// Stream lifecycle client speaking the `/api/stream/` endpoints.
#[derive(Debug, Clone)]
pub struct HttpStreamLifecycle {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpStreamLifecycle {
    /// Builds a client for the configured API host.
    ///
    /// # Errors
    ///
    /// - `ClientError::InvalidBaseUrl` - The base URL does not parse
    /// - `ClientError::RequestFailed` - The HTTP client could not be built
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                reason: e.to_string(),
            })
    }

    async fn ack(response: reqwest::Response) -> Result<(), ClientError> {
        let envelope: ApiEnvelope<()> =
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    reason: e.to_string(),
                })?;
        envelope.into_ack()
    }
}

#[async_trait]
impl StreamLifecycle for HttpStreamLifecycle {
    async fn start(&self, rtsp_url: &str) -> Result<(), ClientError> {
        validate_rtsp_url(rtsp_url)?;
        let url = self.endpoint("/api/stream/")?;
        debug!(rtsp_url, "starting upstream capture");
        let response = self
            .http
            .post(url)
            .json(&RtspRequest {
                rtsp_url: rtsp_url.trim(),
            })
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        Self::ack(response).await
    }

    async fn stop(&self) -> Result<(), ClientError> {
        let url = self.endpoint("/api/stream/")?;
        debug!("stopping upstream capture");
        let response =
            self.http
                .delete(url)
                .send()
                .await
                .map_err(|e| ClientError::RequestFailed {
                    reason: e.to_string(),
                })?;
        Self::ack(response).await
    }

    async fn status(&self) -> Result<StreamStatus, ClientError> {
        let url = self.endpoint("/api/stream/status")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        let envelope: ApiEnvelope<StreamStatus> =
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    reason: e.to_string(),
                })?;
        envelope.into_data()
    }

    async fn test_connection(&self, rtsp_url: &str) -> Result<(), ClientError> {
        validate_rtsp_url(rtsp_url)?;
        let url = self.endpoint("/api/stream/test")?;
        let response = self
            .http
            .post(url)
            .json(&RtspRequest {
                rtsp_url: rtsp_url.trim(),
            })
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        Self::ack(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtsp_url_validation() {
        assert!(validate_rtsp_url("rtsp://cam/1").is_ok());
        assert!(validate_rtsp_url("RTSP://cam:554/stream").is_ok());
        assert!(validate_rtsp_url(" rtsp://cam/1 ").is_ok());
        assert!(validate_rtsp_url("").is_err());
        assert!(validate_rtsp_url("http://cam/1").is_err());
        assert!(validate_rtsp_url("rtsp:/missing-slash").is_err());
    }

    #[tokio::test]
    async fn test_start_rejects_bad_url_before_any_request() {
        // Unroutable base URL: a network attempt would fail differently.
        let config = ApiConfig {
            base_url: "http://192.0.2.1:1".to_string(),
            ..ApiConfig::default()
        };
        let lifecycle = HttpStreamLifecycle::new(&config).unwrap();
        let err = lifecycle.start("ftp://cam/1").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRtspUrl { .. }));
    }
}
