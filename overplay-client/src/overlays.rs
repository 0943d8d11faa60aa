//! HTTP client for the remote overlay store.

use async_trait::async_trait;
use overplay_core::config::ApiConfig;
use overplay_core::overlay::{OverlayDraft, OverlayRecord};
use tracing::debug;
use url::Url;

use crate::errors::ClientError;
use crate::types::ApiEnvelope;
use crate::OverlayStore;

/// Overlay store client speaking the `/api/overlays/` endpoints.
#[derive(Debug, Clone)]
pub struct HttpOverlayStore {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpOverlayStore {
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

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl OverlayStore for HttpOverlayStore {
    async fn list(&self) -> Result<Vec<OverlayRecord>, ClientError> {
        let url = self.endpoint("/api/overlays/")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        let envelope: ApiEnvelope<Vec<OverlayRecord>> = Self::parse(response).await?;
        let overlays = envelope.into_data()?;
        debug!(count = overlays.len(), "fetched overlay set");
        Ok(overlays)
    }

    async fn create(&self, draft: &OverlayDraft) -> Result<OverlayRecord, ClientError> {
        let url = self.endpoint("/api/overlays/")?;
        let response = self
            .http
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        let envelope: ApiEnvelope<OverlayRecord> = Self::parse(response).await?;
        envelope.into_data()
    }

    async fn update(&self, overlay_id: &str, draft: &OverlayDraft) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/api/overlays/{overlay_id}"))?;
        let response = self
            .http
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        let envelope: ApiEnvelope<()> = Self::parse(response).await?;
        envelope.into_ack()
    }

    async fn delete(&self, overlay_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/api/overlays/{overlay_id}"))?;
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                reason: e.to_string(),
            })?;
        let envelope: ApiEnvelope<()> = Self::parse(response).await?;
        envelope.into_ack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            HttpOverlayStore::new(&config),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_joins_against_base() {
        let store = HttpOverlayStore::new(&ApiConfig::default()).unwrap();
        let url = store.endpoint("/api/overlays/abc123").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/overlays/abc123");
    }
}
