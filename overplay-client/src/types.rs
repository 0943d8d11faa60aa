//! Wire types shared by the remote API clients.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::errors::ClientError;

/// The JSON envelope every API endpoint answers with.
///
/// Error responses carry `success: false` (or omit it) plus an `error`
/// string; parsing stays uniform across status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload of a successful response.
    ///
    /// # Errors
    ///
    /// - `ClientError::Rejected` - The API reported failure
    /// - `ClientError::InvalidResponse` - Success without a payload
    pub fn into_data(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Rejected {
                reason: self.rejection_reason(),
            });
        }
        self.data.ok_or_else(|| ClientError::InvalidResponse {
            reason: "missing data in successful response".to_string(),
        })
    }

    /// Checks a response that carries no payload of interest.
    ///
    /// # Errors
    ///
    /// - `ClientError::Rejected` - The API reported failure
    pub fn into_ack(self) -> Result<(), ClientError> {
        if self.success {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                reason: self.rejection_reason(),
            })
        }
    }

    fn rejection_reason(self) -> String {
        self.error
            .or(self.message)
            .unwrap_or_else(|| "request rejected".to_string())
    }
}

/// Upstream capture status as reported by `GET /api/stream/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamStatus {
    pub is_streaming: bool,
    pub rtsp_url: Option<String>,
    pub stream_url: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    /// Formatted `HH:MM:SS`, present only while streaming.
    pub uptime: Option<String>,
}

impl StreamStatus {
    /// Status value for a stopped upstream.
    pub fn stopped() -> Self {
        Self {
            is_streaming: false,
            rtsp_url: None,
            stream_url: None,
            start_time: None,
            uptime: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_with_data() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_error_body_without_success_field() {
        // Error responses from the API often carry only an `error` key.
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"error": "Overlay not found"}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(
            err,
            ClientError::Rejected {
                reason: "Overlay not found".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_ack() {
        let ok: ApiEnvelope<()> =
            serde_json::from_str(r#"{"success": true, "message": "Stream stopped"}"#).unwrap();
        assert!(ok.into_ack().is_ok());

        let rejected: ApiEnvelope<()> =
            serde_json::from_str(r#"{"success": false, "error": "No active stream to stop"}"#)
                .unwrap();
        assert!(rejected.into_ack().is_err());
    }

    #[test]
    fn test_stream_status_parses_live_payload() {
        let status: StreamStatus = serde_json::from_str(
            r#"{
                "is_streaming": true,
                "rtsp_url": "rtsp://cam/1",
                "stream_url": "/stream/out.m3u8",
                "start_time": "2025-08-29T10:15:30.123456",
                "uptime": "00:05:12"
            }"#,
        )
        .unwrap();
        assert!(status.is_streaming);
        assert_eq!(status.stream_url.as_deref(), Some("/stream/out.m3u8"));
        assert_eq!(status.uptime.as_deref(), Some("00:05:12"));
    }

    #[test]
    fn test_stream_status_parses_stopped_payload() {
        let status: StreamStatus = serde_json::from_str(
            r#"{
                "is_streaming": false,
                "rtsp_url": null,
                "stream_url": "/stream/out.m3u8",
                "start_time": null,
                "uptime": null
            }"#,
        )
        .unwrap();
        assert!(!status.is_streaming);
        assert_eq!(status.start_time, None);
    }
}
