//! Error types for remote API access.

use thiserror::Error;

/// Errors that can occur talking to the overlay store or stream
/// lifecycle API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// The HTTP request could not be completed.
    #[error("request failed: {reason}")]
    RequestFailed {
        /// The reason for the transport failure
        reason: String,
    },

    /// The API answered but rejected the request.
    #[error("request rejected: {reason}")]
    Rejected {
        /// The error the API reported
        reason: String,
    },

    /// The response body could not be interpreted.
    #[error("invalid response: {reason}")]
    InvalidResponse {
        /// The reason the response was unusable
        reason: String,
    },

    /// The RTSP URL failed validation before any network call was made.
    #[error("invalid RTSP URL: {url} (must start with rtsp://)")]
    InvalidRtspUrl {
        /// The URL that failed validation
        url: String,
    },

    /// The configured API base URL is unusable.
    #[error("invalid base URL: {reason}")]
    InvalidBaseUrl {
        /// The reason the base URL was rejected
        reason: String,
    },
}
