//! Overplay Client - Remote API access
//!
//! Typed clients for the two external collaborators of the viewer core:
//! the overlay store (CRUD on overlay records) and the stream lifecycle
//! API (start/stop/status/test of the upstream capture). Both speak the
//! `{ success, data, error }` JSON envelope against a single base URL.
//!
//! The traits here are the seams the shell is tested against; `mock`
//! provides in-memory implementations.

pub mod errors;
pub mod mock;
pub mod overlays;
pub mod stream;
pub mod types;

pub use errors::ClientError;
pub use overlays::HttpOverlayStore;
pub use stream::{HttpStreamLifecycle, validate_rtsp_url};
pub use types::{ApiEnvelope, StreamStatus};

use async_trait::async_trait;
use overplay_core::overlay::{OverlayDraft, OverlayRecord};

/// CRUD access to the remote overlay store.
///
/// A failed call is local to the originating request; it never affects
/// playback-session state.
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// Fetches the full overlay set.
    async fn list(&self) -> Result<Vec<OverlayRecord>, ClientError>;

    /// Creates an overlay and returns it with its store-assigned id.
    async fn create(&self, draft: &OverlayDraft) -> Result<OverlayRecord, ClientError>;

    /// Updates an existing overlay.
    async fn update(&self, overlay_id: &str, draft: &OverlayDraft) -> Result<(), ClientError>;

    /// Deletes an overlay.
    async fn delete(&self, overlay_id: &str) -> Result<(), ClientError>;
}

/// Control over the upstream capture process.
#[async_trait]
pub trait StreamLifecycle: Send + Sync {
    /// Starts capturing the given RTSP source.
    async fn start(&self, rtsp_url: &str) -> Result<(), ClientError>;

    /// Stops the upstream capture.
    async fn stop(&self) -> Result<(), ClientError>;

    /// Reports whether the upstream capture is live.
    async fn status(&self) -> Result<StreamStatus, ClientError>;

    /// Probes an RTSP source without starting a capture.
    async fn test_connection(&self, rtsp_url: &str) -> Result<(), ClientError>;
}
