//! Session shell: composes the viewer core with the remote API clients.
//!
//! Data flows one way into the core (overlay records, streaming flag);
//! overlay mutation flows back out through here to the store. The shell
//! decides what gets persisted; the core never talks to the network.

use std::sync::Arc;

use overplay_client::{ClientError, OverlayStore, StreamLifecycle, StreamStatus};
use overplay_core::config::OverplayConfig;
use overplay_core::overlay::{OverlayCompositor, OverlayDraft, OverlayElement, OverlayRecord};
use overplay_core::player::engine::{EngineEvent, EngineFactory, MediaSink};
use overplay_core::player::{PlayerError, SessionStatus, StreamSessionController};
use overplay_core::OverlayError;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by shell operations.
///
/// Store and validation failures are local to the originating form; they
/// never cause a playback-session transition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShellError {
    /// Rejected before any network call.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

/// Composes controller, compositor, and clients for one mounted viewer.
pub struct SessionShell {
    manifest_url: String,
    controller: StreamSessionController,
    compositor: OverlayCompositor,
    store: Arc<dyn OverlayStore>,
    lifecycle: Arc<dyn StreamLifecycle>,
    streaming: bool,
}

impl SessionShell {
    /// Creates a shell for a newly mounted viewer. No playback session is
    /// started until streaming is confirmed active.
    pub fn new(
        config: &OverplayConfig,
        factory: Box<dyn EngineFactory>,
        sink: Box<dyn MediaSink>,
        store: Arc<dyn OverlayStore>,
        lifecycle: Arc<dyn StreamLifecycle>,
    ) -> Self {
        let manifest_url = format!(
            "{}{}",
            config.api.base_url.trim_end_matches('/'),
            config.player.manifest_path
        );
        Self {
            manifest_url,
            controller: StreamSessionController::new(config.player.clone(), factory, sink),
            compositor: OverlayCompositor::new(),
            store,
            lifecycle,
            streaming: false,
        }
    }

    /// Starts the upstream capture, then the playback session.
    ///
    /// # Errors
    ///
    /// - `ClientError::InvalidRtspUrl` - Bad URL, rejected before any call
    /// - `ClientError` - The lifecycle API refused the start
    /// - `PlayerError` - The playback session could not attach
    pub async fn start_streaming(&mut self, rtsp_url: &str) -> Result<(), ShellError> {
        self.lifecycle.start(rtsp_url).await?;
        self.streaming = true;
        self.controller.start(&self.manifest_url, true)?;
        Ok(())
    }

    /// Stops the upstream capture and tears the playback session down.
    ///
    /// # Errors
    ///
    /// - `ClientError` - The lifecycle API refused the stop; the local
    ///   session is torn down regardless
    pub async fn stop_streaming(&mut self) -> Result<(), ShellError> {
        self.streaming = false;
        self.controller.stop();
        self.lifecycle.stop().await?;
        Ok(())
    }

    /// Probes an RTSP source without starting a capture.
    ///
    /// # Errors
    ///
    /// - `ClientError` - Validation or probe failure
    pub async fn test_connection(&self, rtsp_url: &str) -> Result<(), ShellError> {
        self.lifecycle.test_connection(rtsp_url).await?;
        Ok(())
    }

    /// Reconciles the shell against a polled upstream status.
    ///
    /// Starts the playback session when the upstream came up and tears it
    /// down when the upstream went away.
    ///
    /// # Errors
    ///
    /// - `PlayerError` - The playback session could not attach
    pub fn apply_status(&mut self, status: &StreamStatus) -> Result<(), ShellError> {
        if status.is_streaming && !self.streaming {
            debug!("upstream came up, starting playback session");
            self.streaming = true;
            self.controller.start(&self.manifest_url, true)?;
        } else if !status.is_streaming && self.streaming {
            debug!("upstream went away, stopping playback session");
            self.streaming = false;
            self.controller.stop();
        }
        Ok(())
    }

    /// Mirrors the store's overlay set into the compositor.
    ///
    /// # Errors
    ///
    /// - `ClientError` - The list call failed; the mirrored set is kept
    pub async fn refresh_overlays(&mut self) -> Result<(), ShellError> {
        let records = self.store.list().await?;
        self.compositor.set_overlays(records);
        Ok(())
    }

    /// Creates an overlay.
    ///
    /// Rejected before any store call when the upstream is not streaming
    /// or the draft fails validation.
    ///
    /// # Errors
    ///
    /// - `ShellError::Validation` - Upstream is not streaming
    /// - `OverlayError::InvalidText` - Draft text out of bounds
    /// - `ClientError` - The store refused the create
    pub async fn create_overlay(&mut self, draft: &OverlayDraft) -> Result<OverlayRecord, ShellError> {
        if !self.streaming {
            return Err(ShellError::Validation {
                reason: "start the RTSP stream first".to_string(),
            });
        }
        draft.validate()?;
        let record = self.store.create(draft).await?;
        self.refresh_overlays().await?;
        Ok(record)
    }

    /// Updates an overlay and re-mirrors the set.
    ///
    /// # Errors
    ///
    /// - `OverlayError::InvalidText` - Draft text out of bounds
    /// - `ClientError` - The store refused the update
    pub async fn update_overlay(
        &mut self,
        overlay_id: &str,
        draft: &OverlayDraft,
    ) -> Result<(), ShellError> {
        draft.validate()?;
        self.store.update(overlay_id, draft).await?;
        self.refresh_overlays().await?;
        Ok(())
    }

    /// Deletes an overlay and re-mirrors the set.
    ///
    /// # Errors
    ///
    /// - `ClientError` - The store refused the delete
    pub async fn delete_overlay(&mut self, overlay_id: &str) -> Result<(), ShellError> {
        self.store.delete(overlay_id).await?;
        self.refresh_overlays().await?;
        Ok(())
    }

    /// Begins dragging an overlay. Exclusive; see the compositor contract.
    pub fn drag_start(&mut self, overlay_id: &str) -> bool {
        self.compositor.drag_start(overlay_id)
    }

    /// Ends a drag and persists the moved position.
    ///
    /// The compositor only emits an intent for the overlay actually being
    /// dragged; anything else is a no-op returning `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - `ClientError` - The store refused the position update
    pub async fn drag_end(
        &mut self,
        overlay_id: &str,
        top: &str,
        left: &str,
    ) -> Result<bool, ShellError> {
        let Some(intent) = self.compositor.drag_end(overlay_id) else {
            return Ok(false);
        };
        let Some(record) = self.compositor.get(&intent.overlay_id) else {
            warn!(overlay_id, "dragged overlay vanished before persisting");
            return Ok(false);
        };
        let draft = OverlayDraft {
            text: record.text.clone(),
            top: top.to_string(),
            left: left.to_string(),
            color: record.color.clone(),
            font_size: record.font_size.clone(),
            background_color: record.background_color.clone(),
        };
        self.store.update(&intent.overlay_id, &draft).await?;
        self.refresh_overlays().await?;
        Ok(true)
    }

    /// Forwards an engine event to the session controller.
    pub fn handle_engine_event(&mut self, epoch: u64, event: EngineEvent) {
        self.controller.handle_engine_event(epoch, event);
    }

    /// Forwards a click on the video surface to the controller.
    pub fn handle_video_click(&mut self) {
        self.controller.handle_user_gesture();
    }

    /// Tears the viewer down (unmount). Idempotent.
    pub fn shutdown(&mut self) {
        self.controller.stop();
    }

    /// Current playback-session status.
    pub fn session_status(&self) -> SessionStatus {
        self.controller.status()
    }

    /// Epoch of the live playback session, for engine event wiring.
    pub fn session_epoch(&self) -> u64 {
        self.controller.current_epoch()
    }

    /// Message to show near the video surface, if any.
    pub fn user_message(&self) -> Option<&str> {
        self.controller.user_message()
    }

    /// Whether the upstream capture is believed to be live.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Positioned overlay descriptors for the current frame.
    pub fn render_overlays(&self) -> Vec<OverlayElement> {
        self.compositor.render()
    }
}
