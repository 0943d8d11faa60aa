//! Overplay Core - Live-stream playback resilience and overlay composition
//!
//! This crate provides the client-side core of the Overplay viewer: the
//! playback-session state machine with its recovery policy, autoplay
//! negotiation against browser-style playback restrictions, and the
//! compositor that layers positioned text overlays above the live picture.
//! It performs no network I/O; remote API access lives in `overplay-client`.

pub mod config;
pub mod overlay;
pub mod player;

// Re-export main types for convenient access
pub use config::OverplayConfig;
pub use overlay::{DragIntent, OverlayCompositor, OverlayDraft, OverlayError, OverlayRecord};
pub use player::{
    EngineEvent, ErrorInfo, ErrorKind, MediaSink, PlaybackEngine, PlayerError, SessionStatus,
    StreamSessionController,
};

/// Core errors that can bubble up from any Overplay subsystem.
#[derive(Debug, thiserror::Error)]
pub enum OverplayError {
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    #[error("Overlay error: {0}")]
    Overlay(#[from] OverlayError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

impl OverplayError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            OverplayError::Player(e) => match e {
                PlayerError::InvalidSource { reason } => {
                    format!("Cannot start playback: {reason}")
                }
                PlayerError::RecoveryFailed { .. } | PlayerError::EngineFailed { .. } => {
                    "Stream error. Please ensure the RTSP stream is running.".to_string()
                }
                PlayerError::PlaybackRejected { .. } => {
                    "Click the video to start playback".to_string()
                }
            },
            OverplayError::Overlay(e) => e.to_string(),
            OverplayError::Configuration { .. } => "Configuration error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            OverplayError::Player(PlayerError::InvalidSource { .. })
                | OverplayError::Overlay(OverlayError::InvalidText { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, OverplayError>;
