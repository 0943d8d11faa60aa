//! Live-stream playback: engine abstraction, session state machine, and
//! autoplay negotiation.
//!
//! The playback engine's asynchronous lifecycle/error callbacks are
//! re-architected here as explicit state-machine transitions driven by a
//! typed event enumeration, decoupling recovery policy from any specific
//! engine implementation.

pub mod autoplay;
pub mod engine;
pub mod session;
pub mod test_mocks;

pub use autoplay::{AutoplayNegotiator, GestureOutcome, NegotiationOutcome};
pub use engine::{EngineErrorKind, EngineEvent, EngineFactory, MediaSink, PlaybackEngine};
pub use session::{ErrorInfo, ErrorKind, SessionStatus, StreamSessionController};

use thiserror::Error;

/// Errors raised by playback-session operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayerError {
    /// Rejected before any engine work: empty source or upstream not live.
    #[error("invalid source: {reason}")]
    InvalidSource { reason: String },

    /// An engine operation (load, attach) failed.
    #[error("engine operation failed: {reason}")]
    EngineFailed { reason: String },

    /// A recovery action on a live attachment failed; the session is
    /// reclassified fatal.
    #[error("recovery action failed: {reason}")]
    RecoveryFailed { reason: String },

    /// The media sink refused to start playback (autoplay policy).
    #[error("playback rejected: {reason}")]
    PlaybackRejected { reason: String },
}
