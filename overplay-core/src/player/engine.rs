//! Core abstractions for the playback pipeline.
//!
//! This module defines the traits that separate the session controller's
//! recovery policy from the concrete segmented-stream engine and media
//! sink. The controller only ever sees typed events and the small set of
//! recovery actions below; everything engine-specific stays behind these
//! seams.

use super::PlayerError;
use crate::config::EngineTuning;

/// A segmented-stream playback engine attached to a media sink.
///
/// One engine instance corresponds to one exclusive attachment owned by a
/// session. The controller releases an instance with [`PlaybackEngine::detach`]
/// before ever acquiring a replacement.
pub trait PlaybackEngine: Send {
    /// Points the engine at a manifest URL and begins fetching segments.
    ///
    /// # Errors
    ///
    /// - `PlayerError::EngineFailed` - The engine could not begin loading
    fn load_source(&mut self, manifest_url: &str) -> Result<(), PlayerError>;

    /// Binds the engine's output to the media sink.
    ///
    /// # Errors
    ///
    /// - `PlayerError::EngineFailed` - The sink could not be bound
    fn attach_media(&mut self) -> Result<(), PlayerError>;

    /// Re-fetches the manifest and restarts segment loading on the same
    /// attachment. Used to repair transient network failures and buffer
    /// stalls without tearing the session down.
    ///
    /// # Errors
    ///
    /// - `PlayerError::RecoveryFailed` - The reload could not be issued
    fn reload_source(&mut self) -> Result<(), PlayerError>;

    /// Reinitializes the decode pipeline without re-fetching the manifest.
    ///
    /// # Errors
    ///
    /// - `PlayerError::RecoveryFailed` - The pipeline could not be reset
    fn recover_media_pipeline(&mut self) -> Result<(), PlayerError>;

    /// Releases the engine and all its resources. Called exactly once per
    /// instance; events raised for a detached instance are discarded by
    /// the controller.
    fn detach(&mut self);
}

/// Creates engine instances for new session attachments.
pub trait EngineFactory: Send {
    /// Builds a fresh engine configured with the given tuning.
    fn create_engine(&mut self, tuning: &EngineTuning) -> Box<dyn PlaybackEngine>;
}

/// The media element playback is rendered into.
///
/// Play attempts may be rejected by the platform's autoplay policy; the
/// negotiator in [`super::autoplay`] owns the fallback sequence.
pub trait MediaSink: Send {
    /// Attempts to start playback.
    ///
    /// # Errors
    ///
    /// - `PlayerError::PlaybackRejected` - Autoplay policy refused the attempt
    fn play(&mut self) -> Result<(), PlayerError>;

    /// Pauses playback.
    fn pause(&mut self);

    /// Whether the sink is currently paused.
    fn is_paused(&self) -> bool;

    /// Mutes or unmutes the sink.
    fn set_muted(&mut self, muted: bool);

    /// Whether the sink is currently muted.
    fn is_muted(&self) -> bool;

    /// Sets the output volume (0.0 to 1.0).
    fn set_volume(&mut self, volume: f32);
}

/// Lifecycle and error events raised by a playback engine.
///
/// Events carry no engine internals; the controller classifies them purely
/// by this shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The manifest was fetched and parsed; playback can begin.
    ManifestParsed,
    /// Playback continued after a pipeline reinitialization that did not
    /// re-fetch the manifest. Adapters must emit this (or a fresh
    /// `ManifestParsed`) once decode restarts, or the session stays in
    /// its recovering state.
    PlaybackResumed,
    /// The forward buffer ran dry. Usually a transient network hiccup on a
    /// live feed.
    BufferStalled,
    /// The engine reported an error.
    Error {
        kind: EngineErrorKind,
        /// Non-fatal errors are resolved by the engine's own internal
        /// retry and are recorded for diagnostics only.
        fatal: bool,
        detail: String,
    },
}

/// Classification of engine-reported errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// Manifest or segment fetch failure.
    Network,
    /// Decode or buffering pipeline failure.
    Media,
    /// Anything the engine could not classify.
    Other,
}
