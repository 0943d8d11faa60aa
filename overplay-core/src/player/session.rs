//! Playback-session state machine and recovery policy.
//!
//! One `StreamSessionController` owns at most one live engine attachment.
//! Engine events drive explicit transitions between session states, with a
//! one-retry-per-failure-class recovery budget before the session is
//! declared fatal.

use tracing::{debug, error, warn};

use super::autoplay::{AutoplayNegotiator, GestureOutcome, NegotiationOutcome};
use super::engine::{EngineErrorKind, EngineEvent, EngineFactory, MediaSink, PlaybackEngine};
use super::PlayerError;
use crate::config::PlayerConfig;

/// User-visible status of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No engine attached.
    Idle,
    /// Engine attached, waiting for the manifest.
    Loading,
    /// Live playback in progress.
    Playing,
    /// A recoverable error occurred; a recovery action was issued.
    Recovering,
    /// Unrecoverable failure. The only way out is a fresh `start()`.
    Fatal,
}

impl SessionStatus {
    /// Check if the session has a live attachment.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionStatus::Loading | SessionStatus::Playing | SessionStatus::Recovering
        )
    }

    /// Check if the session terminated on an unrecoverable error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionStatus::Fatal)
    }
}

/// Classification of the last error surfaced by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Media,
    Fatal,
    AutoplayRejected,
}

/// The last error recorded by a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub detail: String,
}

/// Recoverable failure classes tracked by the retry budget. A second
/// consecutive failure of the same class exhausts the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    Network,
    Media,
}

impl FailureClass {
    fn error_kind(self) -> ErrorKind {
        match self {
            FailureClass::Network => ErrorKind::Network,
            FailureClass::Media => ErrorKind::Media,
        }
    }
}

/// An exclusively-owned live engine, tagged with the epoch it was acquired
/// under so late events from a replaced attachment can be discarded.
struct EngineAttachment {
    engine: Box<dyn PlaybackEngine>,
    epoch: u64,
}

/// Owns the lifecycle of one playback-engine attachment.
///
/// Reacts to engine lifecycle/error events, applies the recovery policy,
/// and exposes a simple status to the rest of the UI. All methods are
/// synchronous; engine callbacks, timers, and user input are serialized
/// onto one logical thread.
pub struct StreamSessionController {
    config: PlayerConfig,
    factory: Box<dyn EngineFactory>,
    sink: Box<dyn MediaSink>,
    attachment: Option<EngineAttachment>,
    status: SessionStatus,
    source_url: Option<String>,
    last_error: Option<ErrorInfo>,
    pending_failure: Option<FailureClass>,
    autoplay: AutoplayNegotiator,
    user_message: Option<String>,
    epoch: u64,
}

impl StreamSessionController {
    /// Creates an idle controller. No engine is acquired until `start()`.
    pub fn new(
        config: PlayerConfig,
        factory: Box<dyn EngineFactory>,
        sink: Box<dyn MediaSink>,
    ) -> Self {
        let default_volume = config.default_volume;
        Self {
            config,
            factory,
            sink,
            attachment: None,
            status: SessionStatus::Idle,
            source_url: None,
            last_error: None,
            pending_failure: None,
            autoplay: AutoplayNegotiator::new(default_volume),
            user_message: None,
            epoch: 0,
        }
    }

    /// Starts a new playback session for the given manifest URL.
    ///
    /// Releases any previously attached engine before acquiring a new one,
    /// so at most one attachment exists at any instant. Returns the epoch
    /// of the new attachment; engine events must be delivered with it.
    ///
    /// # Errors
    ///
    /// - `PlayerError::InvalidSource` - Empty URL, or upstream streaming
    ///   has not been confirmed active
    /// - `PlayerError::EngineFailed` - The engine could not load or attach
    pub fn start(&mut self, source_url: &str, upstream_active: bool) -> Result<u64, PlayerError> {
        if source_url.trim().is_empty() {
            return Err(PlayerError::InvalidSource {
                reason: "source URL is empty".to_string(),
            });
        }
        if !upstream_active {
            return Err(PlayerError::InvalidSource {
                reason: "start the RTSP stream first".to_string(),
            });
        }

        self.release_engine();
        self.epoch += 1;
        self.autoplay.reset();
        self.status = SessionStatus::Idle;
        self.source_url = None;
        self.last_error = None;
        self.pending_failure = None;
        self.user_message = None;

        let mut engine = self.factory.create_engine(&self.config.tuning);
        if let Err(e) = engine
            .load_source(source_url)
            .and_then(|()| engine.attach_media())
        {
            engine.detach();
            return Err(e);
        }

        debug!(epoch = self.epoch, source_url, "playback session started");
        self.attachment = Some(EngineAttachment {
            engine,
            epoch: self.epoch,
        });
        self.status = SessionStatus::Loading;
        self.source_url = Some(source_url.to_string());
        Ok(self.epoch)
    }

    /// Stops the session and releases the engine attachment if one exists.
    ///
    /// Idempotent: calling `stop()` while already idle is a no-op that
    /// still guarantees no dangling attachment.
    pub fn stop(&mut self) {
        self.release_engine();
        self.status = SessionStatus::Idle;
        self.source_url = None;
        self.user_message = None;
        self.pending_failure = None;
    }

    /// Handles an asynchronous event from the playback engine.
    ///
    /// Events carrying an epoch that does not match the live attachment
    /// are from an engine that has already been released and are ignored.
    pub fn handle_engine_event(&mut self, epoch: u64, event: EngineEvent) {
        let live = self.attachment.as_ref().map(|a| a.epoch);
        if live != Some(epoch) {
            debug!(epoch, ?live, "discarding engine event for released attachment");
            return;
        }

        match event {
            EngineEvent::ManifestParsed => {
                debug!(from = ?self.status, "manifest parsed, entering Playing");
                self.status = SessionStatus::Playing;
                self.pending_failure = None;
                self.last_error = None;
                self.negotiate_autoplay();
            }
            EngineEvent::PlaybackResumed => {
                if self.status == SessionStatus::Recovering {
                    debug!("playback resumed after pipeline recovery");
                    self.status = SessionStatus::Playing;
                    self.pending_failure = None;
                    self.last_error = None;
                }
            }
            EngineEvent::BufferStalled => {
                warn!("buffer stalled, reloading source");
                // Stalls share the network retry budget but stay invisible
                // to the user unless recovery fails.
                self.attempt_recovery(FailureClass::Network, "buffer stalled".to_string(), false);
            }
            EngineEvent::Error {
                fatal: false,
                kind,
                detail,
            } => {
                // The engine's internal retry is expected to resolve these.
                warn!(?kind, %detail, "non-fatal engine error");
            }
            EngineEvent::Error {
                fatal: true,
                kind: EngineErrorKind::Network,
                detail,
            } => {
                self.attempt_recovery(FailureClass::Network, detail, true);
            }
            EngineEvent::Error {
                fatal: true,
                kind: EngineErrorKind::Media,
                detail,
            } => {
                self.attempt_recovery(FailureClass::Media, detail, true);
            }
            EngineEvent::Error {
                fatal: true,
                kind: EngineErrorKind::Other,
                detail,
            } => {
                self.enter_fatal(ErrorKind::Fatal, detail);
            }
        }
    }

    /// Handles a user gesture (click) on the playback affordance.
    ///
    /// Never fails; a rejected gesture-triggered play attempt becomes a
    /// user message rather than another automatic fallback.
    pub fn handle_user_gesture(&mut self) {
        match self.autoplay.handle_user_gesture(self.sink.as_mut()) {
            GestureOutcome::Started | GestureOutcome::Paused => {
                self.user_message = None;
            }
            GestureOutcome::Rejected(detail) => {
                warn!(%detail, "gesture-triggered play attempt rejected");
                self.last_error = Some(ErrorInfo {
                    kind: ErrorKind::AutoplayRejected,
                    detail,
                });
                self.user_message = Some("Unable to start video playback".to_string());
            }
        }
    }

    /// Current user-visible session status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The last error recorded by this session, if any.
    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    /// Message to surface near the video surface, if any.
    pub fn user_message(&self) -> Option<&str> {
        self.user_message.as_deref()
    }

    /// The manifest URL of the current session, if one is active.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Whether an engine attachment is currently live.
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Epoch of the most recently started session. Engine events tagged
    /// with an older epoch are discarded.
    pub fn current_epoch(&self) -> u64 {
        self.epoch
    }

    /// Autoplay negotiation state for the current session.
    pub fn autoplay(&self) -> &AutoplayNegotiator {
        &self.autoplay
    }

    /// Runs the autoplay negotiation once per session, mapping the outcome
    /// to the affordance message the UI shows.
    fn negotiate_autoplay(&mut self) {
        match self.autoplay.negotiate(self.sink.as_mut()) {
            NegotiationOutcome::Playing => {
                self.user_message = None;
            }
            NegotiationOutcome::PlayingMuted => {
                self.user_message = Some("Click the video to unmute".to_string());
            }
            NegotiationOutcome::AwaitingUserGesture => {
                self.user_message = Some("Click the video to start playback".to_string());
            }
            NegotiationOutcome::AlreadyNegotiated => {}
        }
    }

    /// Issues one recovery action for a recoverable failure class.
    ///
    /// A second consecutive failure of the same class, or a recovery
    /// action that itself fails, exhausts the budget and the session goes
    /// fatal.
    fn attempt_recovery(&mut self, class: FailureClass, detail: String, enter_recovering: bool) {
        if self.pending_failure == Some(class) {
            self.enter_fatal(class.error_kind(), detail);
            return;
        }
        self.pending_failure = Some(class);
        if enter_recovering {
            self.status = SessionStatus::Recovering;
        }

        let Some(attachment) = self.attachment.as_mut() else {
            return;
        };
        let result = match class {
            FailureClass::Network => {
                warn!(%detail, "fatal network error, reloading source");
                attachment.engine.reload_source()
            }
            FailureClass::Media => {
                warn!(%detail, "fatal media error, recovering pipeline");
                attachment.engine.recover_media_pipeline()
            }
        };
        if let Err(e) = result {
            self.enter_fatal(ErrorKind::Fatal, format!("recovery failed: {e}"));
        }
    }

    /// Terminates the session on an unrecoverable error. The engine is
    /// released immediately; only `start()` or `stop()` leave this state.
    fn enter_fatal(&mut self, kind: ErrorKind, detail: String) {
        error!(%detail, "unrecoverable stream error, terminating session");
        self.release_engine();
        self.status = SessionStatus::Fatal;
        self.user_message = Some(format!("Stream error: {detail}"));
        self.last_error = Some(ErrorInfo { kind, detail });
    }

    /// Releases the engine attachment. `Option::take` guarantees the
    /// release routine runs exactly once per attachment.
    fn release_engine(&mut self) {
        if let Some(mut attachment) = self.attachment.take() {
            debug!(epoch = attachment.epoch, "releasing engine attachment");
            attachment.engine.detach();
        }
    }
}

impl Drop for StreamSessionController {
    fn drop(&mut self) {
        self.release_engine();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::test_mocks::{EngineAction, MockEngineFactory, MockSink};

    const SOURCE: &str = "http://localhost:5000/stream/out.m3u8";

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    fn controller_with(factory: MockEngineFactory, sink: MockSink) -> StreamSessionController {
        init_tracing();
        StreamSessionController::new(PlayerConfig::default(), Box::new(factory), Box::new(sink))
    }

    fn started(factory: MockEngineFactory, sink: MockSink) -> (StreamSessionController, u64) {
        let mut controller = controller_with(factory, sink);
        let epoch = controller.start(SOURCE, true).unwrap();
        (controller, epoch)
    }

    #[test]
    fn test_start_rejects_empty_source() {
        let mut controller = controller_with(MockEngineFactory::new(), MockSink::new());
        let err = controller.start("  ", true).unwrap_err();
        assert!(matches!(err, PlayerError::InvalidSource { .. }));
        assert_eq!(controller.status(), SessionStatus::Idle);
        assert!(!controller.is_attached());
    }

    #[test]
    fn test_start_rejects_inactive_upstream() {
        let factory = MockEngineFactory::new();
        let mut controller = controller_with(factory.clone(), MockSink::new());
        let err = controller.start(SOURCE, false).unwrap_err();
        assert!(matches!(err, PlayerError::InvalidSource { .. }));
        assert_eq!(factory.engines_created(), 0);
    }

    #[test]
    fn test_start_attaches_and_enters_loading() {
        let factory = MockEngineFactory::new();
        let (controller, _) = started(factory.clone(), MockSink::new());
        assert_eq!(controller.status(), SessionStatus::Loading);
        assert!(controller.is_attached());
        assert_eq!(
            factory.actions(),
            vec![
                EngineAction::LoadSource(SOURCE.to_string()),
                EngineAction::AttachMedia
            ]
        );
    }

    #[test]
    fn test_at_most_one_attachment_across_restarts() {
        let factory = MockEngineFactory::new();
        let (mut controller, _) = started(factory.clone(), MockSink::new());

        controller.start(SOURCE, true).unwrap();
        controller.stop();
        controller.start(SOURCE, true).unwrap();
        drop(controller);

        assert_eq!(factory.engines_created(), 3);
        assert_eq!(factory.live_engines(), 0);
        assert_eq!(factory.max_live_engines(), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let factory = MockEngineFactory::new();
        let (mut controller, _) = started(factory.clone(), MockSink::new());

        controller.stop();
        let detaches_after_first =
            factory.actions().iter().filter(|a| **a == EngineAction::Detach).count();
        controller.stop();
        let detaches_after_second =
            factory.actions().iter().filter(|a| **a == EngineAction::Detach).count();

        assert_eq!(controller.status(), SessionStatus::Idle);
        assert_eq!(detaches_after_first, 1);
        assert_eq!(detaches_after_second, 1);
    }

    #[test]
    fn test_manifest_parsed_enters_playing() {
        let (mut controller, epoch) = started(MockEngineFactory::new(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);
        assert_eq!(controller.status(), SessionStatus::Playing);
        assert_eq!(controller.user_message(), None);
    }

    #[test]
    fn test_network_error_recovers_then_returns_to_playing() {
        let factory = MockEngineFactory::new();
        let (mut controller, epoch) = started(factory.clone(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Network,
                fatal: true,
                detail: "manifest fetch failed".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Recovering);
        let reloads =
            factory.actions().iter().filter(|a| **a == EngineAction::ReloadSource).count();
        assert_eq!(reloads, 1);

        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);
        assert_eq!(controller.status(), SessionStatus::Playing);
    }

    #[test]
    fn test_second_consecutive_network_failure_is_fatal() {
        let (mut controller, epoch) = started(MockEngineFactory::new(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        let network_error = EngineEvent::Error {
            kind: EngineErrorKind::Network,
            fatal: true,
            detail: "segment timeout".to_string(),
        };
        controller.handle_engine_event(epoch, network_error.clone());
        assert_eq!(controller.status(), SessionStatus::Recovering);

        controller.handle_engine_event(epoch, network_error);
        assert_eq!(controller.status(), SessionStatus::Fatal);
        assert_eq!(controller.last_error().unwrap().kind, ErrorKind::Network);
        assert!(!controller.is_attached());
    }

    #[test]
    fn test_media_error_recovers_pipeline() {
        let factory = MockEngineFactory::new();
        let (mut controller, epoch) = started(factory.clone(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Media,
                fatal: true,
                detail: "decode error".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Recovering);
        assert!(
            factory
                .actions()
                .contains(&EngineAction::RecoverMediaPipeline)
        );
        // Media recovery must not re-fetch the manifest.
        assert!(!factory.actions().contains(&EngineAction::ReloadSource));
    }

    #[test]
    fn test_failed_start_clears_previous_source() {
        let factory = MockEngineFactory::new();
        let (mut controller, _) = started(factory.clone(), MockSink::new());
        assert_eq!(controller.source_url(), Some(SOURCE));

        factory.fail_next_load();
        let err = controller.start(SOURCE, true).unwrap_err();
        assert!(matches!(err, PlayerError::EngineFailed { .. }));
        assert_eq!(controller.status(), SessionStatus::Idle);
        assert!(!controller.is_attached());
        assert_eq!(controller.source_url(), None);
    }

    #[test]
    fn test_playback_resumed_exits_recovering_after_media_recovery() {
        let factory = MockEngineFactory::new();
        let (mut controller, epoch) = started(factory.clone(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Media,
                fatal: true,
                detail: "decode error".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Recovering);

        controller.handle_engine_event(epoch, EngineEvent::PlaybackResumed);
        assert_eq!(controller.status(), SessionStatus::Playing);
        assert_eq!(controller.last_error(), None);

        // The budget is cleared: a later media error gets a fresh retry.
        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Media,
                fatal: true,
                detail: "decode error".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Recovering);
    }

    #[test]
    fn test_playback_resumed_outside_recovery_is_ignored() {
        let (mut controller, epoch) = started(MockEngineFactory::new(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::PlaybackResumed);
        assert_eq!(controller.status(), SessionStatus::Loading);
    }

    #[test]
    fn test_buffer_stall_reloads_without_status_change() {
        let factory = MockEngineFactory::new();
        let (mut controller, epoch) = started(factory.clone(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(epoch, EngineEvent::BufferStalled);
        assert_eq!(controller.status(), SessionStatus::Playing);
        let reloads =
            factory.actions().iter().filter(|a| **a == EngineAction::ReloadSource).count();
        assert_eq!(reloads, 1);
    }

    #[test]
    fn test_stall_then_network_error_exhausts_shared_budget() {
        let (mut controller, epoch) = started(MockEngineFactory::new(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(epoch, EngineEvent::BufferStalled);
        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Network,
                fatal: true,
                detail: "manifest fetch failed".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Fatal);
    }

    #[test]
    fn test_other_fatal_error_terminates_immediately() {
        let (mut controller, epoch) = started(MockEngineFactory::new(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Other,
                fatal: true,
                detail: "keyframe corruption".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Fatal);
        assert_eq!(controller.last_error().unwrap().kind, ErrorKind::Fatal);
        assert!(controller.user_message().unwrap().contains("Stream error"));
    }

    #[test]
    fn test_non_fatal_error_is_diagnostics_only() {
        let factory = MockEngineFactory::new();
        let (mut controller, epoch) = started(factory.clone(), MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Network,
                fatal: false,
                detail: "fragment load error".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Playing);
        assert!(!factory.actions().contains(&EngineAction::ReloadSource));
    }

    #[test]
    fn test_failed_recovery_action_is_reclassified_fatal() {
        let factory = MockEngineFactory::new_with_failing_recovery();
        let (mut controller, epoch) = started(factory, MockSink::new());
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);

        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Network,
                fatal: true,
                detail: "manifest fetch failed".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Fatal);
        assert_eq!(controller.last_error().unwrap().kind, ErrorKind::Fatal);
    }

    #[test]
    fn test_stale_epoch_events_are_ignored() {
        let factory = MockEngineFactory::new();
        let (mut controller, first_epoch) = started(factory.clone(), MockSink::new());
        let second_epoch = controller.start(SOURCE, true).unwrap();
        assert_ne!(first_epoch, second_epoch);

        // A late Playing event from the torn-down engine must not act.
        controller.handle_engine_event(first_epoch, EngineEvent::ManifestParsed);
        assert_eq!(controller.status(), SessionStatus::Loading);

        controller.handle_engine_event(second_epoch, EngineEvent::ManifestParsed);
        assert_eq!(controller.status(), SessionStatus::Playing);
    }

    #[test]
    fn test_events_after_stop_are_ignored() {
        let factory = MockEngineFactory::new();
        let (mut controller, epoch) = started(factory.clone(), MockSink::new());
        controller.stop();

        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);
        assert_eq!(controller.status(), SessionStatus::Idle);
        controller.handle_engine_event(epoch, EngineEvent::BufferStalled);
        assert!(!factory.actions().contains(&EngineAction::ReloadSource));
    }

    #[test]
    fn test_no_exit_from_fatal_without_restart() {
        let (mut controller, epoch) = started(MockEngineFactory::new(), MockSink::new());
        controller.handle_engine_event(
            epoch,
            EngineEvent::Error {
                kind: EngineErrorKind::Other,
                fatal: true,
                detail: "unsupported codec".to_string(),
            },
        );
        assert_eq!(controller.status(), SessionStatus::Fatal);

        // Late events from the released engine change nothing.
        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);
        assert_eq!(controller.status(), SessionStatus::Fatal);

        let new_epoch = controller.start(SOURCE, true).unwrap();
        controller.handle_engine_event(new_epoch, EngineEvent::ManifestParsed);
        assert_eq!(controller.status(), SessionStatus::Playing);
        assert_eq!(controller.last_error(), None);
    }

    #[test]
    fn test_restart_resets_autoplay_attempts() {
        let sink = MockSink::new_rejecting(4);
        let factory = MockEngineFactory::new();
        let (mut controller, epoch) = started(factory.clone(), sink.clone());

        controller.handle_engine_event(epoch, EngineEvent::ManifestParsed);
        assert!(controller.autoplay().awaiting_user_gesture());
        assert_eq!(sink.play_calls(), 2);

        let new_epoch = controller.start(SOURCE, true).unwrap();
        controller.handle_engine_event(new_epoch, EngineEvent::ManifestParsed);
        // Fresh session, fresh unmuted-then-muted sequence.
        assert_eq!(sink.play_calls(), 4);
    }
}
