//! Autoplay policy negotiation.
//!
//! Browsers refuse audible playback without a prior user gesture. The
//! negotiator tries unmuted playback exactly once, falls back to muted
//! exactly once, and then waits for a click. Attempt state is scoped to
//! one playback session and reset whenever a new session starts.

use tracing::debug;

use super::engine::MediaSink;

/// Result of an automatic negotiation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationOutcome {
    /// Audible playback started.
    Playing,
    /// Playback started muted; the user should be prompted to unmute.
    PlayingMuted,
    /// Both automatic attempts were rejected; a manual-start affordance
    /// must be shown.
    AwaitingUserGesture,
    /// Negotiation already ran for this session; nothing was attempted.
    AlreadyNegotiated,
}

/// Result of a user gesture on the playback affordance.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Playback started (and the sink was restored to audible).
    Started,
    /// Playback was paused.
    Paused,
    /// The gesture-triggered play attempt was rejected. Surfaced as a
    /// message; no further automatic fallback after a human action.
    Rejected(String),
}

/// Negotiates playback against the platform's autoplay policy.
#[derive(Debug)]
pub struct AutoplayNegotiator {
    default_volume: f32,
    tried_unmuted: bool,
    tried_muted: bool,
    awaiting_user_gesture: bool,
}

impl AutoplayNegotiator {
    /// Creates a negotiator that restores the given volume when unmuting.
    pub fn new(default_volume: f32) -> Self {
        Self {
            default_volume,
            tried_unmuted: false,
            tried_muted: false,
            awaiting_user_gesture: false,
        }
    }

    /// Clears attempt state for a new session.
    pub fn reset(&mut self) {
        self.tried_unmuted = false;
        self.tried_muted = false;
        self.awaiting_user_gesture = false;
    }

    /// Runs the automatic fallback sequence: unmuted once, then muted
    /// once. A third automatic attempt never occurs; subsequent calls
    /// within the same session return `AlreadyNegotiated`.
    pub fn negotiate(&mut self, sink: &mut dyn MediaSink) -> NegotiationOutcome {
        if self.tried_unmuted {
            return NegotiationOutcome::AlreadyNegotiated;
        }

        self.tried_unmuted = true;
        sink.set_volume(self.default_volume);
        sink.set_muted(false);
        if sink.play().is_ok() {
            return NegotiationOutcome::Playing;
        }

        debug!("unmuted autoplay rejected, retrying muted");
        self.tried_muted = true;
        sink.set_muted(true);
        if sink.play().is_ok() {
            return NegotiationOutcome::PlayingMuted;
        }

        debug!("muted autoplay rejected, awaiting user gesture");
        self.awaiting_user_gesture = true;
        NegotiationOutcome::AwaitingUserGesture
    }

    /// Handles a click on the playback affordance.
    ///
    /// A paused sink is started, any negotiator-applied mute is cleared,
    /// and the default audible volume is restored. A playing sink is
    /// paused. Idempotent per click and never fails.
    pub fn handle_user_gesture(&mut self, sink: &mut dyn MediaSink) -> GestureOutcome {
        if sink.is_paused() {
            match sink.play() {
                Ok(()) => {
                    if sink.is_muted() {
                        sink.set_muted(false);
                        sink.set_volume(self.default_volume);
                    }
                    self.awaiting_user_gesture = false;
                    GestureOutcome::Started
                }
                Err(e) => GestureOutcome::Rejected(e.to_string()),
            }
        } else {
            sink.pause();
            self.awaiting_user_gesture = false;
            GestureOutcome::Paused
        }
    }

    /// Whether an unmuted automatic attempt was made this session.
    pub fn tried_unmuted(&self) -> bool {
        self.tried_unmuted
    }

    /// Whether a muted automatic attempt was made this session.
    pub fn tried_muted(&self) -> bool {
        self.tried_muted
    }

    /// Whether the manual-start affordance should be shown.
    pub fn awaiting_user_gesture(&self) -> bool {
        self.awaiting_user_gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::test_mocks::MockSink;

    #[test]
    fn test_unmuted_attempt_succeeds() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new();
        let outcome = negotiator.negotiate(&mut sink.clone());
        assert_eq!(outcome, NegotiationOutcome::Playing);
        assert!(!sink.is_muted_now());
        assert_eq!(sink.volume(), 0.5);
        assert!(!negotiator.awaiting_user_gesture());
    }

    #[test]
    fn test_falls_back_to_muted() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new_rejecting(1);
        let outcome = negotiator.negotiate(&mut sink.clone());
        assert_eq!(outcome, NegotiationOutcome::PlayingMuted);
        assert!(sink.is_muted_now());
        assert_eq!(sink.play_calls(), 2);
    }

    #[test]
    fn test_both_attempts_rejected_awaits_gesture() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new_rejecting(2);
        let outcome = negotiator.negotiate(&mut sink.clone());
        assert_eq!(outcome, NegotiationOutcome::AwaitingUserGesture);
        assert!(negotiator.tried_unmuted());
        assert!(negotiator.tried_muted());
        assert!(negotiator.awaiting_user_gesture());
        assert_eq!(sink.play_calls(), 2);
    }

    #[test]
    fn test_never_a_third_automatic_attempt() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new_rejecting(2);
        negotiator.negotiate(&mut sink.clone());
        let outcome = negotiator.negotiate(&mut sink.clone());
        assert_eq!(outcome, NegotiationOutcome::AlreadyNegotiated);
        assert_eq!(sink.play_calls(), 2);
    }

    #[test]
    fn test_gesture_starts_paused_sink_and_restores_audio() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new_rejecting(2);
        negotiator.negotiate(&mut sink.clone());
        assert!(negotiator.awaiting_user_gesture());

        let outcome = negotiator.handle_user_gesture(&mut sink.clone());
        assert_eq!(outcome, GestureOutcome::Started);
        assert!(!sink.is_paused_now());
        assert!(!sink.is_muted_now());
        assert_eq!(sink.volume(), 0.5);
        assert!(!negotiator.awaiting_user_gesture());
    }

    #[test]
    fn test_gesture_pauses_playing_sink() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new();
        negotiator.negotiate(&mut sink.clone());

        let outcome = negotiator.handle_user_gesture(&mut sink.clone());
        assert_eq!(outcome, GestureOutcome::Paused);
        assert!(sink.is_paused_now());
    }

    #[test]
    fn test_rejected_gesture_is_surfaced_not_retried() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new_rejecting(3);
        negotiator.negotiate(&mut sink.clone());
        assert_eq!(sink.play_calls(), 2);

        let outcome = negotiator.handle_user_gesture(&mut sink.clone());
        assert!(matches!(outcome, GestureOutcome::Rejected(_)));
        // The affordance stays up for another click.
        assert!(negotiator.awaiting_user_gesture());
        assert_eq!(sink.play_calls(), 3);
    }

    #[test]
    fn test_reset_allows_new_session_attempts() {
        let mut negotiator = AutoplayNegotiator::new(0.5);
        let sink = MockSink::new_rejecting(2);
        negotiator.negotiate(&mut sink.clone());
        negotiator.reset();
        assert!(!negotiator.tried_unmuted());
        assert!(!negotiator.awaiting_user_gesture());

        let outcome = negotiator.negotiate(&mut sink.clone());
        assert_eq!(outcome, NegotiationOutcome::Playing);
    }
}
