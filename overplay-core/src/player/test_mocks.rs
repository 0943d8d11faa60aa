//! Mock implementations for testing the playback session.
//!
//! The mocks share interior state through `Arc` so tests can keep a clone
//! for inspection while the controller owns the boxed instance.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::engine::{EngineFactory, MediaSink, PlaybackEngine};
use super::PlayerError;
use crate::config::EngineTuning;

/// Engine operations recorded by the mock, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction {
    LoadSource(String),
    AttachMedia,
    ReloadSource,
    RecoverMediaPipeline,
    Detach,
}

#[derive(Debug, Default)]
struct FactoryState {
    actions: Vec<EngineAction>,
    engines_created: u32,
    live_engines: u32,
    max_live_engines: u32,
    fail_next_load: bool,
}

/// Mock engine factory tracking how many engines are live at once.
#[derive(Debug, Clone, Default)]
pub struct MockEngineFactory {
    state: Arc<Mutex<FactoryState>>,
    fail_recovery: bool,
}

impl MockEngineFactory {
    /// Creates a factory whose engines accept every operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a factory whose engines fail recovery actions.
    pub fn new_with_failing_recovery() -> Self {
        Self {
            state: Arc::new(Mutex::new(FactoryState::default())),
            fail_recovery: true,
        }
    }

    /// All engine operations recorded so far, across every engine.
    pub fn actions(&self) -> Vec<EngineAction> {
        self.lock_state().actions.clone()
    }

    /// Total engines handed out.
    pub fn engines_created(&self) -> u32 {
        self.lock_state().engines_created
    }

    /// Engines currently attached (created and not yet detached).
    pub fn live_engines(&self) -> u32 {
        self.lock_state().live_engines
    }

    /// High-water mark of simultaneously live engines.
    pub fn max_live_engines(&self) -> u32 {
        self.lock_state().max_live_engines
    }

    /// Makes the next `load_source` call fail.
    pub fn fail_next_load(&self) {
        self.lock_state().fail_next_load = true;
    }

    fn lock_state(&self) -> MutexGuard<'_, FactoryState> {
        self.state.lock().expect("mock factory state poisoned")
    }
}

impl EngineFactory for MockEngineFactory {
    fn create_engine(&mut self, _tuning: &EngineTuning) -> Box<dyn PlaybackEngine> {
        let mut state = self.lock_state();
        state.engines_created += 1;
        state.live_engines += 1;
        state.max_live_engines = state.max_live_engines.max(state.live_engines);
        Box::new(MockEngine {
            state: Arc::clone(&self.state),
            fail_recovery: self.fail_recovery,
            detached: false,
        })
    }
}

/// Mock playback engine recording every operation into its factory.
#[derive(Debug)]
pub struct MockEngine {
    state: Arc<Mutex<FactoryState>>,
    fail_recovery: bool,
    detached: bool,
}

impl MockEngine {
    fn record(&self, action: EngineAction) {
        self.state
            .lock()
            .expect("mock factory state poisoned")
            .actions
            .push(action);
    }
}

impl PlaybackEngine for MockEngine {
    fn load_source(&mut self, manifest_url: &str) -> Result<(), PlayerError> {
        let mut state = self.state.lock().expect("mock factory state poisoned");
        state.actions.push(EngineAction::LoadSource(manifest_url.to_string()));
        if std::mem::take(&mut state.fail_next_load) {
            return Err(PlayerError::EngineFailed {
                reason: "mock load failure".to_string(),
            });
        }
        Ok(())
    }

    fn attach_media(&mut self) -> Result<(), PlayerError> {
        self.record(EngineAction::AttachMedia);
        Ok(())
    }

    fn reload_source(&mut self) -> Result<(), PlayerError> {
        self.record(EngineAction::ReloadSource);
        if self.fail_recovery {
            return Err(PlayerError::RecoveryFailed {
                reason: "mock reload failure".to_string(),
            });
        }
        Ok(())
    }

    fn recover_media_pipeline(&mut self) -> Result<(), PlayerError> {
        self.record(EngineAction::RecoverMediaPipeline);
        if self.fail_recovery {
            return Err(PlayerError::RecoveryFailed {
                reason: "mock pipeline recovery failure".to_string(),
            });
        }
        Ok(())
    }

    fn detach(&mut self) {
        if self.detached {
            panic!("engine detached twice");
        }
        self.detached = true;
        let mut state = self.state.lock().expect("mock factory state poisoned");
        state.actions.push(EngineAction::Detach);
        state.live_engines -= 1;
    }
}

#[derive(Debug)]
struct SinkState {
    paused: bool,
    muted: bool,
    volume: f32,
    play_calls: u32,
    pause_calls: u32,
    rejections: VecDeque<()>,
}

/// Mock media sink with scriptable autoplay rejections.
#[derive(Debug, Clone)]
pub struct MockSink {
    state: Arc<Mutex<SinkState>>,
}

impl MockSink {
    /// Creates a sink that accepts every play attempt.
    pub fn new() -> Self {
        Self::new_rejecting(0)
    }

    /// Creates a sink that rejects the first `count` play attempts.
    pub fn new_rejecting(count: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SinkState {
                paused: true,
                muted: false,
                volume: 1.0,
                play_calls: 0,
                pause_calls: 0,
                rejections: std::iter::repeat_n((), count).collect(),
            })),
        }
    }

    /// Total play attempts, accepted or rejected.
    pub fn play_calls(&self) -> u32 {
        self.lock_state().play_calls
    }

    /// Total pause calls.
    pub fn pause_calls(&self) -> u32 {
        self.lock_state().pause_calls
    }

    /// Current paused state.
    pub fn is_paused_now(&self) -> bool {
        self.lock_state().paused
    }

    /// Current muted state.
    pub fn is_muted_now(&self) -> bool {
        self.lock_state().muted
    }

    /// Current volume.
    pub fn volume(&self) -> f32 {
        self.lock_state().volume
    }

    fn lock_state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().expect("mock sink state poisoned")
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSink for MockSink {
    fn play(&mut self) -> Result<(), PlayerError> {
        let mut state = self.lock_state();
        state.play_calls += 1;
        if state.rejections.pop_front().is_some() {
            return Err(PlayerError::PlaybackRejected {
                reason: "autoplay policy".to_string(),
            });
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.lock_state();
        state.pause_calls += 1;
        state.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.lock_state().paused
    }

    fn set_muted(&mut self, muted: bool) {
        self.lock_state().muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.lock_state().muted
    }

    fn set_volume(&mut self, volume: f32) {
        self.lock_state().volume = volume;
    }
}
