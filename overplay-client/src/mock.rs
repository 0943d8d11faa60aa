//! In-memory mock implementations of the API client traits.
//!
//! Used by the shell's tests; behavior is deliberately simple and fully
//! inspectable through shared counters.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use overplay_core::overlay::{OverlayDraft, OverlayRecord};

use crate::errors::ClientError;
use crate::types::StreamStatus;
use crate::{OverlayStore, StreamLifecycle};

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<OverlayRecord>,
    next_id: u32,
    create_calls: u32,
    update_calls: u32,
    delete_calls: u32,
}

/// Mock overlay store holding records in memory.
#[derive(Debug, Clone, Default)]
pub struct MockOverlayStore {
    state: Arc<Mutex<StoreState>>,
    fail_all: bool,
}

impl MockOverlayStore {
    /// Creates an empty store that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects every call.
    pub fn new_failing() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            fail_all: true,
        }
    }

    /// Current record set.
    pub fn records(&self) -> Vec<OverlayRecord> {
        self.lock_state().records.clone()
    }

    /// Number of create calls that reached the store.
    pub fn create_calls(&self) -> u32 {
        self.lock_state().create_calls
    }

    /// Number of update calls that reached the store.
    pub fn update_calls(&self) -> u32 {
        self.lock_state().update_calls
    }

    /// Number of delete calls that reached the store.
    pub fn delete_calls(&self) -> u32 {
        self.lock_state().delete_calls
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("mock store state poisoned")
    }

    fn rejection() -> ClientError {
        ClientError::Rejected {
            reason: "mock store failure".to_string(),
        }
    }
}

#[async_trait]
impl OverlayStore for MockOverlayStore {
    async fn list(&self) -> Result<Vec<OverlayRecord>, ClientError> {
        if self.fail_all {
            return Err(Self::rejection());
        }
        Ok(self.records())
    }

    async fn create(&self, draft: &OverlayDraft) -> Result<OverlayRecord, ClientError> {
        let mut state = self.lock_state();
        state.create_calls += 1;
        if self.fail_all {
            return Err(Self::rejection());
        }
        state.next_id += 1;
        let record = OverlayRecord {
            id: format!("overlay-{}", state.next_id),
            text: draft.text.clone(),
            top: draft.top.clone(),
            left: draft.left.clone(),
            color: draft.color.clone(),
            font_size: draft.font_size.clone(),
            background_color: draft.background_color.clone(),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, overlay_id: &str, draft: &OverlayDraft) -> Result<(), ClientError> {
        let mut state = self.lock_state();
        state.update_calls += 1;
        if self.fail_all {
            return Err(Self::rejection());
        }
        let Some(record) = state.records.iter_mut().find(|r| r.id == overlay_id) else {
            return Err(ClientError::Rejected {
                reason: "Overlay not found".to_string(),
            });
        };
        record.text = draft.text.clone();
        record.top = draft.top.clone();
        record.left = draft.left.clone();
        record.color = draft.color.clone();
        record.font_size = draft.font_size.clone();
        record.background_color = draft.background_color.clone();
        Ok(())
    }

    async fn delete(&self, overlay_id: &str) -> Result<(), ClientError> {
        let mut state = self.lock_state();
        state.delete_calls += 1;
        if self.fail_all {
            return Err(Self::rejection());
        }
        let before = state.records.len();
        state.records.retain(|r| r.id != overlay_id);
        if state.records.len() == before {
            return Err(ClientError::Rejected {
                reason: "Overlay not found".to_string(),
            });
        }
        Ok(())
    }
}

/// Mock stream lifecycle with a settable status and an optional response
/// delay for exercising in-flight cancellation.
#[derive(Debug, Clone)]
pub struct MockStreamLifecycle {
    status: Arc<Mutex<StreamStatus>>,
    status_calls: Arc<AtomicU32>,
    response_delay: Option<Duration>,
}

impl MockStreamLifecycle {
    /// Creates a lifecycle whose upstream is initially stopped.
    pub fn new() -> Self {
        Self {
            status: Arc::new(Mutex::new(StreamStatus::stopped())),
            status_calls: Arc::new(AtomicU32::new(0)),
            response_delay: None,
        }
    }

    /// Creates a lifecycle whose `status()` answers after `delay`.
    pub fn new_with_delay(delay: Duration) -> Self {
        Self {
            response_delay: Some(delay),
            ..Self::new()
        }
    }

    /// Overrides the reported status.
    pub fn set_streaming(&self, rtsp_url: Option<&str>) {
        let mut status = self.status.lock().expect("mock status poisoned");
        status.is_streaming = rtsp_url.is_some();
        status.rtsp_url = rtsp_url.map(str::to_string);
        status.stream_url = rtsp_url.map(|_| "/stream/out.m3u8".to_string());
    }

    /// Number of `status()` calls made so far.
    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockStreamLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamLifecycle for MockStreamLifecycle {
    async fn start(&self, rtsp_url: &str) -> Result<(), ClientError> {
        crate::stream::validate_rtsp_url(rtsp_url)?;
        self.set_streaming(Some(rtsp_url));
        Ok(())
    }

    async fn stop(&self) -> Result<(), ClientError> {
        self.set_streaming(None);
        Ok(())
    }

    async fn status(&self) -> Result<StreamStatus, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.response_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.status.lock().expect("mock status poisoned").clone())
    }

    async fn test_connection(&self, rtsp_url: &str) -> Result<(), ClientError> {
        crate::stream::validate_rtsp_url(rtsp_url)?;
        Ok(())
    }
}
