//! Cancellable status-reconciliation poll.
//!
//! Periodically asks the stream lifecycle API whether the upstream is
//! still live and publishes the answer over a watch channel. The poller
//! holds an explicit cancellation signal handed out at creation; once
//! cancelled, no status update is applied — a response already in flight
//! is discarded rather than published.

use std::sync::Arc;
use std::time::Duration;

use overplay_client::{StreamLifecycle, StreamStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Handle to a running status poll. Cancel on unmount.
pub struct StatusPoller {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Cancels the poll and waits for the task to exit. Updates racing
    /// the cancellation are discarded, never published.
    pub async fn cancel(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// Spawns the status poll against the given lifecycle client.
///
/// Returns the poller handle and the channel updates are published on;
/// the receiver starts at `None` until the first poll completes.
pub fn spawn_status_poller(
    lifecycle: Arc<dyn StreamLifecycle>,
    interval: Duration,
) -> (StatusPoller, watch::Receiver<Option<StreamStatus>>) {
    let (status_tx, status_rx) = watch::channel(None);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = shutdown_rx.changed() => break,
                result = lifecycle.status() => result,
            };
            // A cancellation may have landed while the response was in
            // flight; the update must not be applied then.
            if *shutdown_rx.borrow() {
                break;
            }
            match result {
                Ok(status) => {
                    let _ = status_tx.send(Some(status));
                }
                Err(e) => {
                    warn!(error = %e, "stream status poll failed");
                }
            }
        }
        debug!("status poller stopped");
    });

    let poller = StatusPoller {
        shutdown: shutdown_tx,
        task: Some(task),
    };
    (poller, status_rx)
}
