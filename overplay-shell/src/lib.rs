//! Overplay Shell - Viewer composition
//!
//! The thin layer above the core: wires the playback-session controller
//! and overlay compositor to the remote API clients, enforces the
//! "start stream first" gate, persists drag results, and runs the
//! cancellable status-reconciliation poll.

pub mod poller;
pub mod shell;

pub use poller::{spawn_status_poller, StatusPoller};
pub use shell::{SessionShell, ShellError};
