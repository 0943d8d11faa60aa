//! Overlay records and the compositor that layers them above the video.

pub mod compositor;
pub mod types;

pub use compositor::{DragIntent, DragState, OverlayCompositor, OverlayElement};
pub use types::{OverlayDraft, OverlayError, OverlayRecord};
