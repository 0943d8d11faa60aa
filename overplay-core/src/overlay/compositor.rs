//! Composites the active overlay set above the live video surface.
//!
//! The compositor mirrors whatever record set it is handed (keyed by id,
//! unordered) and tracks the exclusive drag interaction. Rendering is a
//! pure mapping; persistence of a moved overlay is emitted upward as an
//! intent and decided by the shell.

use std::collections::HashMap;

use tracing::debug;

use super::types::OverlayRecord;

/// Stacking level for overlay elements, above the video surface.
const OVERLAY_Z_INDEX: i32 = 1000;

/// The current drag interaction. At most one overlay drags at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    overlay_id: Option<String>,
}

impl DragState {
    /// Whether any overlay is currently being dragged.
    pub fn is_dragging(&self) -> bool {
        self.overlay_id.is_some()
    }

    /// Id of the overlay being dragged, if any.
    pub fn dragging_id(&self) -> Option<&str> {
        self.overlay_id.as_deref()
    }
}

/// A drag that ended, reported upward so the shell can decide whether to
/// persist the moved position.
#[derive(Debug, Clone, PartialEq)]
pub struct DragIntent {
    pub overlay_id: String,
}

/// A positioned visual descriptor produced by [`OverlayCompositor::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement {
    pub id: String,
    pub text: String,
    pub top: String,
    pub left: String,
    pub color: String,
    pub font_size: String,
    pub background_color: String,
    /// Whether this element is the one currently being dragged.
    pub dragging: bool,
    /// Elements capture pointer input so drags can start on them.
    pub captures_input: bool,
    pub z_index: i32,
}

/// Maintains the mirrored overlay set and drag state.
#[derive(Debug, Default)]
pub struct OverlayCompositor {
    overlays: HashMap<String, OverlayRecord>,
    drag: DragState,
}

impl OverlayCompositor {
    /// Creates an empty compositor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the mirrored overlay set.
    ///
    /// Records are keyed by id; a duplicate id keeps the last record seen.
    /// If the overlay being dragged disappeared from the set, the drag is
    /// cleared.
    pub fn set_overlays(&mut self, records: Vec<OverlayRecord>) {
        self.overlays = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        let drag_vanished = self
            .drag
            .dragging_id()
            .is_some_and(|id| !self.overlays.contains_key(id));
        if drag_vanished {
            debug!("dragged overlay removed from set, clearing drag");
            self.drag = DragState::default();
        }
    }

    /// Number of overlays in the mirrored set.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    /// Whether the mirrored set is empty.
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Current drag state.
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Looks up a mirrored overlay by id.
    pub fn get(&self, overlay_id: &str) -> Option<&OverlayRecord> {
        self.overlays.get(overlay_id)
    }

    /// Produces positioned visual descriptors for the current set.
    ///
    /// Pure with respect to the compositor's state: no I/O and no store
    /// mutation. Order is unspecified; styling strings pass through
    /// unchanged.
    pub fn render(&self) -> Vec<OverlayElement> {
        self.overlays
            .values()
            .map(|record| OverlayElement {
                id: record.id.clone(),
                text: record.text.clone(),
                top: record.top.clone(),
                left: record.left.clone(),
                color: record.color.clone(),
                font_size: record.font_size.clone(),
                background_color: record.background_color.clone(),
                dragging: self.drag.dragging_id() == Some(record.id.as_str()),
                captures_input: true,
                z_index: OVERLAY_Z_INDEX,
            })
            .collect()
    }

    /// Begins dragging the given overlay.
    ///
    /// Drag is exclusive: returns false (and changes nothing) if another
    /// overlay is already dragging or the id is not in the set.
    pub fn drag_start(&mut self, overlay_id: &str) -> bool {
        if self.drag.is_dragging() || !self.overlays.contains_key(overlay_id) {
            return false;
        }
        self.drag.overlay_id = Some(overlay_id.to_string());
        true
    }

    /// Ends the current drag.
    ///
    /// Only clears state when `overlay_id` matches the dragging overlay;
    /// a drag-end for any other id is a no-op. Returns the intent the
    /// shell may persist.
    pub fn drag_end(&mut self, overlay_id: &str) -> Option<DragIntent> {
        if self.drag.dragging_id() != Some(overlay_id) {
            return None;
        }
        self.drag = DragState::default();
        Some(DragIntent {
            overlay_id: overlay_id.to_string(),
        })
    }
}
