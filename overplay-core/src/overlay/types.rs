//! Overlay record types mirrored from the remote store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest overlay text accepted by validation.
pub const MAX_TEXT_LEN: usize = 50;

fn default_background() -> String {
    "rgba(0,0,0,0.5)".to_string()
}

/// A positioned text overlay, as stored by the remote overlay store.
///
/// Position, size, and color fields are opaque CSS strings; the core never
/// parses them and passes them through to the rendering layer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRecord {
    /// Store-assigned identifier, unique within the active set.
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub top: String,
    pub left: String,
    pub color: String,
    #[serde(rename = "fontSize")]
    pub font_size: String,
    #[serde(rename = "backgroundColor", default = "default_background")]
    pub background_color: String,
}

/// An overlay without a store identity, used for create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDraft {
    pub text: String,
    pub top: String,
    pub left: String,
    pub color: String,
    #[serde(rename = "fontSize")]
    pub font_size: String,
    #[serde(rename = "backgroundColor", default = "default_background")]
    pub background_color: String,
}

impl OverlayDraft {
    /// Validates the draft before any network call.
    ///
    /// # Errors
    ///
    /// - `OverlayError::InvalidText` - Empty text or longer than 50 characters
    pub fn validate(&self) -> Result<(), OverlayError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(OverlayError::InvalidText {
                reason: "overlay text is empty".to_string(),
            });
        }
        if text.chars().count() > MAX_TEXT_LEN {
            return Err(OverlayError::InvalidText {
                reason: format!("overlay text exceeds {MAX_TEXT_LEN} characters"),
            });
        }
        Ok(())
    }
}

/// Errors raised by overlay validation and composition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OverlayError {
    /// Overlay text failed the 1..=50 character check.
    #[error("invalid overlay text: {reason}")]
    InvalidText { reason: String },
}
