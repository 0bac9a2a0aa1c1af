//! Shared types for the WASM API
//!
//! Result structures crossing the boundary to the JavaScript view.

use serde::{Deserialize, Serialize};

use crate::edit::Notification;
use crate::models::{EntryRef, RecordKind};

/// One selector that failed to resolve after a document load
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InvalidSelector {
    pub entry: EntryRef,
    pub palette_index: u16,
    pub color_index: u16,
}

/// Result of loading a document into the session
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoadResult {
    pub notifications: Vec<Notification>,
    /// Selectors referencing palettes or colors the document does not have
    pub invalid_selectors: Vec<InvalidSelector>,
}

/// What the session clipboard currently holds
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClipboardInfo {
    pub kind: RecordKind,
    pub count: usize,
    pub is_list_batch: bool,
}
