//! Editing session state
//!
//! The session is the WASM-owned source of truth: the active document, the
//! render cache that must track it, and the last copied batch. Engines
//! receive the session (or just the document) by reference; nothing below
//! the API layer reaches for globals.

use serde::{Deserialize, Serialize};

use super::core::Document;
use super::entries::{Record, RecordKind};
use super::render_cache::RenderCache;

/// The last copied batch, held by the session instead of the OS clipboard
///
/// Either a run of records of one kind, or a run of whole sub-lists whose
/// elements are of one kind (copied from list container nodes).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ClipboardBatch {
    Items {
        kind: RecordKind,
        records: Vec<Record>,
    },
    Lists {
        kind: RecordKind,
        lists: Vec<Vec<Record>>,
    },
}

impl ClipboardBatch {
    pub fn kind(&self) -> RecordKind {
        match self {
            ClipboardBatch::Items { kind, .. } | ClipboardBatch::Lists { kind, .. } => *kind,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ClipboardBatch::Items { records, .. } => records.len(),
            ClipboardBatch::Lists { lists, .. } => lists.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Status-bar description, e.g. "3 Color items" or "2 Physics lists"
    pub fn describe(&self) -> String {
        match self {
            ClipboardBatch::Items { kind, records } => {
                format!("{} {} items", records.len(), kind.readable_name())
            }
            ClipboardBatch::Lists { kind, lists } => {
                format!("{} {} lists", lists.len(), kind.readable_name())
            }
        }
    }
}

/// One editing session: document, aligned render cache, clipboard
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub document: Document,
    pub render_cache: RenderCache,
    pub clipboard: Option<ClipboardBatch>,
}

impl Session {
    /// Start a session over a loaded document, deriving the render cache
    pub fn new(document: Document) -> Self {
        let mut render_cache = RenderCache::new();
        render_cache.rebuild(&document);
        Self {
            document,
            render_cache,
            clipboard: None,
        }
    }

    /// Swap in a newly loaded document, dropping stale cache rows
    ///
    /// The clipboard survives a load so a batch can be pasted across
    /// documents.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.render_cache.rebuild(&self.document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entries::{Color, ColorSelector, PartColor};

    #[test]
    fn new_session_derives_an_aligned_cache() {
        let mut document = Document::new();
        document.part_colors.push(PartColor {
            name: "skin_".to_string(),
            colors: vec![Color::default(), Color::default()],
        });
        let session = Session::new(document);
        assert!(session.render_cache.is_aligned_with(&session.document));
    }

    #[test]
    fn clipboard_survives_document_replacement() {
        let mut session = Session::new(Document::new());
        session.clipboard = Some(ClipboardBatch::Items {
            kind: RecordKind::ColorSelector,
            records: vec![Record::ColorSelector(ColorSelector {
                palette_index: 1,
                color_index: 0,
            })],
        });
        session.replace_document(Document::new());
        assert!(session.clipboard.is_some());
    }

    #[test]
    fn batch_description_names_kind_and_count() {
        let batch = ClipboardBatch::Lists {
            kind: RecordKind::Physics,
            lists: vec![Vec::new(), Vec::new()],
        };
        assert_eq!(batch.describe(), "2 Physics lists");
    }
}
