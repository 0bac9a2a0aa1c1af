//! Structural edit engine
//!
//! Every user action arrives here as one `EditRequest`, mutates the model
//! synchronously as one atomic batch, and leaves as a list of outbound
//! notifications for the view. All error conditions are recovered at this
//! boundary: nothing below it panics for a bad index or a vetoed delete,
//! and the model is left fully consistent whether a batch applies
//! completely, partially, or not at all.

pub mod operations;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clipboard;
use crate::models::{
    CollectionKind, EntryRef, FieldError, FieldValue, OutOfRange, PartSlot, Record, RecordKind,
    Session,
};

/// Where a new record lands relative to its anchor
///
/// `Append` inserts after the anchor, `Insert` before it, `AtEnd` at the
/// end of the owning collection. These are the only placement semantics.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Append,
    Insert,
    AtEnd,
}

/// One inbound user action
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum EditRequest {
    Add {
        kind: RecordKind,
        placement: Placement,
        anchor: Option<EntryRef>,
    },
    AddPart {
        anchor: EntryRef,
        slot: PartSlot,
    },
    DeleteBatch {
        handles: Vec<EntryRef>,
    },
    FieldEdit {
        handle: EntryRef,
        field: String,
        value: FieldValue,
    },
    Copy {
        handles: Vec<EntryRef>,
    },
    Paste {
        handles: Vec<EntryRef>,
    },
    Select {
        handle: EntryRef,
    },
}

/// Outbound notification for the external view
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Notification {
    /// The named collection changed shape or labels; relabel its tree
    Reindexed(CollectionKind),
    /// A delete was vetoed; present the referencing (part set, slot) pairs
    ConflictReported {
        kind: RecordKind,
        pairs: Vec<(usize, PartSlot)>,
    },
    /// A record was selected; populate the detail form
    EntryLoaded { entry: EntryRef, record: Record },
    StatusMessage(String),
}

/// Recoverable edit failures
///
/// Dangling selector references are deliberately absent: they are a
/// tolerated state rendered with a sentinel, not an error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditError {
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
    #[error("cannot use {found} here, expected {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("record is still referenced by {} part(s)", .0.len())]
    ReferenceConflict(Vec<(usize, PartSlot)>),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("{} part already exists in this set", .0.title())]
    SlotOccupied(PartSlot),
    #[error("entry no longer exists")]
    StaleHandle,
}

/// Apply one user action and report what the view must do
///
/// The single entry point of the engine. Multi-item batches are per-item
/// best-effort: a vetoed delete is reported and skipped while the rest of
/// the batch proceeds. Exactly one reindex notification is emitted per
/// affected collection per call.
pub fn apply(session: &mut Session, request: EditRequest) -> Vec<Notification> {
    match request {
        EditRequest::Add {
            kind,
            placement,
            anchor,
        } => match operations::add_record(session, kind, placement, anchor) {
            Ok(entry) => {
                debug_assert!(session.render_cache.is_aligned_with(&session.document));
                let mut notifications = added_notifications(session, entry);
                notifications.push(Notification::StatusMessage(format!(
                    "Added {} successfully",
                    kind.readable_name()
                )));
                notifications
            }
            Err(err) => refusal(err),
        },
        EditRequest::AddPart { anchor, slot } => {
            match operations::add_part(session, anchor, slot) {
                Ok(entry) => {
                    let mut notifications = added_notifications(session, entry);
                    notifications.push(Notification::StatusMessage(format!(
                        "Added {} part successfully",
                        slot.title()
                    )));
                    notifications
                }
                Err(err) => refusal(err),
            }
        }
        EditRequest::DeleteBatch { handles } => delete_batch(session, handles),
        EditRequest::FieldEdit {
            handle,
            field,
            value,
        } => match operations::field_edit(session, handle, &field, &value) {
            Ok(kind) => vec![Notification::Reindexed(kind)],
            Err(err) => refusal(err),
        },
        EditRequest::Copy { handles } => clipboard::copy(session, &handles),
        EditRequest::Paste { handles } => clipboard::paste(session, &handles),
        EditRequest::Select { handle } => match session.document.record(handle) {
            Some(record) => vec![Notification::EntryLoaded {
                entry: handle,
                record,
            }],
            None => Vec::new(),
        },
    }
}

fn added_notifications(session: &Session, entry: EntryRef) -> Vec<Notification> {
    let mut notifications = vec![Notification::Reindexed(operations::collection_of(entry))];
    if let Some(record) = session.document.record(entry) {
        notifications.push(Notification::EntryLoaded { entry, record });
    }
    notifications
}

fn refusal(err: EditError) -> Vec<Notification> {
    log::warn!("edit refused: {err}");
    match err {
        EditError::ReferenceConflict(pairs) => vec![Notification::ConflictReported {
            kind: RecordKind::PartColor,
            pairs,
        }],
        other => vec![Notification::StatusMessage(other.to_string())],
    }
}

fn delete_batch(session: &mut Session, handles: Vec<EntryRef>) -> Vec<Notification> {
    let mut notifications = Vec::new();
    let mut reindexed: Vec<CollectionKind> = Vec::new();
    let mut deleted = 0usize;

    let batch = operations::topmost_in_reverse_order(&handles);
    for entry in batch {
        match operations::delete_one(session, entry) {
            Ok(kind) => {
                deleted += 1;
                if !reindexed.contains(&kind) {
                    reindexed.push(kind);
                }
            }
            Err(EditError::ReferenceConflict(pairs)) => {
                let kind = entry.record_kind().unwrap_or(RecordKind::PartColor);
                notifications.push(Notification::ConflictReported { kind, pairs });
            }
            // Stale or out-of-range handles are dropped; the rest of the
            // batch still proceeds.
            Err(err) => {
                log::warn!("delete skipped: {err}");
            }
        }
    }

    debug_assert!(session.render_cache.is_aligned_with(&session.document));
    for kind in reindexed {
        notifications.push(Notification::Reindexed(kind));
    }
    if deleted > 0 {
        notifications.push(Notification::StatusMessage("Deleted successfully".to_string()));
    }
    notifications
}
