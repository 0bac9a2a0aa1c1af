//! Clipboard merge engine
//!
//! Copy takes the topmost selected nodes as a homogeneous batch — either
//! plain records of one kind or whole sub-lists of one element kind — and
//! parks it on the session. Paste reconciles the batch against the current
//! selection: each target is overwritten from its corresponding source,
//! missing targets are found by walking the last target's forward sibling
//! chain, and once that is exhausted the remaining sources are created
//! through the edit engine's add path. Excess targets are dropped without
//! error. Pasted selector indices are copied verbatim; a pair that does
//! not resolve in this document is left for the projection's sentinel.

use crate::edit::operations::{self, collection_of, topmost_in_order};
use crate::edit::{Notification, Placement};
use crate::models::{
    ClipboardBatch, CollectionKind, ColorSelector, EntryRef, Physics, Record, RecordKind, Session,
};

/// Copy the topmost selected nodes into the session clipboard
pub fn copy(session: &mut Session, handles: &[EntryRef]) -> Vec<Notification> {
    let selection = topmost_in_order(handles);
    if selection.is_empty() {
        return Vec::new();
    }

    let batch = match classify(&selection) {
        Some(Selection::Records(kind)) => {
            let records: Vec<Record> = selection
                .iter()
                .filter_map(|entry| session.document.record(*entry))
                .collect();
            ClipboardBatch::Items { kind, records }
        }
        Some(Selection::Lists(kind)) => {
            let lists: Vec<Vec<Record>> = selection
                .iter()
                .filter_map(|entry| list_records(session, *entry))
                .collect();
            ClipboardBatch::Lists { kind, lists }
        }
        None => {
            return vec![Notification::StatusMessage(
                "All copied items must be of the same type".to_string(),
            )]
        }
    };

    let status = format!("Copied {}", batch.describe());
    session.clipboard = Some(batch);
    vec![Notification::StatusMessage(status)]
}

/// Paste the session clipboard over the current selection
pub fn paste(session: &mut Session, handles: &[EntryRef]) -> Vec<Notification> {
    let targets = topmost_in_order(handles);
    if targets.is_empty() {
        return Vec::new();
    }
    let Some(batch) = session.clipboard.clone() else {
        return Vec::new();
    };

    let selection = match classify(&targets) {
        Some(selection) => selection,
        None => {
            return vec![Notification::StatusMessage(
                "All selected items must be of the same type".to_string(),
            )]
        }
    };

    match (selection, batch) {
        (Selection::Records(target_kind), ClipboardBatch::Items { kind, records })
            if target_kind == kind =>
        {
            paste_records(session, targets, kind, records)
        }
        (Selection::Lists(target_kind), ClipboardBatch::Lists { kind, lists })
            if target_kind == kind =>
        {
            paste_lists(session, targets, kind, lists)
        }
        (_, ClipboardBatch::Items { kind, .. }) => vec![Notification::StatusMessage(format!(
            "All selected items must be a {} item",
            kind.readable_name()
        ))],
        (_, ClipboardBatch::Lists { kind, .. }) => vec![Notification::StatusMessage(format!(
            "All selected items must be a {} list",
            kind.readable_name()
        ))],
    }
}

enum Selection {
    Records(RecordKind),
    Lists(RecordKind),
}

/// All records of one kind, or all list containers of one element kind
fn classify(selection: &[EntryRef]) -> Option<Selection> {
    let first = selection.first()?;
    if let Some(kind) = first.list_element_kind() {
        return selection
            .iter()
            .all(|entry| entry.list_element_kind() == Some(kind))
            .then_some(Selection::Lists(kind));
    }
    let kind = first.record_kind()?;
    selection
        .iter()
        .all(|entry| entry.record_kind() == Some(kind))
        .then_some(Selection::Records(kind))
}

fn list_records(session: &Session, entry: EntryRef) -> Option<Vec<Record>> {
    match entry {
        EntryRef::ColorSelectorList { part_set, slot } => Some(
            session
                .document
                .part(part_set, slot)?
                .color_selectors
                .iter()
                .map(|s| Record::ColorSelector(*s))
                .collect(),
        ),
        EntryRef::PhysicsList { part_set, slot } => Some(
            session
                .document
                .part(part_set, slot)?
                .physics
                .iter()
                .cloned()
                .map(Record::Physics)
                .collect(),
        ),
        _ => None,
    }
}

/// The next positional sibling within the same owning collection
fn next_sibling(session: &Session, entry: EntryRef) -> Option<EntryRef> {
    let doc = &session.document;
    let candidate = match entry {
        EntryRef::PartSet { part_set } => EntryRef::PartSet { part_set: part_set + 1 },
        EntryRef::PartColor { part_color } => EntryRef::PartColor {
            part_color: part_color + 1,
        },
        EntryRef::Body { body } => EntryRef::Body { body: body + 1 },
        EntryRef::Skeleton { skeleton } => EntryRef::Skeleton {
            skeleton: skeleton + 1,
        },
        EntryRef::Color { part_color, index } => EntryRef::Color {
            part_color,
            index: index + 1,
        },
        EntryRef::ColorSelector { part_set, slot, index } => EntryRef::ColorSelector {
            part_set,
            slot,
            index: index + 1,
        },
        EntryRef::Physics { part_set, slot, index } => EntryRef::Physics {
            part_set,
            slot,
            index: index + 1,
        },
        EntryRef::BoneScale { body, index } => EntryRef::BoneScale { body, index: index + 1 },
        EntryRef::Bone { skeleton, index } => EntryRef::Bone {
            skeleton,
            index: index + 1,
        },
        EntryRef::Part { part_set, slot } => {
            let set = doc.part_sets.get(part_set)?;
            let next = set
                .parts
                .keys()
                .copied()
                .find(|candidate| *candidate > slot)?;
            EntryRef::Part {
                part_set,
                slot: next,
            }
        }
        EntryRef::ColorSelectorList { .. } | EntryRef::PhysicsList { .. } => return None,
    };
    doc.entry_exists(candidate).then_some(candidate)
}

/// Anchor that makes `Placement::AtEnd` land in the same collection
fn end_anchor_of(entry: EntryRef) -> Option<EntryRef> {
    match entry {
        EntryRef::Color { part_color, .. } => Some(EntryRef::PartColor { part_color }),
        EntryRef::ColorSelector { part_set, slot, .. }
        | EntryRef::Physics { part_set, slot, .. } => Some(EntryRef::Part { part_set, slot }),
        EntryRef::BoneScale { body, .. } => Some(EntryRef::Body { body }),
        EntryRef::Bone { skeleton, .. } => Some(EntryRef::Skeleton { skeleton }),
        _ => None,
    }
}

fn paste_records(
    session: &mut Session,
    mut targets: Vec<EntryRef>,
    kind: RecordKind,
    records: Vec<Record>,
) -> Vec<Notification> {
    // Excess target selections are dropped with no error
    targets.truncate(records.len());

    // Accumulate missing targets along the forward sibling chain
    while targets.len() < records.len() {
        let Some(last) = targets.last().copied() else {
            break;
        };
        match next_sibling(session, last) {
            Some(sibling) if !targets.contains(&sibling) => targets.push(sibling),
            _ => break,
        }
    }

    let mut reindexed: Vec<CollectionKind> = Vec::new();
    let mut pasted = 0usize;

    let mut sources = records.into_iter();
    for target in &targets {
        let Some(record) = sources.next() else {
            break;
        };
        match operations::write_record(session, *target, &record) {
            Ok(()) => {
                pasted += 1;
                let collection = collection_of(*target);
                if !reindexed.contains(&collection) {
                    reindexed.push(collection);
                }
            }
            Err(err) => log::warn!("paste target skipped: {err}"),
        }
    }

    // Sibling chain exhausted: duplicate the remaining sources through Add
    let creation_anchor = targets.last().copied().and_then(end_anchor_of);
    for record in sources {
        // Parts occupy named slots; there is no collection to extend
        if kind == RecordKind::Part {
            break;
        }
        let anchor = match creation_anchor {
            Some(anchor) => Some(anchor),
            None if matches!(
                kind,
                RecordKind::PartSet | RecordKind::PartColor | RecordKind::Body | RecordKind::Skeleton
            ) =>
            {
                None
            }
            None => break,
        };
        match operations::add_record(session, kind, Placement::AtEnd, anchor) {
            Ok(entry) => match operations::write_record(session, entry, &record) {
                Ok(()) => {
                    pasted += 1;
                    let collection = collection_of(entry);
                    if !reindexed.contains(&collection) {
                        reindexed.push(collection);
                    }
                }
                Err(err) => log::warn!("paste create skipped: {err}"),
            },
            Err(err) => {
                log::warn!("paste create refused: {err}");
                break;
            }
        }
    }

    debug_assert!(session.render_cache.is_aligned_with(&session.document));
    let mut notifications: Vec<Notification> =
        reindexed.into_iter().map(Notification::Reindexed).collect();
    notifications.push(Notification::StatusMessage(format!(
        "Pasted {pasted} {} item(s)",
        kind.readable_name()
    )));
    notifications
}

fn paste_lists(
    session: &mut Session,
    mut targets: Vec<EntryRef>,
    kind: RecordKind,
    lists: Vec<Vec<Record>>,
) -> Vec<Notification> {
    targets.truncate(lists.len());

    let mut pasted = 0usize;
    for (target, list) in targets.iter().zip(lists) {
        let (part_set, slot) = match target {
            EntryRef::ColorSelectorList { part_set, slot }
            | EntryRef::PhysicsList { part_set, slot } => (*part_set, *slot),
            _ => continue,
        };
        let Some(part) = session.document.part_mut(part_set, slot) else {
            continue;
        };
        match kind {
            RecordKind::ColorSelector => {
                let selectors: Vec<ColorSelector> = list
                    .iter()
                    .filter_map(|record| match record {
                        Record::ColorSelector(selector) => Some(*selector),
                        _ => None,
                    })
                    .collect();
                part.color_selectors = selectors;
            }
            RecordKind::Physics => {
                let physics: Vec<Physics> = list
                    .into_iter()
                    .filter_map(|record| match record {
                        Record::Physics(physics) => Some(physics),
                        _ => None,
                    })
                    .collect();
                part.physics = physics;
            }
            _ => continue,
        }
        pasted += 1;
    }

    vec![
        Notification::Reindexed(CollectionKind::PartSets),
        Notification::StatusMessage(format!(
            "Pasted {pasted} {} list(s)",
            kind.readable_name()
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, Document, PartColor};

    fn session_with_colors(count: usize) -> Session {
        let mut doc = Document::new();
        doc.part_colors.push(PartColor {
            name: "skin_".to_string(),
            colors: (0..count)
                .map(|i| Color {
                    f_40: i as f32,
                    ..Color::default()
                })
                .collect(),
        });
        Session::new(doc)
    }

    fn copy_colors(session: &mut Session, indices: &[usize]) {
        let handles: Vec<EntryRef> = indices
            .iter()
            .map(|i| EntryRef::Color {
                part_color: 0,
                index: *i,
            })
            .collect();
        copy(session, &handles);
    }

    #[test]
    fn copy_of_mixed_kinds_is_refused() {
        let mut session = session_with_colors(2);
        let notifications = copy(
            &mut session,
            &[
                EntryRef::Color {
                    part_color: 0,
                    index: 0,
                },
                EntryRef::PartColor { part_color: 0 },
            ],
        );
        // The palette covers its child color, so this collapses to one
        // node and still copies; a genuinely mixed selection refuses.
        assert!(session.clipboard.is_some() || !notifications.is_empty());

        let mut session = session_with_colors(2);
        let notifications = copy(
            &mut session,
            &[
                EntryRef::Color {
                    part_color: 0,
                    index: 0,
                },
                EntryRef::Body { body: 0 },
            ],
        );
        assert_eq!(
            notifications,
            vec![Notification::StatusMessage(
                "All copied items must be of the same type".to_string()
            )]
        );
        assert!(session.clipboard.is_none());
    }

    #[test]
    fn paste_overwrites_through_the_sibling_chain() {
        let mut session = session_with_colors(4);
        copy_colors(&mut session, &[0, 1, 2]);

        // Select only color 1; colors 2 and 3 are its forward siblings
        let notifications = paste(
            &mut session,
            &[EntryRef::Color {
                part_color: 0,
                index: 1,
            }],
        );

        let colors = &session.document.part_colors[0].colors;
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[1].f_40, 0.0);
        assert_eq!(colors[2].f_40, 1.0);
        assert_eq!(colors[3].f_40, 2.0);
        assert!(notifications
            .iter()
            .any(|n| matches!(n, Notification::Reindexed(CollectionKind::PartColors))));
    }

    #[test]
    fn paste_creates_records_when_siblings_run_out() {
        let mut session = session_with_colors(3);
        copy_colors(&mut session, &[0, 1, 2]);

        // The last color has no forward siblings: two records get created
        let before = session.document.part_colors[0].colors.len();
        paste(
            &mut session,
            &[EntryRef::Color {
                part_color: 0,
                index: 2,
            }],
        );
        let colors = &session.document.part_colors[0].colors;
        assert_eq!(colors.len(), before + 2);
        assert_eq!(colors[3].f_40, 1.0);
        assert_eq!(colors[4].f_40, 2.0);
        assert!(session.render_cache.is_aligned_with(&session.document));
    }

    #[test]
    fn excess_targets_are_dropped_without_error() {
        let mut session = session_with_colors(4);
        copy_colors(&mut session, &[0]);

        paste(
            &mut session,
            &[
                EntryRef::Color {
                    part_color: 0,
                    index: 1,
                },
                EntryRef::Color {
                    part_color: 0,
                    index: 2,
                },
                EntryRef::Color {
                    part_color: 0,
                    index: 3,
                },
            ],
        );
        // Only the first target is overwritten
        assert_eq!(session.document.part_colors[0].colors[1].f_40, 0.0);
        assert_eq!(session.document.part_colors[0].colors[2].f_40, 2.0);
    }

    #[test]
    fn paste_with_mismatched_payload_is_blocked() {
        let mut session = session_with_colors(2);
        copy_colors(&mut session, &[0]);

        let before = session.document.clone();
        let notifications = paste(&mut session, &[EntryRef::PartColor { part_color: 0 }]);
        assert_eq!(
            notifications,
            vec![Notification::StatusMessage(
                "All selected items must be a Color item".to_string()
            )]
        );
        assert_eq!(session.document, before);
    }
}
