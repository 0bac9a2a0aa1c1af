// Reference integrity across palette and color deletions and insertions

use organizer_wasm::edit::{apply, EditRequest, Notification, Placement};
use organizer_wasm::models::{
    Color, ColorSelector, Document, EntryRef, Part, PartColor, PartSet, PartSlot, RecordKind,
    Session,
};

fn palette(name: &str, colors: usize) -> PartColor {
    PartColor {
        name: name.to_string(),
        colors: (0..colors).map(|_| Color::default()).collect(),
    }
}

fn part_with_selectors(selectors: &[(u16, u16)]) -> Part {
    Part {
        name: "HUM".to_string(),
        color_selectors: selectors
            .iter()
            .map(|(palette_index, color_index)| ColorSelector {
                palette_index: *palette_index,
                color_index: *color_index,
            })
            .collect(),
        ..Part::default()
    }
}

fn session_with(palettes: &[usize], selectors: &[(u16, u16)]) -> Session {
    let mut doc = Document::new();
    for (i, count) in palettes.iter().enumerate() {
        doc.part_colors.push(palette(&format!("pal{i}_"), *count));
    }
    let mut set = PartSet::default();
    set.parts.insert(PartSlot::FaceBase, part_with_selectors(selectors));
    doc.part_sets.push(set);
    Session::new(doc)
}

fn selector_pairs(session: &Session) -> Vec<(u16, u16)> {
    session.document.part(0, PartSlot::FaceBase).unwrap()
        .color_selectors
        .iter()
        .map(|s| (s.palette_index, s.color_index))
        .collect()
}

#[test]
fn deleting_a_referenced_palette_is_refused_and_leaves_everything_unchanged() {
    let mut session = session_with(&[2, 2], &[(0, 1)]);
    let before_doc = session.document.clone();
    let before_cache = session.render_cache.clone();

    let notifications = apply(
        &mut session,
        EditRequest::DeleteBatch {
            handles: vec![EntryRef::PartColor { part_color: 0 }],
        },
    );

    assert!(notifications.iter().any(|n| matches!(
        n,
        Notification::ConflictReported { pairs, .. } if pairs == &[(0, PartSlot::FaceBase)]
    )));
    assert_eq!(session.document, before_doc);
    assert_eq!(session.render_cache, before_cache);
}

#[test]
fn deleting_an_unreferenced_palette_shifts_later_references_down() {
    // Selectors at palettes 1 and 3; palette 2 is unreferenced
    let mut session = session_with(&[1, 1, 1, 1], &[(1, 0), (3, 0)]);

    apply(
        &mut session,
        EditRequest::DeleteBatch {
            handles: vec![EntryRef::PartColor { part_color: 2 }],
        },
    );

    assert_eq!(session.document.part_colors.len(), 3);
    assert_eq!(selector_pairs(&session), vec![(1, 0), (2, 0)]);
    assert!(session.render_cache.is_aligned_with(&session.document));
}

#[test]
fn inserting_a_palette_is_the_mirror_shift() {
    let mut session = session_with(&[1, 1, 1], &[(1, 0), (2, 0)]);

    apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::PartColor,
            placement: Placement::Insert,
            anchor: Some(EntryRef::PartColor { part_color: 2 }),
        },
    );

    assert_eq!(session.document.part_colors.len(), 4);
    // Reference below the insertion point stays, the one at it moves up
    assert_eq!(selector_pairs(&session), vec![(1, 0), (3, 0)]);
    assert!(session.render_cache.is_aligned_with(&session.document));
}

#[test]
fn color_deletion_scenario_from_a_face_selector() {
    // skin_ palette with three colors, face part selecting color 1
    let mut session = session_with(&[3], &[(0, 1), (0, 0)]);

    // Color 0 is referenced by the second selector: refused
    let notifications = apply(
        &mut session,
        EditRequest::DeleteBatch {
            handles: vec![EntryRef::Color {
                part_color: 0,
                index: 0,
            }],
        },
    );
    assert!(notifications
        .iter()
        .any(|n| matches!(n, Notification::ConflictReported { .. })));
    assert_eq!(session.document.part_colors[0].colors.len(), 3);

    // Color 2 is unreferenced: deletion succeeds, color 1 reference stays
    let notifications = apply(
        &mut session,
        EditRequest::DeleteBatch {
            handles: vec![EntryRef::Color {
                part_color: 0,
                index: 2,
            }],
        },
    );
    assert!(notifications
        .iter()
        .any(|n| matches!(n, Notification::StatusMessage(msg) if msg == "Deleted successfully")));
    assert_eq!(session.document.part_colors[0].colors.len(), 2);
    assert_eq!(selector_pairs(&session), vec![(0, 1), (0, 0)]);
    assert!(session.render_cache.is_aligned_with(&session.document));
}

#[test]
fn color_insertion_shifts_references_within_one_palette_only() {
    let mut session = session_with(&[3, 3], &[(0, 1), (1, 1)]);

    apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::Color,
            placement: Placement::Insert,
            anchor: Some(EntryRef::Color {
                part_color: 0,
                index: 0,
            }),
        },
    );

    assert_eq!(session.document.part_colors[0].colors.len(), 4);
    assert_eq!(selector_pairs(&session), vec![(0, 2), (1, 1)]);
    assert!(session.render_cache.is_aligned_with(&session.document));
}
