// Edit engine behaviors driven through the request boundary: placement
// semantics, slot adds, field edits

use organizer_wasm::edit::{apply, EditRequest, Notification, Placement};
use organizer_wasm::models::{
    CollectionKind, Document, EntryRef, FieldValue, Part, PartSet, PartSlot, Physics, Record,
    RecordKind, Session,
};

fn session_with_one_set() -> Session {
    let mut doc = Document::new();
    let mut set = PartSet::default();
    set.parts.insert(
        PartSlot::FaceBase,
        Part {
            name: "HUM".to_string(),
            ..Part::default()
        },
    );
    doc.part_sets.push(set);
    Session::new(doc)
}

#[test]
fn add_at_end_append_and_insert_cover_all_placements() {
    let mut session = Session::new(Document::new());

    for _ in 0..2 {
        apply(
            &mut session,
            EditRequest::Add {
                kind: RecordKind::Body,
                placement: Placement::AtEnd,
                anchor: None,
            },
        );
    }
    assert_eq!(session.document.bodies.len(), 2);

    apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::BoneScale,
            placement: Placement::AtEnd,
            anchor: Some(EntryRef::Body { body: 0 }),
        },
    );
    apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::BoneScale,
            placement: Placement::Insert,
            anchor: Some(EntryRef::BoneScale { body: 0, index: 0 }),
        },
    );
    apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::BoneScale,
            placement: Placement::Append,
            anchor: Some(EntryRef::BoneScale { body: 0, index: 0 }),
        },
    );
    assert_eq!(session.document.bodies[0].bone_scales.len(), 3);
    assert!(session.document.bodies[1].bone_scales.is_empty());
}

#[test]
fn add_part_propagates_the_first_parts_name() {
    let mut session = session_with_one_set();

    let notifications = apply(
        &mut session,
        EditRequest::AddPart {
            anchor: EntryRef::PartSet { part_set: 0 },
            slot: PartSlot::Hair,
        },
    );

    let hair = session.document.part(0, PartSlot::Hair).unwrap();
    assert_eq!(hair.name, "HUM");
    assert!(notifications.iter().any(|n| matches!(
        n,
        Notification::EntryLoaded {
            record: Record::Part(_),
            ..
        }
    )));

    // An empty set yields an empty default name
    apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::PartSet,
            placement: Placement::AtEnd,
            anchor: None,
        },
    );
    apply(
        &mut session,
        EditRequest::AddPart {
            anchor: EntryRef::PartSet { part_set: 1 },
            slot: PartSlot::Boots,
        },
    );
    assert_eq!(session.document.part(1, PartSlot::Boots).unwrap().name, "");
}

#[test]
fn add_part_refuses_an_occupied_slot() {
    let mut session = session_with_one_set();
    let notifications = apply(
        &mut session,
        EditRequest::AddPart {
            anchor: EntryRef::PartSet { part_set: 0 },
            slot: PartSlot::FaceBase,
        },
    );
    assert_eq!(
        notifications,
        vec![Notification::StatusMessage(
            "Face Base part already exists in this set".to_string()
        )]
    );
    assert_eq!(session.document.part_sets[0].parts.len(), 1);
}

#[test]
fn added_physics_inherits_the_owning_parts_name() {
    let mut session = session_with_one_set();
    apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::Physics,
            placement: Placement::AtEnd,
            anchor: Some(EntryRef::Part {
                part_set: 0,
                slot: PartSlot::FaceBase,
            }),
        },
    );
    let physics: &Physics = session.document.physics(0, PartSlot::FaceBase, 0).unwrap();
    assert_eq!(physics.name, "HUM");
}

#[test]
fn field_edit_applies_and_reports_a_reindex() {
    let mut session = session_with_one_set();
    let handle = EntryRef::Part {
        part_set: 0,
        slot: PartSlot::FaceBase,
    };

    let notifications = apply(
        &mut session,
        EditRequest::FieldEdit {
            handle,
            field: "model".to_string(),
            value: FieldValue::Int(42),
        },
    );
    assert_eq!(
        notifications,
        vec![Notification::Reindexed(CollectionKind::PartSets)]
    );
    assert_eq!(session.document.part(0, PartSlot::FaceBase).unwrap().model, 42);
}

#[test]
fn field_edit_enforces_the_three_character_name_limit() {
    let mut session = session_with_one_set();
    let handle = EntryRef::Part {
        part_set: 0,
        slot: PartSlot::FaceBase,
    };

    let notifications = apply(
        &mut session,
        EditRequest::FieldEdit {
            handle,
            field: "name".to_string(),
            value: FieldValue::Text("HUMAN".to_string()),
        },
    );
    assert!(matches!(
        notifications.as_slice(),
        [Notification::StatusMessage(_)]
    ));
    assert_eq!(session.document.part(0, PartSlot::FaceBase).unwrap().name, "HUM");
}

#[test]
fn out_of_range_add_is_recovered_as_a_status_message() {
    let mut session = Session::new(Document::new());
    let notifications = apply(
        &mut session,
        EditRequest::Add {
            kind: RecordKind::PartSet,
            placement: Placement::Append,
            anchor: Some(EntryRef::PartSet { part_set: 7 }),
        },
    );
    assert!(matches!(
        notifications.as_slice(),
        [Notification::StatusMessage(_)]
    ));
    assert!(session.document.part_sets.is_empty());
}

#[test]
fn select_loads_the_record_for_the_detail_form() {
    let mut session = session_with_one_set();
    let handle = EntryRef::Part {
        part_set: 0,
        slot: PartSlot::FaceBase,
    };
    let notifications = apply(&mut session, EditRequest::Select { handle });
    match notifications.as_slice() {
        [Notification::EntryLoaded {
            entry,
            record: Record::Part(part),
        }] => {
            assert_eq!(*entry, handle);
            assert_eq!(part.name, "HUM");
        }
        other => panic!("unexpected notifications: {other:?}"),
    }
}
