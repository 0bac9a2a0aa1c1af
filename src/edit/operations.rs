//! Mutation primitives behind the edit engine
//!
//! Each operation works against one target collection and index, keeps the
//! render cache aligned in the same transaction, and routes every palette
//! shape change through the reference resolver.

use crate::models::{
    fields, insert_at, remove_at, CollectionKind, ColorSelector, EntryRef, FieldValue, Part,
    PartColor, PartSlot, Physics, Record, RecordKind, Session,
};
use crate::resolver;

use super::{EditError, Placement};

/// The top-level collection a handle belongs to
pub fn collection_of(entry: EntryRef) -> CollectionKind {
    match entry {
        EntryRef::PartSet { .. }
        | EntryRef::Part { .. }
        | EntryRef::ColorSelectorList { .. }
        | EntryRef::ColorSelector { .. }
        | EntryRef::PhysicsList { .. }
        | EntryRef::Physics { .. } => CollectionKind::PartSets,
        EntryRef::PartColor { .. } | EntryRef::Color { .. } => CollectionKind::PartColors,
        EntryRef::Body { .. } | EntryRef::BoneScale { .. } => CollectionKind::Bodies,
        EntryRef::Skeleton { .. } | EntryRef::Bone { .. } => CollectionKind::Skeletons,
    }
}

/// Document-order sort key for batch processing
fn position_key(entry: EntryRef) -> (u8, usize, usize, usize, u8) {
    match entry {
        EntryRef::PartSet { part_set } => (0, part_set, 0, 0, 0),
        EntryRef::Part { part_set, slot } => (0, part_set, slot.ordinal(), 0, 1),
        EntryRef::ColorSelectorList { part_set, slot } => (0, part_set, slot.ordinal(), 0, 2),
        EntryRef::ColorSelector { part_set, slot, index } => {
            (0, part_set, slot.ordinal(), index, 3)
        }
        EntryRef::PhysicsList { part_set, slot } => (0, part_set, slot.ordinal(), 0, 4),
        EntryRef::Physics { part_set, slot, index } => (0, part_set, slot.ordinal(), index, 5),
        EntryRef::PartColor { part_color } => (1, part_color, 0, 0, 0),
        EntryRef::Color { part_color, index } => (1, part_color, index, 0, 1),
        EntryRef::Body { body } => (2, body, 0, 0, 0),
        EntryRef::BoneScale { body, index } => (2, body, index, 0, 1),
        EntryRef::Skeleton { skeleton } => (3, skeleton, 0, 0, 0),
        EntryRef::Bone { skeleton, index } => (3, skeleton, index, 0, 1),
    }
}

/// Reduce a selection to its topmost nodes, in document order
///
/// A selected node with a selected ancestor is dropped: a batch operation
/// on the container already covers its children.
pub fn topmost_in_order(handles: &[EntryRef]) -> Vec<EntryRef> {
    let mut nodes: Vec<EntryRef> = handles
        .iter()
        .copied()
        .filter(|entry| {
            !handles
                .iter()
                .any(|other| other != entry && entry.is_descendant_of(other))
        })
        .collect();
    nodes.sort_by_key(|entry| position_key(*entry));
    nodes.dedup();
    nodes
}

/// Topmost selection in reverse document order
///
/// Delete batches run back to front so earlier deletions cannot
/// invalidate the later indices.
pub fn topmost_in_reverse_order(handles: &[EntryRef]) -> Vec<EntryRef> {
    let mut nodes = topmost_in_order(handles);
    nodes.reverse();
    nodes
}

fn placed_index(placement: Placement, anchor_index: usize, len: usize) -> usize {
    match placement {
        Placement::Append => anchor_index + 1,
        Placement::Insert => anchor_index,
        Placement::AtEnd => len,
    }
}

fn mismatch(expected: &'static str, anchor: Option<EntryRef>) -> EditError {
    EditError::TypeMismatch {
        expected,
        found: match anchor.and_then(|a| a.record_kind()) {
            Some(kind) => kind.readable_name(),
            None => "no selection",
        },
    }
}

/// Create a zero-valued record and insert it at the placement-computed
/// index, returning the handle of the new record
///
/// Palette and color inserts update the render cache row and shift every
/// selector reference at or past the insertion point in the same
/// transaction.
pub fn add_record(
    session: &mut Session,
    kind: RecordKind,
    placement: Placement,
    anchor: Option<EntryRef>,
) -> Result<EntryRef, EditError> {
    let doc = &mut session.document;
    match kind {
        RecordKind::PartSet => {
            let index = match (placement, anchor) {
                (Placement::AtEnd, _) => doc.part_sets.len(),
                (_, Some(EntryRef::PartSet { part_set })) => {
                    placed_index(placement, part_set, doc.part_sets.len())
                }
                _ => return Err(mismatch("Part Set", anchor)),
            };
            insert_at(&mut doc.part_sets, index, Default::default())?;
            Ok(EntryRef::PartSet { part_set: index })
        }
        RecordKind::PartColor => {
            let index = match (placement, anchor) {
                (Placement::AtEnd, _) => doc.part_colors.len(),
                (_, Some(EntryRef::PartColor { part_color })) => {
                    placed_index(placement, part_color, doc.part_colors.len())
                }
                _ => return Err(mismatch("Part Color", anchor)),
            };
            insert_at(&mut doc.part_colors, index, PartColor::default())?;
            session.render_cache.insert_palette(index);
            resolver::shift_references(&mut session.document, index, None, 1);
            Ok(EntryRef::PartColor { part_color: index })
        }
        RecordKind::Color => {
            let (palette, index) = match (placement, anchor) {
                (Placement::AtEnd, Some(EntryRef::PartColor { part_color })) => {
                    let len = doc
                        .part_colors
                        .get(part_color)
                        .ok_or(EditError::StaleHandle)?
                        .colors
                        .len();
                    (part_color, len)
                }
                (_, Some(EntryRef::Color { part_color, index })) => {
                    let len = doc
                        .part_colors
                        .get(part_color)
                        .ok_or(EditError::StaleHandle)?
                        .colors
                        .len();
                    (part_color, placed_index(placement, index, len))
                }
                _ => return Err(mismatch("Color", anchor)),
            };
            let palette_record = doc
                .part_colors
                .get_mut(palette)
                .ok_or(EditError::StaleHandle)?;
            insert_at(&mut palette_record.colors, index, Default::default())?;
            session.render_cache.insert_color(palette, index);
            resolver::shift_references(&mut session.document, palette, Some(index), 1);
            Ok(EntryRef::Color {
                part_color: palette,
                index,
            })
        }
        RecordKind::ColorSelector => {
            let (part_set, slot, index) = sub_list_target(
                doc,
                placement,
                anchor,
                "Color Selector",
                |entry| match entry {
                    EntryRef::ColorSelector { part_set, slot, index } => {
                        Some((part_set, slot, Some(index)))
                    }
                    EntryRef::ColorSelectorList { part_set, slot }
                    | EntryRef::Part { part_set, slot } => Some((part_set, slot, None)),
                    _ => None,
                },
                |part| part.color_selectors.len(),
            )?;
            let part = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            insert_at(&mut part.color_selectors, index, ColorSelector::default())?;
            Ok(EntryRef::ColorSelector { part_set, slot, index })
        }
        RecordKind::Physics => {
            let (part_set, slot, index) = sub_list_target(
                doc,
                placement,
                anchor,
                "Physics",
                |entry| match entry {
                    EntryRef::Physics { part_set, slot, index } => {
                        Some((part_set, slot, Some(index)))
                    }
                    EntryRef::PhysicsList { part_set, slot }
                    | EntryRef::Part { part_set, slot } => Some((part_set, slot, None)),
                    _ => None,
                },
                |part| part.physics.len(),
            )?;
            let part = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            // Physics objects inherit the owning part's name
            let physics = Physics {
                name: part.name.clone(),
                ..Physics::default()
            };
            insert_at(&mut part.physics, index, physics)?;
            Ok(EntryRef::Physics { part_set, slot, index })
        }
        RecordKind::Body => {
            let index = match (placement, anchor) {
                (Placement::AtEnd, _) => doc.bodies.len(),
                (_, Some(EntryRef::Body { body })) => {
                    placed_index(placement, body, doc.bodies.len())
                }
                _ => return Err(mismatch("Body", anchor)),
            };
            insert_at(&mut doc.bodies, index, Default::default())?;
            Ok(EntryRef::Body { body: index })
        }
        RecordKind::BoneScale => {
            let (body, index) = match (placement, anchor) {
                (Placement::AtEnd, Some(EntryRef::Body { body })) => {
                    let len = doc.bodies.get(body).ok_or(EditError::StaleHandle)?.bone_scales.len();
                    (body, len)
                }
                (_, Some(EntryRef::BoneScale { body, index })) => {
                    let len = doc.bodies.get(body).ok_or(EditError::StaleHandle)?.bone_scales.len();
                    (body, placed_index(placement, index, len))
                }
                _ => return Err(mismatch("Bone Scale", anchor)),
            };
            let body_record = doc.bodies.get_mut(body).ok_or(EditError::StaleHandle)?;
            insert_at(&mut body_record.bone_scales, index, Default::default())?;
            Ok(EntryRef::BoneScale { body, index })
        }
        RecordKind::Skeleton => {
            let index = match (placement, anchor) {
                (Placement::AtEnd, _) => doc.skeletons.len(),
                (_, Some(EntryRef::Skeleton { skeleton })) => {
                    placed_index(placement, skeleton, doc.skeletons.len())
                }
                _ => return Err(mismatch("Skeleton", anchor)),
            };
            insert_at(&mut doc.skeletons, index, Default::default())?;
            Ok(EntryRef::Skeleton { skeleton: index })
        }
        RecordKind::Bone => {
            let (skeleton, index) = match (placement, anchor) {
                (Placement::AtEnd, Some(EntryRef::Skeleton { skeleton })) => {
                    let len = doc
                        .skeletons
                        .get(skeleton)
                        .ok_or(EditError::StaleHandle)?
                        .bones
                        .len();
                    (skeleton, len)
                }
                (_, Some(EntryRef::Bone { skeleton, index })) => {
                    let len = doc
                        .skeletons
                        .get(skeleton)
                        .ok_or(EditError::StaleHandle)?
                        .bones
                        .len();
                    (skeleton, placed_index(placement, index, len))
                }
                _ => return Err(mismatch("Bone", anchor)),
            };
            let skeleton_record = doc
                .skeletons
                .get_mut(skeleton)
                .ok_or(EditError::StaleHandle)?;
            insert_at(&mut skeleton_record.bones, index, Default::default())?;
            Ok(EntryRef::Bone { skeleton, index })
        }
        // Parts live in a slot map, not an indexed collection
        RecordKind::Part => Err(mismatch("a slot-based add", anchor)),
    }
}

/// Resolve the owning part and insertion index for a part sub-list add
fn sub_list_target(
    doc: &crate::models::Document,
    placement: Placement,
    anchor: Option<EntryRef>,
    expected: &'static str,
    classify: impl Fn(EntryRef) -> Option<(usize, PartSlot, Option<usize>)>,
    len_of: impl Fn(&Part) -> usize,
) -> Result<(usize, PartSlot, usize), EditError> {
    let (part_set, slot, anchor_index) = anchor
        .and_then(&classify)
        .ok_or_else(|| mismatch(expected, anchor))?;
    let part = doc.part(part_set, slot).ok_or(EditError::StaleHandle)?;
    let len = len_of(part);
    let index = match anchor_index {
        Some(anchor_index) => placed_index(placement, anchor_index, len),
        None => len,
    };
    Ok((part_set, slot, index))
}

/// Add a part into an unoccupied slot of a part set
///
/// The new part inherits the name of the set's first existing part, the
/// naming convention shared by every linked file.
pub fn add_part(
    session: &mut Session,
    anchor: EntryRef,
    slot: PartSlot,
) -> Result<EntryRef, EditError> {
    let part_set = match anchor {
        EntryRef::PartSet { part_set } | EntryRef::Part { part_set, .. } => part_set,
        _ => return Err(mismatch("Part Set", Some(anchor))),
    };
    let set = session
        .document
        .part_sets
        .get_mut(part_set)
        .ok_or(EditError::StaleHandle)?;
    if set.parts.contains_key(&slot) {
        return Err(EditError::SlotOccupied(slot));
    }
    let name = set
        .first_part()
        .map(|part| part.name.clone())
        .unwrap_or_default();
    set.parts.insert(
        slot,
        Part {
            name,
            ..Part::default()
        },
    );
    Ok(EntryRef::Part { part_set, slot })
}

/// Delete one node, refusing palette/color deletions that are still
/// referenced
///
/// Returns the collection to reindex. The model is untouched when the
/// result is an error.
pub fn delete_one(session: &mut Session, entry: EntryRef) -> Result<CollectionKind, EditError> {
    let doc = &mut session.document;
    match entry {
        EntryRef::PartSet { part_set } => {
            remove_at(&mut doc.part_sets, part_set)?;
            Ok(CollectionKind::PartSets)
        }
        EntryRef::Part { part_set, slot } => {
            let set = doc.part_sets.get_mut(part_set).ok_or(EditError::StaleHandle)?;
            set.parts.remove(&slot).ok_or(EditError::StaleHandle)?;
            Ok(CollectionKind::PartSets)
        }
        EntryRef::ColorSelectorList { part_set, slot } => {
            let part = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            part.color_selectors.clear();
            Ok(CollectionKind::PartSets)
        }
        EntryRef::ColorSelector { part_set, slot, index } => {
            let part = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            remove_at(&mut part.color_selectors, index)?;
            Ok(CollectionKind::PartSets)
        }
        EntryRef::PhysicsList { part_set, slot } => {
            let part = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            part.physics.clear();
            Ok(CollectionKind::PartSets)
        }
        EntryRef::Physics { part_set, slot, index } => {
            let part = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            remove_at(&mut part.physics, index)?;
            Ok(CollectionKind::PartSets)
        }
        EntryRef::PartColor { part_color } => {
            let conflicts = resolver::find_conflicts(doc, part_color, None);
            if !conflicts.is_empty() {
                return Err(EditError::ReferenceConflict(conflicts));
            }
            remove_at(&mut doc.part_colors, part_color)?;
            session.render_cache.remove_palette(part_color);
            resolver::shift_references(&mut session.document, part_color, None, -1);
            Ok(CollectionKind::PartColors)
        }
        EntryRef::Color { part_color, index } => {
            let conflicts = resolver::find_conflicts(doc, part_color, Some(index));
            if !conflicts.is_empty() {
                return Err(EditError::ReferenceConflict(conflicts));
            }
            let palette = doc
                .part_colors
                .get_mut(part_color)
                .ok_or(EditError::StaleHandle)?;
            remove_at(&mut palette.colors, index)?;
            session.render_cache.remove_color(part_color, index);
            resolver::shift_references(&mut session.document, part_color, Some(index), -1);
            Ok(CollectionKind::PartColors)
        }
        EntryRef::Body { body } => {
            remove_at(&mut doc.bodies, body)?;
            Ok(CollectionKind::Bodies)
        }
        EntryRef::BoneScale { body, index } => {
            let body_record = doc.bodies.get_mut(body).ok_or(EditError::StaleHandle)?;
            remove_at(&mut body_record.bone_scales, index)?;
            Ok(CollectionKind::Bodies)
        }
        EntryRef::Skeleton { skeleton } => {
            remove_at(&mut doc.skeletons, skeleton)?;
            Ok(CollectionKind::Skeletons)
        }
        EntryRef::Bone { skeleton, index } => {
            let skeleton_record = doc
                .skeletons
                .get_mut(skeleton)
                .ok_or(EditError::StaleHandle)?;
            remove_at(&mut skeleton_record.bones, index)?;
            Ok(CollectionKind::Skeletons)
        }
    }
}

/// Apply a named-field edit to the record a handle addresses
pub fn field_edit(
    session: &mut Session,
    entry: EntryRef,
    field: &str,
    value: &FieldValue,
) -> Result<CollectionKind, EditError> {
    let doc = &mut session.document;
    match entry {
        EntryRef::Part { part_set, slot } => {
            let part = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            fields::set_part_field(part, field, value)?;
        }
        EntryRef::Physics { part_set, slot, index } => {
            let physics = doc
                .physics_mut(part_set, slot, index)
                .ok_or(EditError::StaleHandle)?;
            fields::set_physics_field(physics, field, value)?;
        }
        EntryRef::ColorSelector { part_set, slot, index } => {
            let selector = doc
                .selector_mut(part_set, slot, index)
                .ok_or(EditError::StaleHandle)?;
            fields::set_selector_field(selector, field, value)?;
        }
        EntryRef::PartColor { part_color } => {
            let palette = doc
                .part_colors
                .get_mut(part_color)
                .ok_or(EditError::StaleHandle)?;
            fields::set_part_color_field(palette, field, value)?;
        }
        EntryRef::Color { part_color, index } => {
            let color = doc.color_mut(part_color, index).ok_or(EditError::StaleHandle)?;
            fields::set_color_field(color, field, value)?;
        }
        EntryRef::BoneScale { body, index } => {
            let bone_scale = doc
                .bone_scale_mut(body, index)
                .ok_or(EditError::StaleHandle)?;
            fields::set_bone_scale_field(bone_scale, field, value)?;
        }
        EntryRef::Bone { skeleton, index } => {
            let bone = doc.bone_mut(skeleton, index).ok_or(EditError::StaleHandle)?;
            fields::set_bone_field(bone, field, value)?;
        }
        _ => {
            return Err(EditError::TypeMismatch {
                expected: "a record with editable fields",
                found: entry
                    .record_kind()
                    .map(|k| k.readable_name())
                    .unwrap_or("a group"),
            })
        }
    }
    Ok(collection_of(entry))
}

/// Overwrite the record at a handle from a source record of the same kind
///
/// Part overwrites copy the scalar fields and leave the owned sub-lists in
/// place; palette overwrites replace the color list and reset the cache
/// row to match in the same transaction.
pub fn write_record(
    session: &mut Session,
    entry: EntryRef,
    record: &Record,
) -> Result<(), EditError> {
    let doc = &mut session.document;
    match (entry, record) {
        (EntryRef::PartSet { part_set }, Record::PartSet(source)) => {
            let target = doc.part_sets.get_mut(part_set).ok_or(EditError::StaleHandle)?;
            *target = source.clone();
        }
        (EntryRef::Part { part_set, slot }, Record::Part(source)) => {
            let target = doc.part_mut(part_set, slot).ok_or(EditError::StaleHandle)?;
            let color_selectors = std::mem::take(&mut target.color_selectors);
            let physics = std::mem::take(&mut target.physics);
            *target = Part {
                color_selectors,
                physics,
                ..source.clone()
            };
        }
        (EntryRef::ColorSelector { part_set, slot, index }, Record::ColorSelector(source)) => {
            let target = doc
                .selector_mut(part_set, slot, index)
                .ok_or(EditError::StaleHandle)?;
            *target = *source;
        }
        (EntryRef::Physics { part_set, slot, index }, Record::Physics(source)) => {
            let target = doc
                .physics_mut(part_set, slot, index)
                .ok_or(EditError::StaleHandle)?;
            *target = source.clone();
        }
        (EntryRef::PartColor { part_color }, Record::PartColor(source)) => {
            let target = doc
                .part_colors
                .get_mut(part_color)
                .ok_or(EditError::StaleHandle)?;
            *target = source.clone();
            let count = target.colors.len();
            session.render_cache.reset_palette(part_color, count);
        }
        (EntryRef::Color { part_color, index }, Record::Color(source)) => {
            let target = doc.color_mut(part_color, index).ok_or(EditError::StaleHandle)?;
            *target = source.clone();
        }
        (EntryRef::Body { body }, Record::Body(source)) => {
            let target = doc.bodies.get_mut(body).ok_or(EditError::StaleHandle)?;
            *target = source.clone();
        }
        (EntryRef::BoneScale { body, index }, Record::BoneScale(source)) => {
            let target = doc
                .bone_scale_mut(body, index)
                .ok_or(EditError::StaleHandle)?;
            *target = source.clone();
        }
        (EntryRef::Skeleton { skeleton }, Record::Skeleton(source)) => {
            let target = doc.skeletons.get_mut(skeleton).ok_or(EditError::StaleHandle)?;
            *target = source.clone();
        }
        (EntryRef::Bone { skeleton, index }, Record::Bone(source)) => {
            let target = doc.bone_mut(skeleton, index).ok_or(EditError::StaleHandle)?;
            *target = source.clone();
        }
        (entry, record) => {
            return Err(EditError::TypeMismatch {
                expected: entry
                    .record_kind()
                    .map(|k| k.readable_name())
                    .unwrap_or("a record"),
                found: record.kind().readable_name(),
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, Document};

    fn session_with_palettes(counts: &[usize]) -> Session {
        let mut doc = Document::new();
        for (i, count) in counts.iter().enumerate() {
            doc.part_colors.push(PartColor {
                name: format!("pal{i}_"),
                colors: (0..*count).map(|_| Color::default()).collect(),
            });
        }
        Session::new(doc)
    }

    #[test]
    fn append_inserts_after_anchor() {
        let mut session = session_with_palettes(&[1, 1]);
        let entry = add_record(
            &mut session,
            RecordKind::PartColor,
            Placement::Append,
            Some(EntryRef::PartColor { part_color: 0 }),
        )
        .unwrap();
        assert_eq!(entry, EntryRef::PartColor { part_color: 1 });
        assert_eq!(session.document.part_colors.len(), 3);
        assert_eq!(session.document.part_colors[1].name, "");
        assert!(session.render_cache.is_aligned_with(&session.document));
    }

    #[test]
    fn insert_lands_before_anchor_and_at_end_ignores_it() {
        let mut session = session_with_palettes(&[1]);
        add_record(
            &mut session,
            RecordKind::PartColor,
            Placement::Insert,
            Some(EntryRef::PartColor { part_color: 0 }),
        )
        .unwrap();
        assert_eq!(session.document.part_colors[0].name, "");
        assert_eq!(session.document.part_colors[1].name, "pal0_");

        let entry = add_record(&mut session, RecordKind::PartColor, Placement::AtEnd, None).unwrap();
        assert_eq!(entry, EntryRef::PartColor { part_color: 2 });
    }

    #[test]
    fn add_with_wrong_anchor_kind_is_refused() {
        let mut session = session_with_palettes(&[1]);
        let err = add_record(
            &mut session,
            RecordKind::Color,
            Placement::Append,
            Some(EntryRef::Body { body: 0 }),
        );
        assert!(matches!(err, Err(EditError::TypeMismatch { .. })));
    }

    #[test]
    fn topmost_filter_drops_covered_children() {
        let selection = [
            EntryRef::PartSet { part_set: 1 },
            EntryRef::Part {
                part_set: 1,
                slot: PartSlot::Hair,
            },
            EntryRef::PartSet { part_set: 0 },
        ];
        let batch = topmost_in_reverse_order(&selection);
        assert_eq!(
            batch,
            vec![
                EntryRef::PartSet { part_set: 1 },
                EntryRef::PartSet { part_set: 0 },
            ]
        );
    }

    #[test]
    fn part_overwrite_keeps_owned_sub_lists() {
        let mut doc = Document::new();
        let mut part = Part::default();
        part.color_selectors.push(ColorSelector::default());
        let mut set = crate::models::PartSet::default();
        set.parts.insert(PartSlot::Bust, part);
        doc.part_sets.push(set);
        let mut session = Session::new(doc);

        let source = Part {
            name: "ABC".to_string(),
            model: 7,
            ..Part::default()
        };
        write_record(
            &mut session,
            EntryRef::Part {
                part_set: 0,
                slot: PartSlot::Bust,
            },
            &Record::Part(source),
        )
        .unwrap();

        let target = session.document.part(0, PartSlot::Bust).unwrap();
        assert_eq!(target.name, "ABC");
        assert_eq!(target.model, 7);
        assert_eq!(target.color_selectors.len(), 1);
    }
}
