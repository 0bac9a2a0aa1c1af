//! Find and replace over the part-set forest
//!
//! The find/replace dialogs search three record kinds by named field,
//! walking the same pre-order traversal the projection uses and wrapping
//! around at the end. Replacement over selector references is validated
//! against the render cache: a replacement that would dangle is skipped
//! and reported instead of applied.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{
    fields, Document, EntryRef, FieldValue, RecordKind, RenderCache,
};

/// Searchable fields per kind, in dialog order
pub fn searchable_fields(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Part => &[
            "name",
            "model",
            "model2",
            "texture",
            "emd_name",
            "emm_name",
            "ean_name",
            "dyt_options",
            "part_hiding",
        ],
        RecordKind::Physics => &[
            "name",
            "texture",
            "emd_name",
            "emm_name",
            "esk_name",
            "bone_name",
            "scd_name",
            "dyt_options",
            "part_hiding",
        ],
        RecordKind::ColorSelector => &["palette_index", "color_index"],
        _ => &[],
    }
}

/// Pre-order handles of one searchable kind
fn entries_of_kind(document: &Document, kind: RecordKind) -> Vec<EntryRef> {
    let mut entries = Vec::new();
    for (part_set, set) in document.part_sets.iter().enumerate() {
        for (slot, part) in &set.parts {
            match kind {
                RecordKind::Part => entries.push(EntryRef::Part {
                    part_set,
                    slot: *slot,
                }),
                RecordKind::ColorSelector => {
                    for index in 0..part.color_selectors.len() {
                        entries.push(EntryRef::ColorSelector {
                            part_set,
                            slot: *slot,
                            index,
                        });
                    }
                }
                RecordKind::Physics => {
                    for index in 0..part.physics.len() {
                        entries.push(EntryRef::Physics {
                            part_set,
                            slot: *slot,
                            index,
                        });
                    }
                }
                _ => {}
            }
        }
    }
    entries
}

fn field_of(document: &Document, entry: EntryRef, field: &str) -> Option<FieldValue> {
    match entry {
        EntryRef::Part { part_set, slot } => {
            fields::get_part_field(document.part(part_set, slot)?, field)
        }
        EntryRef::Physics { part_set, slot, index } => {
            fields::get_physics_field(document.physics(part_set, slot, index)?, field)
        }
        EntryRef::ColorSelector { part_set, slot, index } => {
            fields::get_selector_field(document.selector(part_set, slot, index)?, field)
        }
        _ => None,
    }
}

/// Whether a field value matches the searched-for value
///
/// Numbers match by equality, text by substring, like the dialogs.
fn matches(current: &FieldValue, find: &FieldValue) -> bool {
    match (current, find) {
        (FieldValue::Int(current), FieldValue::Int(find)) => current == find,
        (FieldValue::Text(current), FieldValue::Text(find)) => current.contains(find.as_str()),
        _ => false,
    }
}

/// Find the next record of `kind` whose `field` matches `find`
///
/// Walks forward from the record after `after`, wrapping around; the
/// anchor itself is excluded. A missing `find` value matches any record
/// of the kind.
pub fn find_next(
    document: &Document,
    after: Option<EntryRef>,
    kind: RecordKind,
    field: &str,
    find: Option<&FieldValue>,
) -> Option<EntryRef> {
    let entries = entries_of_kind(document, kind);
    if entries.is_empty() {
        return None;
    }
    let start = after
        .and_then(|anchor| entries.iter().position(|e| *e == anchor))
        .map(|pos| pos + 1)
        .unwrap_or(0);

    let candidates = entries.iter().cycle().skip(start).take(entries.len());
    for entry in candidates {
        if after == Some(*entry) {
            continue;
        }
        let hit = match find {
            None => true,
            Some(find) => field_of(document, *entry, field)
                .map(|current| matches(&current, find))
                .unwrap_or(false),
        };
        if hit {
            return Some(*entry);
        }
    }
    None
}

/// What happened to one record during a replace pass
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    Skipped,
    NotReplaced,
}

/// Result of a replace-all pass
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ReplaceReport {
    pub replaced: usize,
    pub skipped: usize,
    /// Skipped selector (palette, color) pairs, sorted, for the warning
    pub skipped_pairs: Vec<(u16, u16)>,
}

/// Replace `find` with `replace` in one record's field
///
/// Selector replacements must still resolve against the render cache;
/// a pair that would dangle is skipped so the dialog can warn. Text
/// replacement is substring substitution, numeric replacement a plain
/// overwrite.
pub fn replace_one(
    document: &mut Document,
    cache: &RenderCache,
    entry: EntryRef,
    field: &str,
    find: &FieldValue,
    replace: &FieldValue,
) -> ReplaceOutcome {
    let Some(current) = field_of(document, entry, field) else {
        return ReplaceOutcome::NotReplaced;
    };
    if !matches(&current, find) {
        return ReplaceOutcome::NotReplaced;
    }

    if let EntryRef::ColorSelector { part_set, slot, index } = entry {
        let (FieldValue::Int(replacement), Some(selector)) =
            (replace, document.selector(part_set, slot, index))
        else {
            return ReplaceOutcome::NotReplaced;
        };
        let (palette_index, color_index) = match field {
            "palette_index" => (*replacement as usize, selector.color_index as usize),
            _ => (selector.palette_index as usize, *replacement as usize),
        };
        if cache.handle(palette_index, color_index).is_none() {
            return ReplaceOutcome::Skipped;
        }
    }

    let new_value = match (&current, replace) {
        (FieldValue::Text(current), FieldValue::Text(to)) => {
            let FieldValue::Text(from) = find else {
                return ReplaceOutcome::NotReplaced;
            };
            FieldValue::Text(current.replace(from.as_str(), to.as_str()))
        }
        (FieldValue::Int(_), FieldValue::Int(_)) => replace.clone(),
        _ => return ReplaceOutcome::NotReplaced,
    };

    let applied = match entry {
        EntryRef::Part { part_set, slot } => document
            .part_mut(part_set, slot)
            .map(|part| fields::set_part_field(part, field, &new_value)),
        EntryRef::Physics { part_set, slot, index } => document
            .physics_mut(part_set, slot, index)
            .map(|physics| fields::set_physics_field(physics, field, &new_value)),
        EntryRef::ColorSelector { part_set, slot, index } => document
            .selector_mut(part_set, slot, index)
            .map(|selector| fields::set_selector_field(selector, field, &new_value)),
        _ => None,
    };
    match applied {
        // A constraint failure (e.g. the three-character name limit) skips
        // the record rather than aborting the pass
        Some(Ok(())) => ReplaceOutcome::Replaced,
        Some(Err(_)) => ReplaceOutcome::Skipped,
        None => ReplaceOutcome::NotReplaced,
    }
}

/// Replace across every record of `kind` in the document
pub fn replace_all(
    document: &mut Document,
    cache: &RenderCache,
    kind: RecordKind,
    field: &str,
    find: &FieldValue,
    replace: &FieldValue,
) -> ReplaceReport {
    let mut report = ReplaceReport::default();
    let mut skipped_pairs = BTreeSet::new();

    for entry in entries_of_kind(document, kind) {
        match replace_one(document, cache, entry, field, find, replace) {
            ReplaceOutcome::Replaced => report.replaced += 1,
            ReplaceOutcome::Skipped => {
                report.skipped += 1;
                if let EntryRef::ColorSelector { part_set, slot, index } = entry {
                    if let Some(selector) = document.selector(part_set, slot, index) {
                        skipped_pairs.insert((selector.palette_index, selector.color_index));
                    }
                }
            }
            ReplaceOutcome::NotReplaced => {}
        }
    }

    report.skipped_pairs = skipped_pairs.into_iter().collect();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Color, ColorSelector, Part, PartColor, PartSet, PartSlot, Physics,
    };

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.part_colors.push(PartColor {
            name: "skin_".to_string(),
            colors: vec![Color::default(), Color::default()],
        });

        let mut hair = Part {
            name: "HUM".to_string(),
            model: 7,
            ..Part::default()
        };
        hair.color_selectors.push(ColorSelector {
            palette_index: 0,
            color_index: 0,
        });
        hair.physics.push(Physics {
            name: "HUM".to_string(),
            ..Physics::default()
        });

        let bust = Part {
            name: "HUF".to_string(),
            model: 7,
            ..Part::default()
        };

        let mut set = PartSet::default();
        set.parts.insert(PartSlot::Hair, hair);
        set.parts.insert(PartSlot::Bust, bust);
        doc.part_sets.push(set);
        doc
    }

    #[test]
    fn find_wraps_around_and_excludes_the_anchor() {
        let doc = sample_document();
        let first = find_next(&doc, None, RecordKind::Part, "model", Some(&FieldValue::Int(7)));
        assert_eq!(
            first,
            Some(EntryRef::Part {
                part_set: 0,
                slot: PartSlot::Hair,
            })
        );

        let second = find_next(&doc, first, RecordKind::Part, "model", Some(&FieldValue::Int(7)));
        assert_eq!(
            second,
            Some(EntryRef::Part {
                part_set: 0,
                slot: PartSlot::Bust,
            })
        );

        // Wraps back to the first match
        let third = find_next(&doc, second, RecordKind::Part, "model", Some(&FieldValue::Int(7)));
        assert_eq!(third, first);

        let none = find_next(&doc, None, RecordKind::Part, "model", Some(&FieldValue::Int(9)));
        assert_eq!(none, None);
    }

    #[test]
    fn text_replace_substitutes_substrings() {
        let mut doc = sample_document();
        let cache = {
            let mut cache = RenderCache::new();
            cache.rebuild(&doc);
            cache
        };
        let report = replace_all(
            &mut doc,
            &cache,
            RecordKind::Part,
            "name",
            &FieldValue::Text("HU".to_string()),
            &FieldValue::Text("NM".to_string()),
        );
        assert_eq!(report.replaced, 2);
        assert_eq!(doc.part(0, PartSlot::Hair).unwrap().name, "NMM");
        assert_eq!(doc.part(0, PartSlot::Bust).unwrap().name, "NMF");
    }

    #[test]
    fn selector_replace_that_would_dangle_is_skipped_and_reported() {
        let mut doc = sample_document();
        let mut cache = RenderCache::new();
        cache.rebuild(&doc);

        let report = replace_all(
            &mut doc,
            &cache,
            RecordKind::ColorSelector,
            "palette_index",
            &FieldValue::Int(0),
            &FieldValue::Int(5),
        );
        assert_eq!(report.replaced, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.skipped_pairs, vec![(0, 0)]);
        // The selector is untouched
        assert_eq!(
            doc.selector(0, PartSlot::Hair, 0).unwrap().palette_index,
            0
        );

        // A replacement that resolves goes through
        let report = replace_all(
            &mut doc,
            &cache,
            RecordKind::ColorSelector,
            "color_index",
            &FieldValue::Int(0),
            &FieldValue::Int(1),
        );
        assert_eq!(report.replaced, 1);
        assert_eq!(doc.selector(0, PartSlot::Hair, 0).unwrap().color_index, 1);
    }
}
