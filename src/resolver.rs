//! Reference resolver
//!
//! Color selectors reference palettes and colors purely by position, so
//! every structural change to the palette collections has to run through
//! here: `find_conflicts` vetoes deletions that would orphan a live
//! reference, and `shift_references` renumbers every affected selector
//! after an insert or delete. `validate_references` reports the selectors
//! that already dangle (tolerated state, surfaced after load).

use crate::models::{Document, EntryRef, PartSlot};

/// Selectors still referencing a palette entry, as (part set, slot) pairs
///
/// With `color_index` unset, any selector on the palette counts; with it
/// set, only selectors on that exact (palette, color) pair. One pair is
/// reported per matching selector, in traversal order, for verbatim
/// display in the conflict warning.
pub fn find_conflicts(
    document: &Document,
    palette_index: usize,
    color_index: Option<usize>,
) -> Vec<(usize, PartSlot)> {
    let mut conflicts = Vec::new();
    for (set_index, part_set) in document.part_sets.iter().enumerate() {
        for (slot, part) in &part_set.parts {
            for selector in &part.color_selectors {
                let palette_matches = selector.palette_index as usize == palette_index;
                let color_matches = color_index
                    .map(|ci| selector.color_index as usize == ci)
                    .unwrap_or(true);
                if palette_matches && color_matches {
                    conflicts.push((set_index, *slot));
                }
            }
        }
    }
    conflicts
}

/// Renumber selectors after a palette or color insert/delete
///
/// With `color_index` unset: every selector whose `palette_index` is at or
/// past the threshold moves by `delta` (palette inserted or deleted at
/// that position). With it set: selectors on exactly `palette_index` whose
/// `color_index` is at or past the threshold move instead. Runs
/// unconditionally for every such mutation; deletion conflicts must be
/// vetoed before the record is removed, so a negative shift never crosses
/// below the threshold.
pub fn shift_references(
    document: &mut Document,
    palette_index: usize,
    color_index: Option<usize>,
    delta: i16,
) {
    for part_set in &mut document.part_sets {
        for part in part_set.parts.values_mut() {
            for selector in &mut part.color_selectors {
                match color_index {
                    None => {
                        if selector.palette_index as usize >= palette_index {
                            selector.palette_index =
                                selector.palette_index.saturating_add_signed(delta);
                        }
                    }
                    Some(ci) => {
                        if selector.palette_index as usize == palette_index
                            && selector.color_index as usize >= ci
                        {
                            selector.color_index =
                                selector.color_index.saturating_add_signed(delta);
                        }
                    }
                }
            }
        }
    }
}

/// All selectors whose (palette, color) pair no longer resolves
///
/// Dangling selectors are a tolerated state; this only enumerates them so
/// the view can warn after a load. Sorted by the referenced pair.
pub fn validate_references(document: &Document) -> Vec<(EntryRef, (u16, u16))> {
    let mut dangling = Vec::new();
    for (set_index, part_set) in document.part_sets.iter().enumerate() {
        for (slot, part) in &part_set.parts {
            for (index, selector) in part.color_selectors.iter().enumerate() {
                let resolves = document
                    .part_colors
                    .get(selector.palette_index as usize)
                    .map(|palette| (selector.color_index as usize) < palette.colors.len())
                    .unwrap_or(false);
                if !resolves {
                    dangling.push((
                        EntryRef::ColorSelector {
                            part_set: set_index,
                            slot: *slot,
                            index,
                        },
                        (selector.palette_index, selector.color_index),
                    ));
                }
            }
        }
    }
    dangling.sort_by_key(|(_, pair)| *pair);
    dangling
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, ColorSelector, Part, PartColor, PartSet};

    fn document_with_selectors(selectors: &[(u16, u16)]) -> Document {
        let mut doc = Document::new();
        for _ in 0..4 {
            doc.part_colors.push(PartColor {
                name: "col_".to_string(),
                colors: vec![Color::default(), Color::default(), Color::default()],
            });
        }
        let mut part = Part::default();
        for (palette_index, color_index) in selectors {
            part.color_selectors.push(ColorSelector {
                palette_index: *palette_index,
                color_index: *color_index,
            });
        }
        let mut set = PartSet::default();
        set.parts.insert(PartSlot::FaceBase, part);
        doc.part_sets.push(set);
        doc
    }

    #[test]
    fn conflicts_match_palette_and_optionally_color() {
        let doc = document_with_selectors(&[(0, 1), (2, 0)]);
        assert_eq!(find_conflicts(&doc, 0, None), vec![(0, PartSlot::FaceBase)]);
        assert_eq!(find_conflicts(&doc, 0, Some(1)), vec![(0, PartSlot::FaceBase)]);
        assert!(find_conflicts(&doc, 0, Some(2)).is_empty());
        assert!(find_conflicts(&doc, 1, None).is_empty());
    }

    #[test]
    fn palette_shift_moves_only_at_or_past_threshold() {
        let mut doc = document_with_selectors(&[(0, 0), (2, 1), (3, 2)]);
        shift_references(&mut doc, 2, None, -1);
        let part = doc.part(0, PartSlot::FaceBase).unwrap();
        let pairs: Vec<(u16, u16)> = part
            .color_selectors
            .iter()
            .map(|s| (s.palette_index, s.color_index))
            .collect();
        assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn insert_shift_is_the_mirror_of_delete() {
        let mut doc = document_with_selectors(&[(1, 0), (2, 0)]);
        shift_references(&mut doc, 2, None, 1);
        let part = doc.part(0, PartSlot::FaceBase).unwrap();
        assert_eq!(part.color_selectors[0].palette_index, 1);
        assert_eq!(part.color_selectors[1].palette_index, 3);
    }

    #[test]
    fn color_shift_touches_one_palette_only() {
        let mut doc = document_with_selectors(&[(1, 2), (2, 2)]);
        shift_references(&mut doc, 1, Some(1), -1);
        let part = doc.part(0, PartSlot::FaceBase).unwrap();
        assert_eq!(part.color_selectors[0].color_index, 1);
        assert_eq!(part.color_selectors[1].color_index, 2);
    }

    #[test]
    fn validation_lists_dangling_pairs_sorted() {
        let doc = document_with_selectors(&[(9, 0), (0, 7), (1, 1)]);
        let dangling = validate_references(&doc);
        let pairs: Vec<(u16, u16)> = dangling.iter().map(|(_, pair)| *pair).collect();
        assert_eq!(pairs, vec![(0, 7), (9, 0)]);
    }
}
