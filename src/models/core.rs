//! Core document structures
//!
//! This module defines the `Document` aggregate (the in-memory form of one
//! loaded asset file) and the bounds-checked primitives every ordered
//! collection goes through. The document is owned by the editing session
//! and passed by reference into the engines; there is no global state at
//! this layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entries::{
    Body, Bone, BoneScale, Color, ColorSelector, EntryRef, Part, PartColor, PartSet, Physics,
    Record, Skeleton,
};
use super::slots::PartSlot;

/// Index past the bounds of an ordered collection
///
/// A UI error in practice; the model fails safely instead of panicking.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("index {index} out of range (len {len})")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Insert into an ordered collection, allowing `index == len` (append)
pub fn insert_at<T>(items: &mut Vec<T>, index: usize, value: T) -> Result<(), OutOfRange> {
    if index > items.len() {
        return Err(OutOfRange {
            index,
            len: items.len(),
        });
    }
    items.insert(index, value);
    Ok(())
}

/// Remove from an ordered collection, returning the removed record
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T, OutOfRange> {
    if index >= items.len() {
        return Err(OutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

/// The four top-level collections of a document
///
/// The external view keeps one tree per collection; reindex notifications
/// are scoped to one of these.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    PartSets,
    PartColors,
    Bodies,
    Skeletons,
}

/// File header carried through edits unchanged except for its own fields
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub gender: u8,
    pub race: u8,
}

/// Gender values stored in the header, by index
pub const GENDERS: [&str; 2] = ["Male", "Female"];

/// Race values stored in the header, by index
pub const RACES: [&str; 6] = ["Human", "Saiyan", "Namekian", "Frieza", "Majin", "Android"];

/// The complete in-memory document: header plus four ordered collections
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub header: Header,
    pub part_sets: Vec<PartSet>,
    pub part_colors: Vec<PartColor>,
    pub bodies: Vec<Body>,
    pub skeletons: Vec<Skeleton>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part(&self, part_set: usize, slot: PartSlot) -> Option<&Part> {
        self.part_sets.get(part_set)?.parts.get(&slot)
    }

    pub fn part_mut(&mut self, part_set: usize, slot: PartSlot) -> Option<&mut Part> {
        self.part_sets.get_mut(part_set)?.parts.get_mut(&slot)
    }

    pub fn selector(&self, part_set: usize, slot: PartSlot, index: usize) -> Option<&ColorSelector> {
        self.part(part_set, slot)?.color_selectors.get(index)
    }

    pub fn selector_mut(
        &mut self,
        part_set: usize,
        slot: PartSlot,
        index: usize,
    ) -> Option<&mut ColorSelector> {
        self.part_mut(part_set, slot)?.color_selectors.get_mut(index)
    }

    pub fn physics(&self, part_set: usize, slot: PartSlot, index: usize) -> Option<&Physics> {
        self.part(part_set, slot)?.physics.get(index)
    }

    pub fn physics_mut(
        &mut self,
        part_set: usize,
        slot: PartSlot,
        index: usize,
    ) -> Option<&mut Physics> {
        self.part_mut(part_set, slot)?.physics.get_mut(index)
    }

    pub fn color(&self, part_color: usize, index: usize) -> Option<&Color> {
        self.part_colors.get(part_color)?.colors.get(index)
    }

    pub fn color_mut(&mut self, part_color: usize, index: usize) -> Option<&mut Color> {
        self.part_colors.get_mut(part_color)?.colors.get_mut(index)
    }

    pub fn bone_scale(&self, body: usize, index: usize) -> Option<&BoneScale> {
        self.bodies.get(body)?.bone_scales.get(index)
    }

    pub fn bone_scale_mut(&mut self, body: usize, index: usize) -> Option<&mut BoneScale> {
        self.bodies.get_mut(body)?.bone_scales.get_mut(index)
    }

    pub fn bone(&self, skeleton: usize, index: usize) -> Option<&Bone> {
        self.skeletons.get(skeleton)?.bones.get(index)
    }

    pub fn bone_mut(&mut self, skeleton: usize, index: usize) -> Option<&mut Bone> {
        self.skeletons.get_mut(skeleton)?.bones.get_mut(index)
    }

    /// Name of the palette at an index, `None` when the index dangles
    pub fn palette_name(&self, palette_index: usize) -> Option<&str> {
        self.part_colors.get(palette_index).map(|pc| pc.name.as_str())
    }

    /// Clone the record a handle addresses
    ///
    /// Returns `None` for stale handles and for list containers, which own
    /// no record of their own.
    pub fn record(&self, entry: EntryRef) -> Option<Record> {
        match entry {
            EntryRef::PartSet { part_set } => {
                self.part_sets.get(part_set).cloned().map(Record::PartSet)
            }
            EntryRef::Part { part_set, slot } => {
                self.part(part_set, slot).cloned().map(Record::Part)
            }
            EntryRef::ColorSelector { part_set, slot, index } => self
                .selector(part_set, slot, index)
                .copied()
                .map(Record::ColorSelector),
            EntryRef::Physics { part_set, slot, index } => {
                self.physics(part_set, slot, index).cloned().map(Record::Physics)
            }
            EntryRef::PartColor { part_color } => {
                self.part_colors.get(part_color).cloned().map(Record::PartColor)
            }
            EntryRef::Color { part_color, index } => {
                self.color(part_color, index).cloned().map(Record::Color)
            }
            EntryRef::Body { body } => self.bodies.get(body).cloned().map(Record::Body),
            EntryRef::BoneScale { body, index } => {
                self.bone_scale(body, index).cloned().map(Record::BoneScale)
            }
            EntryRef::Skeleton { skeleton } => {
                self.skeletons.get(skeleton).cloned().map(Record::Skeleton)
            }
            EntryRef::Bone { skeleton, index } => {
                self.bone(skeleton, index).cloned().map(Record::Bone)
            }
            EntryRef::ColorSelectorList { .. } | EntryRef::PhysicsList { .. } => None,
        }
    }

    /// Whether a handle still resolves against the current shape
    pub fn entry_exists(&self, entry: EntryRef) -> bool {
        match entry {
            EntryRef::ColorSelectorList { part_set, slot }
            | EntryRef::PhysicsList { part_set, slot } => self.part(part_set, slot).is_some(),
            _ => self.record(entry).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_allows_append_only_up_to_len() {
        let mut items = vec![1, 2, 3];
        assert!(insert_at(&mut items, 3, 4).is_ok());
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(
            insert_at(&mut items, 6, 9),
            Err(OutOfRange { index: 6, len: 4 })
        );
    }

    #[test]
    fn remove_at_rejects_index_at_len() {
        let mut items = vec![1, 2];
        assert_eq!(remove_at(&mut items, 0), Ok(1));
        assert_eq!(remove_at(&mut items, 1), Err(OutOfRange { index: 1, len: 1 }));
        assert_eq!(items, vec![2]);
    }

    #[test]
    fn record_lookup_returns_none_for_stale_handles() {
        let doc = Document::new();
        assert!(doc.record(EntryRef::PartSet { part_set: 0 }).is_none());
        assert!(!doc.entry_exists(EntryRef::Body { body: 2 }));
    }
}
