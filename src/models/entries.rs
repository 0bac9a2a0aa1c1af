//! Record types for the customization document
//!
//! Every ordered collection in the document holds one of the record types
//! defined here. Records are created zero-valued on add and mutated in
//! place; the owning collection's array discipline is the sole source of a
//! record's existence.
//!
//! `Record`, `RecordKind` and `EntryRef` form the closed tagged union the
//! edit engine and projection dispatch over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::slots::PartSlot;

/// Maximum length of a part or physics name (format constraint)
pub const MAX_NAME_LEN: usize = 3;

/// A set of parts, one per occupied slot, iterated in canonical slot order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PartSet {
    pub parts: BTreeMap<PartSlot, Part>,
}

impl PartSet {
    /// The first part in slot order, if any slot is occupied
    pub fn first_part(&self) -> Option<&Part> {
        self.parts.values().next()
    }
}

/// One visible part: model/texture bindings plus owned sub-collections
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Part {
    /// Three-character part name shared across linked files
    pub name: String,
    pub model: u16,
    pub model2: u16,
    pub texture: u16,
    pub emd_name: String,
    pub emm_name: String,
    pub emb_name: String,
    pub ean_name: String,
    pub dyt_options: u32,
    pub part_hiding: u32,
    pub u_06: u16,
    pub u_08: u16,
    pub u_10: u64,
    pub u_20: u32,
    pub f_24: f32,
    pub f_28: f32,
    pub u_2c: u32,
    pub u_30: u32,
    pub u_48: u16,
    pub u_50: u16,
    pub color_selectors: Vec<ColorSelector>,
    pub physics: Vec<Physics>,
}

/// A pair of indices choosing one color within one palette
///
/// Both indices are positional; either may dangle after cross-document
/// pastes, which the projection renders with a sentinel instead of failing.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorSelector {
    pub palette_index: u16,
    pub color_index: u16,
}

/// A physics object attached to a part
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Physics {
    pub name: String,
    pub texture: u16,
    pub emd_name: String,
    pub emm_name: String,
    pub emb_name: String,
    pub esk_name: String,
    pub bone_name: String,
    pub scd_name: String,
    pub dyt_options: u32,
    pub part_hiding: u32,
    pub u_20: u32,
}

/// A named palette owning an ordered list of colors
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PartColor {
    pub name: String,
    pub colors: Vec<Color>,
}

/// One palette entry: up to four RGBA tuples plus float parameters
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Color {
    pub color1: [u8; 4],
    pub color2: [u8; 4],
    pub color3: [u8; 4],
    pub color4: [u8; 4],
    pub f_40: f32,
    pub f_44: f32,
    pub f_48: f32,
    pub f_4c: f32,
}

/// A body definition owning per-bone scales
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Body {
    pub bone_scales: Vec<BoneScale>,
}

/// Per-bone scale triple
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BoneScale {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A skeleton definition owning bone records
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

/// One bone record; mostly unknown scalar fields carried verbatim
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Bone {
    pub name: String,
    pub u_00: u32,
    pub u_04: u32,
    pub u_08: u32,
    pub u_0c: u16,
    pub u_0e: u16,
    pub u_10: u16,
    pub u_12: u16,
    pub u_14: u16,
    pub u_16: u16,
    pub u_18: u16,
    pub u_1a: u16,
    pub u_1c: u16,
    pub u_1e: u16,
    pub u_20: u16,
    pub u_22: u16,
    pub u_24: u16,
    pub u_26: u16,
    pub u_28: u16,
    pub u_2a: u16,
    pub u_2c: u16,
    pub u_2e: u16,
}

/// The concrete kind of a record, used for dispatch and type checks
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    PartSet,
    Part,
    ColorSelector,
    Physics,
    PartColor,
    Color,
    Body,
    BoneScale,
    Skeleton,
    Bone,
}

impl RecordKind {
    /// Human-readable kind name for status messages and warnings
    pub fn readable_name(&self) -> &'static str {
        match self {
            RecordKind::PartSet => "Part Set",
            RecordKind::Part => "Part",
            RecordKind::ColorSelector => "Color Selector",
            RecordKind::Physics => "Physics",
            RecordKind::PartColor => "Part Color",
            RecordKind::Color => "Color",
            RecordKind::Body => "Body",
            RecordKind::BoneScale => "Bone Scale",
            RecordKind::Skeleton => "Skeleton",
            RecordKind::Bone => "Bone",
        }
    }
}

/// An owned record of any kind
///
/// Used for clipboard batches and for handing a record to the detail form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Record {
    PartSet(PartSet),
    Part(Part),
    ColorSelector(ColorSelector),
    Physics(Physics),
    PartColor(PartColor),
    Color(Color),
    Body(Body),
    BoneScale(BoneScale),
    Skeleton(Skeleton),
    Bone(Bone),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::PartSet(_) => RecordKind::PartSet,
            Record::Part(_) => RecordKind::Part,
            Record::ColorSelector(_) => RecordKind::ColorSelector,
            Record::Physics(_) => RecordKind::Physics,
            Record::PartColor(_) => RecordKind::PartColor,
            Record::Color(_) => RecordKind::Color,
            Record::Body(_) => RecordKind::Body,
            Record::BoneScale(_) => RecordKind::BoneScale,
            Record::Skeleton(_) => RecordKind::Skeleton,
            Record::Bone(_) => RecordKind::Bone,
        }
    }
}

/// Positional handle addressing any node in the document forest
///
/// Handles carry no stable identity; every index is revalidated against the
/// current collection shape after any mutation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryRef {
    PartSet { part_set: usize },
    Part { part_set: usize, slot: PartSlot },
    ColorSelectorList { part_set: usize, slot: PartSlot },
    ColorSelector { part_set: usize, slot: PartSlot, index: usize },
    PhysicsList { part_set: usize, slot: PartSlot },
    Physics { part_set: usize, slot: PartSlot, index: usize },
    PartColor { part_color: usize },
    Color { part_color: usize, index: usize },
    Body { body: usize },
    BoneScale { body: usize, index: usize },
    Skeleton { skeleton: usize },
    Bone { skeleton: usize, index: usize },
}

impl EntryRef {
    /// The record kind this handle addresses, when it addresses a record
    ///
    /// List containers have no record of their own and return `None`.
    pub fn record_kind(&self) -> Option<RecordKind> {
        match self {
            EntryRef::PartSet { .. } => Some(RecordKind::PartSet),
            EntryRef::Part { .. } => Some(RecordKind::Part),
            EntryRef::ColorSelector { .. } => Some(RecordKind::ColorSelector),
            EntryRef::Physics { .. } => Some(RecordKind::Physics),
            EntryRef::PartColor { .. } => Some(RecordKind::PartColor),
            EntryRef::Color { .. } => Some(RecordKind::Color),
            EntryRef::Body { .. } => Some(RecordKind::Body),
            EntryRef::BoneScale { .. } => Some(RecordKind::BoneScale),
            EntryRef::Skeleton { .. } => Some(RecordKind::Skeleton),
            EntryRef::Bone { .. } => Some(RecordKind::Bone),
            EntryRef::ColorSelectorList { .. } | EntryRef::PhysicsList { .. } => None,
        }
    }

    /// The element kind of the list a container handle addresses
    pub fn list_element_kind(&self) -> Option<RecordKind> {
        match self {
            EntryRef::ColorSelectorList { .. } => Some(RecordKind::ColorSelector),
            EntryRef::PhysicsList { .. } => Some(RecordKind::Physics),
            _ => None,
        }
    }

    /// The parent node in the forest, `None` for top-level entries
    pub fn parent(&self) -> Option<EntryRef> {
        match *self {
            EntryRef::PartSet { .. }
            | EntryRef::PartColor { .. }
            | EntryRef::Body { .. }
            | EntryRef::Skeleton { .. } => None,
            EntryRef::Part { part_set, .. } => Some(EntryRef::PartSet { part_set }),
            EntryRef::ColorSelectorList { part_set, slot }
            | EntryRef::PhysicsList { part_set, slot } => {
                Some(EntryRef::Part { part_set, slot })
            }
            EntryRef::ColorSelector { part_set, slot, .. } => {
                Some(EntryRef::ColorSelectorList { part_set, slot })
            }
            EntryRef::Physics { part_set, slot, .. } => {
                Some(EntryRef::PhysicsList { part_set, slot })
            }
            EntryRef::Color { part_color, .. } => Some(EntryRef::PartColor { part_color }),
            EntryRef::BoneScale { body, .. } => Some(EntryRef::Body { body }),
            EntryRef::Bone { skeleton, .. } => Some(EntryRef::Skeleton { skeleton }),
        }
    }

    /// Whether `other` is an ancestor of this handle
    pub fn is_descendant_of(&self, other: &EntryRef) -> bool {
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            if node == *other {
                return true;
            }
            cursor = node.parent();
        }
        false
    }
}
