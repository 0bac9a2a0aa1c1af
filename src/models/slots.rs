//! Part slot enumeration and fixed domain vocabularies
//!
//! This module defines the closed set of part slots a part set can carry,
//! plus the DYT-option and part-hiding bit vocabularies shared by parts
//! and physics objects. The numeric values are fixed semantic bit patterns
//! from the asset format, not arbitrary choices.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Enumeration of the fixed part slots in a part set
///
/// Declaration order is the canonical slot order used for iteration and
/// for the slot ordinal shown in part labels.
#[wasm_bindgen]
#[repr(u8)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartSlot {
    FaceBase = 0,
    FaceForehead = 1,
    FaceEye = 2,
    FaceNose = 3,
    FaceEar = 4,
    Hair = 5,
    Bust = 6,
    Pants = 7,
    Rist = 8,
    Boots = 9,
}

impl PartSlot {
    /// All slots in canonical order
    pub const ALL: [PartSlot; 10] = [
        PartSlot::FaceBase,
        PartSlot::FaceForehead,
        PartSlot::FaceEye,
        PartSlot::FaceNose,
        PartSlot::FaceEar,
        PartSlot::Hair,
        PartSlot::Bust,
        PartSlot::Pants,
        PartSlot::Rist,
        PartSlot::Boots,
    ];

    /// Position of this slot in the canonical order
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Slot name as stored in the asset format (lower snake case)
    pub fn name(&self) -> &'static str {
        match self {
            PartSlot::FaceBase => "face_base",
            PartSlot::FaceForehead => "face_forehead",
            PartSlot::FaceEye => "face_eye",
            PartSlot::FaceNose => "face_nose",
            PartSlot::FaceEar => "face_ear",
            PartSlot::Hair => "hair",
            PartSlot::Bust => "bust",
            PartSlot::Pants => "pants",
            PartSlot::Rist => "rist",
            PartSlot::Boots => "boots",
        }
    }

    /// Display title for tree labels and menus
    pub fn title(&self) -> &'static str {
        match self {
            PartSlot::FaceBase => "Face Base",
            PartSlot::FaceForehead => "Face Forehead",
            PartSlot::FaceEye => "Face Eye",
            PartSlot::FaceNose => "Face Nose",
            PartSlot::FaceEar => "Face Ear",
            PartSlot::Hair => "Hair",
            PartSlot::Bust => "Bust",
            PartSlot::Pants => "Pants",
            PartSlot::Rist => "Rist",
            PartSlot::Boots => "Boots",
        }
    }

    /// Parse a slot from its asset-format name
    pub fn from_name(name: &str) -> Option<PartSlot> {
        PartSlot::ALL.iter().copied().find(|s| s.name() == name)
    }
}

/// DYT option values selectable on a `Part`
///
/// Label/value pairs; values are fixed bit patterns in the format.
pub const PART_DYT_OPTIONS: [(&str, u32); 8] = [
    ("Standard", 0x0),
    ("Model 2 EMB.DYT", 0x2),
    ("Accessories", 0x4),
    ("Green Scouter Overlay", 0xC),
    ("Red Scouter Overlay", 0x14),
    ("Blue Scouter Overlay", 0x24),
    ("Purple Scouter Overlay", 0x44),
    ("Orange Scouter Overlay", 0x204),
];

/// DYT option values selectable on a `Physics` object
///
/// Same vocabulary as parts plus the part/physics DYT split bits.
pub const PHYSICS_DYT_OPTIONS: [(&str, u32); 9] = [
    ("Standard", 0x0),
    ("Part DYT", 0x1),
    ("Physics DYT", 0x2),
    ("Accessories", 0x4),
    ("Green Scouter Overlay", 0xC),
    ("Red Scouter Overlay", 0x14),
    ("Blue Scouter Overlay", 0x24),
    ("Purple Scouter Overlay", 0x44),
    ("Orange Scouter Overlay", 0x204),
];

/// Part-hiding flag bits
///
/// The format packs the hide flags into three byte groups: accessories in
/// the low byte, outfit slots in the second byte, face slots in the third.
pub mod part_hiding {
    pub const WRISTS: u32 = 0x0000_0001;
    pub const BOOTS: u32 = 0x0000_0002;
    pub const FACE_EAR: u32 = 0x0000_0100;
    pub const HAIR: u32 = 0x0000_0200;
    pub const BUST: u32 = 0x0000_0400;
    pub const PANTS: u32 = 0x0000_0800;
    pub const FACE_BASE: u32 = 0x0001_0000;
    pub const FACE_FOREHEAD: u32 = 0x0002_0000;
    pub const FACE_EYE: u32 = 0x0004_0000;
    pub const FACE_NOSE: u32 = 0x0008_0000;
}

/// Labeled part-hiding flags in checkbox display order
pub const PART_HIDING_FLAGS: [(&str, u32); 10] = [
    ("Wrists", part_hiding::WRISTS),
    ("Boots", part_hiding::BOOTS),
    ("Face Ear", part_hiding::FACE_EAR),
    ("Hair", part_hiding::HAIR),
    ("Bust", part_hiding::BUST),
    ("Pants", part_hiding::PANTS),
    ("Face Base", part_hiding::FACE_BASE),
    ("Face Forehead", part_hiding::FACE_FOREHEAD),
    ("Face Eye", part_hiding::FACE_EYE),
    ("Face Nose", part_hiding::FACE_NOSE),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_order_is_stable() {
        let ordinals: Vec<usize> = PartSlot::ALL.iter().map(|s| s.ordinal()).collect();
        assert_eq!(ordinals, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn slot_names_round_trip() {
        for slot in PartSlot::ALL {
            assert_eq!(PartSlot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(PartSlot::from_name("tail"), None);
    }

    #[test]
    fn dyt_vocabularies_share_overlay_values() {
        // The physics table is the part table plus the two DYT split bits
        for (label, value) in PART_DYT_OPTIONS {
            if value == 0 {
                continue;
            }
            assert!(
                PHYSICS_DYT_OPTIONS.iter().any(|(l, v)| *l == label && *v == value),
                "missing {label} in physics vocabulary"
            );
        }
    }
}
