//! Models module for the organizer document core
//!
//! This module contains all the data models and structures for the
//! customization document: the record types, the document aggregate, the
//! session that owns it, and the render cache that tracks the palettes.

pub mod core;
pub mod entries;
pub mod fields;
pub mod render_cache;
pub mod session;
pub mod slots;

// Re-export commonly used types
pub use self::core::*;
pub use entries::*;
pub use fields::{FieldError, FieldValue};
pub use render_cache::{preview_rgba, ImageHandle, RenderCache};
pub use session::{ClipboardBatch, Session};
pub use slots::{PartSlot, PART_DYT_OPTIONS, PART_HIDING_FLAGS, PHYSICS_DYT_OPTIONS};
