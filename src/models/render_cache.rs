//! Palette render cache
//!
//! The external view shows a small preview image next to every color and
//! selector. The core never touches bitmaps; it owns the index structure:
//! one row of opaque image handles per palette, one handle per color,
//! strictly aligned with `part_colors` and each palette's `colors` at all
//! times. Handles are allocated monotonically and never reused, so the UI
//! can cache bitmaps against them.

use serde::{Deserialize, Serialize};

use super::core::Document;
use super::entries::PartColor;

/// Opaque preview image id owned by the external view
pub type ImageHandle = u32;

/// Preview RGBA for a color entry
///
/// Palettes named `eye_` store their visible color in the fourth tuple;
/// everything else uses the first. Alpha is forced opaque for previews.
pub fn preview_rgba(palette: &PartColor, color_index: usize) -> Option<[u8; 4]> {
    let color = palette.colors.get(color_index)?;
    let rgba = if palette.name == "eye_" {
        color.color4
    } else {
        color.color1
    };
    Some([rgba[0], rgba[1], rgba[2], 255])
}

/// Index-aligned image handle rows, one per palette
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RenderCache {
    rows: Vec<Vec<ImageHandle>>,
    next_handle: ImageHandle,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all rows and re-derive the cache from the document
    pub fn rebuild(&mut self, document: &Document) {
        self.rows.clear();
        for palette in &document.part_colors {
            let row = palette.colors.iter().map(|_| self.allocate()).collect();
            self.rows.push(row);
        }
    }

    fn allocate(&mut self) -> ImageHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    pub fn palette_count(&self) -> usize {
        self.rows.len()
    }

    pub fn color_count(&self, palette_index: usize) -> Option<usize> {
        self.rows.get(palette_index).map(|row| row.len())
    }

    pub fn handle(&self, palette_index: usize, color_index: usize) -> Option<ImageHandle> {
        self.rows.get(palette_index)?.get(color_index).copied()
    }

    /// Insert an empty row when a palette is inserted
    pub fn insert_palette(&mut self, index: usize) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, Vec::new());
    }

    /// Drop the row of a removed palette
    pub fn remove_palette(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Allocate a handle for a newly inserted color
    pub fn insert_color(&mut self, palette_index: usize, index: usize) -> Option<ImageHandle> {
        let handle = self.allocate();
        let row = self.rows.get_mut(palette_index)?;
        let index = index.min(row.len());
        row.insert(index, handle);
        Some(handle)
    }

    /// Replace a palette's row with `count` fresh handles
    ///
    /// Used when a whole palette record is overwritten and its color list
    /// changes length in one step.
    pub fn reset_palette(&mut self, palette_index: usize, count: usize) {
        let row: Vec<ImageHandle> = (0..count).map(|_| self.allocate()).collect();
        if let Some(slot) = self.rows.get_mut(palette_index) {
            *slot = row;
        }
    }

    /// Drop the handle of a removed color
    pub fn remove_color(&mut self, palette_index: usize, index: usize) {
        if let Some(row) = self.rows.get_mut(palette_index) {
            if index < row.len() {
                row.remove(index);
            }
        }
    }

    /// Alignment invariant: same palette count, same per-palette length
    pub fn is_aligned_with(&self, document: &Document) -> bool {
        self.rows.len() == document.part_colors.len()
            && self
                .rows
                .iter()
                .zip(&document.part_colors)
                .all(|(row, palette)| row.len() == palette.colors.len())
    }
}
