//! Organizer Document Core WASM Module
//!
//! This is the main WASM module for the character customization organizer.
//! It owns the structured document model and the algorithms that keep its
//! positional cross-references valid across edits; the surrounding GUI is
//! an external JavaScript collaborator driving this module through the
//! `api` boundary.

pub mod models;
pub mod resolver;
pub mod edit;
pub mod projection;
pub mod clipboard;
pub mod search;
pub mod api;

// Re-export commonly used types
pub use models::core::*;
pub use models::entries::*;
pub use models::session::{ClipboardBatch, Session};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Organizer document core WASM module initialized");
}
