//! Organizer WASM API
//!
//! This module provides the JavaScript-facing API for the organizer core.
//! It includes shared utilities for serialization, validation and error
//! handling, plus the exported API functions.
//!
//! # Module Structure
//!
//! - `helpers`: serialization, validation, error handling, logging
//! - `types`: result structures crossing the boundary
//! - `core`: exported API functions and the session storage

pub mod core;
pub mod helpers;
pub mod types;

// Re-export all public functions to keep a flat public API
pub use self::core::*;
pub use types::{ClipboardInfo, InvalidSelector, LoadResult};
