//! Data models for keyboard mappings, author filters, and corrections.
//!
//! This module contains the core data structures used throughout the
//! application. Models are independent of UI and transport concerns.

pub mod author_filter;
pub mod correction;
pub mod keyboard_mapping;

// Re-export all model types
pub use author_filter::AuthorFilter;
pub use correction::{Correction, WordInfo};
pub use keyboard_mapping::{KeyboardMapping, KeyboardUpdate, MappingEntry, MappingState, UpdateAction};
