//! Persistent user preferences.
//!
//! # Modules
//!
//! - `backend`: the [`PreferenceStore`] trait
//! - `json`: JSON file implementation with atomic writes
//! - `memory`: in-memory implementation
//! - `models`: preference keys and the on-disk file layout

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::PreferenceStore;
pub use json::JsonPreferences;
pub use memory::MemoryPreferences;
pub use models::{ThemePreference, HOME_SCROLL_Y, PREFERRED_THEME};
