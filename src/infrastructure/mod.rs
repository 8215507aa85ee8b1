//! Sandbox environment helpers: data directory layout and path expansion
//! for user-supplied file options (`theme_file`, `locale_file`).

pub mod paths;

pub use paths::{data_dir, expand_tilde, preferences_file, trace_file};
