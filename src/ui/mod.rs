//! Terminal user interface.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! - [`viewmodel`]: display-ready view model types
//! - [`renderer`]: top-level rendering entry point
//! - [`components`]: header, tabs, search box, table, footer, empty state
//! - [`helpers`]: cursor positioning, truncation, match highlighting
//! - [`theme`]: light/dark palettes and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{
    ColumnHeaders, EmptyState, EventRow, FooterInfo, HeaderInfo, SearchBarInfo, StatusLine, TabInfo, UIViewModel,
};
