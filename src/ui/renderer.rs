//! Top-level rendering entry point.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → components → ANSI output
//! ```

use crate::app::AppState;
use crate::ui::components;
use chrono::{DateTime, Utc};

/// Renders the plugin UI to stdout.
///
/// Countdowns are computed against `now`.
pub fn render(state: &AppState, rows: usize, cols: usize, now: DateTime<Utc>) {
    let _span = tracing::trace_span!("render", rows, cols).entered();

    let viewmodel = state.compute_viewmodel(rows, cols, now);
    components::render_layout(&viewmodel, &state.theme, cols, rows);
}
