//! Empty state renderer.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders a centered two-line message starting at `row`.
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    let lines = [
        (&empty.message, Theme::fg(&theme.colors.empty_state_fg)),
        (&empty.subtitle, format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim))),
    ];

    for (offset, (text, style)) in lines.iter().enumerate() {
        let text = truncate(text, cols);
        let len = text.chars().count();
        let padding = cols.saturating_sub(len) / 2;

        position_cursor(row + offset, 1);
        print!("{style}{}{text}", " ".repeat(padding));
        print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
        print!("{}", Theme::reset());
    }

    row + lines.len()
}
