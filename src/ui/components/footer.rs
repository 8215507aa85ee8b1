//! Status line and footer renderers.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, StatusLine};

/// Renders the loading, error or end-of-list line, or a blank line.
pub fn render_status_line(row: usize, status: Option<&StatusLine>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let (color, text) = match status {
        Some(StatusLine::Loading(text)) => (&theme.colors.text_dim, text),
        Some(StatusLine::Error(text)) => (&theme.colors.error_fg, text),
        Some(StatusLine::EndOfList(text)) => (&theme.colors.text_dim, text),
        None => {
            print!("{}", " ".repeat(cols));
            return row + 1;
        }
    };

    let text = truncate(&format!(" {text}"), cols);
    print!("{}{text}", Theme::fg(color));
    print!("{}", " ".repeat(cols.saturating_sub(text.chars().count())));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders centered keybinding hints.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let text = truncate(&footer.keybindings, cols);
    let len = text.chars().count();
    let padding = cols.saturating_sub(len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}{text}", " ".repeat(padding));
    print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
    print!("{}", Theme::reset());
    row + 1
}
