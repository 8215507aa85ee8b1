//! Header and status tab renderers.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{HeaderInfo, TabInfo};

/// Renders the title on the left and the summary on the right.
///
/// Returns the next free row.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate(&format!(" {}", header.title), cols);
    let title_len = title.chars().count();
    let summary = truncate(&format!("{} ", header.summary), cols.saturating_sub(title_len + 1));
    let gap = cols.saturating_sub(title_len + summary.chars().count());

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{}{title}{}", Theme::bold(), Theme::reset());

    print!("{}", Theme::fg(&theme.colors.text_dim));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{}{summary}", " ".repeat(gap));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the status tabs, the active one highlighted.
///
/// Returns the next free row.
pub fn render_tabs(row: usize, tabs: &[TabInfo], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let mut used = 0;

    for (index, tab) in tabs.iter().enumerate() {
        let label = format!(" {} {} ", index + 1, tab.label);
        let len = label.chars().count();
        if used + len > cols {
            break;
        }

        if tab.is_active {
            print!(
                "{}{}{}{label}{}",
                Theme::bold(),
                Theme::fg(&theme.colors.tab_active_fg),
                Theme::bg(&theme.colors.tab_active_bg),
                Theme::reset()
            );
        } else {
            print!("{}{label}{}", Theme::fg(&theme.colors.tab_inactive_fg), Theme::reset());
        }
        used += len;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    row + 1
}
