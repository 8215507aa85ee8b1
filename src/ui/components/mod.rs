//! Composable UI component renderers.
//!
//! - [`header`]: title bar and status tabs
//! - [`search`]: search input box
//! - [`table`]: event table
//! - [`footer`]: status line and keybinding hints
//! - [`empty`]: message shown when no event is visible
//!
//! Layout, top to bottom:
//!
//! ```text
//! [Header]
//! [Tabs]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Table Headers]
//! [Table Rows | Empty State]
//! ...
//! [Status Line]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod search;
pub mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Rows used by everything except table rows.
pub const CHROME_ROWS: usize = 7;

/// Extra rows used by the search box.
pub const SEARCH_BAR_ROWS: usize = 3;

fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}{}{}", Theme::fg(color), "─".repeat(cols), Theme::reset());
    row + 1
}

/// Renders a full frame.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 1;

    current_row = header::render_header(current_row, &vm.header, theme, cols);
    current_row = header::render_tabs(current_row, &vm.tabs, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    if let Some(search) = &vm.search_bar {
        current_row = search::render_search_bar(current_row, search, theme, cols);
    }

    if let Some(empty_state) = &vm.empty_state {
        empty::render_empty_state(current_row + 2, empty_state, theme, cols);
    } else {
        current_row = table::render_table_headers(current_row, &vm.columns, theme, cols);
        table::render_table_rows(current_row, &vm.rows, theme, cols);
    }

    let footer_row = rows.max(CHROME_ROWS);
    footer::render_status_line(footer_row - 2, vm.status_line.as_ref(), theme, cols);
    render_border(footer_row - 1, &theme.colors.border, cols);
    footer::render_footer(footer_row, &vm.footer, theme, cols);
}
