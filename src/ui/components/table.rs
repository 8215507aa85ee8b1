//! Event table renderer.
//!
//! ```text
//! ● TITLE                      TAGS               REWARD  PEOPLE  TIME
//! ● Will it rain tomorrow?     #weather          1.5 BTC      12  2h 5m left
//! ```
//!
//! The tags column is dropped on narrow panes so titles stay readable.

use crate::ui::helpers::{self, fit, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{ColumnHeaders, EventRow};

const MARKER_WIDTH: usize = 2;
const TAGS_WIDTH: usize = 18;
const REWARD_WIDTH: usize = 16;
const PARTICIPANTS_WIDTH: usize = 7;
const TIME_WIDTH: usize = 18;
const MIN_TITLE_WIDTH: usize = 24;

/// Column widths for a pane width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub title: usize,
    pub show_tags: bool,
}

impl TableLayout {
    #[must_use]
    pub const fn for_width(cols: usize) -> Self {
        let fixed = MARKER_WIDTH + REWARD_WIDTH + 1 + PARTICIPANTS_WIDTH + 1 + TIME_WIDTH + 1;
        let with_tags = cols.saturating_sub(fixed + TAGS_WIDTH + 1);

        if with_tags >= MIN_TITLE_WIDTH {
            Self {
                title: with_tags,
                show_tags: true,
            }
        } else {
            Self {
                title: cols.saturating_sub(fixed),
                show_tags: false,
            }
        }
    }
}

pub fn render_table_headers(row: usize, columns: &ColumnHeaders, theme: &Theme, cols: usize) -> usize {
    let layout = TableLayout::for_width(cols);

    let mut line = " ".repeat(MARKER_WIDTH);
    line.push_str(&fit(&columns.title, layout.title));
    if layout.show_tags {
        line.push(' ');
        line.push_str(&fit(&columns.tags, TAGS_WIDTH));
    }
    line.push_str(&format!(
        " {:>rw$} {:>pw$} {}",
        truncate(&columns.reward, REWARD_WIDTH),
        truncate(&columns.participants, PARTICIPANTS_WIDTH),
        fit(&columns.time, TIME_WIDTH),
        rw = REWARD_WIDTH,
        pw = PARTICIPANTS_WIDTH,
    ));

    position_cursor(row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print!("{}", fit(&line, cols));
    print!("{}", Theme::reset());
    row + 1
}

pub fn render_table_rows(row: usize, rows: &[EventRow], theme: &Theme, cols: usize) -> usize {
    let layout = TableLayout::for_width(cols);
    let mut current = row;
    for event in rows {
        current = render_table_row(current, event, layout, theme, cols);
    }
    current
}

fn render_table_row(row: usize, event: &EventRow, layout: TableLayout, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let base = if event.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    let colored = |hex: &str| if event.is_selected { String::new() } else { Theme::fg(hex) };

    print!("{base}");
    print!("{}●{base} ", colored(theme.status_fg(event.status)));

    let title = truncate(&event.title, layout.title);
    helpers::render_highlighted_text(&title, &event.highlight_ranges, theme, event.is_selected);
    print!("{}", " ".repeat(layout.title.saturating_sub(title.chars().count())));

    if layout.show_tags {
        print!(" {}{}{base}", colored(theme.colors.tag_fg.as_str()), fit(&event.tags, TAGS_WIDTH));
    }

    print!(
        " {}{:>width$}{base}",
        colored(theme.colors.reward_fg.as_str()),
        truncate(&event.reward, REWARD_WIDTH),
        width = REWARD_WIDTH
    );
    print!(
        " {:>width$}",
        truncate(&event.participants, PARTICIPANTS_WIDTH),
        width = PARTICIPANTS_WIDTH
    );
    print!(" {}", fit(&event.countdown, TIME_WIDTH));

    let used = MARKER_WIDTH
        + layout.title
        + if layout.show_tags { TAGS_WIDTH + 1 } else { 0 }
        + REWARD_WIDTH
        + 1
        + PARTICIPANTS_WIDTH
        + 1
        + TIME_WIDTH
        + 1;
    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
