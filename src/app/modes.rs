//! Input mode state machine.
//!
//! - **Normal**: navigation and feed commands
//! - **Search**: typing into the search box, or browsing its results

/// Focus within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keystrokes edit the search text.
    Typing,
    /// The search box stays visible; j/k move through results.
    Navigating,
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search(SearchFocus),
}

impl InputMode {
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::Search(SearchFocus::Typing))
    }

    #[must_use]
    pub const fn shows_search_bar(self) -> bool {
        matches!(self, Self::Search(_))
    }
}
