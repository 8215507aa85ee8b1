//! Query parameters and pure list utilities.
//!
//! This module owns the vocabulary of a feed query (status tab, sort field
//! and order) and the identity of a logical query ([`FilterSignature`],
//! [`QueryTag`]). The submodules hold the pure operations applied to an
//! in-memory list of [`EventSummary`]:
//!
//! - [`search`]: text/id/hashtag search, hashtag and status filters
//! - [`sort`]: stable multi-field sort

pub mod search;
pub mod sort;

pub use search::{filter_by_hashtag, filter_by_search, filter_by_status};
pub use sort::sort_events;

use crate::domain::{EventStatus, EventSummary};
use serde::{Deserialize, Serialize};

/// Status tab of the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTab {
    All,
    Preheat,
    #[default]
    Ongoing,
    Completed,
}

impl StatusTab {
    /// Tabs in display order.
    pub const ALL_TABS: [Self; 4] = [Self::All, Self::Preheat, Self::Ongoing, Self::Completed];

    /// Value of the `status` query parameter.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Preheat => "preheat",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }

    /// Client lifecycle status this tab narrows to, `None` for `All`.
    #[must_use]
    pub const fn narrows_to(self) -> Option<EventStatus> {
        match self {
            Self::All => None,
            Self::Preheat => Some(EventStatus::Preheat),
            Self::Ongoing => Some(EventStatus::Active),
            Self::Completed => Some(EventStatus::Completed),
        }
    }

    #[must_use]
    pub fn matches(self, event: &EventSummary) -> bool {
        self.narrows_to().map_or(true, |status| event.status == status)
    }
}

/// Field the feed is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Time,
    Bounty,
    Participation,
}

impl SortField {
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Bounty => "bounty",
            Self::Participation => "participation",
        }
    }

    /// Next field in the `time → bounty → participation` cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Time => Self::Bounty,
            Self::Bounty => Self::Participation,
            Self::Participation => Self::Time,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Identity of a logical query: everything that decides which items belong
/// to the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterSignature {
    pub status: StatusTab,
    pub search: String,
    pub hashtag: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

/// Tag attached to every page request at dispatch time.
///
/// A response is applied only if its tag equals the tag the feed is
/// currently waiting for. `generation` changes on every reload, so even a
/// reload with an unchanged signature invalidates earlier requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryTag {
    pub signature: FilterSignature,
    pub generation: u64,
    pub offset: usize,
}
