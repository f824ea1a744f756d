//! Merged aggregate timelines.

use abp_core::ResourceKind;
use serde::{Deserialize, Serialize};

use crate::version::Version;

/// 1-based pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    #[must_use]
    pub const fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    /// Index of the first entry on this page.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 25,
        }
    }
}

/// Timeline sort order by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// One page of a merged timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<Version>,
    /// Count of the full merged timeline, not just this page.
    pub total_record_count: usize,
}

/// Merged timeline for `(kind, id)`: the entity's own versions plus every
/// version declaring it as parent item, ordered by creation time and
/// paginated.
#[must_use]
pub fn history_for(
    kind: ResourceKind,
    id: &str,
    versions: &[Version],
    page: Page,
    sort: SortOrder,
) -> HistoryPage {
    let mut entries: Vec<Version> = versions
        .iter()
        .filter(|version| version.belongs_to_timeline(kind, id))
        .cloned()
        .collect();

    // Stable sort keeps append order for equal timestamps.
    entries.sort_by_key(|version| version.created_at);
    if sort == SortOrder::Desc {
        entries.reverse();
    }

    let total_record_count = entries.len();
    let entries = entries
        .into_iter()
        .skip(page.offset())
        .take(page.size)
        .collect();

    HistoryPage {
        entries,
        total_record_count,
    }
}
