use serde::{Deserialize, Serialize};

/// Pagination block returned under `meta.pagination`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Number of items per page
    pub limit: u64,
    /// Offset of the first item of this page
    pub offset: u64,
    /// Total number of items
    pub total: u64,
}

impl Pagination {
    pub fn new(limit: u64, offset: u64, total: u64) -> Self {
        Pagination {
            limit,
            offset,
            total,
        }
    }

    /// Whether more items follow the current page.
    ///
    /// All-zero metadata never reports a next page.
    pub fn has_next_page(&self) -> bool {
        self.total != 0 && self.limit != 0 && self.total > self.offset.saturating_add(self.limit)
    }
}
