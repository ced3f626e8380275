//! Page window for the list endpoints (users, courses, feedback, lost items,
//! visitor passes).

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// 1-based page number plus page size as sent by clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Absent query values fall back to page 1 of `DEFAULT_PER_PAGE`.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page: page.unwrap_or(1), per_page: per_page.unwrap_or(DEFAULT_PER_PAGE) }
    }

    /// `(zero_based_page, page_size)` as expected by sea-orm's `fetch_page`.
    pub fn normalize(self) -> (u64, u64) {
        let idx = self.page.saturating_sub(1);
        let size = self.per_page.clamp(1, MAX_PER_PAGE);
        (u64::from(idx), u64::from(size))
    }
}

impl Default for Pagination {
    fn default() -> Self { Self::from_query(None, None) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_reads_as_first_page() {
        assert_eq!(Pagination { page: 0, per_page: 0 }.normalize(), (0, 1));
    }

    #[test]
    fn oversized_pages_are_capped() {
        assert_eq!(Pagination { page: 3, per_page: 5_000 }.normalize(), (2, u64::from(MAX_PER_PAGE)));
    }

    #[test]
    fn missing_query_values_use_defaults() {
        let p = Pagination::from_query(None, Some(50));
        assert_eq!(p, Pagination { page: 1, per_page: 50 });
        assert_eq!(Pagination::default().per_page, DEFAULT_PER_PAGE);
    }
}
