use serde::Serialize;

/// Pagination metadata returned alongside every list response. The totals
/// are computed with the same filter predicate as the page fetch, so
/// `total_items` never drifts from what paging through would yield.
#[derive(Debug, Serialize, PartialEq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: i64,
    pub items_per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let total_pages = if total == 0 || limit == 0 {
            0
        } else {
            ((total + limit as i64 - 1) / limit as i64) as u32
        };

        Pagination {
            current_page: page,
            total_pages,
            total_items: total,
            items_per_page: limit,
        }
    }
}

/// Helper to compute OFFSET safely from 1-based `page` and `per_page`.
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_of_total_over_limit() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
        assert_eq!(Pagination::new(1, 1, 37).total_pages, 37);
    }

    #[test]
    fn limit_one_works_as_a_count_probe() {
        let p = Pagination::new(1, 1, 42);
        assert_eq!(p.total_items, 42);
        assert_eq!(p.total_pages, 42);
        assert_eq!(p.items_per_page, 1);
    }

    #[test]
    fn offset_is_zero_based_and_never_underflows() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(page_offset(0, 20), 0);
    }
}
