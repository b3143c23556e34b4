//! Pagination utilities for the review list
//!
//! Pages are 1-indexed. Requesting a page past the end is not an error; it
//! simply yields no rows. A page whose offset does not fit in an `i64` has no
//! pagination at all.

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
    /// Total number of pages (0 when there are no results)
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Calculate pagination metadata from total results and requested page
///
/// `page` and `per_page` must already be validated as >= 1. Returns `None`
/// when the offset overflows.
///
/// # Examples
/// ```
/// use nclex_server::pagination::calculate_pagination;
///
/// // 30 total results at 12 per page = 3 pages (12 + 12 + 6)
/// let p = calculate_pagination(30, 2, 12).unwrap();
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 12);
///
/// assert!(calculate_pagination(30, i64::MAX, 12).is_none());
/// ```
pub fn calculate_pagination(total_results: i64, page: i64, per_page: i64) -> Option<Pagination> {
    let total_pages = total_results.checked_add(per_page - 1)? / per_page;
    let offset = page.checked_sub(1)?.checked_mul(per_page)?;

    Some(Pagination {
        page,
        per_page,
        total_pages,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(30, 2, 12).unwrap();
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 12);
    }

    #[test]
    fn test_pagination_first_page() {
        let p = calculate_pagination(5, 1, 12).unwrap();
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_past_end_not_clamped() {
        let p = calculate_pagination(5, 4, 12).unwrap();
        assert_eq!(p.page, 4);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.offset, 36);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1, 12).unwrap();
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(24, 2, 12).unwrap();
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 12);
    }

    #[test]
    fn test_pagination_offset_overflow() {
        assert_eq!(calculate_pagination(5, i64::MAX, 12), None);
        assert_eq!(calculate_pagination(5, i64::MAX / 12 + 2, 12), None);
        assert!(calculate_pagination(5, i64::MAX / 12, 12).is_some());
    }
}
