//! Pagination utilities
//!
//! Activity history is browsed 50 rows per page.

/// Page size for activity history
pub const ACTIVITY_PAGE_SIZE: i64 = 50;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
    pub page_size: i64,
}

/// Clamp the requested page into `[1, total_pages]` and compute its offset
///
/// # Examples
/// ```
/// use tresor_gx::pagination::calculate_pagination;
///
/// // 120 rows at 50 per page = 3 pages
/// let p = calculate_pagination(120, 2, 50);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 50);
///
/// // Out-of-bounds pages are clamped
/// assert_eq!(calculate_pagination(120, 99, 50).page, 3);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64, page_size: i64) -> Pagination {
    let page_size = page_size.max(1);
    let total_pages = (total_results.max(0) + page_size - 1) / page_size;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        total_pages,
        offset,
        page_size,
    }
}
