use crate::{Result, SearchError};
use sigma_protocol::Page;

/// Slice out one 1-based page. Page 0 is read as page 1; pages past the end
/// come back empty but still report the totals.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Result<Page<T>> {
    if page_size == 0 {
        return Err(SearchError::InvalidPageSize);
    }

    let current_page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let start = (current_page - 1).saturating_mul(page_size);

    let data: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Ok(Page {
        data,
        total_pages,
        current_page,
        total_items,
        has_prev: current_page > 1,
        has_next: current_page < total_pages,
    })
}
