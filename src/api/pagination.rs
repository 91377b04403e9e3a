// src/api/pagination.rs
//! Draining cursor-paginated listings.

use super::types::{PageRequest, PaginatedResponse};
use crate::error::AppError;
use std::future::Future;

/// Calls `list_page` until the listing is exhausted and returns every item
/// in the order the API reported them.
///
/// The listing ends when a response says there is nothing more, carries no
/// cursor, or hands back the cursor that was just used. The last case is
/// logged; it would otherwise loop forever.
pub async fn collect_all<T, F, Fut>(mut list_page: F, page_size: u32) -> Result<Vec<T>, AppError>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut request = PageRequest::first(page_size);
    let mut pages_fetched = 0u32;

    loop {
        let current_cursor = request.start_cursor.clone();
        let page = list_page(request.clone()).await?;
        pages_fetched += 1;
        items.extend(page.results);

        let next_cursor = match page.next_cursor {
            Some(cursor) if page.has_more => cursor,
            _ => break,
        };
        if current_cursor.as_deref() == Some(next_cursor.as_str()) {
            log::warn!(
                "Listing returned the cursor it was given ({}); treating as end of results",
                next_cursor
            );
            break;
        }
        request = request.after(next_cursor);
    }

    log::debug!(
        "Collected {} items over {} pages",
        items.len(),
        pages_fetched
    );
    Ok(items)
}
