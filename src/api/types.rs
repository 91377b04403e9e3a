// src/api/types.rs
//! Request and response shapes shared by the API implementations.

use crate::constants::NOTION_API_PAGE_SIZE;
use serde::{Deserialize, Serialize};

/// One page of a cursor-paginated listing.
///
/// `has_more` defaults to `false` when a response omits it, which the
/// collector treats as end-of-stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// A final page: no cursor, nothing more to fetch.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }

    pub fn with_cursor(results: Vec<T>, next_cursor: impl Into<String>) -> Self {
        Self {
            results,
            next_cursor: Some(next_cursor.into()),
            has_more: true,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResponse<U> {
        PaginatedResponse {
            results: self.results.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Cursor and size for one listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    pub page_size: u32,
}

impl PageRequest {
    /// First page of a listing. Zero means the API default; anything above
    /// the API maximum is clamped to it.
    pub fn first(page_size: u32) -> Self {
        Self {
            start_cursor: None,
            page_size: effective_page_size(page_size),
        }
    }

    pub fn after(&self, cursor: String) -> Self {
        Self {
            start_cursor: Some(cursor),
            page_size: self.page_size,
        }
    }

    /// Query-string pairs for GET listings.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page_size", self.page_size.to_string())];
        if let Some(cursor) = &self.start_cursor {
            pairs.push(("start_cursor", cursor.clone()));
        }
        pairs
    }
}

pub fn effective_page_size(requested: u32) -> u32 {
    match requested {
        0 => NOTION_API_PAGE_SIZE,
        n => n.min(NOTION_API_PAGE_SIZE),
    }
}

/// Body of a non-2xx Notion response.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionApiErrorResponse {
    #[serde(default)]
    pub status: Option<u16>,
    pub code: String,
    #[serde(default)]
    pub message: String,
}
