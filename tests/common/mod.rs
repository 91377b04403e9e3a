// tests/common/mod.rs
//! In-memory Notion workspace shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use notion2pandoc::types::Id;
use notion2pandoc::{
    AppError, Block, BlockCommon, BlockId, DataSourceId, DataSourceRef, DatabaseId, DatabaseInfo,
    NotionErrorCode, NotionRepository, PageId, PageInfo, PageRequest, PaginatedResponse,
    ResilientRepository, RetryPolicy, RichTextItem,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A deterministic id from a small number.
pub fn id<K>(n: u32) -> Id<K> {
    Id::parse(&format!("{:032x}", n)).expect("hex ids are valid")
}

/// Failure the fake returns instead of answering.
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    RateLimited,
    Unavailable,
    NotFound,
    Unauthorized,
}

impl Scripted {
    fn into_error(self) -> AppError {
        match self {
            Scripted::RateLimited => {
                AppError::notion(NotionErrorCode::RateLimited, 429, "slow down")
            }
            Scripted::Unavailable => AppError::notion(
                NotionErrorCode::ServiceUnavailable,
                503,
                "try again later",
            ),
            Scripted::NotFound => {
                AppError::notion(NotionErrorCode::ObjectNotFound, 404, "no such object")
            }
            Scripted::Unauthorized => {
                AppError::notion(NotionErrorCode::Unauthorized, 401, "bad token")
            }
        }
    }
}

#[derive(Default)]
struct Workspace {
    pages: HashMap<String, PageInfo>,
    children: HashMap<String, Vec<Block>>,
    databases: HashMap<String, DatabaseInfo>,
    rows: HashMap<String, Vec<PageInfo>>,
    failures: HashMap<String, VecDeque<Scripted>>,
    calls: HashMap<String, u32>,
    page_sizes: Vec<u32>,
}

/// `NotionRepository` over in-memory data. Every call is counted under a
/// key such as `children:{id}`; scripted failures for that key are
/// returned first, in order.
#[derive(Clone, Default)]
pub struct FakeRepository {
    state: Arc<Mutex<Workspace>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page_id: &PageId, title: &str, blocks: Vec<Block>) -> Self {
        {
            let mut state = self.state.lock().expect("lock");
            state.pages.insert(
                page_id.as_str().to_string(),
                PageInfo {
                    id: page_id.clone(),
                    title: title.to_string(),
                    url: format!("https://www.notion.so/{}", page_id),
                },
            );
            state.children.insert(page_id.as_str().to_string(), blocks);
        }
        self
    }

    pub fn with_children(self, parent: &BlockId, blocks: Vec<Block>) -> Self {
        self.state
            .lock()
            .expect("lock")
            .children
            .insert(parent.as_str().to_string(), blocks);
        self
    }

    /// A database with a single data source holding `rows`.
    pub fn with_database(self, database_id: &DatabaseId, title: &str, rows: &[&str]) -> Self {
        let source: DataSourceId = database_id.retag();
        {
            let mut state = self.state.lock().expect("lock");
            state.databases.insert(
                database_id.as_str().to_string(),
                DatabaseInfo {
                    id: database_id.clone(),
                    title: title.to_string(),
                    data_sources: vec![DataSourceRef {
                        id: source.clone(),
                        name: title.to_string(),
                    }],
                },
            );
            let pages = rows
                .iter()
                .enumerate()
                .map(|(index, row)| PageInfo {
                    id: id(10_000 + index as u32),
                    title: row.to_string(),
                    url: String::new(),
                })
                .collect();
            state.rows.insert(source.as_str().to_string(), pages);
        }
        self
    }

    pub fn fail(self, key: &str, failures: &[Scripted]) -> Self {
        self.state
            .lock()
            .expect("lock")
            .failures
            .entry(key.to_string())
            .or_default()
            .extend(failures.iter().copied());
        self
    }

    pub fn calls(&self, key: &str) -> u32 {
        self.state
            .lock()
            .expect("lock")
            .calls
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn page_sizes(&self) -> Vec<u32> {
        self.state.lock().expect("lock").page_sizes.clone()
    }

    /// Counts the call and pops the next scripted failure, if any.
    fn enter(&self, key: String) -> Result<(), AppError> {
        let mut state = self.state.lock().expect("lock");
        *state.calls.entry(key.clone()).or_default() += 1;
        match state.failures.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }

    pub fn resilient(&self, policy: RetryPolicy, page_size: u32) -> ResilientRepository {
        ResilientRepository::new(Arc::new(self.clone()), policy, page_size)
    }
}

/// Millisecond delays so retries do not slow the suite down.
pub fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(
        max_retries,
        Duration::from_millis(1),
        Duration::from_millis(5),
    )
}

/// Slices `items` according to an offset cursor.
fn paginate<T: Clone>(items: &[T], request: &PageRequest) -> PaginatedResponse<T> {
    let start: usize = request
        .start_cursor
        .as_deref()
        .and_then(|cursor| cursor.parse().ok())
        .unwrap_or(0);
    let end = (start + request.page_size as usize).min(items.len());
    let results = items[start.min(end)..end].to_vec();
    if end < items.len() {
        PaginatedResponse::with_cursor(results, end.to_string())
    } else {
        PaginatedResponse::last(results)
    }
}

fn not_found(what: &str) -> AppError {
    AppError::notion(
        NotionErrorCode::ObjectNotFound,
        404,
        format!("Could not find {}", what),
    )
}

#[async_trait]
impl NotionRepository for FakeRepository {
    async fn retrieve_page(&self, page_id: &PageId) -> Result<PageInfo, AppError> {
        self.enter(format!("page:{}", page_id))?;
        let state = self.state.lock().expect("lock");
        state
            .pages
            .get(page_id.as_str())
            .cloned()
            .ok_or_else(|| not_found("page"))
    }

    async fn retrieve_database(&self, database_id: &DatabaseId) -> Result<DatabaseInfo, AppError> {
        self.enter(format!("database:{}", database_id))?;
        let state = self.state.lock().expect("lock");
        state
            .databases
            .get(database_id.as_str())
            .cloned()
            .ok_or_else(|| not_found("database"))
    }

    async fn list_children(
        &self,
        parent: &BlockId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        self.enter(format!("children:{}", parent))?;
        let mut state = self.state.lock().expect("lock");
        state.page_sizes.push(request.page_size);
        let blocks = state.children.get(parent.as_str()).cloned().unwrap_or_default();
        Ok(paginate(&blocks, &request))
    }

    async fn query_data_source(
        &self,
        data_source: &DataSourceId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<PageInfo>, AppError> {
        self.enter(format!("rows:{}", data_source))?;
        let state = self.state.lock().expect("lock");
        let rows = state
            .rows
            .get(data_source.as_str())
            .ok_or_else(|| not_found("data source"))?;
        Ok(paginate(rows, &request))
    }
}

// --- Block builders ---

pub fn common(n: u32) -> BlockCommon {
    BlockCommon::new(id(n))
}

pub fn paragraph(n: u32, text: &str) -> Block {
    Block::paragraph(common(n), vec![RichTextItem::plain_text(text)])
}

pub fn paragraph_runs(n: u32, runs: Vec<RichTextItem>) -> Block {
    Block::paragraph(common(n), runs)
}
