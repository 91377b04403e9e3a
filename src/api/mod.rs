// src/api/mod.rs
//! Notion API interaction: the ability to retrieve content from a workspace.
//!
//! [`NotionRepository`] is the single-request contract. The HTTP client
//! implements it; tests implement it in memory. Higher layers only ever
//! talk to [`ResilientRepository`], which adds retrying and pagination.

pub mod client;
pub mod pagination;
pub mod parser;
mod resilient;
pub mod types;

use crate::error::AppError;
use crate::model::{Block, DatabaseInfo, PageInfo};
use crate::types::{BlockId, DataSourceId, DatabaseId, PageId};

pub use client::NotionHttpClient;
pub use pagination::collect_all;
pub use resilient::ResilientRepository;
pub use types::{PageRequest, PaginatedResponse};

/// The ability to retrieve content from a Notion workspace.
///
/// Each method performs exactly one remote request.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_page(&self, id: &PageId) -> Result<PageInfo, AppError>;

    async fn retrieve_database(&self, id: &DatabaseId) -> Result<DatabaseInfo, AppError>;

    async fn list_children(
        &self,
        parent: &BlockId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError>;

    async fn query_data_source(
        &self,
        data_source: &DataSourceId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<PageInfo>, AppError>;
}
