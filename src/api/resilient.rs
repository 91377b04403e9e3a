// src/api/resilient.rs
//! The per-run fetch context.
//!
//! Built once per export run and passed down explicitly. Every remote call
//! the renderer or exporter makes goes through here, and from here through
//! [`with_retry`], so no call site can skip the retry policy.

use super::pagination::collect_all;
use super::types::{PageRequest, PaginatedResponse};
use super::NotionRepository;
use crate::error::AppError;
use crate::error_recovery::{with_retry, RetryPolicy};
use crate::model::{Block, DatabaseInfo, PageInfo};
use crate::types::{BlockId, DataSourceId, DatabaseId, PageId};
use std::sync::Arc;

#[derive(Clone)]
pub struct ResilientRepository {
    inner: Arc<dyn NotionRepository>,
    policy: RetryPolicy,
    page_size: u32,
}

impl ResilientRepository {
    pub fn new(inner: Arc<dyn NotionRepository>, policy: RetryPolicy, page_size: u32) -> Self {
        Self {
            inner,
            policy,
            page_size,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn page(&self, id: &PageId) -> Result<PageInfo, AppError> {
        let context = format!("retrieve page {}", id.short());
        with_retry(|| self.inner.retrieve_page(id), &self.policy, &context).await
    }

    pub async fn database(&self, id: &DatabaseId) -> Result<DatabaseInfo, AppError> {
        let context = format!("retrieve database {}", id.short());
        with_retry(|| self.inner.retrieve_database(id), &self.policy, &context).await
    }

    /// One page of a block's children.
    pub async fn children_page(
        &self,
        parent: &BlockId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let context = match &request.start_cursor {
            Some(cursor) => format!("list children of {} after {}", parent.short(), cursor),
            None => format!("list children of {}", parent.short()),
        };
        with_retry(
            || self.inner.list_children(parent, request.clone()),
            &self.policy,
            &context,
        )
        .await
    }

    /// One page of a data source's rows.
    pub async fn rows_page(
        &self,
        data_source: &DataSourceId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<PageInfo>, AppError> {
        let context = format!("query data source {}", data_source.short());
        with_retry(
            || self.inner.query_data_source(data_source, request.clone()),
            &self.policy,
            &context,
        )
        .await
    }

    /// Every child of `parent`, all cursors drained.
    pub async fn all_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
        collect_all(
            |request| self.children_page(parent, request),
            self.page_size,
        )
        .await
    }

    /// Every row of a data source, all cursors drained.
    pub async fn all_rows(&self, data_source: &DataSourceId) -> Result<Vec<PageInfo>, AppError> {
        collect_all(
            |request| self.rows_page(data_source, request),
            self.page_size,
        )
        .await
    }
}
