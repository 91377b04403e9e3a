//! Domain model: blocks of the content tree plus the page and database
//! summaries the exporter needs.

mod block;
pub mod blocks;
mod common;

pub use block::Block;
pub use blocks::*;
pub use common::BlockCommon;

use crate::types::{DataSourceId, DatabaseId, PageId};
use serde::{Deserialize, Serialize};

/// A page as far as the exporter cares: its id, resolved title and URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: PageId,
    pub title: String,
    pub url: String,
}

/// One data source of a database. Rows are queried per data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceRef {
    pub id: DataSourceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub id: DatabaseId,
    pub title: String,
    pub data_sources: Vec<DataSourceRef>,
}
