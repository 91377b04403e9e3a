// src/lib.rs
//! notion2pandoc library: exports Notion pages as pandoc markdown carrying
//! raw HTML and LaTeX for the constructs markdown cannot express.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ErrorClass`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ExportConfig`
//! - **Resilient fetching**: `RetryPolicy`, `with_retry`, `collect_all`, `ResilientRepository`
//! - **Domain model**: `Block` and its variants, `PageInfo`, `DatabaseInfo`
//! - **Rendering**: `BlockRenderer`, `TransformerRegistry`, `PostProcessor`
//! - **Export and delivery**: `Exporter`, `ExportReport`, `OutputPlan`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod export;
pub mod formatting;
pub mod model;
pub mod output;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ErrorClass, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig};

// --- Resilient Fetching ---
pub use crate::api::{
    collect_all, NotionHttpClient, NotionRepository, PageRequest, PaginatedResponse,
    ResilientRepository,
};
pub use crate::error_recovery::{compute_delay, with_retry, RetryPolicy};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, CalloutBlock, ChildDatabaseBlock, ChildPageBlock, CodeBlock,
    ContainerBlock, DataSourceRef, DatabaseInfo, DividerBlock, EquationBlock, HeadingBlock,
    LinkedMediaBlock, ListItemBlock, PageInfo, ParagraphBlock, QuoteBlock, TableBlock,
    TableRowBlock, TextBlockContent, ToDoBlock, ToggleBlock, UnsupportedBlock,
};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, DataSourceId, DatabaseId, NotionId, PageId, RichTextItem,
    RichTextType,
};

// --- Rendering ---
pub use crate::formatting::{
    BlockRenderer, Grammar, PostProcessor, RenderOptions, RenderedDocument, TransformerRegistry,
};

// --- Export and Delivery ---
pub use crate::export::{ExportReport, ExportedPage, Exporter, PageFailure};
pub use crate::output::{deliver, plan_files, plan_stdout, DeliveryTarget, OutputPlan, OutputReport};
