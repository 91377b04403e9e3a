//! Per-type overrides of the default block rendering.
//!
//! A transformer is looked up by the block's type tag. Types without an
//! entry fall through to the default markdown rendering in
//! [`BlockRenderer`](super::block_renderer::BlockRenderer).

pub mod code;
pub mod table;

use super::block_renderer::BlockRenderer;
use crate::error::AppError;
use crate::model::Block;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;

/// Renders one block. May fetch through the renderer's source.
pub type Transformer =
    for<'a> fn(&'a BlockRenderer, &'a Block) -> BoxFuture<'a, Result<String, AppError>>;

#[derive(Clone)]
pub struct TransformerRegistry {
    entries: HashMap<&'static str, Transformer>,
}

impl TransformerRegistry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Tables, their rows, and code blocks.
    pub fn standard() -> Self {
        Self::empty()
            .with("table", table::transform_table)
            .with("table_row", skip_table_row)
            .with("code", code::transform_code)
    }

    pub fn with(mut self, block_type: &'static str, transformer: Transformer) -> Self {
        self.entries.insert(block_type, transformer);
        self
    }

    pub fn get(&self, block_type: &str) -> Option<Transformer> {
        self.entries.get(block_type).copied()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rows are rendered by their table; on their own they emit nothing.
fn skip_table_row<'a>(_: &'a BlockRenderer, _: &'a Block) -> BoxFuture<'a, Result<String, AppError>> {
    futures::future::ready(Ok(String::new())).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_tables_and_code() {
        let registry = TransformerRegistry::standard();
        assert!(registry.get("table").is_some());
        assert!(registry.get("table_row").is_some());
        assert!(registry.get("code").is_some());
        assert!(registry.get("paragraph").is_none());
    }
}
