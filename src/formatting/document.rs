//! The rendered output of one exported page.

use crate::formatting::postprocess::PostProcessor;
use crate::types::BlockId;
use indexmap::IndexMap;

/// A page's parent document plus, when child pages are split out, one
/// document per child page keyed by its block id in traversal order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedDocument {
    pub parent: String,
    pub children: IndexMap<BlockId, String>,
}

impl RenderedDocument {
    pub fn new(parent: String, children: IndexMap<BlockId, String>) -> Self {
        Self { parent, children }
    }

    pub fn is_split(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn document_count(&self) -> usize {
        1 + self.children.len()
    }

    /// Runs `processor` over the parent and every child document.
    pub fn post_process(self, processor: &PostProcessor) -> Self {
        Self {
            parent: processor.apply(&self.parent),
            children: self
                .children
                .into_iter()
                .map(|(id, text)| (id, processor.apply(&text)))
                .collect(),
        }
    }
}
