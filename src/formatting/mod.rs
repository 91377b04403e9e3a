// src/formatting/mod.rs
//! Renders Notion blocks into pandoc markdown with raw HTML and LaTeX.

pub mod block_renderer;
pub mod document;
pub mod escape;
pub mod postprocess;
pub mod rich_text;
pub mod transformers;

pub use self::block_renderer::{BlockRenderer, RenderOptions};
pub use self::document::RenderedDocument;
pub use self::escape::Grammar;
pub use self::postprocess::PostProcessor;
pub use self::transformers::TransformerRegistry;
