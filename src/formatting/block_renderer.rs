// src/formatting/block_renderer.rs
//! Block rendering engine: walks the block tree and produces a document.
//!
//! Children are fetched lazily, one listing per block that has them, and
//! siblings are rendered strictly in order. Types with a registered
//! transformer are handed to it; everything else gets the default markdown
//! rendering below.

use super::document::RenderedDocument;
use super::rich_text::render_markdown;
use super::transformers::TransformerRegistry;
use crate::api::ResilientRepository;
use crate::constants::{BLOCK_MAX_RENDER_DEPTH, CHARS_PER_BLOCK_ESTIMATE, NESTED_INDENT};
use crate::error::{AppError, ErrorClass};
use crate::model::*;
use crate::types::{BlockId, PageId};
use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;

/// Child documents collected while rendering one page.
type ChildDocuments = IndexMap<BlockId, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Child pages become separate documents instead of inline sections.
    pub separate_child_pages: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separate_child_pages: true,
        }
    }
}

pub struct BlockRenderer {
    source: ResilientRepository,
    options: RenderOptions,
    transformers: TransformerRegistry,
}

impl BlockRenderer {
    pub fn new(source: ResilientRepository, options: RenderOptions) -> Self {
        Self::with_transformers(source, options, TransformerRegistry::standard())
    }

    pub fn with_transformers(
        source: ResilientRepository,
        options: RenderOptions,
        transformers: TransformerRegistry,
    ) -> Self {
        Self {
            source,
            options,
            transformers,
        }
    }

    /// The fetch context transformers use for their own listings.
    pub fn source(&self) -> &ResilientRepository {
        &self.source
    }

    /// Renders the content of a page. The title is not included.
    pub async fn render_page(&self, page_id: &PageId) -> Result<RenderedDocument, AppError> {
        let blocks = self.source.all_children(&page_id.retag()).await?;
        log::debug!(
            "Rendering {} top-level blocks of page {}",
            blocks.len(),
            page_id.short()
        );

        let mut children = ChildDocuments::new();
        let parent = self.render_blocks(&blocks, 0, &mut children).await?;
        Ok(RenderedDocument::new(parent, children))
    }

    /// Renders siblings in order. List items are joined by single newlines,
    /// everything else by a blank line.
    fn render_blocks<'a>(
        &'a self,
        blocks: &'a [Block],
        depth: usize,
        children: &'a mut ChildDocuments,
    ) -> BoxFuture<'a, Result<String, AppError>> {
        async move {
            let mut output = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
            let mut previous_was_list_item = false;
            let mut list_number = 0usize;

            for block in blocks {
                if block.common().archived {
                    log::debug!("Skipping archived block {}", block.common().id.short());
                    continue;
                }
                list_number = match block {
                    Block::NumberedListItem(_) => list_number + 1,
                    _ => 0,
                };

                let rendered = self.render_block(block, depth, list_number, children).await?;
                if rendered.is_empty() {
                    continue;
                }

                if !output.is_empty() {
                    let tight = previous_was_list_item && block.is_list_item();
                    output.push_str(if tight { "\n" } else { "\n\n" });
                }
                output.push_str(&rendered);
                previous_was_list_item = block.is_list_item();
            }

            Ok(output)
        }
        .boxed()
    }

    async fn render_block(
        &self,
        block: &Block,
        depth: usize,
        list_number: usize,
        children: &mut ChildDocuments,
    ) -> Result<String, AppError> {
        if let Some(transform) = self.transformers.get(block.block_type()) {
            return transform(self, block).await;
        }

        let rendered = match block {
            Block::Paragraph(b) => {
                let line = render_markdown(&b.content.rich_text);
                self.with_children(line, block, depth, "", children).await?
            }
            Block::Heading(b) => {
                let hashes = "#".repeat(b.level.clamp(1, 3) as usize);
                let line = format!("{} {}", hashes, render_markdown(&b.content.rich_text));
                self.with_children(line, block, depth, "", children).await?
            }
            Block::BulletedListItem(b) => {
                let line = format!("- {}", render_markdown(&b.content.rich_text));
                self.with_children(line, block, depth, NESTED_INDENT, children)
                    .await?
            }
            Block::NumberedListItem(b) => {
                let line = format!("{}. {}", list_number.max(1), render_markdown(&b.content.rich_text));
                self.with_children(line, block, depth, NESTED_INDENT, children)
                    .await?
            }
            Block::ToDo(b) => {
                let mark = if b.checked { "x" } else { " " };
                let line = format!("- [{}] {}", mark, render_markdown(&b.content.rich_text));
                self.with_children(line, block, depth, NESTED_INDENT, children)
                    .await?
            }
            Block::Toggle(b) => {
                let line = format!("▸ {}", render_markdown(&b.content.rich_text));
                self.with_children(line, block, depth, NESTED_INDENT, children)
                    .await?
            }
            Block::Quote(b) => {
                let body = self
                    .with_children(render_markdown(&b.content.rich_text), block, depth, "", children)
                    .await?;
                quote_lines(&body)
            }
            Block::Callout(b) => {
                let line = match &b.icon {
                    Some(icon) => format!("{} {}", icon, render_markdown(&b.content.rich_text)),
                    None => render_markdown(&b.content.rich_text),
                };
                let body = self.with_children(line, block, depth, "", children).await?;
                quote_lines(&body)
            }
            Block::Equation(b) => format!("$$\n{}\n$$", b.expression.trim()),
            Block::Divider(_) => "---".to_string(),
            Block::Image(b) => {
                let caption = render_markdown(&b.caption);
                format!("![{}]({})", caption, b.url)
            }
            Block::Bookmark(b) | Block::Embed(b) | Block::LinkPreview(b) => {
                if b.url.is_empty() {
                    String::new()
                } else {
                    let caption = render_markdown(&b.caption);
                    let label = if caption.is_empty() { &b.url } else { &caption };
                    format!("[{}]({})", label, b.url)
                }
            }
            Block::ChildPage(b) => self.render_child_page(b, depth, children).await?,
            Block::ChildDatabase(b) => self.render_child_database(b).await?,
            Block::ColumnList(_) | Block::Column(_) | Block::Synced(_) => {
                self.render_children(block.common(), depth, children).await?
            }
            // Code, tables and rows normally go through transformers; with
            // a registry lacking them they degrade to their plain content.
            Block::Code(_) | Block::Table(_) | Block::TableRow(_) => block
                .rich_text()
                .map(crate::types::plain_content)
                .unwrap_or_default(),
            Block::Unsupported(b) => {
                log::debug!("Skipping unsupported block type '{}'", b.block_type);
                String::new()
            }
        };
        Ok(rendered)
    }

    /// `line` followed by the block's children, indented by `indent`.
    async fn with_children(
        &self,
        line: String,
        block: &Block,
        depth: usize,
        indent: &str,
        children: &mut ChildDocuments,
    ) -> Result<String, AppError> {
        let nested = self.render_children(block.common(), depth, children).await?;
        if nested.is_empty() {
            return Ok(line);
        }
        Ok(format!("{}\n\n{}", line, indent_lines(&nested, indent)))
    }

    async fn render_children(
        &self,
        block: &BlockCommon,
        depth: usize,
        children: &mut ChildDocuments,
    ) -> Result<String, AppError> {
        if !block.has_children {
            return Ok(String::new());
        }
        if depth + 1 >= BLOCK_MAX_RENDER_DEPTH {
            log::warn!(
                "Not descending into block {}: nesting deeper than {}",
                block.id.short(),
                BLOCK_MAX_RENDER_DEPTH
            );
            return Ok(String::new());
        }

        let blocks = self.source.all_children(&block.id).await?;
        self.render_blocks(&blocks, depth + 1, children).await
    }

    /// Either a separate document or an inline section, both titled.
    async fn render_child_page(
        &self,
        page: &ChildPageBlock,
        depth: usize,
        children: &mut ChildDocuments,
    ) -> Result<String, AppError> {
        let title = if page.title.trim().is_empty() {
            crate::constants::UNTITLED_PAGE
        } else {
            page.title.trim()
        };
        let body = self.render_children(&page.common, depth, children).await?;
        let section = if body.is_empty() {
            format!("# {}", title)
        } else {
            format!("# {}\n\n{}", title, body)
        };

        if self.options.separate_child_pages {
            log::debug!("Split child page '{}' into its own document", title);
            children.insert(page.common.id.clone(), section);
            Ok(String::new())
        } else {
            Ok(section)
        }
    }

    /// Title plus a bullet per row. A database the integration cannot see
    /// (linked databases, missing permission) degrades to the bare title.
    async fn render_child_database(&self, database: &ChildDatabaseBlock) -> Result<String, AppError> {
        let title = format!("**{}**", database.title.trim());
        let rows = match self.child_database_rows(database).await {
            Ok(rows) => rows,
            Err(e) if e.class() == ErrorClass::Permanent => {
                log::warn!(
                    "Child database '{}' is not accessible, rendering title only: {}",
                    database.title,
                    e
                );
                return Ok(title);
            }
            Err(e) => return Err(e),
        };

        if rows.is_empty() {
            return Ok(title);
        }
        let list: Vec<String> = rows.iter().map(|row| format!("- {}", row.title)).collect();
        Ok(format!("{}\n\n{}", title, list.join("\n")))
    }

    async fn child_database_rows(
        &self,
        database: &ChildDatabaseBlock,
    ) -> Result<Vec<PageInfo>, AppError> {
        let info = self.source.database(&database.common.id.retag()).await?;
        let mut rows = Vec::new();
        for data_source in &info.data_sources {
            rows.extend(self.source.all_rows(&data_source.id).await?);
        }
        Ok(rows)
    }
}

/// Indents every non-empty line, leaving blank lines empty.
fn indent_lines(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() || indent.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefixes every line with `> `; blank lines become a bare `>`.
fn quote_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
