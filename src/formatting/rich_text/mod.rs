// src/formatting/rich_text/mod.rs
//! Rendering rich-text runs into HTML, LaTeX or markdown.
//!
//! Rendering is a pure function of the runs: the same input always yields
//! byte-identical output, which keeps re-exports diffable.

mod annotations;

pub use annotations::MarkdownStyleRenderer;

use crate::constants::NOTION_WEB_BASE_URL;
use crate::formatting::escape::{escape, Grammar};
use crate::types::{Annotations, RichTextItem, RichTextType};
use url::Url;

/// Renders one run: content, escape, line breaks, then wrappers.
pub fn render_run(run: &RichTextItem, grammar: Grammar) -> String {
    let escaped = escape(run.content(), grammar);
    let content = escaped.replace('\n', grammar.line_break());
    let href = run.link().map(resolve_href);
    annotations::wrap(content, &run.annotations, href.as_deref(), grammar)
}

/// Renders a run sequence with no separator between runs.
pub fn render_run_sequence(runs: &[RichTextItem], grammar: Grammar) -> String {
    runs.iter().map(|run| render_run(run, grammar)).collect()
}

/// A table cell is just a run sequence.
pub fn render_cell(cell: &[RichTextItem], grammar: Grammar) -> String {
    render_run_sequence(cell, grammar)
}

/// Rendering for preformatted text such as diagrams.
///
/// Line breaks stay literal and only bold survives: other wrappers would
/// shift the columns diagrams depend on.
pub fn render_preformatted(runs: &[RichTextItem], grammar: Grammar) -> String {
    runs.iter()
        .map(|run| {
            let escaped = escape(run.content(), grammar);
            if run.annotations.bold && !escaped.trim().is_empty() {
                let bold_only = Annotations {
                    bold: true,
                    ..Annotations::default()
                };
                annotations::wrap(escaped, &bold_only, None, grammar)
            } else {
                escaped
            }
        })
        .collect()
}

/// Markdown rendering for blocks handled by the default renderer.
pub fn render_markdown(runs: &[RichTextItem]) -> String {
    runs.iter()
        .map(|run| match &run.text_type {
            RichTextType::Equation { .. } => format!("${}$", run.content().trim()),
            _ => {
                let href = run.link().map(resolve_href);
                MarkdownStyleRenderer::apply_styles(run.content(), &run.annotations, href.as_deref())
            }
        })
        .collect()
}

/// Resolves workspace-relative links (`/0f3a…`) against notion.so.
pub fn resolve_href(href: &str) -> String {
    if !href.starts_with('/') {
        return href.to_string();
    }
    match Url::parse(NOTION_WEB_BASE_URL).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            log::debug!("Keeping unresolvable link {}: {}", href, e);
            href.to_string()
        }
    }
}
