//! Code blocks: fenced source code, or dual-grammar diagrams.
//!
//! A block counts as a diagram when its language is a plain-text variant
//! or its content contains box-drawing style symbols or ASCII connectors.
//! Diagrams are emitted once per grammar as pandoc raw blocks so the
//! converter picks the variant matching its output format.

use crate::error::AppError;
use crate::formatting::block_renderer::BlockRenderer;
use crate::formatting::escape::{fence_for, Grammar};
use crate::formatting::rich_text::render_preformatted;
use crate::model::{Block, CodeBlock};
use crate::types::plain_content;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Language names Notion uses for unhighlighted text.
pub const PLAIN_TEXT_LANGUAGES: [&str; 4] = ["plain text", "plaintext", "text", "txt"];

/// Box drawing, block elements, geometric shapes, arrows, dingbats.
const DIAGRAM_CHAR_RANGES: [(char, char); 5] = [
    ('\u{2500}', '\u{257F}'),
    ('\u{2580}', '\u{259F}'),
    ('\u{25A0}', '\u{25FF}'),
    ('\u{2190}', '\u{21FF}'),
    ('\u{2700}', '\u{27BF}'),
];

const ASCII_CONNECTORS: [&str; 8] = ["->", "<-", "==>", "<==", "-->", "<--", "+--", "--+"];

pub fn transform_code<'a>(
    _renderer: &'a BlockRenderer,
    block: &'a Block,
) -> BoxFuture<'a, Result<String, AppError>> {
    let rendered = match block {
        Block::Code(code) => render_code_block(code),
        _ => String::new(),
    };
    futures::future::ready(Ok(rendered)).boxed()
}

pub fn render_code_block(code: &CodeBlock) -> String {
    let content = plain_content(&code.rich_text);
    if is_diagram(&code.language, &content) {
        render_diagram(code)
    } else {
        render_fenced(&code.language, &content)
    }
}

pub fn is_plain_text_language(language: &str) -> bool {
    let language = language.trim();
    PLAIN_TEXT_LANGUAGES
        .iter()
        .any(|plain| plain.eq_ignore_ascii_case(language))
}

pub fn is_diagram(language: &str, content: &str) -> bool {
    is_plain_text_language(language) || has_diagram_symbols(content)
}

fn has_diagram_symbols(content: &str) -> bool {
    content.chars().any(|c| {
        DIAGRAM_CHAR_RANGES
            .iter()
            .any(|(start, end)| (*start..=*end).contains(&c))
    }) || ASCII_CONNECTORS.iter().any(|token| content.contains(token))
}

fn render_fenced(language: &str, content: &str) -> String {
    let fence = fence_for(content);
    let tag = if language.trim().is_empty() || is_plain_text_language(language) {
        ""
    } else {
        language.trim()
    };
    format!("{fence}{}\n{}\n{fence}", tag, content.trim_end_matches('\n'))
}

/// The HTML variant followed by the LaTeX variant.
fn render_diagram(code: &CodeBlock) -> String {
    let html = render_preformatted(&code.rich_text, Grammar::Html);
    let latex = render_preformatted(&code.rich_text, Grammar::Latex);
    format!(
        "{}\n\n{}",
        raw_block(
            Grammar::Html,
            &format!("<pre class=\"diagram\">{}</pre>", html.trim_end_matches('\n'))
        ),
        raw_block(
            Grammar::Latex,
            &format!(
                "\\begin{{Verbatim}}[commandchars=\\\\\\{{\\}}]\n{}\n\\end{{Verbatim}}",
                latex.trim_end_matches('\n')
            )
        )
    )
}

fn raw_block(grammar: Grammar, body: &str) -> String {
    let fence = fence_for(body);
    format!("{fence}{{={}}}\n{}\n{fence}", grammar.raw_format(), body)
}
