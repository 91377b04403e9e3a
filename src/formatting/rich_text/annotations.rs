// src/formatting/rich_text/annotations.rs
//! Wrapping styled content in each grammar's markup.
//!
//! Nesting is fixed: link outermost, then code, bold, italic,
//! strikethrough, and underline innermost. The wrappers are applied from
//! the inside out.

use crate::formatting::escape::{escape, escape_latex_url, Grammar};
use crate::types::Annotations;

/// Annotation flags in application order (innermost first).
fn active_styles(annotations: &Annotations) -> [(bool, Style); 5] {
    [
        (annotations.underline, Style::Underline),
        (annotations.strikethrough, Style::Strikethrough),
        (annotations.italic, Style::Italic),
        (annotations.bold, Style::Bold),
        (annotations.code, Style::Code),
    ]
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Underline,
    Strikethrough,
    Italic,
    Bold,
    Code,
}

impl Style {
    fn html_tag(self) -> &'static str {
        match self {
            Style::Underline => "u",
            Style::Strikethrough => "s",
            Style::Italic => "em",
            Style::Bold => "strong",
            Style::Code => "code",
        }
    }

    fn latex_macro(self) -> &'static str {
        match self {
            Style::Underline => "\\underline",
            Style::Strikethrough => "\\sout",
            Style::Italic => "\\textit",
            Style::Bold => "\\textbf",
            Style::Code => "\\texttt",
        }
    }
}

/// Wraps already-escaped `content` for `grammar`.
pub fn wrap(content: String, annotations: &Annotations, href: Option<&str>, grammar: Grammar) -> String {
    let mut result = content;
    for (enabled, style) in active_styles(annotations) {
        if !enabled {
            continue;
        }
        result = match grammar {
            Grammar::Html => format!("<{tag}>{}</{tag}>", result, tag = style.html_tag()),
            Grammar::Latex => format!("{}{{{}}}", style.latex_macro(), result),
        };
    }

    match href {
        Some(url) => match grammar {
            Grammar::Html => format!("<a href=\"{}\">{}</a>", escape(url, Grammar::Html), result),
            Grammar::Latex => format!("\\href{{{}}}{{{}}}", escape_latex_url(url), result),
        },
        None => result,
    }
}

/// Markdown rendering of styles, used for blocks without a dedicated
/// transformer.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Code goes innermost here: markers inside a code span are literal.
    /// Surrounding whitespace is moved outside the markers, since
    /// `** bold**` is not emphasis in markdown.
    pub fn apply_styles(content: &str, annotations: &Annotations, href: Option<&str>) -> String {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return content.to_string();
        }
        let leading = &content[..content.len() - content.trim_start().len()];
        let trailing = &content[content.trim_end().len()..];

        let markdown_order = [
            (annotations.code, Style::Code),
            (annotations.strikethrough, Style::Strikethrough),
            (annotations.bold, Style::Bold),
            (annotations.italic, Style::Italic),
            (annotations.underline, Style::Underline),
        ];

        let mut result = trimmed.to_string();
        for (enabled, style) in markdown_order {
            if !enabled {
                continue;
            }
            result = match style {
                Style::Underline => format!("<u>{}</u>", result),
                Style::Strikethrough => format!("~~{}~~", result),
                Style::Italic => format!("*{}*", result),
                Style::Bold => format!("**{}**", result),
                Style::Code => {
                    let ticks = "`".repeat(inline_code_ticks(&result));
                    format!("{ticks}{}{ticks}", result)
                }
            };
        }

        if let Some(url) = href {
            result = format!("[{}]({})", result, url);
        }

        format!("{}{}{}", leading, result, trailing)
    }
}

/// Backticks needed so inline code survives backticks in its content.
fn inline_code_ticks(content: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run + 1
}
