// src/formatting/postprocess.rs
//! Whole-document clean-up applied once after rendering.
//!
//! Each step is a pure `&str -> String` function. The order is fixed:
//! metadata stripping and blank-line collapsing run before callout
//! conversion, which inserts blank lines of its own around the blocks it
//! emits.

use crate::formatting::escape::{escape_latex_prose, escape_latex_url, fence_for, Grammar};
use regex::Regex;

lazy_static::lazy_static! {
    /// `Generated: …` / `**Config:** …` at column zero, case-insensitive.
    static ref METADATA_LINE: Regex =
        Regex::new(r"(?i)^(?:\*\*)?(?:generated|config)[ \t]*(?:\*\*)?[ \t]*:")
            .expect("METADATA_LINE is a valid regex");

    /// Inline markdown the block renderer emits inside callout text.
    static ref INLINE_MARKDOWN: Regex = Regex::new(concat!(
        r"\*\*\*(?P<bold_italic>\S(?:.*?\S)?)\*\*\*",
        r"|\*\*(?P<bold>\S(?:.*?\S)?)\*\*",
        r"|~~(?P<strike>\S(?:.*?\S)?)~~",
        r"|<u>(?P<underline>.+?)</u>",
        r"|`(?P<code>[^`]+)`",
        r"|\[(?P<label>[^\]]+)\]\((?P<url>[^)\s]+)\)",
        r"|\*(?P<italic>[^*\s](?:[^*]*[^*\s])?)\*",
    ))
    .expect("INLINE_MARKDOWN is a valid regex");

    static ref ADJACENT_DATES: Regex = Regex::new(concat!(
        r"\b(\d{1,2} (?:January|February|March|April|May|June|July|August|September|October|November|December) \d{4})",
        r"(\d{1,2} (?:January|February|March|April|May|June|July|August|September|October|November|December) \d{4})\b"
    ))
    .expect("ADJACENT_DATES is a valid regex");

    static ref EXCESS_BLANK_LINES: Regex =
        Regex::new(r"\n{3,}").expect("EXCESS_BLANK_LINES is a valid regex");
}

pub type Step = fn(&str) -> String;

/// An ordered list of named text transformations.
#[derive(Clone)]
pub struct PostProcessor {
    steps: Vec<(&'static str, Step)>,
}

impl PostProcessor {
    /// Metadata stripping, date repair, blank-line collapsing, callouts.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                ("strip metadata lines", strip_metadata_lines as Step),
                ("repair adjacent dates", repair_adjacent_dates),
                ("collapse blank lines", collapse_blank_lines),
                ("convert callouts", convert_callouts),
            ],
        }
    }

    /// Adds emoji labelling after the standard steps.
    pub fn with_emoji_labels(mut self) -> Self {
        self.steps.push(("label emojis", label_emojis));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(name, _)| *name).collect()
    }

    pub fn apply(&self, text: &str) -> String {
        self.steps.iter().fold(text.to_string(), |acc, (name, step)| {
            let next = step(&acc);
            if next.len() != acc.len() {
                log::debug!("Post-processing step '{}' changed the document", name);
            }
            next
        })
    }
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::standard()
    }
}

/// Drops `Generated:` / `Config:` lines outside fenced code.
pub fn strip_metadata_lines(text: &str) -> String {
    let mut fences = FenceTracker::default();
    text.split_inclusive('\n')
        .filter(|line| fences.observe(line) || !METADATA_LINE.is_match(line))
        .collect()
}

/// `16 May 202514 September 2025` → `16 May 2025 -- 14 September 2025`.
pub fn repair_adjacent_dates(text: &str) -> String {
    ADJACENT_DATES.replace_all(text, "${1} -- ${2}").into_owned()
}

pub fn collapse_blank_lines(text: &str) -> String {
    EXCESS_BLANK_LINES.replace_all(text, "\n\n").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalloutKind {
    Note,
    Warning,
}

impl CalloutKind {
    fn label(self) -> &'static str {
        match self {
            CalloutKind::Note => "Note:",
            CalloutKind::Warning => "Warning:",
        }
    }

    /// Recognises a line opening with 💡 or ⚠ (optionally with U+FE0F) and
    /// returns the kind plus the text after the glyph.
    fn detect(line: &str) -> Option<(Self, &str)> {
        let (kind, rest) = if let Some(rest) = line.strip_prefix('\u{1F4A1}') {
            (CalloutKind::Note, rest)
        } else if let Some(rest) = line.strip_prefix('\u{26A0}') {
            (CalloutKind::Warning, rest)
        } else {
            return None;
        };
        let rest = rest.strip_prefix('\u{FE0F}').unwrap_or(rest);
        Some((kind, rest.trim()))
    }
}

/// Drops leading whitespace and any `>` quote markers.
fn unquote(line: &str) -> &str {
    let mut rest = line.trim_start();
    while let Some(stripped) = rest.strip_prefix('>') {
        rest = stripped.trim_start();
    }
    rest
}

/// Number of leading backticks when the line opens or closes a fence.
fn fence_run(line: &str) -> Option<usize> {
    let run = line.trim_start().chars().take_while(|c| *c == '`').count();
    (run >= 3).then_some(run)
}

/// Follows backtick fences line by line.
#[derive(Debug, Default)]
struct FenceTracker {
    open: Option<usize>,
}

impl FenceTracker {
    /// True when `line` is a fence delimiter or sits inside a fenced region.
    fn observe(&mut self, line: &str) -> bool {
        if let Some(run) = fence_run(line) {
            self.open = match self.open {
                None => Some(run),
                Some(open) if run >= open && line.trim().chars().all(|c| c == '`') => None,
                still_open => still_open,
            };
            return true;
        }
        self.open.is_some()
    }
}

/// Rewrites 💡 / ⚠ callouts as LaTeX quote blocks.
///
/// A callout runs from its glyph to the next blank line or heading. Fenced
/// regions are left alone.
pub fn convert_callouts(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fences = FenceTracker::default();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];

        if fences.observe(line) {
            out.push(line.to_string());
            index += 1;
            continue;
        }

        let Some((kind, first)) = CalloutKind::detect(unquote(line)) else {
            out.push(line.to_string());
            index += 1;
            continue;
        };

        let mut body = vec![first.to_string()];
        index += 1;
        while index < lines.len() {
            let next = unquote(lines[index]);
            if next.trim().is_empty()
                || next.starts_with('#')
                || fence_run(next).is_some()
                || CalloutKind::detect(next).is_some()
            {
                break;
            }
            body.push(next.trim().to_string());
            index += 1;
        }

        if out.last().is_some_and(|previous| !previous.trim().is_empty()) {
            out.push(String::new());
        }
        out.push(callout_block(kind, &body.join("\n")));
        if index < lines.len() && !lines[index].trim().is_empty() {
            out.push(String::new());
        }
    }

    out.join("\n")
}

fn callout_block(kind: CalloutKind, body: &str) -> String {
    let quote = format!(
        "\\begin{{quote}}\n\\textbf{{{}}} {}\n\\end{{quote}}",
        kind.label(),
        markdown_to_latex(body.trim())
    );
    let fence = fence_for(&quote);
    format!("{fence}{{={}}}\n{}\n{fence}", Grammar::Latex.raw_format(), quote)
}

/// Escapes callout text for LaTeX, turning inline emphasis, code and links
/// into the matching commands.
fn markdown_to_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut last = 0;
    for caps in INLINE_MARKDOWN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&escape_latex_prose(&text[last..whole.start()]));
        let span = if let Some(inner) = caps.name("bold_italic") {
            format!("\\textbf{{\\textit{{{}}}}}", markdown_to_latex(inner.as_str()))
        } else if let Some(inner) = caps.name("bold") {
            format!("\\textbf{{{}}}", markdown_to_latex(inner.as_str()))
        } else if let Some(inner) = caps.name("strike") {
            format!("\\sout{{{}}}", markdown_to_latex(inner.as_str()))
        } else if let Some(inner) = caps.name("underline") {
            format!("\\underline{{{}}}", markdown_to_latex(inner.as_str()))
        } else if let Some(inner) = caps.name("code") {
            format!("\\texttt{{{}}}", escape_latex_prose(inner.as_str()))
        } else if let (Some(label), Some(url)) = (caps.name("label"), caps.name("url")) {
            format!(
                "\\href{{{}}}{{{}}}",
                escape_latex_url(url.as_str()),
                markdown_to_latex(label.as_str())
            )
        } else if let Some(inner) = caps.name("italic") {
            format!("\\textit{{{}}}", markdown_to_latex(inner.as_str()))
        } else {
            escape_latex_prose(whole.as_str())
        };
        out.push_str(&span);
        last = whole.end();
    }
    out.push_str(&escape_latex_prose(&text[last..]));
    out
}

/// Emoji that viewers commonly fail to draw, with a readable name.
const EMOJI_LABELS: [(&str, &str); 26] = [
    ("🧹", "Broom"),
    ("📘", "Book"),
    ("📊", "Chart"),
    ("📈", "ChartUp"),
    ("🔄", "Refresh"),
    ("📄", "Page"),
    ("📁", "Folder"),
    ("✅", "Done"),
    ("❌", "Cross"),
    ("✓", "Check"),
    ("✗", "X"),
    ("📝", "Memo"),
    ("🔍", "Search"),
    ("⚠️", "Warning"),
    ("💻", "Computer"),
    ("🐛", "Bug"),
    ("✨", "Sparkles"),
    ("🔧", "Wrench"),
    ("📦", "Package"),
    ("🎨", "Art"),
    ("⚡", "Zap"),
    ("🔒", "Lock"),
    ("🔑", "Key"),
    ("📌", "Pin"),
    ("🏆", "Trophy"),
    ("🎉", "Party"),
];

/// `📊 Results` → `📊[Chart] Results`. Emoji not followed by a space, or
/// already labelled, are left alone.
pub fn label_emojis(text: &str) -> String {
    let mut result = text.to_string();
    for (emoji, name) in EMOJI_LABELS {
        let needle = format!("{} ", emoji);
        if result.contains(&needle) {
            result = result.replace(&needle, &format!("{}[{}] ", emoji, name));
        }
    }
    result
}
