// src/types/rich_text.rs
//! Inline rich-text runs as they come out of the Notion API.

use serde::{Deserialize, Serialize};

/// Structural variant of a run. Each variant carries the field that holds
/// its literal content; `RichTextItem::plain_text` is the universal fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<String> },
    Mention { kind: String },
    Equation { expression: String },
}

/// Independent style flags. Any combination may be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

impl Annotations {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// One annotated span of text. Run order within a block is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    pub fn equation(expression: &str) -> Self {
        Self {
            text_type: RichTextType::Equation {
                expression: expression.to_string(),
            },
            annotations: Annotations::default(),
            plain_text: expression.to_string(),
            href: None,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn bold(self) -> Self {
        let annotations = Annotations {
            bold: true,
            ..self.annotations
        };
        self.with_annotations(annotations)
    }

    /// The literal text this run displays.
    ///
    /// Text runs yield their content, equations their expression and
    /// mentions their display text. Empty variant content falls back to
    /// `plain_text`.
    pub fn content(&self) -> &str {
        let specific = match &self.text_type {
            RichTextType::Text { content, .. } => content.as_str(),
            RichTextType::Equation { expression } => expression.as_str(),
            RichTextType::Mention { .. } => "",
        };
        if specific.is_empty() {
            &self.plain_text
        } else {
            specific
        }
    }

    /// Hyperlink target: the run-level href, else the text link.
    pub fn link(&self) -> Option<&str> {
        self.href
            .as_deref()
            .or(match &self.text_type {
                RichTextType::Text { link, .. } => link.as_deref(),
                _ => None,
            })
            .filter(|url| !url.is_empty())
    }
}

/// Concatenates the displayed content of a run sequence, styles dropped.
pub fn plain_content(runs: &[RichTextItem]) -> String {
    runs.iter().map(RichTextItem::content).collect()
}
