//! Escaping for the two output grammars.
//!
//! Everything that writes HTML or LaTeX text goes through [`escape`], so the
//! two grammars cannot drift apart in what they consider reserved.

/// Target grammar of a rendered fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// Semantic markup, emitted as HTML.
    Html,
    /// Typesetting macros, emitted as LaTeX.
    Latex,
}

impl Grammar {
    /// Token replacing a literal line break inside inline text.
    pub fn line_break(self) -> &'static str {
        match self {
            Grammar::Html => "<br>",
            Grammar::Latex => "\\newline{}",
        }
    }

    /// Format name in a pandoc raw block: ```` ```{=html} ````.
    pub fn raw_format(self) -> &'static str {
        match self {
            Grammar::Html => "html",
            Grammar::Latex => "latex",
        }
    }
}

/// Escapes the characters `grammar` reserves.
///
/// HTML: `& < > " '`. LaTeX: the backslash and both braces, rewritten to
/// printable macros so text can never open a command or a group.
pub fn escape(text: &str, grammar: Grammar) -> String {
    match grammar {
        Grammar::Html => escape_html(text),
        Grammar::Latex => escape_latex(text),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            _ => out.push(c),
        }
    }
    out
}

/// LaTeX escaping for running prose outside verbatim environments.
///
/// On top of [`escape`] this covers `& % $ # _ ^ ~`, which are harmless
/// inside `Verbatim` but break a paragraph or turn into spacing.
pub fn escape_latex_prose(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '\\' | '{' | '}' => out.push_str(&escape_latex(c.encode_utf8(&mut [0; 4]))),
            _ => out.push(c),
        }
    }
    out
}

/// URL argument of `\href`: `%` and `#` would otherwise start a comment
/// or a parameter.
pub fn escape_latex_url(url: &str) -> String {
    escape_latex(url).replace('%', "\\%").replace('#', "\\#")
}

/// Smallest backtick fence (at least three) not occurring in `content`.
pub fn fence_for(content: &str) -> String {
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
    "`".repeat(max_run.max(2) + 1)
}
