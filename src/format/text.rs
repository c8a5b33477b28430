//! Line-level passes run before tokenizing and after layout.
use itertools::Itertools;

use crate::FormatOptions;
use crate::sql::Lexicon;

/// Trim the input and, when `remove_extra_whitespace` is set, collapse
/// whitespace runs outside quotes and drop blank lines. Comment-only lines are
/// dropped unless comments are preserved.
pub fn preprocess(text: &str, lexicon: &Lexicon, options: &FormatOptions) -> String {
    let text = text.trim();
    if !options.remove_extra_whitespace {
        return text.to_string();
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| options.preserve_comments || !is_comment_line(line, lexicon))
        .map(collapse_whitespace)
        .join("\n")
}

/// Strip trailing whitespace, collapse runs of blank lines to one and drop
/// leading and trailing blank lines.
pub fn postprocess(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        let blank = line.is_empty();
        if blank && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn is_comment_line(line: &str, lexicon: &Lexicon) -> bool {
    line.starts_with(lexicon.line_comment)
        || (lexicon.block_comments && line.starts_with("/*") && line.ends_with("*/"))
}

/// Collapse whitespace runs to a single space, leaving quoted text alone.
pub fn collapse_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut gap = false;
    for c in line.chars() {
        match quote {
            Some(q) => {
                out.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => gap = true,
            None => {
                if gap && !out.is_empty() {
                    out.push(' ');
                }
                gap = false;
                if matches!(c, '\'' | '"' | '`') {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}
