//! Token model tying a [`TokenKind`] to its text and source position.
//!
//! Tokens are produced by [`tokenize`](super::tokenize) and owned by the pass
//! that requested them; nothing mutates a token after the scanner (or the
//! compound-keyword folder) has built it.
//!
//! Positions are recorded twice: as byte offsets (`start..end`, for slicing the
//! original text) and as a 1-based `line`/`column` pair (for diagnostics that an
//! editor can highlight). Columns count characters, not bytes.
use crate::sql::token_kind::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text, verbatim.
    pub text: String,
    /// Upper-cased canonical form for keywords, lower-cased for functions,
    /// verbatim otherwise.
    pub normalized: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        normalized: impl Into<String>,
        (start, end): (usize, usize),
        (line, column): (usize, usize),
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            normalized: normalized.into(),
            start,
            end,
            line,
            column,
        }
    }

    /// Byte length of this token (`end - start`).
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if this token is the keyword (or folded compound) `kw`.
    ///
    /// `kw` must be upper-cased, with single spaces between words.
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.normalized == kw
    }

    /// True if this token is a keyword contained in `set`.
    pub fn is_any_keyword(&self, set: &[&str]) -> bool {
        self.kind == TokenKind::Keyword && set.contains(&self.normalized.as_str())
    }

    /// True if this token is the punctuation character `c`.
    pub fn is_punct(&self, c: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == c
    }

    /// True if this token is the operator `op`.
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Case-insensitive comparison against the raw word.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind.is_word() && self.text.eq_ignore_ascii_case(word)
    }

    /// True for quoted string literals (`'...'`, or `"..."` where double
    /// quotes do not delimit identifiers).
    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::Literal && (self.text.starts_with('\'') || self.text.starts_with('"'))
    }

    /// True for `/regex/` literals.
    pub fn is_regex(&self) -> bool {
        self.kind == TokenKind::Literal && self.text.starts_with('/')
    }

    /// Quoted token (string, quoted identifier, regex or block comment) that
    /// ran to end of input without its closing delimiter.
    pub fn is_unterminated(&self) -> bool {
        match self.kind {
            TokenKind::Comment => {
                self.text.starts_with("/*") && (self.text.len() < 4 || !self.text.ends_with("*/"))
            }
            TokenKind::Literal | TokenKind::Identifier => match self.text.chars().next() {
                Some(q @ ('\'' | '"' | '`')) => !closes(&self.text, q),
                Some('/') => !closes(&self.text, '/'),
                _ => false,
            },
            _ => false,
        }
    }

    /// String content without the surrounding quotes.
    pub fn unquoted(&self) -> &str {
        let t = self.text.as_str();
        match t.chars().next() {
            Some(q @ ('\'' | '"' | '`')) if t.len() >= 2 && t.ends_with(q) => &t[1..t.len() - 1],
            _ => t,
        }
    }

    /// 1-based `(line, column)`, the anchor used for diagnostics.
    pub const fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Convenience: convert to a `(start, end)` tuple.
    pub const fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// Whether `text` (which starts with `quote`) ends with an unescaped `quote`.
fn closes(text: &str, quote: char) -> bool {
    if text.chars().count() < 2 || !text.ends_with(quote) {
        return false;
    }
    let body = &text[quote.len_utf8()..text.len() - quote.len_utf8()];
    let trailing_backslashes = body.chars().rev().take_while(|c| *c == '\\').count();
    trailing_backslashes % 2 == 0
}
