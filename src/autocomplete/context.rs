use itertools::Itertools;

use crate::Cursor;
use crate::sql::{Lexicon, Token, TokenKind, scan, significant, tokenize};

/// Everything a completion engine needs to know about the caret, derived
/// once per request from `(text, cursor)`.
#[derive(Debug, Clone)]
pub struct CompletionContext {
    pub text: String,
    pub cursor: Cursor,
    /// Database (or storage group) the editor is connected to, if any.
    pub database: Option<String>,
    /// Byte offset of the caret.
    pub offset: usize,
    /// Full text of the line holding the caret.
    pub line_text: String,
    /// Word fragment immediately left of the caret, dots included
    /// (`sel`, `r._fi`, `root.sg1.`).
    pub current_word: String,
    /// Normalized text of the significant token before `current_word`.
    pub previous_word: Option<String>,
    /// First word right of the caret.
    pub next_word: Option<String>,
    pub is_in_string: bool,
    pub is_in_comment: bool,
    /// Significant tokens before `current_word`, compounds folded.
    pub preceding: Vec<Token>,
}

impl CompletionContext {
    pub fn new(text: &str, cursor: Cursor, lexicon: &Lexicon) -> Self {
        let offset = cursor.offset(text);
        let (before, after) = text.split_at(offset);

        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line_end = after.find('\n').map_or(text.len(), |i| offset + i);

        let word_start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word_char(*c))
            .last()
            .map_or(offset, |(i, _)| i);
        let current_word = before[word_start..].to_string();

        let raw = scan(before, lexicon);
        let tail = raw.last();
        let is_in_string = tail.is_some_and(|t| {
            matches!(t.kind, TokenKind::Literal | TokenKind::Identifier)
                && t.text.starts_with(['\'', '"', '`'])
                && t.is_unterminated()
        });
        let is_in_comment = tail.is_some_and(|t| {
            t.kind == TokenKind::Comment && (!t.text.starts_with("/*") || t.is_unterminated())
        });

        let preceding: Vec<Token> = significant(&tokenize(&before[..word_start], lexicon))
            .into_iter()
            .cloned()
            .collect();
        let previous_word = preceding.last().map(|t| t.normalized.clone());

        let next_word = after
            .trim_start()
            .split(|c: char| !is_word_char(c))
            .next()
            .filter(|w| !w.is_empty())
            .map(str::to_string);

        Self {
            text: text.to_string(),
            cursor,
            database: None,
            offset,
            line_text: text[line_start..line_end].to_string(),
            current_word,
            previous_word,
            next_word,
            is_in_string,
            is_in_comment,
            preceding,
        }
    }

    pub fn with_database(mut self, database: Option<&str>) -> Self {
        self.database = database.map(str::to_string);
        self
    }

    /// No suggestions are offered inside literals or comments.
    pub fn suppressed(&self) -> bool {
        self.is_in_string || self.is_in_comment
    }

    /// Fragment candidates are filtered against: the part of the current
    /// word after its last `.`.
    pub fn prefix(&self) -> &str {
        self.current_word
            .rsplit_once('.')
            .map_or(self.current_word.as_str(), |(_, tail)| tail)
    }

    /// Part of the current word before its last `.` (`r` in `r._fi`).
    pub fn qualifier(&self) -> Option<&str> {
        self.current_word.rsplit_once('.').map(|(head, _)| head)
    }

    /// The `n`th significant token before the current word, `0` being the
    /// closest.
    pub fn back(&self, n: usize) -> Option<&Token> {
        self.preceding.iter().rev().nth(n)
    }

    /// Whether the previous token is one of the keywords in `set`.
    pub fn after_keyword(&self, set: &[&str]) -> bool {
        self.back(0).is_some_and(|t| t.is_any_keyword(set))
    }

    /// Most recent keyword before the caret that belongs to `set`, looking
    /// back within the current statement only.
    pub fn last_keyword_in(&self, set: &[&str]) -> Option<&Token> {
        self.preceding
            .iter()
            .rev()
            .take_while(|t| !t.is_punct(";"))
            .find(|t| t.is_any_keyword(set))
    }

    /// Statement-leading keyword of the statement holding the caret.
    pub fn statement_keyword(&self) -> Option<&Token> {
        self.preceding
            .iter()
            .rev()
            .take_while(|t| !t.is_punct(";"))
            .last()
            .filter(|t| t.kind == TokenKind::Keyword)
    }
}

impl CompletionContext {
    /// Remaining words of those `variants` that extend the keywords typed so
    /// far after the statement keyword (`KEYS`, `VALUES` after `SHOW TAG`).
    /// Empty once anything other than a keyword has been typed.
    pub fn continuations(&self, variants: &[&[&str]]) -> Vec<String> {
        let statement: Vec<&Token> = self
            .preceding
            .iter()
            .rev()
            .take_while(|t| !t.is_punct(";"))
            .collect();
        if statement.is_empty() || statement.iter().any(|t| t.kind != TokenKind::Keyword) {
            return Vec::new();
        }
        let typed: Vec<&str> = statement
            .iter()
            .rev()
            .skip(1)
            .map(|t| t.normalized.as_str())
            .collect();
        variants
            .iter()
            .filter(|v| v.len() > typed.len() && v.iter().zip(&typed).all(|(a, b)| a == b))
            .map(|v| v[typed.len()..].join(" "))
            .unique()
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influxql::LEXICON;

    fn at_end(text: &str) -> CompletionContext {
        CompletionContext::new(text, Cursor::end_of(text), &LEXICON)
    }

    #[test]
    fn derives_words_around_the_caret() {
        let ctx = CompletionContext::new("SELECT usa FROM cpu", Cursor::new(1, 11), &LEXICON);
        assert_eq!(ctx.current_word, "usa");
        assert_eq!(ctx.previous_word.as_deref(), Some("SELECT"));
        assert_eq!(ctx.next_word.as_deref(), Some("FROM"));
        assert_eq!(ctx.line_text, "SELECT usa FROM cpu");
    }

    #[test]
    fn compound_previous_word() {
        let ctx = at_end("SELECT mean(v) FROM cpu GROUP BY ");
        assert_eq!(ctx.current_word, "");
        assert_eq!(ctx.previous_word.as_deref(), Some("GROUP BY"));
        assert!(ctx.after_keyword(&["GROUP BY"]));
    }

    #[test]
    fn dotted_words_split_into_qualifier_and_prefix() {
        let ctx = at_end("SELECT * FROM root.sg1.d");
        assert_eq!(ctx.current_word, "root.sg1.d");
        assert_eq!(ctx.qualifier(), Some("root.sg1"));
        assert_eq!(ctx.prefix(), "d");
    }

    #[test]
    fn detects_open_strings() {
        assert!(at_end("SELECT * FROM \"m\" WHERE tag='a").is_in_string);
        assert!(!at_end("SELECT * FROM \"m\" WHERE tag='a' ").is_in_string);
        assert!(at_end("SELECT * FROM \"m").is_in_string);
        assert!(at_end(r"WHERE a = 'it\'s").is_in_string);
    }

    #[test]
    fn detects_open_comments() {
        assert!(at_end("SELECT * -- pick ").is_in_comment);
        assert!(!at_end("SELECT * -- pick\n").is_in_comment);
        assert!(at_end("SELECT /* later").is_in_comment);
        assert!(!at_end("SELECT /* done */ ").is_in_comment);
        assert!(at_end("SELECT /* later").suppressed());
    }

    #[test]
    fn statement_keyword_looks_at_current_statement() {
        let ctx = at_end("SHOW DATABASES; SELECT a FROM ");
        assert!(ctx.statement_keyword().is_some_and(|t| t.is_keyword("SELECT")));
        assert!(ctx.last_keyword_in(&["SHOW"]).is_none());
    }

    #[test]
    fn multiline_caret() {
        let text = "SELECT *\nFROM cp\nWHERE x";
        let ctx = CompletionContext::new(text, Cursor::new(2, 8), &LEXICON);
        assert_eq!(ctx.current_word, "cp");
        assert_eq!(ctx.line_text, "FROM cp");
        assert_eq!(ctx.next_word.as_deref(), Some("WHERE"));
    }
}
