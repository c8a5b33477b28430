//! Token kind definitions for the shared tokenizer.
//!
//! Every lexeme the scanner produces falls into exactly one of these classes.
//! Anything the scanner cannot place more precisely (`$`, `@`, `?`) is reported
//! as `Punctuation` so that the formatter glues it to its neighbour instead of
//! guessing at spacing.

/// Classification for a token produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TokenKind {
    /// Entry of the dialect keyword table (possibly a folded compound).
    #[display("keyword")]
    Keyword,
    /// Measurement / field / path / variable name, quoted or bare.
    #[display("identifier")]
    Identifier,
    /// Arithmetic, comparison, regex-match or pipeline operator.
    #[display("operator")]
    Operator,
    /// String, number, duration, regex or date-time literal.
    #[display("literal")]
    Literal,
    /// Known function name immediately followed by `(`.
    #[display("function")]
    Function,
    /// Brackets, comma, semicolon, dot, colon and other glue characters.
    #[display("punctuation")]
    Punctuation,
    #[display("whitespace")]
    Whitespace,
    #[display("comment")]
    Comment,
}

impl TokenKind {
    /// True for tokens that carry meaning (not whitespace, not comments).
    pub fn is_significant(self) -> bool {
        !matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// True for tokens that read as words: keywords, identifiers, functions.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::Keyword | TokenKind::Identifier | TokenKind::Function
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance() {
        assert!(TokenKind::Keyword.is_significant());
        assert!(TokenKind::Punctuation.is_significant());
        assert!(!TokenKind::Whitespace.is_significant());
        assert!(!TokenKind::Comment.is_significant());
    }

    #[test]
    fn words() {
        assert!(TokenKind::Identifier.is_word());
        assert!(TokenKind::Function.is_word());
        assert!(!TokenKind::Literal.is_word());
        assert!(!TokenKind::Operator.is_word());
    }

    #[test]
    fn display_is_lowercase_name() {
        assert_eq!(TokenKind::Literal.to_string(), "literal");
        assert_eq!(TokenKind::Punctuation.to_string(), "punctuation");
    }
}
