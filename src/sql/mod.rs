//! Lexing toolkit shared by every dialect.
//!
//! This module groups the building blocks each dialect composes to reason about
//! query text without a full grammar. The components are intentionally
//! pragmatic:
//!
//! Modules:
//! - `keyword`    : [`Lexicon`], the static vocabulary of one dialect.
//! - `token_kind` : Classification of lexical atoms.
//! - `token`      : Token struct pairing a `TokenKind` with text and position.
//! - `tokenizer`  : Single pass O(n) scanner plus compound keyword folding.
//!
//! Design Principles:
//! 1. Accept incomplete / syntactically invalid text (robust for live editing).
//! 2. Preserve original casing; canonical spellings live in `normalized`.
//! 3. No dialect logic here: dialect modules pass their `Lexicon` in.
//!
//! Example:
//! ```rust
//! use tsq::sql::prelude::*;
//!
//! let tokens = tokenize("SELECT mean(usage_idle) FROM cpu GROUP BY host", &tsq::influxql::LEXICON);
//! assert!(tokens.iter().any(|t| t.is_keyword("GROUP BY")));
//! assert!(tokens.iter().any(|t| t.kind == TokenKind::Function && t.text == "mean"));
//! ```

pub mod keyword;
pub mod token;
pub mod token_kind;
pub mod tokenizer;

pub use keyword::{BASE_OPERATORS, Lexicon};
pub use token::Token;
pub use token_kind::TokenKind;
pub use tokenizer::{fold_compounds, scan, tokenize};

/// Convenience prelude re-exporting the most commonly used items.
pub mod prelude {
    pub use super::{Lexicon, Token, TokenKind, tokenize};
}

/// Tokens that carry meaning, in order.
pub fn significant(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|t| t.kind.is_significant()).collect()
}

/// Significant tokens split into statements on `;`. Empty statements are
/// dropped.
pub fn statements(tokens: &[Token]) -> Vec<Vec<&Token>> {
    significant(tokens)
        .split(|t| t.is_punct(";"))
        .filter(|s| !s.is_empty())
        .map(<[&Token]>::to_vec)
        .collect()
}

/// Significant tokens of the `;`-separated statement holding byte `offset`.
pub fn statement_at(tokens: &[Token], offset: usize) -> Vec<&Token> {
    let sig = significant(tokens);
    let start = sig
        .iter()
        .rposition(|t| t.is_punct(";") && t.end <= offset)
        .map_or(0, |i| i + 1);
    sig[start..]
        .iter()
        .copied()
        .take_while(|t| !t.is_punct(";"))
        .collect()
}

/// Index of the bracket closing the one at `open`, tracking nesting of the
/// same bracket pair. `None` when the bracket never closes.
pub fn matching_close(tokens: &[&Token], open: usize) -> Option<usize> {
    let opener = tokens.get(open)?;
    let closer = match opener.text.as_str() {
        "(" => ")",
        "[" => "]",
        "{" => "}",
        _ => return None,
    };
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(open) {
        if t.is_punct(&opener.text) {
            depth += 1;
        } else if t.is_punct(closer) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influxql::LEXICON;

    #[test]
    fn tokenize_and_access() {
        let tokens = tokenize("SELECT col FROM tbl", &LEXICON);
        assert!(tokens.iter().any(|t| t.is_keyword("SELECT")));
        assert!(tokens.iter().any(|t| t.is_keyword("FROM")));
        assert!(tokens.iter().any(|t| t.text == "col"));
    }

    #[test]
    fn splits_statements() {
        let tokens = tokenize("SHOW DATABASES; SELECT a FROM b;;", &LEXICON);
        let stmts = statements(&tokens);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[1][0].is_keyword("SELECT"));
    }

    #[test]
    fn finds_matching_bracket() {
        let tokens = tokenize("f(a, g(b), c) d", &LEXICON);
        let sig = significant(&tokens);
        assert_eq!(matching_close(&sig, 1), Some(10));
        assert_eq!(matching_close(&sig, 0), None);
    }

    #[test]
    fn statement_at_caret() {
        let text = "SELECT a FROM m; SELECT b FROM n WHERE ";
        let tokens = tokenize(text, &LEXICON);
        let words = |offset| -> Vec<String> {
            statement_at(&tokens, offset).iter().map(|t| t.text.clone()).collect()
        };
        assert_eq!(words(3), vec!["SELECT", "a", "FROM", "m"]);
        assert_eq!(words(text.len()), vec!["SELECT", "b", "FROM", "n", "WHERE"]);
    }
}
