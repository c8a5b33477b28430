//! Static per-dialect vocabulary consumed by the shared tokenizer.
//!
//! A [`Lexicon`] bundles everything the scanner needs to know about one query
//! language: its keyword and function tables, the compound keywords that must
//! be folded into a single token, the multi-character operators, and a handful
//! of lexical switches (comment syntax, path-shaped identifiers, bare date-time
//! literals). Each dialect module defines exactly one `static` lexicon; nothing
//! here is ever mutated.
//!
//! Lookups are case-insensitive. Keyword tables are stored upper-cased and the
//! canonical spelling is what ends up in [`Token::normalized`](super::Token).

/// Immutable, process-wide description of one dialect's lexical surface.
#[derive(Debug)]
pub struct Lexicon {
    /// Upper-cased keywords.
    pub keywords: &'static [&'static str],
    /// Function names in their canonical spelling.
    pub functions: &'static [&'static str],
    /// Multi-word keywords folded into one token, longest first.
    pub compounds: &'static [&'static [&'static str]],
    /// Multi-character operators, matched greedily before single characters.
    pub operators: &'static [&'static str],
    /// Line comment introducer (`--` for the SQL dialects, `//` for Flux).
    pub line_comment: &'static str,
    /// Whether `/* ... */` block comments exist.
    pub block_comments: bool,
    /// Dotted paths (`root.sg1.d1.s1`, `root.**`) scan as one identifier.
    pub path_identifiers: bool,
    /// `"..."` delimits identifiers rather than string literals.
    pub quoted_identifiers: bool,
    /// Bare `2021-01-01T00:00:00Z` literals are recognized.
    pub date_time_literals: bool,
}

impl Lexicon {
    /// Canonical (upper-cased) keyword for `word`, if any.
    pub fn keyword(&self, word: &str) -> Option<&'static str> {
        self.keywords
            .iter()
            .copied()
            .find(|kw| kw.eq_ignore_ascii_case(word))
    }

    /// Canonical function name for `word`, if any.
    pub fn function(&self, word: &str) -> Option<&'static str> {
        self.functions
            .iter()
            .copied()
            .find(|f| f.eq_ignore_ascii_case(word))
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keyword(word).is_some()
    }

    pub fn is_function(&self, word: &str) -> bool {
        self.function(word).is_some()
    }

    /// Longest multi-character operator that prefixes `rest`.
    pub(crate) fn match_operator(&self, rest: &str) -> Option<&'static str> {
        self.operators
            .iter()
            .copied()
            .filter(|op| rest.starts_with(op))
            .max_by_key(|op| op.len())
    }
}

/// Operators shared by every dialect.
pub const BASE_OPERATORS: &[&str] = &["!=", "<>", "<=", ">=", "=="];
