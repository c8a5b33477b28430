use itertools::Itertools;

use crate::sql::{keyword::Lexicon, token::Token, token_kind::TokenKind};

/// Lenient single-pass scanner producing a flat stream of `Token`s.
///
/// Scope / Intent:
/// - Shared by every dialect; all dialect knowledge arrives through `lexicon`.
/// - Accepts incomplete / syntactically invalid input (live editing).
/// - Keeps whitespace and comments as tokens so callers decide what to drop.
///
/// Behavior:
/// - Whitespace runs collapse into one `Whitespace` token.
/// - Line and block comments become `Comment` tokens, verbatim.
/// - Quoted text honours backslash escapes; an unterminated quote swallows the
///   rest of the input instead of failing.
/// - Words are classified against the lexicon: a known function immediately
///   followed by `(` is a `Function`, otherwise a keyword table hit is a
///   `Keyword`, otherwise an `Identifier`. Original casing is preserved.
/// - Multi-character operators match greedily before single characters.
///
/// Guarantees:
/// - Never panics and never returns an error.
/// - Tokens cover the input exactly: concatenating their text yields `text`.
pub fn scan(text: &str, lexicon: &Lexicon) -> Vec<Token> {
    Scanner::new(text, lexicon).run()
}

/// [`scan`] followed by compound keyword folding.
///
/// This is the token stream validators and formatters consume.
pub fn tokenize(text: &str, lexicon: &Lexicon) -> Vec<Token> {
    fold_compounds(scan(text, lexicon), lexicon)
}

/// Merge adjacent words matching one of the lexicon's compound keywords
/// (`GROUP BY`, `ALIGN BY DEVICE`, `IS NOT NULL`) into a single keyword token.
///
/// Only whitespace may separate the words; the folded token's text joins the
/// original words with single spaces so keyword casing still applies per word.
pub fn fold_compounds(tokens: Vec<Token>, lexicon: &Lexicon) -> Vec<Token> {
    if lexicon.compounds.is_empty() {
        return tokens;
    }
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        match match_compound(&tokens, i, lexicon) {
            Some((words, indices)) => {
                let first = &tokens[indices[0]];
                let last = &tokens[indices[indices.len() - 1]];
                let text = indices.iter().map(|&ix| tokens[ix].text.as_str()).join(" ");
                out.push(Token::new(
                    TokenKind::Keyword,
                    text,
                    words.join(" "),
                    (first.start, last.end),
                    (first.line, first.column),
                ));
                i = indices[indices.len() - 1] + 1;
            }
            None => {
                out.push(tokens[i].clone());
                i += 1;
            }
        }
    }
    out
}

fn match_compound(
    tokens: &[Token],
    at: usize,
    lexicon: &Lexicon,
) -> Option<(&'static [&'static str], Vec<usize>)> {
    lexicon.compounds.iter().find_map(|words| {
        let mut indices = Vec::with_capacity(words.len());
        let mut j = at;
        for (n, word) in words.iter().enumerate() {
            if n > 0 {
                while tokens.get(j).is_some_and(|t| t.kind == TokenKind::Whitespace) {
                    j += 1;
                }
            }
            let t = tokens.get(j)?;
            if !(t.kind.is_word() && t.text.eq_ignore_ascii_case(word)) {
                return None;
            }
            indices.push(j);
            j += 1;
        }
        Some((*words, indices))
    })
}

struct Scanner<'a> {
    text: &'a str,
    lexicon: &'a Lexicon,
    chars: Vec<(usize, char)>,
    i: usize,
    line: usize,
    line_start: usize,
    out: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, lexicon: &'a Lexicon) -> Self {
        Self {
            text,
            lexicon,
            chars: text.char_indices().collect(),
            i: 0,
            line: 1,
            line_start: 0,
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek(0) {
            let start = self.i;
            let position = (self.line, self.i - self.line_start + 1);
            let kind = self.lex(c);
            self.push(kind, start, position);
        }
        self.out
    }

    fn lex(&mut self, c: char) -> TokenKind {
        let lexicon = self.lexicon;
        if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            return TokenKind::Whitespace;
        }
        if self.rest().starts_with(lexicon.line_comment) {
            self.eat_while(|c| c != '\n');
            return TokenKind::Comment;
        }
        if lexicon.block_comments && self.rest().starts_with("/*") {
            self.eat_block_comment();
            return TokenKind::Comment;
        }
        match c {
            '\'' => {
                self.eat_quoted(c);
                TokenKind::Literal
            }
            '"' => {
                self.eat_quoted(c);
                if lexicon.quoted_identifiers {
                    TokenKind::Identifier
                } else {
                    TokenKind::Literal
                }
            }
            '`' => {
                self.eat_quoted(c);
                TokenKind::Identifier
            }
            '/' if self.after_regex_operator() => {
                self.eat_quoted(c);
                TokenKind::Literal
            }
            _ if c.is_ascii_digit()
                || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) =>
            {
                self.eat_number();
                TokenKind::Literal
            }
            _ if c.is_alphabetic() || c == '_' => self.eat_word(),
            _ => {
                if let Some(op) = lexicon.match_operator(self.rest()) {
                    self.advance_by(op.chars().count());
                    TokenKind::Operator
                } else if self.rest().starts_with("::") {
                    self.advance_by(2);
                    TokenKind::Punctuation
                } else if "+-*/%=<>!~&|^".contains(c) {
                    self.advance();
                    TokenKind::Operator
                } else {
                    self.advance();
                    TokenKind::Punctuation
                }
            }
        }
    }

    fn eat_word(&mut self) -> TokenKind {
        let start = self.i;
        self.eat_while(|c| c.is_alphanumeric() || c == '_');
        if self.lexicon.path_identifiers {
            self.eat_path_segments();
        }
        let word = self.slice(start, self.i);
        if word.contains('.') {
            return TokenKind::Identifier;
        }
        if self.next_non_whitespace() == Some('(') && self.lexicon.is_function(word) {
            return TokenKind::Function;
        }
        if self.lexicon.is_keyword(word) {
            return TokenKind::Keyword;
        }
        TokenKind::Identifier
    }

    /// `.segment` continuations of an IoTDB path: words, `*`/`**` wildcards
    /// and backtick-quoted segments.
    fn eat_path_segments(&mut self) {
        while self.peek(0) == Some('.') {
            match self.peek(1) {
                Some(c) if c.is_alphanumeric() || c == '_' => {
                    self.advance();
                    self.eat_while(|c| c.is_alphanumeric() || c == '_');
                }
                Some('*') => {
                    self.advance();
                    self.eat_while(|c| c == '*');
                }
                Some('`') => {
                    self.advance();
                    self.eat_quoted('`');
                }
                _ => break,
            }
        }
    }

    fn eat_number(&mut self) {
        if self.lexicon.date_time_literals && self.looks_like_date() {
            self.eat_while(|c| c.is_ascii_digit() || matches!(c, '-' | ':' | '.' | '+' | 'T' | 'Z'));
            return;
        }
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(0), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek(1), Some('+' | '-')) { 2 } else { 1 };
            if self.peek(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance_by(digit_at);
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        // Duration units (`1h`, `100ms`, `1h30m`).
        self.eat_while(|c| c.is_ascii_alphanumeric());
    }

    /// `dddd-dd-dd` at the cursor.
    fn looks_like_date(&self) -> bool {
        (0..10).all(|k| match (k, self.peek(k)) {
            (4 | 7, Some(c)) => c == '-',
            (_, Some(c)) => c.is_ascii_digit(),
            (_, None) => false,
        })
    }

    fn eat_quoted(&mut self, quote: char) {
        self.advance();
        while let Some(c) = self.peek(0) {
            self.advance();
            if c == '\\' {
                if self.peek(0).is_some() {
                    self.advance();
                }
            } else if c == quote {
                break;
            }
        }
    }

    fn eat_block_comment(&mut self) {
        self.advance_by(2);
        while self.peek(0).is_some() {
            if self.rest().starts_with("*/") {
                self.advance_by(2);
                break;
            }
            self.advance();
        }
    }

    fn after_regex_operator(&self) -> bool {
        self.out
            .iter()
            .rev()
            .find(|t| t.kind.is_significant())
            .is_some_and(|t| t.is_operator("=~") || t.is_operator("!~"))
    }

    fn next_non_whitespace(&self) -> Option<char> {
        self.chars[self.i..]
            .iter()
            .map(|(_, c)| *c)
            .find(|c| !c.is_whitespace())
    }

    fn push(&mut self, kind: TokenKind, start: usize, position: (usize, usize)) {
        let text = self.slice(start, self.i);
        let normalized = match kind {
            TokenKind::Keyword => self
                .lexicon
                .keyword(text)
                .map(str::to_string)
                .unwrap_or_else(|| text.to_uppercase()),
            TokenKind::Function => self
                .lexicon
                .function(text)
                .map(str::to_string)
                .unwrap_or_else(|| text.to_string()),
            _ => text.to_string(),
        };
        let span = (self.byte(start), self.byte(self.i));
        self.out
            .push(Token::new(kind, text, normalized, span, position));
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.i + ahead).map(|(_, c)| *c)
    }

    fn advance(&mut self) {
        if let Some((_, c)) = self.chars.get(self.i) {
            if *c == '\n' {
                self.line += 1;
                self.line_start = self.i + 1;
            }
            self.i += 1;
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek(0).is_some_and(&pred) {
            self.advance();
        }
    }

    fn byte(&self, char_index: usize) -> usize {
        self.chars
            .get(char_index)
            .map(|(b, _)| *b)
            .unwrap_or(self.text.len())
    }

    fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.text[self.byte(from)..self.byte(to)]
    }

    fn rest(&self) -> &'a str {
        &self.text[self.byte(self.i)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SQLISH: Lexicon = Lexicon {
        keywords: &["SELECT", "FROM", "WHERE", "GROUP", "BY", "ALIGN", "DEVICE", "IS", "NOT", "NULL"],
        functions: &["mean", "now", "time"],
        compounds: &[&["ALIGN", "BY", "DEVICE"], &["IS", "NOT", "NULL"], &["GROUP", "BY"]],
        operators: &["!=", "<>", "<=", ">=", "=~", "!~"],
        line_comment: "--",
        block_comments: true,
        path_identifiers: true,
        quoted_identifiers: true,
        date_time_literals: true,
    };

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        tokenize(text, &SQLISH)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn basic_select_sequence() {
        let toks = kinds("SELECT mean(usage) FROM cpu");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Keyword, "SELECT".into()),
                (TokenKind::Function, "mean".into()),
                (TokenKind::Punctuation, "(".into()),
                (TokenKind::Identifier, "usage".into()),
                (TokenKind::Punctuation, ")".into()),
                (TokenKind::Keyword, "FROM".into()),
                (TokenKind::Identifier, "cpu".into()),
            ]
        );
    }

    #[test]
    fn function_name_without_call_is_identifier() {
        let toks = kinds("WHERE time > now() - 1h");
        assert_eq!(toks[1], (TokenKind::Identifier, "time".into()));
        assert_eq!(toks[3], (TokenKind::Function, "now".into()));
        assert_eq!(toks[6], (TokenKind::Operator, "-".into()));
        assert_eq!(toks[7], (TokenKind::Literal, "1h".into()));
    }

    #[test]
    fn preserves_case_and_normalizes_keywords() {
        let toks = tokenize("select From", &SQLISH);
        assert_eq!(toks[0].text, "select");
        assert_eq!(toks[0].normalized, "SELECT");
        assert_eq!(toks[2].normalized, "FROM");
    }

    #[test]
    fn folds_compound_keywords() {
        let toks = tokenize("x group   by y align by device", &SQLISH);
        let group = toks.iter().find(|t| t.is_keyword("GROUP BY")).expect("group by folded");
        assert_eq!(group.text, "group by");
        assert!(toks.iter().any(|t| t.is_keyword("ALIGN BY DEVICE")));
        assert!(!toks.iter().any(|t| t.is_keyword("BY")));
    }

    #[test]
    fn folds_three_word_compounds() {
        let toks = kinds("s1 IS NOT NULL");
        assert_eq!(toks[1], (TokenKind::Keyword, "IS NOT NULL".into()));
    }

    #[test]
    fn paths_are_opaque() {
        let toks = kinds("SELECT s1 FROM root.sg1.d1 WHERE root.** ");
        assert!(toks.contains(&(TokenKind::Identifier, "root.sg1.d1".into())));
        assert!(toks.contains(&(TokenKind::Identifier, "root.**".into())));
    }

    #[test]
    fn operators_are_greedy() {
        let toks = kinds("a != b <> c =~ /x.*/ d >= 1e-3");
        assert!(toks.contains(&(TokenKind::Operator, "!=".into())));
        assert!(toks.contains(&(TokenKind::Operator, "<>".into())));
        assert!(toks.contains(&(TokenKind::Operator, "=~".into())));
        assert!(toks.contains(&(TokenKind::Literal, "/x.*/".into())));
        assert!(toks.contains(&(TokenKind::Literal, "1e-3".into())));
    }

    #[test]
    fn strings_comments_and_quoted_identifiers() {
        let toks = kinds("SELECT \"my field\" FROM t -- note\nWHERE a = 'it\\'s' /* block */");
        assert!(toks.contains(&(TokenKind::Identifier, "\"my field\"".into())));
        assert!(toks.contains(&(TokenKind::Comment, "-- note".into())));
        assert!(toks.contains(&(TokenKind::Literal, "'it\\'s'".into())));
        assert!(toks.contains(&(TokenKind::Comment, "/* block */".into())));
    }

    #[test]
    fn unterminated_input_is_swallowed() {
        let toks = kinds("WHERE a = 'open (");
        assert_eq!(toks.last(), Some(&(TokenKind::Literal, "'open (".into())));
        let toks = kinds("x /* never closed");
        assert_eq!(toks.last(), Some(&(TokenKind::Comment, "/* never closed".into())));
    }

    #[test]
    fn date_time_literals() {
        let toks = kinds("time >= 2017-11-01T00:00:00+08:00");
        assert_eq!(toks[2], (TokenKind::Literal, "2017-11-01T00:00:00+08:00".into()));
    }

    #[test]
    fn positions_are_line_and_column() {
        let toks = tokenize("SELECT a\n  FROM b", &SQLISH);
        let from = toks.iter().find(|t| t.is_keyword("FROM")).expect("from");
        assert_eq!((from.line, from.column), (2, 3));
        assert_eq!(&"SELECT a\n  FROM b"[from.start..from.end], "FROM");
    }

    #[test]
    fn tokens_cover_input() {
        let text = "SELECT  *  FROM \"m\" WHERE x='y' -- c\n;";
        let joined: String = scan(text, &SQLISH).into_iter().map(|t| t.text).collect();
        assert_eq!(joined, text);
    }
}
