//! Clause-by-clause layout for the SQL-shaped dialects.
//!
//! The walker keeps a bracket depth (incremented on `(`, decremented on `)`,
//! floored at 0) and decides, per significant token, whether it starts a new
//! line, is glued to its neighbour or is separated by one space. Output
//! depends only on the token sequence, which is what makes formatting
//! idempotent: a second pass sees the same tokens and makes the same choices.
use crate::sql::{Lexicon, Token, TokenKind, tokenize};
use crate::{Error, FormatOptions, Result};

use super::text::preprocess;

/// Layout rules of one SQL-shaped dialect.
#[derive(Debug)]
pub struct SqlLayout {
    pub lexicon: &'static Lexicon,
    /// Keywords that open a statement or a statement section. Always start a
    /// line, including right after `(` (subqueries).
    pub major: &'static [&'static str],
    /// Clause keywords (`WHERE`, `GROUP BY`, `LIMIT`, ...) that start a line.
    pub clauses: &'static [&'static str],
    /// Keywords written like calls and glued to their `(` (`FILL(linear)`).
    pub calls: &'static [&'static str],
}

/// Lay out `text` under `options`. Fails on input the layout cannot safely
/// re-emit (an unterminated string, identifier or comment); callers fall back
/// to the original text.
pub fn layout(text: &str, rules: &SqlLayout, options: &FormatOptions) -> Result<String> {
    let text = preprocess(text, rules.lexicon, options);
    let tokens = tokenize(&text, rules.lexicon);
    if let Some(open) = tokens.iter().find(|t| t.is_unterminated()) {
        return Err(Error::Format(format!(
            "unterminated {} at {}:{}",
            open.kind, open.line, open.column
        )));
    }

    let mut w = Writer::new(options);
    let mut depth = 0usize;
    let mut prev: Option<&Token> = None;
    let mut prev_unary = false;
    let mut force_break = false;
    let mut line_comment = false;
    let mut select_list: Option<usize> = None;

    for token in tokens.iter().filter(|t| t.kind != TokenKind::Whitespace) {
        if token.kind == TokenKind::Comment {
            if !options.preserve_comments {
                continue;
            }
            if line_comment {
                w.newline(depth);
            } else {
                w.space();
            }
            w.write(&token.text);
            line_comment = !token.text.starts_with("/*");
            force_break |= line_comment;
            continue;
        }
        line_comment = false;

        if is_close(token) {
            depth = depth.saturating_sub(1);
            if select_list.is_some_and(|d| d > depth) {
                select_list = None;
            }
        }

        let major = token.is_any_keyword(rules.major);
        let clause = token.is_any_keyword(rules.clauses);
        let after_major = prev.is_some_and(|p| p.is_any_keyword(rules.major));
        let after_open = prev.is_some_and(|p| p.is_punct("("));
        let keyword_break = options.line_break_after_keywords
            && prev.is_some()
            && !after_major
            && (major || (clause && !after_open));

        if force_break || keyword_break {
            w.newline(depth);
        } else if options.align_columns
            && select_list == Some(depth)
            && prev.is_some_and(|p| p.is_punct(","))
        {
            w.newline(depth + 1);
        } else if spaced(prev, prev_unary, token, rules) {
            let rendered = render(token, options).chars().count();
            if w.fits(rendered) {
                w.space();
            } else {
                w.newline(depth + 1);
            }
        }
        w.write(&render(token, options));

        if major || clause {
            select_list = (token.is_keyword("SELECT")).then_some(depth);
        }
        if is_open(token) {
            depth += 1;
        }
        force_break = token.is_punct(";");
        if force_break {
            depth = 0;
            select_list = None;
        }
        prev_unary = is_unary(prev, token);
        prev = Some(token);
    }
    Ok(w.finish())
}

fn is_open(token: &Token) -> bool {
    token.is_punct("(") || token.is_punct("[") || token.is_punct("{")
}

fn is_close(token: &Token) -> bool {
    token.is_punct(")") || token.is_punct("]") || token.is_punct("}")
}

fn is_unary(prev: Option<&Token>, token: &Token) -> bool {
    (token.is_operator("-") || token.is_operator("+"))
        && prev.is_none_or(|p| {
            matches!(p.kind, TokenKind::Operator | TokenKind::Keyword)
                || p.is_punct("(")
                || p.is_punct(",")
                || p.is_punct("[")
        })
}

/// Whether one space separates `prev` and `token`.
fn spaced(prev: Option<&Token>, prev_unary: bool, token: &Token, rules: &SqlLayout) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if prev_unary {
        return false;
    }
    if [",", ")", "]", "}", ";", ".", "::"].iter().any(|p| token.is_punct(p)) {
        return false;
    }
    if ["(", "[", "{", ".", "::", "$", "@"].iter().any(|p| prev.is_punct(p)) {
        return false;
    }
    if token.is_punct("(") {
        let call = matches!(prev.kind, TokenKind::Function | TokenKind::Identifier)
            || prev.is_any_keyword(rules.calls);
        return !call;
    }
    true
}

fn render(token: &Token, options: &FormatOptions) -> String {
    match token.kind {
        TokenKind::Keyword => options.keyword_case.apply(&token.text),
        _ => token.text.clone(),
    }
}

/// Output buffer tracking the width of the line being written.
pub(crate) struct Writer<'o> {
    options: &'o FormatOptions,
    out: String,
    width: usize,
    fresh: bool,
}

impl<'o> Writer<'o> {
    pub(crate) fn new(options: &'o FormatOptions) -> Self {
        Self {
            options,
            out: String::new(),
            width: 0,
            fresh: true,
        }
    }

    pub(crate) fn newline(&mut self, level: usize) {
        let kept = self.out.trim_end_matches(' ').len();
        self.out.truncate(kept);
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let indent = self.options.indent(level);
        self.width = indent.chars().count();
        self.out.push_str(&indent);
        self.fresh = true;
    }

    pub(crate) fn space(&mut self) {
        if !self.fresh {
            self.out.push(' ');
            self.width += 1;
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.out.push_str(text);
        self.width = match text.rsplit_once('\n') {
            Some((_, tail)) => tail.chars().count(),
            None => self.width + text.chars().count(),
        };
        self.fresh = false;
    }

    /// Whether a space plus `width` more characters stay within the limit.
    /// A line holding only indentation always fits.
    pub(crate) fn fits(&self, width: usize) -> bool {
        self.fresh || !self.options.exceeds(self.width + 1 + width)
    }

    pub(crate) fn finish(self) -> String {
        super::text::postprocess(&self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeywordCase;

    static RULES: SqlLayout = SqlLayout {
        lexicon: &crate::influxql::LEXICON,
        major: &["SELECT", "FROM", "SHOW", "DELETE", "DROP"],
        clauses: &["WHERE", "GROUP BY", "ORDER BY", "LIMIT", "FILL"],
        calls: &["FILL"],
    };

    fn run(text: &str, options: &FormatOptions) -> String {
        layout(text, &RULES, options).expect("layout")
    }

    #[test]
    fn breaks_before_clauses_and_cases_keywords() {
        let out = run("select * from cpu where time>now()-1h", &FormatOptions::default());
        assert_eq!(out, "SELECT *\nFROM cpu\nWHERE time > now() - 1h");
    }

    #[test]
    fn keeps_major_pairs_together() {
        let out = run("delete from cpu where host='a'", &FormatOptions::default());
        assert_eq!(out, "DELETE FROM cpu\nWHERE host = 'a'");
    }

    #[test]
    fn glues_calls_and_unary_minus() {
        let out = run(
            "SELECT mean( x ) FROM m WHERE v > - 1 GROUP BY time(1m) fill ( none )",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "SELECT mean(x)\nFROM m\nWHERE v > -1\nGROUP BY time(1m)\nFILL(none)"
        );
    }

    #[test]
    fn subqueries_are_indented() {
        let out = run("SELECT max(m) FROM (SELECT mean(v) AS m FROM cpu)", &FormatOptions::default());
        assert_eq!(out, "SELECT max(m)\nFROM (\n  SELECT mean(v) AS m\n  FROM cpu)");
    }

    #[test]
    fn aligns_select_columns() {
        let options = FormatOptions {
            align_columns: true,
            ..FormatOptions::default()
        };
        let out = run("SELECT a, b, mean(c) FROM m", &options);
        assert_eq!(out, "SELECT a,\n  b,\n  mean(c)\nFROM m");
    }

    #[test]
    fn respects_keyword_case_and_strings() {
        let options = FormatOptions {
            keyword_case: KeywordCase::Lower,
            ..FormatOptions::default()
        };
        let out = run("SELECT v FROM m WHERE tag = 'SELECT'", &options);
        assert_eq!(out, "select v\nfrom m\nwhere tag = 'SELECT'");
    }

    #[test]
    fn single_line_when_breaks_disabled() {
        let options = FormatOptions {
            line_break_after_keywords: false,
            ..FormatOptions::default()
        };
        assert_eq!(run("select a from b  where c=1", &options), "SELECT a FROM b WHERE c = 1");
    }

    #[test]
    fn wraps_long_lines_one_level_deeper() {
        let options = FormatOptions {
            max_line_length: 20,
            ..FormatOptions::default()
        };
        let out = run("SELECT alpha, beta, gamma, delta FROM m", &options);
        assert_eq!(out, "SELECT alpha, beta,\n  gamma, delta\nFROM m");
    }

    #[test]
    fn statements_start_new_lines_and_comments_survive() {
        let out = run(
            "SHOW DATABASES; -- list\nSHOW MEASUREMENTS",
            &FormatOptions::default(),
        );
        assert_eq!(out, "SHOW DATABASES; -- list\nSHOW MEASUREMENTS");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(layout("SELECT 'open", &RULES, &FormatOptions::default()).is_err());
    }

    #[test]
    fn idempotent() {
        let options = FormatOptions::default();
        let once = run(
            "select mean(v) from m where a = 1 and b =~ /x/ group by time(5m), host limit 10",
            &options,
        );
        assert_eq!(run(&once, &options), once);
    }
}
