//! Building blocks for the dialect grammar and semantic layers.
//!
//! Dialect validators describe their grammar as plain functions over one
//! statement's significant tokens and hand them to [`pipeline`], which runs
//! the layers in order and stops after the first layer that reports an error.
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::sql::{Lexicon, Token, TokenKind, statements, tokenize};
use crate::{ErrorType, Language, Report, StructuralRules, ValidationResult, structural, trace};

/// Checks applied to one statement.
pub type StatementCheck = fn(&[&Token], &mut Report);

/// Pseudo-functions that look like calls but are control flow.
pub const CONTROL_FLOW: &[&str] = &["CASE", "WHEN", "THEN", "ELSE", "END", "IF"];

/// Structural layer, then `grammar` over every statement, then `semantic`
/// over every statement if the grammar layer added no errors.
pub fn pipeline(
    text: &str,
    lexicon: &Lexicon,
    rules: StructuralRules,
    grammar: StatementCheck,
    semantic: StatementCheck,
) -> ValidationResult {
    let tokens = tokenize(text, lexicon);
    let mut report = Report::new();
    if !structural::check(text, &tokens, lexicon, rules, &mut report) {
        report.hint("Check that every bracket and quote is closed");
        return report.finish();
    }
    let statements = statements(&tokens);
    trace!("validating {} statement(s)", statements.len());
    for statement in &statements {
        grammar(statement, &mut report);
    }
    if !report.has_errors() {
        for statement in &statements {
            semantic(statement, &mut report);
        }
    }
    report.finish()
}

/// Each token paired with its bracket depth (openers carry the outer depth).
pub fn with_depth<'t>(statement: &[&'t Token]) -> Vec<(usize, &'t Token)> {
    let mut depth = 0usize;
    statement
        .iter()
        .map(|t| {
            if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") {
                depth = depth.saturating_sub(1);
            }
            let at = depth;
            if t.is_punct("(") || t.is_punct("[") || t.is_punct("{") {
                depth += 1;
            }
            (at, *t)
        })
        .collect()
}

/// First occurrence of keyword `kw` outside any bracket.
pub fn top_level<'t>(statement: &[&'t Token], kw: &str) -> Option<&'t Token> {
    with_depth(statement)
        .into_iter()
        .find(|(depth, t)| *depth == 0 && t.is_keyword(kw))
        .map(|(_, t)| t)
}

/// The statement must open with one of `allowed`. Reports a syntax error and
/// returns `false` otherwise.
pub fn check_leading(
    statement: &[&Token],
    allowed: &[&str],
    language: Language,
    report: &mut Report,
) -> bool {
    let Some(first) = statement.first() else {
        return true;
    };
    if first.is_any_keyword(allowed) {
        return true;
    }
    report.error(
        first.position(),
        format!(
            "{language} statements must start with one of {}; found '{}'",
            allowed.join(", "),
            first.text
        ),
        ErrorType::Syntax,
    );
    false
}

/// Consecutive words after the statement's first token (`TAG KEYS` in
/// `SHOW TAG KEYS FROM cpu`).
pub fn head_words<'t>(statement: &[&'t Token]) -> Vec<&'t str> {
    statement
        .iter()
        .skip(1)
        .take_while(|t| t.kind.is_word())
        .map(|t| t.text.as_str())
        .collect()
}

/// Whether `words` begins with `variant`, case-insensitively.
pub fn starts_with_words(words: &[&str], variant: &[&str]) -> bool {
    words.len() >= variant.len()
        && words
            .iter()
            .zip(variant.iter())
            .all(|(w, v)| w.eq_ignore_ascii_case(v))
}

/// Name tokens used as calls: a function or plain identifier immediately
/// followed by `(`.
pub fn calls<'t>(statement: &[&'t Token]) -> Vec<&'t Token> {
    statement
        .windows(2)
        .filter(|w| w[1].is_punct("("))
        .map(|w| w[0])
        .filter(|t| matches!(t.kind, TokenKind::Function | TokenKind::Identifier))
        .collect()
}

/// Whether any call in the statement names one of `aggregates`.
pub fn has_call_to(statement: &[&Token], aggregates: &[&str]) -> bool {
    calls(statement)
        .iter()
        .any(|t| aggregates.iter().any(|a| a.eq_ignore_ascii_case(&t.text)))
}

/// Calls to names the lexicon does not know are reference warnings.
///
/// Dotted names (paths, package members like `strings.toUpper`) and names
/// right after `FROM`/`INTO` (targets with column lists) are not calls and
/// are skipped, as are `tolerated` names.
pub fn check_unknown_functions(
    statement: &[&Token],
    lexicon: &Lexicon,
    tolerated: &[&str],
    report: &mut Report,
) -> bool {
    let mut clean = true;
    for (i, window) in statement.windows(2).enumerate() {
        let (name, open) = (window[0], window[1]);
        if name.kind != TokenKind::Identifier || !open.is_punct("(") || name.text.contains('.') {
            continue;
        }
        if i > 0
            && (statement[i - 1].is_any_keyword(&["FROM", "INTO"]) || statement[i - 1].is_punct("."))
        {
            continue;
        }
        if lexicon.is_function(&name.text)
            || tolerated.iter().any(|t| t.eq_ignore_ascii_case(&name.text))
        {
            continue;
        }
        report.warning(
            name.position(),
            format!("Unknown function '{}'", name.text),
            ErrorType::Reference,
        );
        clean = false;
    }
    if !clean {
        report.hint("Check the function name against the supported function list");
    }
    clean
}

/// `=~` and `!~` must be followed by a `/regex/` literal.
pub fn check_regex_operands(statement: &[&Token], report: &mut Report) {
    for window in statement.windows(2) {
        let (op, operand) = (window[0], window[1]);
        if (op.is_operator("=~") || op.is_operator("!~")) && !operand.is_regex() {
            report.error(
                operand.position(),
                format!("Operator {} must be followed by a /regex/ literal", op.text),
                ErrorType::Syntax,
            );
        }
    }
    if let Some(op) = statement.last().filter(|t| t.is_operator("=~") || t.is_operator("!~")) {
        report.error(
            op.position(),
            format!("Operator {} must be followed by a /regex/ literal", op.text),
            ErrorType::Syntax,
        );
    }
}

pub fn is_rfc3339(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
}

/// Naive `date time` forms: `T` or space separated, optional fraction.
pub fn is_naive_date_time(text: &str, formats: &[&str]) -> bool {
    formats
        .iter()
        .any(|f| NaiveDateTime::parse_from_str(text, f).is_ok())
}

pub fn is_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// Whether `text` starts like a `YYYY-MM-DD` date.
pub fn looks_like_date(text: &str) -> bool {
    let b = text.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influxql::LEXICON;
    use crate::sql::significant;
    use rstest::rstest;

    fn statement(text: &str) -> Vec<Token> {
        significant(&tokenize(text, &LEXICON)).into_iter().cloned().collect()
    }

    #[test]
    fn depth_tracking() {
        let tokens = statement("SELECT a FROM (SELECT b FROM c) WHERE x");
        let refs: Vec<&Token> = tokens.iter().collect();
        let depths: Vec<usize> = with_depth(&refs).into_iter().map(|(d, _)| d).collect();
        assert_eq!(depths, vec![0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0]);
        let from = top_level(&refs, "FROM").expect("from");
        assert_eq!(from.column, 10);
    }

    #[test]
    fn finds_calls() {
        let tokens = statement("SELECT mean(a), foo(b), c FROM m");
        let refs: Vec<&Token> = tokens.iter().collect();
        let names: Vec<&str> = calls(&refs).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(names, vec!["mean", "foo"]);
        assert!(has_call_to(&refs, &["MEAN"]));
    }

    #[test]
    fn unknown_functions_are_reference_warnings() {
        let tokens = statement("SELECT foo(a), if(b) FROM m");
        let refs: Vec<&Token> = tokens.iter().collect();
        let mut report = Report::new();
        assert!(!check_unknown_functions(&refs, &LEXICON, CONTROL_FLOW, &mut report));
        let result = report.finish();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].error_type, ErrorType::Reference);
        assert_eq!(result.warnings[0].message, "Unknown function 'foo'");
    }

    #[rstest]
    #[case("WHERE host =~ /web.*/", true)]
    #[case("WHERE host !~ /db/", true)]
    #[case("WHERE host =~ 'web'", false)]
    #[case("WHERE host =~", false)]
    fn regex_operands(#[case] text: &str, #[case] ok: bool) {
        let tokens = statement(text);
        let refs: Vec<&Token> = tokens.iter().collect();
        let mut report = Report::new();
        check_regex_operands(&refs, &mut report);
        assert_eq!(!report.has_errors(), ok);
    }

    #[rstest]
    #[case("2021-01-01T00:00:00Z", true)]
    #[case("2021-01-01T00:00:00.123+08:00", true)]
    #[case("2021-13-01T00:00:00Z", false)]
    #[case("yesterday", false)]
    fn rfc3339(#[case] text: &str, #[case] ok: bool) {
        assert_eq!(is_rfc3339(text), ok);
    }

    #[test]
    fn date_shapes() {
        assert!(looks_like_date("2021-01-01T00:00:00Z"));
        assert!(!looks_like_date("2021-1-01"));
        assert!(is_date("2021-02-28"));
        assert!(!is_date("2021-02-30"));
        assert!(is_naive_date_time("2021-02-28 10:00:00", &["%Y-%m-%d %H:%M:%S"]));
    }
}
