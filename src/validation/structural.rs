//! Structural layer: checks every dialect shares before any grammar applies.
//!
//! - empty input (only whitespace or comments) is rejected;
//! - brackets are matched with an explicit stack over `( [ {`, using the token
//!   stream so brackets inside strings and comments are ignored;
//! - quotes are matched per line, escape-aware, skipping comment text;
//! - a block comment left open is reported.
use crate::sql::{Lexicon, Token, TokenKind};
use crate::{ErrorType, Report};

/// Dialect switches for the structural layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralRules {
    /// `[start, end)` half-open time intervals (IoTDB `GROUP BY`) are legal.
    pub half_open_intervals: bool,
}

/// Run the structural layer. Returns `true` when it added no errors.
pub fn check(
    text: &str,
    tokens: &[Token],
    lexicon: &Lexicon,
    rules: StructuralRules,
    report: &mut Report,
) -> bool {
    let before = report.error_count();
    if !tokens.iter().any(|t| t.kind.is_significant()) {
        report.error((1, 1), "Query cannot be empty", ErrorType::Syntax);
        return false;
    }
    brackets(tokens, rules, report);
    quotes(text, lexicon, report);
    if let Some(comment) = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Comment && t.is_unterminated())
    {
        report.error(comment.position(), "Unclosed block comment", ErrorType::Syntax);
    }
    report.error_count() == before
}

fn closer_of(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

fn brackets(tokens: &[Token], rules: StructuralRules, report: &mut Report) {
    let mut stack: Vec<&Token> = Vec::new();
    for token in tokens.iter().filter(|t| t.kind == TokenKind::Punctuation) {
        match token.text.as_str() {
            "(" | "[" | "{" => stack.push(token),
            close @ (")" | "]" | "}") => match stack.pop() {
                None => report.error(
                    token.position(),
                    format!("Unmatched closing bracket '{close}'"),
                    ErrorType::Syntax,
                ),
                Some(open) if closer_of(&open.text) == close => {}
                Some(open) if rules.half_open_intervals && open.text == "[" && close == ")" => {}
                Some(open) => report.error(
                    token.position(),
                    format!(
                        "Mismatched bracket: '{}' at line {}, column {} is closed by '{close}'",
                        open.text, open.line, open.column
                    ),
                    ErrorType::Syntax,
                ),
            },
            _ => {}
        }
    }
    for open in stack {
        report.error(
            open.position(),
            format!(
                "Unclosed bracket '{}' opened at line {}, column {}",
                open.text, open.line, open.column
            ),
            ErrorType::Syntax,
        );
    }
}

fn quote_name(quote: char) -> &'static str {
    match quote {
        '\'' => "single quote",
        '"' => "double quote",
        _ => "backtick",
    }
}

fn quotes(text: &str, lexicon: &Lexicon, report: &mut Report) {
    let mut in_block = false;
    for (n, line) in text.lines().enumerate() {
        let chars: Vec<(usize, char)> = line.char_indices().collect();
        let mut open: Option<(char, usize)> = None;
        let mut i = 0;
        while let Some(&(byte, c)) = chars.get(i) {
            let rest = &line[byte..];
            if in_block {
                if rest.starts_with("*/") {
                    in_block = false;
                    i += 1;
                }
            } else if let Some((quote, _)) = open {
                if c == '\\' {
                    i += 1;
                } else if c == quote {
                    open = None;
                }
            } else if rest.starts_with(lexicon.line_comment) {
                break;
            } else if lexicon.block_comments && rest.starts_with("/*") {
                in_block = true;
                i += 1;
            } else if matches!(c, '\'' | '"' | '`') {
                open = Some((c, i));
            }
            i += 1;
        }
        if let Some((quote, column)) = open {
            report.error(
                (n + 1, column + 1),
                format!("Unclosed {} on line {}", quote_name(quote), n + 1),
                ErrorType::Syntax,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influxql::LEXICON;
    use crate::sql::tokenize;
    use crate::ValidationResult;
    use rstest::rstest;

    fn run(text: &str, rules: StructuralRules) -> ValidationResult {
        let mut report = Report::new();
        check(text, &tokenize(text, &LEXICON), &LEXICON, rules, &mut report);
        report.finish()
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t ")]
    #[case("-- only a comment")]
    fn rejects_empty(#[case] text: &str) {
        let result = run(text, StructuralRules::default());
        assert!(!result.valid);
        assert_eq!(result.errors[0].message, "Query cannot be empty");
    }

    #[test]
    fn reports_unclosed_bracket_at_its_position() {
        let result = run("SELECT mean(usage FROM cpu", StructuralRules::default());
        assert_eq!(result.errors.len(), 1);
        let err = &result.errors[0];
        assert_eq!((err.line, err.column), (1, 12));
        assert!(err.message.contains("'('"));
        assert_eq!(err.error_type, ErrorType::Syntax);
    }

    #[test]
    fn reports_unmatched_and_mismatched() {
        let result = run("SELECT a) FROM b", StructuralRules::default());
        assert!(result.errors[0].message.starts_with("Unmatched closing bracket"));

        let result = run("SELECT f(a] FROM b", StructuralRules::default());
        assert!(result.errors[0].message.starts_with("Mismatched bracket"));
    }

    #[test]
    fn half_open_intervals_when_allowed() {
        let text = "GROUP BY ([1, 2), 1h)";
        assert!(!run(text, StructuralRules::default()).valid);
        assert!(run(text, StructuralRules { half_open_intervals: true }).valid);
    }

    #[rstest]
    #[case("SELECT * FROM cpu WHERE host = 'server01")]
    #[case("SELECT * FROM \"cpu WHERE x = 1")]
    #[case("SELECT * FROM cpu WHERE a = 'x' AND b = 'y")]
    #[case("SELECT * FROM cpu WHERE a = 'it\\'s")]
    fn odd_quotes_are_syntax_errors(#[case] text: &str) {
        let result = run(text, StructuralRules::default());
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.error_type == ErrorType::Syntax && e.message.contains("quote")),
            "{result:?}"
        );
    }

    #[rstest]
    #[case("SELECT * FROM cpu WHERE host = 'server01'")]
    #[case("SELECT \"it's\" FROM cpu")]
    #[case("SELECT * FROM cpu WHERE a = 'it\\'s'")]
    #[case("SELECT * FROM cpu -- don't care")]
    #[case("SELECT * /* it's */ FROM cpu")]
    fn balanced_input_has_no_structural_errors(#[case] text: &str) {
        let result = run(text, StructuralRules::default());
        assert!(result.valid, "{result:?}");
    }

    #[test]
    fn unclosed_block_comment() {
        let result = run("SELECT * FROM cpu /* open", StructuralRules::default());
        assert!(result.errors.iter().any(|e| e.message == "Unclosed block comment"));
    }
}
