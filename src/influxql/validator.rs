use crate::sql::{Token, TokenKind};
use crate::validation::grammar::{
    CONTROL_FLOW, check_leading, check_regex_operands, check_unknown_functions, has_call_to,
    head_words, is_date, is_naive_date_time, is_rfc3339, pipeline, starts_with_words, top_level,
};
use crate::{ErrorType, Language, Report, StructuralRules, ValidationResult};

use super::lexicon::*;

pub fn validate(text: &str) -> ValidationResult {
    pipeline(text, &LEXICON, StructuralRules::default(), grammar, semantic)
}

/// `SELECT` without `INTO` and `SHOW`/`EXPLAIN` statements only read.
pub fn is_read_only(text: &str) -> bool {
    let tokens = super::tokenize(text);
    let statements = crate::sql::statements(&tokens);
    !statements.is_empty()
        && statements.iter().all(|s| match s.first() {
            Some(t) if t.is_keyword("SELECT") => top_level(s, "INTO").is_none(),
            Some(t) => t.is_any_keyword(&["SHOW", "EXPLAIN"]),
            None => true,
        })
}

fn grammar(statement: &[&Token], report: &mut Report) {
    if !check_leading(statement, LEADING, Language::InfluxQL, report) {
        return;
    }
    check_regex_operands(statement, report);
    check_time_literals(statement, report);
    match statement[0].normalized.as_str() {
        "SELECT" => select(statement, report),
        "SHOW" => show(statement, report),
        "CREATE" => target(statement, "CREATE", CREATE_TARGETS, report),
        "DROP" => target(statement, "DROP", DROP_TARGETS, report),
        "DELETE" => delete(statement, report),
        "EXPLAIN" => match statement.get(1) {
            Some(t) if t.is_keyword("SELECT") => select(&statement[1..], report),
            Some(t) if t.is_keyword("ANALYZE") => select(&statement[2..], report),
            _ => report.error(
                statement[0].position(),
                "EXPLAIN must be followed by a SELECT statement",
                ErrorType::Syntax,
            ),
        },
        _ => {}
    }
}

fn select(statement: &[&Token], report: &mut Report) {
    let Some(select) = statement.first() else {
        return;
    };
    let Some(from) = top_level(statement, "FROM") else {
        report.error(
            select.position(),
            "SELECT statement requires a FROM clause",
            ErrorType::Syntax,
        );
        return;
    };
    if statement.get(1).is_some_and(|t| std::ptr::eq(*t, from)) {
        report.error(
            from.position(),
            "SELECT requires at least one field or expression before FROM",
            ErrorType::Syntax,
        );
    }
    if statement.last().is_some_and(|t| std::ptr::eq(*t, from)) {
        report.error(
            from.position(),
            "FROM must name at least one measurement",
            ErrorType::Syntax,
        );
    }
    if let Some(group) = top_level(statement, "GROUP BY")
        && !has_call_to(statement, AGGREGATES)
    {
        report.error(
            group.position(),
            "GROUP BY requires an aggregate or selector function such as mean() or count()",
            ErrorType::Semantic,
        );
        report.hint("Wrap the selected fields in an aggregate, e.g. mean(value)");
    }
    check_unknown_functions(statement, &LEXICON, CONTROL_FLOW, report);
}

fn show(statement: &[&Token], report: &mut Report) {
    let words = head_words(statement);
    let Some(variant) = SHOW_VARIANTS.iter().find(|v| starts_with_words(&words, v)) else {
        let at = statement.get(1).unwrap_or(&statement[0]);
        report.error(
            at.position(),
            format!(
                "Unknown SHOW statement 'SHOW {}'",
                words.first().copied().unwrap_or_default()
            ),
            ErrorType::Syntax,
        );
        return;
    };
    if *variant == ["TAG", "VALUES"] && top_level(statement, "WITH").is_none() {
        report.error(
            statement[0].position(),
            "SHOW TAG VALUES requires WITH KEY = \"<tag key>\"",
            ErrorType::Syntax,
        );
    }
}

fn target(statement: &[&Token], verb: &str, targets: &[&[&str]], report: &mut Report) {
    let words = head_words(statement);
    if !targets.iter().any(|v| starts_with_words(&words, v)) {
        let expected: Vec<String> = targets.iter().map(|v| v.join(" ")).collect();
        report.error(
            statement[0].position(),
            format!("{verb} must be followed by one of {}", expected.join(", ")),
            ErrorType::Syntax,
        );
    }
}

fn delete(statement: &[&Token], report: &mut Report) {
    if top_level(statement, "FROM").is_none() && top_level(statement, "WHERE").is_none() {
        report.error(
            statement[0].position(),
            "DELETE requires a FROM clause, a WHERE clause, or both",
            ErrorType::Syntax,
        );
    }
}

/// String literals compared against `time` must be RFC3339 timestamps (or
/// the `YYYY-MM-DD[ HH:MM:SS[.f]]` short forms InfluxQL also accepts).
fn check_time_literals(statement: &[&Token], report: &mut Report) {
    for window in statement.windows(3) {
        let literal = match (window[0], window[1], window[2]) {
            (a, op, b) if a.is_word("time") && op.kind == TokenKind::Operator && b.is_string() => b,
            (a, op, b) if b.is_word("time") && op.kind == TokenKind::Operator && a.is_string() => a,
            _ => continue,
        };
        let value = literal.unquoted();
        let valid = is_rfc3339(value)
            || is_date(value)
            || is_naive_date_time(value, &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]);
        if !valid {
            report.error(
                literal.position(),
                format!("Invalid time literal {}: expected RFC3339, e.g. '2021-01-01T00:00:00Z'", literal.text),
                ErrorType::Syntax,
            );
        }
    }
}

fn semantic(statement: &[&Token], report: &mut Report) {
    match statement.first() {
        Some(t) if t.is_keyword("SELECT") => select_heuristics(statement, report),
        Some(t) if t.is_keyword("DELETE") && top_level(statement, "WHERE").is_none() => {
            report.warning(
                t.position(),
                "DELETE without WHERE removes every point of the measurement",
                ErrorType::Semantic,
            );
        }
        Some(t) if t.is_keyword("DROP") && statement.get(1).is_some_and(|n| n.is_keyword("SERIES")) => {
            if top_level(statement, "WHERE").is_none() && top_level(statement, "FROM").is_none() {
                report.warning(
                    t.position(),
                    "DROP SERIES without FROM or WHERE drops every series in the database",
                    ErrorType::Semantic,
                );
            }
        }
        _ => {}
    }
}

fn select_heuristics(statement: &[&Token], report: &mut Report) {
    let select = statement[0];
    if let Some(star) = statement
        .iter()
        .take_while(|t| !t.is_keyword("FROM"))
        .find(|t| t.is_operator("*"))
    {
        report.warning(
            star.position(),
            "SELECT * returns every field and tag; list the fields you need",
            ErrorType::Semantic,
        );
        report.hint("Select specific fields instead of *");
    }

    match top_level(statement, "WHERE") {
        None => {
            report.warning(
                select.position(),
                "No WHERE clause: the query scans the whole measurement; add a time range",
                ErrorType::Semantic,
            );
            report.hint("Add a time range, e.g. WHERE time > now() - 1h");
        }
        Some(clause) if !statement.iter().any(|t| t.is_word("time")) => {
            report.warning(
                clause.position(),
                "WHERE clause has no time range",
                ErrorType::Semantic,
            );
            report.hint("Add a time range, e.g. WHERE time > now() - 1h");
        }
        Some(_) => {}
    }

    if top_level(statement, "LIMIT").is_none() && top_level(statement, "SLIMIT").is_none() {
        report.warning(
            select.position(),
            "No LIMIT clause; large result sets are slow to transfer and render",
            ErrorType::Semantic,
        );
        report.hint("Add LIMIT to cap the number of returned points");
    }

    let grouped_by_time = top_level(statement, "GROUP BY").is_some()
        && statement
            .windows(2)
            .any(|w| w[0].is_word("time") && w[1].is_punct("("));
    if grouped_by_time && top_level(statement, "ORDER BY").is_none() {
        report.hint("Add ORDER BY time DESC to see the most recent intervals first");
    }
}
