use crate::sql::{Token, TokenKind, matching_close, significant};
use crate::validation::grammar::{
    CONTROL_FLOW, calls, check_regex_operands, check_unknown_functions, is_date, is_rfc3339,
    looks_like_date, pipeline,
};
use crate::{ErrorType, Report, StructuralRules, ValidationResult};

use super::lexicon::*;

/// Top-level shape of one Flux statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Kind {
    Import,
    Option,
    Assignment,
    Expression,
}

pub(super) fn kind(statement: &[&Token]) -> Kind {
    match statement {
        [first, ..] if first.is_any_keyword(&["IMPORT", "PACKAGE"]) => Kind::Import,
        [first, ..] if first.is_keyword("OPTION") => Kind::Option,
        [name, eq, ..] if name.kind == TokenKind::Identifier && eq.is_operator("=") => {
            Kind::Assignment
        }
        _ => Kind::Expression,
    }
}

/// Whether `next`, on a later line than `prev`, still belongs to `prev`'s
/// statement.
pub(super) fn continues(prev: &Token, next: &Token) -> bool {
    next.kind == TokenKind::Operator
        || next.is_any_keyword(&["AND", "OR", "THEN", "ELSE", "WITH"])
        || prev.kind == TokenKind::Operator
        || prev.is_any_keyword(&["AND", "OR", "NOT", "IF", "THEN", "ELSE", "EXISTS", "RETURN", "WITH"])
        || [",", ":", "."].iter().any(|p| prev.is_punct(p))
}

/// Split significant tokens into Flux statements: a token outside brackets
/// on a new line starts a statement unless it continues the previous line
/// (`|> ...`, a trailing operator).
pub(super) fn flux_statements<'t>(tokens: &[&'t Token]) -> Vec<Vec<&'t Token>> {
    let mut out: Vec<Vec<&'t Token>> = Vec::new();
    let mut depth = 0usize;
    for &t in tokens {
        let starts = depth == 0
            && out
                .last()
                .and_then(|s| s.last())
                .is_some_and(|prev| t.line > prev.line && !continues(prev, t));
        if starts || out.is_empty() {
            out.push(vec![t]);
        } else if let Some(current) = out.last_mut() {
            current.push(t);
        }
        if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") {
            depth = depth.saturating_sub(1);
        } else if t.is_punct("(") || t.is_punct("[") || t.is_punct("{") {
            depth += 1;
        }
    }
    out
}

pub fn validate(text: &str) -> ValidationResult {
    pipeline(text, &LEXICON, StructuralRules::default(), grammar, semantic)
}

/// Anything that does not call `to()` or `wideTo()`.
pub fn is_read_only(text: &str) -> bool {
    let tokens = super::tokenize(text);
    let significant = significant(&tokens);
    !significant.is_empty()
        && !calls(&significant)
            .iter()
            .any(|t| WRITERS.contains(&t.text.as_str()))
}

/// Names bound by assignments, options and imports.
fn declared_names(tokens: &[&Token]) -> Vec<String> {
    let mut names = Vec::new();
    for statement in flux_statements(tokens) {
        match kind(&statement) {
            Kind::Assignment => names.push(statement[0].text.clone()),
            Kind::Option => {
                if let Some(name) = statement.get(1).filter(|t| t.kind == TokenKind::Identifier) {
                    names.push(name.text.clone());
                }
            }
            Kind::Import => {
                if let Some(package) = statement.iter().rev().find(|t| t.is_string()) {
                    let path = package.unquoted();
                    names.push(path.rsplit('/').next().unwrap_or(path).to_string());
                }
            }
            Kind::Expression => {}
        }
    }
    names
}

fn grammar(tokens: &[&Token], report: &mut Report) {
    let declared = declared_names(tokens);
    let tolerated: Vec<&str> = declared
        .iter()
        .map(String::as_str)
        .chain(CONTROL_FLOW.iter().copied())
        .collect();
    for statement in flux_statements(tokens) {
        match kind(&statement) {
            Kind::Expression => check_source(&statement, &declared, report),
            Kind::Assignment if statement.iter().any(|t| t.is_operator("|>")) => {
                check_source(&statement[2..], &declared, report)
            }
            _ => {}
        }
        check_pipes(&statement, report);
        check_calls(&statement, report);
        check_time_literals(&statement, report);
        check_regex_operands(&statement, report);
        check_unknown_functions(&statement, &LEXICON, &tolerated, report);
    }
}

/// A query expression must start from a data source, a package call or a
/// variable holding a stream.
fn check_source(body: &[&Token], declared: &[String], report: &mut Report) {
    let Some(head) = body.first().filter(|t| t.kind.is_word()) else {
        return;
    };
    let next = body.get(1);
    let is_call = next.is_some_and(|t| t.is_punct("("));
    let source = is_call && SOURCES.contains(&head.text.as_str());
    let package = next.is_some_and(|t| t.is_punct("."));
    let variable = declared.contains(&head.text);
    if source || package || variable {
        return;
    }
    if !is_call && !body.iter().any(|t| t.is_operator("|>")) {
        return;
    }
    report.error(
        head.position(),
        format!(
            "Flux queries typically start with from(bucket: ...); found '{}'",
            head.text
        ),
        ErrorType::Syntax,
    );
    report.hint("Start the query with from(bucket: \"...\") and pipe it into transformations with |>");
}

/// `|>` needs an input on its left and a call on its right.
fn check_pipes(statement: &[&Token], report: &mut Report) {
    for (i, pipe) in statement.iter().enumerate() {
        if !pipe.is_operator("|>") {
            continue;
        }
        if i == 0 {
            report.error(pipe.position(), "Pipe operator |> has no input", ErrorType::Syntax);
            continue;
        }
        let mut j = i + 1;
        if statement.get(j).is_some_and(|t| t.kind.is_word()) {
            j += 1;
            while statement.get(j).is_some_and(|t| t.is_punct("."))
                && statement.get(j + 1).is_some_and(|t| t.kind.is_word())
            {
                j += 2;
            }
            if statement.get(j).is_some_and(|t| t.is_punct("(")) {
                continue;
            }
        }
        let at = statement.get(i + 1).unwrap_or(pipe);
        report.error(
            at.position(),
            "Pipe operator |> must be followed by a function call",
            ErrorType::Syntax,
        );
    }
}

/// Named arguments of the call whose `(` is at `open`: `(name, value)`.
fn named_args<'t>(statement: &[&'t Token], open: usize) -> Vec<(&'t Token, Vec<&'t Token>)> {
    let Some(close) = matching_close(statement, open) else {
        return Vec::new();
    };
    let mut args: Vec<Vec<&Token>> = vec![Vec::new()];
    let mut depth = 0usize;
    for &t in &statement[open + 1..close] {
        if depth == 0 && t.is_punct(",") {
            args.push(Vec::new());
            continue;
        }
        if t.is_punct("(") || t.is_punct("[") || t.is_punct("{") {
            depth += 1;
        } else if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") {
            depth = depth.saturating_sub(1);
        }
        if let Some(arg) = args.last_mut() {
            arg.push(t);
        }
    }
    args.into_iter()
        .filter_map(|arg| match arg.as_slice() {
            [name, colon, value @ ..] if name.kind.is_word() && colon.is_punct(":") => {
                Some((*name, value.to_vec()))
            }
            _ => None,
        })
        .collect()
}

/// Indices of calls to the unqualified function `name`.
fn calls_to(statement: &[&Token], name: &str) -> Vec<usize> {
    (0..statement.len().saturating_sub(1))
        .filter(|&i| {
            statement[i].text == name
                && statement[i + 1].is_punct("(")
                && (i == 0 || !statement[i - 1].is_punct("."))
        })
        .collect()
}

fn check_calls(statement: &[&Token], report: &mut Report) {
    for i in calls_to(statement, "from") {
        let args = named_args(statement, i + 1);
        if !args
            .iter()
            .any(|(name, _)| name.text == "bucket" || name.text == "bucketID")
        {
            report.error(
                statement[i].position(),
                "from() requires a bucket or bucketID parameter",
                ErrorType::Syntax,
            );
        }
    }
    for i in calls_to(statement, "range") {
        let args = named_args(statement, i + 1);
        if !args.iter().any(|(name, _)| name.text == "start") {
            report.error(
                statement[i].position(),
                "range() requires a start parameter",
                ErrorType::Syntax,
            );
        }
        for (name, value) in &args {
            if (name.text == "start" || name.text == "stop")
                && matches!(value.as_slice(), [v] if v.is_string())
            {
                report.error(
                    value[0].position(),
                    format!(
                        "range() {} must be a duration, time or expression, not a string",
                        name.text
                    ),
                    ErrorType::Type,
                );
                report.hint("Use a duration like -1h or a time literal like 2021-01-01T00:00:00Z");
            }
        }
    }
    for i in calls_to(statement, "time") {
        for (name, value) in named_args(statement, i + 1) {
            if let [v] = value.as_slice()
                && name.text == "v"
                && v.is_string()
                && !is_rfc3339(v.unquoted())
            {
                report.error(
                    v.position(),
                    format!("time() expects an RFC3339 timestamp, got {}", v.text),
                    ErrorType::Type,
                );
            }
        }
    }
}

/// Bare date-time literals must be RFC3339 (or a plain date).
fn check_time_literals(statement: &[&Token], report: &mut Report) {
    for t in statement {
        if t.kind == TokenKind::Literal
            && looks_like_date(&t.text)
            && !is_rfc3339(&t.text)
            && !is_date(&t.text)
        {
            report.error(
                t.position(),
                format!("Invalid RFC3339 time literal '{}'", t.text),
                ErrorType::Syntax,
            );
        }
    }
}

fn semantic(tokens: &[&Token], report: &mut Report) {
    for statement in flux_statements(tokens) {
        let Some(&from) = calls_to(&statement, "from").first() else {
            continue;
        };
        let at = statement[from].position();
        let has = |name: &str| !calls_to(&statement, name).is_empty();
        if !has("range") {
            report.warning(
                at,
                "Query reads a bucket without range(); the whole retention period is scanned",
                ErrorType::Semantic,
            );
            report.hint("Add |> range(start: -1h) right after from()");
        } else if !has("filter") {
            report.warning(
                at,
                "Query has no filter(); every measurement in the range is read",
                ErrorType::Semantic,
            );
            report.hint("Filter on r._measurement and r._field to narrow the scan");
        }
        for i in calls_to(&statement, "aggregateWindow") {
            if !named_args(&statement, i + 1)
                .iter()
                .any(|(name, _)| name.text == "every")
            {
                report.warning(
                    statement[i].position(),
                    "aggregateWindow() without an every: parameter",
                    ErrorType::Semantic,
                );
                report.hint("Set every: to the window size, e.g. every: 1m");
            }
        }
        if !AGGREGATES.iter().any(|a| has(*a)) {
            report.info(
                at,
                "Query has no aggregation or limit(); large result sets may be returned",
                ErrorType::Semantic,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GOOD: &str = "from(bucket: \"telegraf\")\n  |> range(start: -1h)\n  |> filter(fn: (r) => r._measurement == \"cpu\" and r._field == \"usage_idle\")\n  |> aggregateWindow(every: 1m, fn: mean)";

    #[test]
    fn scenario_c_missing_source() {
        let result = validate("filter(fn: (r) => r._value > 0)");
        assert!(!result.valid);
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.error_type == ErrorType::Syntax && e.message.contains("from("))
        );
    }

    #[test]
    fn well_formed_pipeline_is_clean() {
        let result = validate(GOOD);
        assert!(result.valid, "{result:?}");
        assert!(result.warnings.is_empty(), "{result:?}");
    }

    #[test]
    fn statements_split_on_lines_but_not_pipes() {
        let tokens = super::super::tokenize("import \"strings\"\nx = 1\nfrom(bucket: \"b\")\n  |> range(start: -1h)\n");
        let sig = significant(&tokens);
        let kinds: Vec<Kind> = flux_statements(&sig).iter().map(|s| kind(s)).collect();
        assert_eq!(kinds, vec![Kind::Import, Kind::Assignment, Kind::Expression]);
    }

    #[rstest]
    #[case("from(host: \"h\") |> range(start: -1h)", ErrorType::Syntax, "bucket")]
    #[case("from(bucket: \"b\") |> range(stop: now())", ErrorType::Syntax, "start")]
    #[case("from(bucket: \"b\") |> range(start: \"2021-01-01\")", ErrorType::Type, "not a string")]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> 5", ErrorType::Syntax, "function call")]
    #[case("|> range(start: -1h)", ErrorType::Syntax, "no input")]
    #[case("from(bucket: \"b\") |> range(start: 2021-13-01T00:00:00Z)", ErrorType::Syntax, "RFC3339")]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> filter(fn: (r) => r.host =~ \"web\")", ErrorType::Syntax, "regex")]
    fn rejects(#[case] text: &str, #[case] error_type: ErrorType, #[case] needle: &str) {
        let result = validate(text);
        assert!(!result.valid);
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.error_type == error_type && e.message.contains(needle)),
            "{result:?}"
        );
    }

    #[test]
    fn declared_and_imported_functions_are_known() {
        let text = "import \"strings\"\n\
                    double = (tables=<-) => tables |> map(fn: (r) => ({r with _value: r._value * 2.0}))\n\
                    from(bucket: \"b\")\n  |> range(start: -1h)\n  |> filter(fn: (r) => strings.hasPrefix(v: r.host, prefix: \"web\"))\n  |> double()";
        let result = validate(text);
        assert!(result.valid, "{result:?}");
        assert!(!result.has(ErrorType::Reference), "{result:?}");
    }

    #[test]
    fn unknown_function_warns() {
        let result = validate("from(bucket: \"b\") |> range(start: -1h) |> frobnicate()");
        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.error_type == ErrorType::Reference));
    }

    #[rstest]
    #[case("from(bucket: \"b\") |> filter(fn: (r) => true) |> mean()", "range()")]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> mean()", "filter()")]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> filter(fn: (r) => true) |> aggregateWindow(fn: mean)", "every:")]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> filter(fn: (r) => true)", "no aggregation")]
    fn performance_warnings(#[case] text: &str, #[case] needle: &str) {
        let result = validate(text);
        assert!(result.valid, "{result:?}");
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.error_type == ErrorType::Semantic && w.message.contains(needle)),
            "{result:?}"
        );
    }

    #[rstest]
    #[case(GOOD, true)]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> to(bucket: \"copy\")", false)]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> wideTo(bucket: \"copy\")", false)]
    #[case("", false)]
    fn read_only(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_read_only(text), expected);
    }
}
