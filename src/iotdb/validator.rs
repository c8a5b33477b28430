use crate::sql::{Token, TokenKind, matching_close};
use crate::validation::grammar::{
    CONTROL_FLOW, check_leading, check_regex_operands, check_unknown_functions, has_call_to,
    head_words, is_date, is_naive_date_time, is_rfc3339, looks_like_date, pipeline,
    starts_with_words, top_level, with_depth,
};
use crate::{ErrorType, Language, Report, StructuralRules, ValidationResult};

use super::lexicon::*;
use super::types::{Compressor, DataType, Encoding};

pub fn validate(text: &str) -> ValidationResult {
    let rules = StructuralRules {
        half_open_intervals: true,
    };
    pipeline(text, &LEXICON, rules, grammar, semantic)
}

/// `SELECT` without `INTO`, `SHOW`, `COUNT`, `LIST` and `EXPLAIN` only read.
pub fn is_read_only(text: &str) -> bool {
    let tokens = super::tokenize(text);
    let statements = crate::sql::statements(&tokens);
    !statements.is_empty()
        && statements.iter().all(|s| match s.first() {
            Some(t) if t.is_keyword("SELECT") => top_level(s, "INTO").is_none(),
            Some(t) => t.is_any_keyword(&["SHOW", "COUNT", "LIST", "EXPLAIN"]),
            None => true,
        })
}

fn grammar(statement: &[&Token], report: &mut Report) {
    if !check_leading(statement, LEADING, Language::IoTDBSQL, report) {
        return;
    }
    check_regex_operands(statement, report);
    check_time_literals(statement, report);
    match statement[0].normalized.as_str() {
        "SELECT" => select(statement, report),
        "INSERT" => insert(statement, report),
        "CREATE" => create(statement, report),
        "DROP" => target(statement, "DROP", DROP_TARGETS, report),
        "DELETE" => delete(statement, report),
        "SHOW" => show(statement, report),
        "EXPLAIN" => match statement.get(1) {
            Some(t) if t.is_keyword("SELECT") => select(&statement[1..], report),
            _ => report.error(
                statement[0].position(),
                "EXPLAIN must be followed by a SELECT statement",
                ErrorType::Syntax,
            ),
        },
        _ => {}
    }
}

fn is_rooted(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower == "root" || lower.starts_with("root.")
}

/// Paths must be absolute, starting at `root`.
fn check_path(token: Option<&Token>, after: &Token, report: &mut Report) -> bool {
    match token {
        Some(t) if t.kind == TokenKind::Identifier && is_rooted(&t.text) => true,
        Some(t) => {
            report.error(
                t.position(),
                format!("Path '{}' must start with root, e.g. root.sg1.d1", t.text),
                ErrorType::Syntax,
            );
            false
        }
        None => {
            report.error(
                after.position(),
                format!("{} must be followed by a path, e.g. root.sg1.d1", after.text),
                ErrorType::Syntax,
            );
            false
        }
    }
}

fn select(statement: &[&Token], report: &mut Report) {
    let Some(select) = statement.first() else {
        return;
    };
    let Some(from) = statement.iter().position(|t| t.is_keyword("FROM")) else {
        report.error(
            select.position(),
            "SELECT statement requires a FROM clause",
            ErrorType::Syntax,
        );
        return;
    };
    if from == 1 {
        report.error(
            statement[from].position(),
            "SELECT requires at least one sensor or expression before FROM",
            ErrorType::Syntax,
        );
    }
    let paths = from_paths(&statement[from + 1..]);
    if paths.is_empty() {
        check_path(None, statement[from], report);
    }
    for path in paths {
        check_path(Some(path), statement[from], report);
    }

    let align_by_device = top_level(statement, "ALIGN BY DEVICE");
    let group = statement.iter().position(|t| t.is_keyword("GROUP BY"));
    if let (Some(align), Some(group)) = (align_by_device, group) {
        let by_time = statement
            .get(group + 1)
            .is_some_and(|t| t.is_keyword("TIME") || t.is_punct("("));
        if by_time {
            report.error(
                align.position(),
                "ALIGN BY DEVICE cannot be combined with GROUP BY TIME",
                ErrorType::Semantic,
            );
            report.hint("Remove ALIGN BY DEVICE or query one device per GROUP BY TIME statement");
        }
    }
    if let (Some(align), Some(_)) = (align_by_device, top_level(statement, "FILL")) {
        report.error(
            align.position(),
            "ALIGN BY DEVICE cannot be combined with FILL",
            ErrorType::Semantic,
        );
    }
    if let Some(group) = group
        && !has_call_to(statement, AGGREGATES)
    {
        report.error(
            statement[group].position(),
            "GROUP BY requires an aggregate function such as avg() or count()",
            ErrorType::Semantic,
        );
        report.hint("Wrap the selected sensors in an aggregate, e.g. avg(s1)");
    }
    check_unknown_functions(statement, &LEXICON, CONTROL_FLOW, report);
}

/// The first token of every comma-separated path in a `FROM` list, which
/// runs up to the next clause keyword.
fn from_paths<'t>(rest: &[&'t Token]) -> Vec<&'t Token> {
    let list: Vec<&Token> = rest
        .iter()
        .copied()
        .take_while(|t| !t.is_any_keyword(CLAUSES))
        .collect();
    list.split(|t| t.is_punct(","))
        .filter_map(|path| path.first().copied())
        .collect()
}

fn insert(statement: &[&Token], report: &mut Report) {
    let insert = statement[0];
    let Some(into) = statement.get(1).filter(|t| t.is_keyword("INTO")) else {
        report.error(
            insert.position(),
            "INSERT must be followed by INTO <path>",
            ErrorType::Syntax,
        );
        return;
    };
    if !check_path(statement.get(2).copied(), into, report) {
        return;
    }
    let Some(columns) = statement
        .get(3)
        .filter(|t| t.is_punct("("))
        .and_then(|_| list_len(statement, 3))
    else {
        report.error(
            statement[2].position(),
            "INSERT requires a column list, e.g. (timestamp, s1)",
            ErrorType::Syntax,
        );
        return;
    };
    let Some(values) = statement.iter().position(|t| t.is_keyword("VALUES")) else {
        report.error(
            insert.position(),
            "INSERT requires a VALUES clause",
            ErrorType::Syntax,
        );
        return;
    };
    let rows: Vec<usize> = with_depth(&statement[values + 1..])
        .into_iter()
        .enumerate()
        .filter(|(_, (depth, t))| *depth == 0 && t.is_punct("("))
        .map(|(i, _)| values + 1 + i)
        .collect();
    if rows.is_empty() {
        report.error(
            statement[values].position(),
            "VALUES must be followed by at least one (...) row",
            ErrorType::Syntax,
        );
    }
    for open in rows {
        let Some(count) = list_len(statement, open) else {
            continue;
        };
        if count != columns {
            report.error(
                statement[open].position(),
                format!("INSERT lists {columns} column(s) but the row has {count} value(s)"),
                ErrorType::Syntax,
            );
        }
    }
}

/// Number of comma-separated items inside the bracket at `open`.
fn list_len(statement: &[&Token], open: usize) -> Option<usize> {
    let close = matching_close(statement, open)?;
    let inner = &statement[open + 1..close];
    if inner.is_empty() {
        return Some(0);
    }
    let commas = with_depth(inner)
        .into_iter()
        .filter(|(depth, t)| *depth == 0 && t.is_punct(","))
        .count();
    Some(commas + 1)
}

fn create(statement: &[&Token], report: &mut Report) {
    target(statement, "CREATE", CREATE_TARGETS, report);
    let words = head_words(statement);
    let Some(kind) = statement.get(1) else {
        return;
    };
    if starts_with_words(&words, &["TIMESERIES"]) {
        if check_path(statement.get(2).copied(), kind, report) {
            timeseries_attributes(statement, report);
        }
    } else if starts_with_words(&words, &["ALIGNED", "TIMESERIES"]) {
        if let Some(keyword) = statement.get(2) {
            check_path(statement.get(3).copied(), keyword, report);
        }
    } else if starts_with_words(&words, &["DATABASE"]) || starts_with_words(&words, &["STORAGE GROUP"]) {
        check_path(statement.get(2).copied(), kind, report);
    }
}

/// Value of `NAME=value` (or `NAME value`) after the keyword `name`.
fn attribute<'t>(statement: &[&'t Token], names: &[&str]) -> Option<(&'t Token, Option<&'t Token>)> {
    let at = statement.iter().position(|t| t.is_any_keyword(names))?;
    let mut value = statement.get(at + 1).copied();
    if value.is_some_and(|t| t.is_operator("=")) {
        value = statement.get(at + 2).copied();
    }
    Some((statement[at], value.filter(|t| t.kind != TokenKind::Punctuation)))
}

fn timeseries_attributes(statement: &[&Token], report: &mut Report) {
    let data_type = match attribute(statement, &["DATATYPE"]) {
        Some((_, Some(value))) => parse_value::<DataType>(value, report),
        Some((keyword, None)) => {
            report.error(
                keyword.position(),
                format!("DATATYPE must be followed by one of {}", DataType::NAMES.join(", ")),
                ErrorType::Syntax,
            );
            return;
        }
        // Short form: `CREATE TIMESERIES root.sg.d.s INT32 ENCODING=RLE`.
        None => match statement.get(3).filter(|t| t.kind.is_word()) {
            Some(value) if !value.is_keyword("WITH") => parse_value::<DataType>(value, report),
            _ => {
                report.error(
                    statement[2].position(),
                    "CREATE TIMESERIES requires a data type, e.g. WITH DATATYPE=INT32",
                    ErrorType::Syntax,
                );
                report.hint("Add WITH DATATYPE=<type> after the path");
                return;
            }
        },
    };
    let encoding = match attribute(statement, &["ENCODING"]) {
        Some((_, Some(value))) => parse_value::<Encoding>(value, report).map(|e| (value, e)),
        _ => None,
    };
    if let Some((_, Some(value))) = attribute(statement, &["COMPRESSOR", "COMPRESSION"]) {
        parse_value::<Compressor>(value, report);
    }
    if let (Some(data_type), Some((token, encoding))) = (data_type, encoding)
        && !data_type.supports(encoding)
    {
        let allowed: Vec<String> = data_type.encodings().iter().map(|e| e.to_string()).collect();
        report.error(
            token.position(),
            format!("Encoding {encoding} is not supported for {data_type}"),
            ErrorType::Type,
        );
        report.hint(format!("{data_type} supports {}", allowed.join(", ")));
    }
}

fn parse_value<T>(token: &Token, report: &mut Report) -> Option<T>
where
    T: std::str::FromStr<Err = crate::Error>,
{
    match token.text.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            report.error(token.position(), err.to_string(), ErrorType::Type);
            None
        }
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
    let Some(next) = statement.get(1) else {
        report.error(
            statement[0].position(),
            "DELETE must be followed by FROM, TIMESERIES or DATABASE",
            ErrorType::Syntax,
        );
        return;
    };
    if next.is_any_keyword(&["FROM", "TIMESERIES", "DATABASE", "STORAGE GROUP"]) {
        check_path(statement.get(2).copied(), next, report);
    } else {
        report.error(
            next.position(),
            "DELETE must be followed by FROM, TIMESERIES or DATABASE",
            ErrorType::Syntax,
        );
    }
}

fn show(statement: &[&Token], report: &mut Report) {
    let words = head_words(statement);
    if !SHOW_VARIANTS.iter().any(|v| starts_with_words(&words, v)) {
        let at = statement.get(1).unwrap_or(&statement[0]);
        report.error(
            at.position(),
            format!(
                "Unknown SHOW statement 'SHOW {}'",
                words.first().copied().unwrap_or_default()
            ),
            ErrorType::Syntax,
        );
    }
}

/// Bare timestamps (`2017-11-01T00:00:00`) must parse as ISO-8601.
fn check_time_literals(statement: &[&Token], report: &mut Report) {
    for literal in statement
        .iter()
        .filter(|t| t.kind == TokenKind::Literal && !t.is_string() && looks_like_date(&t.text))
    {
        let valid = is_rfc3339(&literal.text)
            || is_date(&literal.text)
            || is_naive_date_time(&literal.text, &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]);
        if !valid {
            report.error(
                literal.position(),
                format!(
                    "Invalid time literal {}: expected ISO-8601, e.g. 2017-11-01T00:00:00",
                    literal.text
                ),
                ErrorType::Syntax,
            );
        }
    }
}

fn semantic(statement: &[&Token], report: &mut Report) {
    if let Some(wildcard) = statement
        .iter()
        .find(|t| t.kind == TokenKind::Identifier && t.text.contains("**"))
    {
        report.warning(
            wildcard.position(),
            format!("Path '{}' matches every time series below it", wildcard.text),
            ErrorType::Semantic,
        );
        report.hint("Narrow the path, e.g. root.sg1.d1.*");
    }
    match statement.first() {
        Some(t) if t.is_keyword("SELECT") => select_heuristics(statement, report),
        Some(t) if t.is_keyword("DELETE") && top_level(statement, "WHERE").is_none() => {
            report.warning(
                t.position(),
                "DELETE without WHERE removes every point of the path",
                ErrorType::Semantic,
            );
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
            "SELECT * returns every sensor of the device; list the sensors you need",
            ErrorType::Semantic,
        );
        report.hint("Select specific sensors instead of *");
    }

    match top_level(statement, "WHERE") {
        None => {
            report.warning(
                select.position(),
                "No WHERE clause: the query scans every point; add a time filter",
                ErrorType::Semantic,
            );
            report.hint("Add a time filter, e.g. WHERE time > now() - 1h");
        }
        Some(clause) if !statement.iter().any(|t| t.is_keyword("TIME")) => {
            report.warning(
                clause.position(),
                "WHERE clause has no time filter",
                ErrorType::Semantic,
            );
            report.hint("Add a time filter, e.g. WHERE time > now() - 1h");
        }
        Some(_) => {}
    }

    if top_level(statement, "LIMIT").is_none() && top_level(statement, "SLIMIT").is_none() {
        report.warning(
            select.position(),
            "No LIMIT clause; large result sets are slow to transfer and render",
            ErrorType::Semantic,
        );
        report.hint("Add LIMIT to cap the number of returned rows");
    }
}
