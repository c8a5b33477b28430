use futures::future::BoxFuture;

use crate::autocomplete::suggestion::{columns, keywords, tables, values};
use crate::sql::{TokenKind, statement_at, tokenize};
use crate::{CompletionContext, SchemaLookup, SmartSuggestion, debug, rank};

use super::lexicon::*;

/// What the caret position calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expect {
    /// Start of a statement.
    Statement,
    /// Next word(s) of a multi-word statement head (`SHOW TAG |`).
    Variant(Vec<String>),
    Measurement,
    Database,
    /// Select list, `WHERE` operands, function arguments.
    Expression,
    /// Right-hand side of a comparison against `lhs`.
    Comparison { lhs: Option<String>, regex: bool },
    GroupBy,
    Fill,
    OrderDirection,
    Number,
    /// After a complete `FROM measurement`.
    Clause,
    Anything,
}

const COMPARISONS: &[&str] = &["=", "!=", "<>", "<", ">", "<=", ">=", "=~", "!~"];
const CLAUSES: &[&str] = &[
    "WHERE", "GROUP BY", "ORDER BY", "LIMIT", "OFFSET", "SLIMIT", "SOFFSET", "FILL", "TZ", "INTO",
];
const EXPRESSION_KEYWORDS: &[&str] = &["AND", "OR", "NOT", "AS", "DISTINCT", "TRUE", "FALSE", "FROM"];

pub fn suggest_boxed<'a>(
    ctx: &'a CompletionContext,
    schema: SchemaLookup<'a>,
) -> BoxFuture<'a, Vec<SmartSuggestion>> {
    Box::pin(suggest(ctx, schema))
}

pub async fn suggest(ctx: &CompletionContext, schema: SchemaLookup<'_>) -> Vec<SmartSuggestion> {
    if ctx.suppressed() {
        return Vec::new();
    }
    let expect = classify(ctx);
    debug!("InfluxQL completion at {:?} expects {expect:?}", ctx.cursor);
    let database = ctx.database.as_deref();
    let mut out: Vec<SmartSuggestion> = Vec::new();
    match expect {
        Expect::Statement => out.extend(keywords(LEADING)),
        Expect::Variant(words) => out.extend(words.into_iter().map(SmartSuggestion::keyword)),
        Expect::Measurement => out.extend(tables(
            schema.measurements(database, EXAMPLE_MEASUREMENTS).await,
            "Measurement",
        )),
        Expect::Database => out.extend(tables(
            schema.databases(EXAMPLE_DATABASES).await,
            "Database",
        )),
        Expect::Expression => {
            out.extend(keywords(EXPRESSION_KEYWORDS));
            out.extend(functions());
            out.extend(schema_columns(ctx, schema).await);
        }
        Expect::Comparison { lhs, regex } => {
            out.extend(functions().filter(|f| f.text == "now"));
            let time = lhs.as_deref().is_some_and(|l| l.eq_ignore_ascii_case("time"));
            let literals: &[&str] = if regex {
                &["/^value$/", "/.*/"]
            } else if time {
                &["now() - 1h", "now() - 24h", "now() - 7d", "'2021-01-01T00:00:00Z'"]
            } else {
                &["true", "false"]
            };
            out.extend(values(literals.iter().map(|s| s.to_string()), "Value"));
        }
        Expect::GroupBy => {
            out.push(
                SmartSuggestion::function("time")
                    .inserting("time(${1:1m})")
                    .described("Group by time interval"),
            );
            if let Some(m) = measurement_in_scope(ctx) {
                out.extend(columns(schema.tags(&m, EXAMPLE_TAGS).await, "Tag"));
            }
        }
        Expect::Fill => out.extend(values(
            FILL_OPTIONS.iter().map(|s| s.to_string()),
            "Fill option",
        )),
        Expect::OrderDirection => out.extend(keywords(&["ASC", "DESC"])),
        Expect::Number => out.extend(values(
            ["10", "100", "1000"].map(String::from),
            "Row count",
        )),
        Expect::Clause => out.extend(keywords(CLAUSES)),
        Expect::Anything => {
            out.extend(keywords(KEYWORDS));
            out.extend(functions());
            out.extend(schema_columns(ctx, schema).await);
        }
    }
    rank(out, ctx.prefix())
}

fn functions() -> impl Iterator<Item = SmartSuggestion> {
    FUNCTIONS.iter().map(|name| {
        let described = if AGGREGATES.contains(name) {
            "Aggregate function"
        } else {
            "Function"
        };
        let snippet = match *name {
            "now" => "now()".to_string(),
            _ => format!("{name}(${{1}})"),
        };
        SmartSuggestion::function(*name)
            .inserting(snippet)
            .described(described)
    })
}

/// Fields and tags of the measurement named in the caret's statement, plus
/// `time`.
async fn schema_columns(ctx: &CompletionContext, schema: SchemaLookup<'_>) -> Vec<SmartSuggestion> {
    let mut out = vec![SmartSuggestion::column("time").described("Timestamp")];
    if let Some(m) = measurement_in_scope(ctx) {
        out.extend(columns(schema.fields(&m, EXAMPLE_FIELDS).await, "Field"));
        out.extend(columns(schema.tags(&m, EXAMPLE_TAGS).await, "Tag"));
    }
    out
}

fn classify(ctx: &CompletionContext) -> Expect {
    let Some(prev) = ctx.back(0) else {
        return Expect::Statement;
    };
    if prev.is_punct(";") {
        return Expect::Statement;
    }
    if let Some(words) = variant_continuation(ctx) {
        return Expect::Variant(words);
    }
    if prev.kind == TokenKind::Operator && COMPARISONS.contains(&prev.text.as_str()) {
        return Expect::Comparison {
            lhs: ctx.back(1).map(|t| t.unquoted().to_string()),
            regex: prev.text.ends_with('~'),
        };
    }
    if prev.is_punct("(") && ctx.back(1).is_some_and(|t| t.is_keyword("FILL")) {
        return Expect::Fill;
    }
    if prev.is_any_keyword(&["FROM", "INTO", "MEASUREMENT"]) {
        return Expect::Measurement;
    }
    if prev.is_any_keyword(&["ON", "DATABASE"]) {
        return Expect::Database;
    }
    if prev.is_keyword("GROUP BY") || (prev.is_punct(",") && in_clause(ctx, "GROUP BY")) {
        return Expect::GroupBy;
    }
    if prev.is_any_keyword(&["LIMIT", "OFFSET", "SLIMIT", "SOFFSET"]) {
        return Expect::Number;
    }
    if prev.is_keyword("ORDER BY") {
        return Expect::Expression;
    }
    if prev.is_word("time") && in_clause(ctx, "ORDER BY") {
        return Expect::OrderDirection;
    }
    if prev.is_any_keyword(&["SELECT", "WHERE", "AND", "OR", "NOT", "DISTINCT"])
        || prev.is_punct("(")
        || prev.is_punct(",")
        || prev.kind == TokenKind::Operator
    {
        return Expect::Expression;
    }
    if matches!(prev.kind, TokenKind::Identifier)
        && ctx.back(1).is_some_and(|t| t.is_keyword("FROM"))
    {
        return Expect::Clause;
    }
    Expect::Anything
}

/// Whether the closest clause keyword before the caret is `clause`.
fn in_clause(ctx: &CompletionContext, clause: &str) -> bool {
    ctx.last_keyword_in(&["SELECT", "FROM", "WHERE", "GROUP BY", "ORDER BY", "LIMIT", "FILL"])
        .is_some_and(|t| t.is_keyword(clause))
}

/// Continuations of `SHOW`/`CREATE`/`DROP` heads.
fn variant_continuation(ctx: &CompletionContext) -> Option<Vec<String>> {
    let table: &[&[&str]] = match ctx.statement_keyword()?.normalized.as_str() {
        "SHOW" => SHOW_VARIANTS,
        "CREATE" => CREATE_TARGETS,
        "DROP" => DROP_TARGETS,
        _ => return None,
    };
    let words = ctx.continuations(table);
    (!words.is_empty()).then_some(words)
}

/// Measurement of the first top-level `FROM` in the caret's statement,
/// looking at the whole text so `SELECT | FROM cpu` resolves too.
fn measurement_in_scope(ctx: &CompletionContext) -> Option<String> {
    let tokens = tokenize(&ctx.text, &LEXICON);
    let statement = statement_at(&tokens, ctx.offset);
    let from = statement.iter().position(|t| t.is_keyword("FROM"))?;
    let mut name = None;
    for t in &statement[from + 1..] {
        match t.kind {
            TokenKind::Identifier => name = Some(t.unquoted().to_string()),
            TokenKind::Punctuation if t.text == "." => continue,
            _ => break,
        }
    }
    name.filter(|n| *n != ctx.current_word)
}
