use futures::future::BoxFuture;

use crate::autocomplete::suggestion::{columns, keywords, tables, values};
use crate::sql::{TokenKind, statement_at, tokenize};
use crate::{CompletionContext, SchemaLookup, SmartSuggestion, debug, rank};

use super::lexicon::*;
use super::types::{Compressor, DataType, Encoding};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expect {
    Statement,
    Variant(Vec<String>),
    /// Next segment below a typed path (`root.sg1.|`).
    PathSegment(String),
    Device,
    StorageGroup,
    Expression,
    Comparison { time: bool },
    Align,
    Fill,
    DataType,
    Encoding,
    Compressor,
    /// `WITH` attributes of `CREATE TIMESERIES`.
    Attribute,
    GroupBy,
    OrderDirection,
    Number,
    /// After a complete `FROM path`.
    Clause,
    Anything,
}

const COMPARISONS: &[&str] = &["=", "==", "!=", "<>", "<", ">", "<=", ">="];
const EXPRESSION_KEYWORDS: &[&str] = &["AND", "OR", "NOT", "AS", "TIME", "FROM", "LIKE", "REGEXP"];
const ATTRIBUTES: &[&str] = &["DATATYPE", "ENCODING", "COMPRESSOR"];
const SNIPPETS: &[(&str, &str)] = &[
    ("now", "now()"),
    ("top_k", "top_k(${1:s1}, 'k'='${2:5}')"),
    ("bottom_k", "bottom_k(${1:s1}, 'k'='${2:5}')"),
    ("date_bin", "date_bin(${1:1h}, time)"),
    ("cast", "cast(${1:s1} AS ${2:INT64})"),
];

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
    debug!("IoTDB-SQL completion at {:?} expects {expect:?}", ctx.cursor);
    let database = ctx.database.as_deref();
    let mut out: Vec<SmartSuggestion> = Vec::new();
    match expect {
        Expect::Statement => out.extend(keywords(LEADING)),
        Expect::Variant(words) => out.extend(words.into_iter().map(SmartSuggestion::keyword)),
        Expect::PathSegment(parent) => {
            let mut known = schema.databases(EXAMPLE_DATABASES).await;
            let devices = schema.devices(database, EXAMPLE_DEVICES).await;
            let is_device = devices.iter().any(|d| d.eq_ignore_ascii_case(&parent));
            known.extend(devices);
            out.extend(children(&parent, &known));
            if is_device {
                out.extend(columns(schema.fields(&parent, EXAMPLE_SENSORS).await, "Sensor"));
            }
            out.push(SmartSuggestion::value("*").described("Every child of the path"));
            out.push(SmartSuggestion::value("**").described("Every path below, at any depth"));
        }
        Expect::Device => out.extend(tables(
            schema.devices(database, EXAMPLE_DEVICES).await,
            "Device",
        )),
        Expect::StorageGroup => out.extend(tables(
            schema.databases(EXAMPLE_DATABASES).await,
            "Storage group",
        )),
        Expect::Expression => {
            out.extend(keywords(EXPRESSION_KEYWORDS));
            out.extend(functions());
            if let Some(device) = device_in_scope(ctx) {
                out.extend(columns(schema.fields(&device, EXAMPLE_SENSORS).await, "Sensor"));
            }
        }
        Expect::Comparison { time } => {
            let literals: &[&str] = if time {
                &["now()", "now() - 1h", "now() - 1d", "2017-11-01T00:00:00"]
            } else {
                &["0", "true", "false", "null"]
            };
            out.extend(values(literals.iter().map(|s| s.to_string()), "Value"));
        }
        Expect::Align => out.extend(keywords(ALIGN_OPTIONS)),
        Expect::Fill => out.extend(values(
            FILL_OPTIONS.iter().map(|s| s.to_string()),
            "Fill option",
        )),
        Expect::DataType => out.extend(values(
            DataType::NAMES.iter().map(|s| s.to_string()),
            "Data type",
        )),
        Expect::Encoding => {
            let allowed: Vec<String> = match declared_data_type(ctx) {
                Some(data_type) => data_type.encodings().iter().map(Encoding::to_string).collect(),
                None => Encoding::NAMES.iter().map(|s| s.to_string()).collect(),
            };
            out.extend(values(allowed, "Encoding"));
        }
        Expect::Compressor => out.extend(values(
            Compressor::NAMES.iter().map(|s| s.to_string()),
            "Compressor",
        )),
        Expect::Attribute => out.extend(ATTRIBUTES.iter().map(|a| {
            SmartSuggestion::keyword(*a)
                .inserting(format!("{a}="))
                .described("Time series attribute")
        })),
        Expect::GroupBy => {
            out.push(
                SmartSuggestion::value("([start, end), interval)")
                    .inserting("([${1:2017-11-01T00:00:00}, ${2:2017-11-07T23:00:00}), ${3:1d})")
                    .described("Time window"),
            );
            out.push(
                SmartSuggestion::keyword("LEVEL")
                    .inserting("LEVEL = ${1:1}")
                    .described("Group by path level"),
            );
        }
        Expect::OrderDirection => out.extend(keywords(&["ASC", "DESC"])),
        Expect::Number => out.extend(values(
            ["10", "100", "1000"].map(String::from),
            "Row count",
        )),
        Expect::Clause => out.extend(keywords(CLAUSES).filter(|k| k.text != "INTO")),
        Expect::Anything => {
            out.extend(keywords(KEYWORDS));
            out.extend(functions());
            if let Some(device) = device_in_scope(ctx) {
                out.extend(columns(schema.fields(&device, EXAMPLE_SENSORS).await, "Sensor"));
            }
        }
    }
    rank(out, ctx.prefix())
}

fn classify(ctx: &CompletionContext) -> Expect {
    if let Some(parent) = ctx.qualifier()
        && is_rooted(parent)
    {
        return Expect::PathSegment(parent.to_string());
    }
    let Some(prev) = ctx.back(0) else {
        return Expect::Statement;
    };
    if prev.is_punct(";") {
        return Expect::Statement;
    }
    if let Some(words) = variant_continuation(ctx) {
        return Expect::Variant(words);
    }
    let value_of = |name: &[&str]| {
        prev.is_any_keyword(name)
            || (prev.is_operator("=") && ctx.back(1).is_some_and(|t| t.is_any_keyword(name)))
    };
    if value_of(&["DATATYPE"]) {
        return Expect::DataType;
    }
    if value_of(&["ENCODING"]) {
        return Expect::Encoding;
    }
    if value_of(&["COMPRESSOR", "COMPRESSION"]) {
        return Expect::Compressor;
    }
    if prev.kind == TokenKind::Operator && COMPARISONS.contains(&prev.text.as_str()) {
        return Expect::Comparison {
            time: ctx.back(1).is_some_and(|t| t.is_keyword("TIME")),
        };
    }
    if prev.is_punct("(") && ctx.back(1).is_some_and(|t| t.is_keyword("FILL")) {
        return Expect::Fill;
    }
    if prev.is_keyword("BY") && ctx.back(1).is_some_and(|t| t.is_keyword("ALIGN")) {
        return Expect::Align;
    }
    if prev.is_any_keyword(&["DATABASE", "STORAGE GROUP"]) {
        return Expect::StorageGroup;
    }
    if prev.is_any_keyword(&["FROM", "INTO", "TIMESERIES", "DEVICES", "PATHS", "NODES"])
        || (prev.is_punct(",") && in_clause(ctx, "FROM"))
    {
        return Expect::Device;
    }
    if ctx.statement_keyword().is_some_and(|t| t.is_keyword("CREATE"))
        && (prev.is_keyword("WITH") || prev.is_punct(","))
    {
        return Expect::Attribute;
    }
    if prev.is_keyword("GROUP BY") {
        return Expect::GroupBy;
    }
    if prev.is_any_keyword(&["LIMIT", "OFFSET", "SLIMIT", "SOFFSET"]) {
        return Expect::Number;
    }
    if prev.is_keyword("TIME") && in_clause(ctx, "ORDER BY") {
        return Expect::OrderDirection;
    }
    if prev.is_any_keyword(&["SELECT", "WHERE", "AND", "OR", "NOT", "ORDER BY", "HAVING"])
        || prev.is_punct("(")
        || prev.is_punct(",")
        || prev.kind == TokenKind::Operator
    {
        return Expect::Expression;
    }
    if prev.kind == TokenKind::Identifier && in_clause(ctx, "FROM") {
        return Expect::Clause;
    }
    Expect::Anything
}

fn is_rooted(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower == "root" || lower.starts_with("root.")
}

fn in_clause(ctx: &CompletionContext, clause: &str) -> bool {
    ctx.last_keyword_in(&["SELECT", "FROM", "WHERE", "GROUP BY", "ORDER BY", "LIMIT", "FILL"])
        .is_some_and(|t| t.is_keyword(clause))
}

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

/// Distinct next segments of the `known` paths that lie below `parent`.
fn children(parent: &str, known: &[String]) -> Vec<SmartSuggestion> {
    let below = format!("{}.", parent.to_ascii_lowercase());
    let mut out: Vec<SmartSuggestion> = Vec::new();
    for path in known {
        if !path.to_ascii_lowercase().starts_with(&below) {
            continue;
        }
        let Some(segment) = path[below.len()..].split('.').next() else {
            continue;
        };
        if out.iter().any(|s| s.text == segment) {
            continue;
        }
        out.push(
            SmartSuggestion::table(segment)
                .displayed(format!("{parent}.{segment}"))
                .described("Path"),
        );
    }
    out
}

fn functions() -> impl Iterator<Item = SmartSuggestion> {
    FUNCTIONS.iter().map(|name| {
        let snippet = SNIPPETS
            .iter()
            .find(|(n, _)| n == name)
            .map_or_else(|| format!("{name}(${{1}})"), |(_, s)| s.to_string());
        let described = if AGGREGATES.contains(name) {
            "Aggregate function"
        } else {
            "Function"
        };
        SmartSuggestion::function(*name)
            .inserting(snippet)
            .described(described)
    })
}

/// First concrete device after `FROM` in the caret's statement, looking at
/// the whole text so `SELECT | FROM root.sg1.d1` resolves too.
fn device_in_scope(ctx: &CompletionContext) -> Option<String> {
    let tokens = tokenize(&ctx.text, &LEXICON);
    let statement = statement_at(&tokens, ctx.offset);
    let from = statement.iter().position(|t| t.is_keyword("FROM"))?;
    statement
        .get(from + 1)
        .filter(|t| t.kind == TokenKind::Identifier && is_rooted(&t.text) && !t.text.contains('*'))
        .map(|t| t.text.clone())
        .filter(|path| *path != ctx.current_word)
}

/// `DATATYPE` already given earlier in a `CREATE TIMESERIES` statement.
fn declared_data_type(ctx: &CompletionContext) -> Option<DataType> {
    let at = ctx.preceding.iter().rposition(|t| t.is_keyword("DATATYPE"))?;
    ctx.preceding[at + 1..]
        .iter()
        .find(|t| t.kind.is_word())
        .and_then(|t| t.text.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cursor, SuggestionKind};

    fn ctx(text: &str) -> CompletionContext {
        CompletionContext::new(text, Cursor::end_of(text), &LEXICON)
    }

    async fn offline(text: &str) -> Vec<SmartSuggestion> {
        suggest(&ctx(text), SchemaLookup::offline()).await
    }

    fn texts(s: &[SmartSuggestion]) -> Vec<&str> {
        s.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn classification() {
        assert_eq!(classify(&ctx("")), Expect::Statement);
        assert_eq!(classify(&ctx("SELECT s1 FROM ")), Expect::Device);
        assert_eq!(classify(&ctx("SELECT s1 FROM root.sg1.")), Expect::PathSegment("root.sg1".into()));
        assert_eq!(classify(&ctx("SELECT s1 FROM root.sg1.d1 ")), Expect::Clause);
        assert_eq!(classify(&ctx("SELECT s1 FROM root.sg1.d1 ALIGN BY ")), Expect::Align);
        assert_eq!(classify(&ctx("SELECT s1 FROM root.sg1.d1 FILL(")), Expect::Fill);
        assert_eq!(classify(&ctx("SELECT s1 FROM root.sg1.d1 WHERE time > ")), Expect::Comparison { time: true });
        assert_eq!(classify(&ctx("CREATE DATABASE ")), Expect::StorageGroup);
        assert_eq!(classify(&ctx("CREATE TIMESERIES root.sg1.d1.s1 WITH ")), Expect::Attribute);
        assert_eq!(classify(&ctx("CREATE TIMESERIES root.sg1.d1.s1 WITH DATATYPE=")), Expect::DataType);
    }

    #[tokio::test]
    async fn path_segments_below_a_prefix() {
        let out = offline("SELECT s1 FROM root.sg1.").await;
        assert!(texts(&out).contains(&"d1"));
        assert!(texts(&out).contains(&"d2"));
        assert!(!texts(&out).contains(&"wf01"));
        let d1 = out.iter().find(|s| s.text == "d1").expect("d1");
        assert_eq!(d1.display_text, "root.sg1.d1");

        let out = offline("SELECT s1 FROM root.").await;
        assert!(texts(&out).contains(&"sg1"));
        assert!(texts(&out).contains(&"ln"));
    }

    #[tokio::test]
    async fn sensors_below_a_device() {
        let out = offline("SELECT * FROM root.sg1.d1.").await;
        assert!(out.iter().any(|s| s.text == "s1" && s.kind == SuggestionKind::Column));
        let out = offline("SELECT * FROM root.sg1.d1.te").await;
        assert_eq!(texts(&out), vec!["temperature"]);
    }

    #[tokio::test]
    async fn devices_after_from() {
        let out = offline("SELECT s1 FROM ro").await;
        assert!(!out.is_empty());
        assert!(out.iter().all(|s| s.kind == SuggestionKind::Table));
        assert!(texts(&out).contains(&"root.sg1.d1"));
    }

    #[tokio::test]
    async fn value_positions() {
        assert_eq!(texts(&offline("SELECT s1 FROM root.sg1.d1 ALIGN BY ").await), vec!["DEVICE", "TIME"]);
        assert_eq!(
            texts(&offline("SELECT s1 FROM root.sg1.d1 FILL(").await),
            vec!["0", "LINEAR", "PREVIOUS"]
        );
        let out = offline("CREATE TIMESERIES root.sg1.d1.s1 WITH DATATYPE=TEXT, ENCODING=").await;
        assert_eq!(texts(&out), vec!["DICTIONARY", "PLAIN"]);
        let out = offline("CREATE TIMESERIES root.sg1.d1.s1 WITH DATATYPE=IN").await;
        assert_eq!(texts(&out), vec!["INT32", "INT64"]);
    }

    #[tokio::test]
    async fn select_list_sees_the_device_after_the_caret() {
        let text = "SELECT  FROM root.sg1.d1";
        let ctx = CompletionContext::new(text, Cursor::new(1, 8), &LEXICON);
        let out = suggest(&ctx, SchemaLookup::offline()).await;
        assert!(texts(&out).contains(&"temperature"));
        let top_k = out.iter().find(|s| s.text == "top_k").expect("top_k");
        assert!(top_k.insert_text.starts_with("top_k(${1:s1}"));
    }

    #[tokio::test]
    async fn storage_group_heads() {
        let out = offline("SHOW ").await;
        assert!(texts(&out).contains(&"STORAGE GROUP"));
        assert!(texts(&out).contains(&"CHILD PATHS"));
        assert_eq!(texts(&offline("SHOW CHILD ").await), vec!["NODES", "PATHS"]);
    }
}
