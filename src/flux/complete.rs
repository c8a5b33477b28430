use futures::future::BoxFuture;

use crate::autocomplete::suggestion::{columns, values};
use crate::sql::{Token, TokenKind, significant, tokenize};
use crate::{CompletionContext, SchemaLookup, SmartSuggestion, SuggestionKind, debug, rank};

use super::lexicon::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expect {
    /// `r.` inside a predicate or map function.
    Member,
    /// Value of the named parameter of `call` (`bucket:`, `every:`).
    Parameter { name: String, call: Option<String> },
    /// Right-hand side of `r._measurement ==` / `r._field ==`.
    ColumnValue(String),
    /// Right after `|>`.
    PipeStage,
    Package,
    Statement,
    Anything,
}

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
    debug!("Flux completion at {:?} expects {expect:?}", ctx.cursor);
    let mut out: Vec<SmartSuggestion> = Vec::new();
    match expect {
        Expect::Member => {
            out.extend(
                RECORD_COLUMNS
                    .iter()
                    .map(|c| SmartSuggestion::column(*c).described("Record column")),
            );
            let tags = match filtered(ctx, "_measurement") {
                Some(m) => schema.tags(&m, EXAMPLE_TAGS).await,
                None => EXAMPLE_TAGS.iter().map(|t| t.to_string()).collect(),
            };
            out.extend(columns(tags, "Tag"));
        }
        Expect::Parameter { name, call } => match name.as_str() {
            "bucket" => {
                let buckets = schema.databases(EXAMPLE_BUCKETS).await;
                out.extend(quoted(buckets, "Bucket"));
            }
            "every" | "period" | "offset" => out.extend(values(
                EXAMPLE_DURATIONS.iter().map(|d| d.to_string()),
                "Duration",
            )),
            "start" | "stop" => {
                out.extend(values(EXAMPLE_STARTS.iter().map(|d| d.to_string()), "Relative time"));
                out.push(SmartSuggestion::function("now").described("Current time"));
            }
            "fn" => out.extend(predicates(call.as_deref())),
            "createEmpty" | "desc" => out.extend(values(
                ["true", "false"].map(String::from),
                "Boolean",
            )),
            _ => out.extend(functions()),
        },
        Expect::ColumnValue(column) => {
            let names = if column == "_measurement" {
                schema
                    .measurements(ctx.database.as_deref(), EXAMPLE_MEASUREMENTS)
                    .await
            } else {
                match filtered(ctx, "_measurement") {
                    Some(m) => schema.fields(&m, EXAMPLE_FIELDS).await,
                    None => EXAMPLE_FIELDS.iter().map(|f| f.to_string()).collect(),
                }
            };
            let what = if column == "_measurement" {
                "Measurement"
            } else {
                "Field"
            };
            out.extend(quoted(names, what));
        }
        Expect::PipeStage => out.extend(functions().filter(|f| !SOURCES.contains(&f.text.as_str()))),
        Expect::Package => out.extend(quoted(
            PACKAGES.iter().map(|p| p.to_string()).collect(),
            "Package",
        )),
        Expect::Statement => {
            out.extend(["import", "option"].map(|k| SmartSuggestion::keyword(k)));
            out.extend(functions());
            out.extend(variables(ctx));
        }
        Expect::Anything => {
            out.extend(SOURCE_KEYWORDS.iter().map(|k| SmartSuggestion::keyword(*k)));
            out.extend(functions());
            out.extend(variables(ctx));
        }
    }
    rank(out, ctx.prefix())
}

fn classify(ctx: &CompletionContext) -> Expect {
    if ctx.qualifier().is_some_and(|q| q == "r") {
        return Expect::Member;
    }
    let Some(prev) = ctx.back(0) else {
        return Expect::Statement;
    };
    if prev.is_operator("|>") {
        return Expect::PipeStage;
    }
    if prev.is_keyword("IMPORT") {
        return Expect::Package;
    }
    if prev.is_punct(":")
        && let Some(name) = ctx.back(1).filter(|t| t.kind.is_word())
    {
        return Expect::Parameter {
            name: name.text.clone(),
            call: enclosing_call(&ctx.preceding),
        };
    }
    if prev.is_operator("==") || prev.is_operator("!=") {
        if let (Some(column), Some(dot), Some(record)) = (ctx.back(1), ctx.back(2), ctx.back(3))
            && dot.is_punct(".")
            && record.is_word("r")
            && (column.text == "_measurement" || column.text == "_field")
        {
            return Expect::ColumnValue(column.text.clone());
        }
    }
    let same_line = prev.line == ctx.cursor.line;
    if !same_line && depth(&ctx.preceding) == 0 {
        return Expect::Statement;
    }
    Expect::Anything
}

/// Name of the innermost call whose argument list holds the caret.
fn enclosing_call(preceding: &[Token]) -> Option<String> {
    let mut depth = 0usize;
    for (i, t) in preceding.iter().enumerate().rev() {
        if t.is_punct(")") {
            depth += 1;
        } else if t.is_punct("(") {
            if depth == 0 {
                return i
                    .checked_sub(1)
                    .map(|j| &preceding[j])
                    .filter(|name| name.kind.is_word())
                    .map(|name| name.text.clone());
            }
            depth -= 1;
        }
    }
    None
}

fn depth(preceding: &[Token]) -> usize {
    preceding.iter().fold(0usize, |depth, t| {
        if t.is_punct("(") || t.is_punct("[") || t.is_punct("{") {
            depth + 1
        } else if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") {
            depth.saturating_sub(1)
        } else {
            depth
        }
    })
}

/// Value compared with `r.<column> ==` anywhere in the query.
fn filtered(ctx: &CompletionContext, column: &str) -> Option<String> {
    let tokens = tokenize(&ctx.text, &LEXICON);
    let sig = significant(&tokens);
    sig.windows(5).find_map(|w| {
        (w[0].is_word("r")
            && w[1].is_punct(".")
            && w[2].text == column
            && w[3].is_operator("==")
            && w[4].is_string())
        .then(|| w[4].unquoted().to_string())
    })
}

fn functions() -> impl Iterator<Item = SmartSuggestion> {
    FUNCTIONS.iter().map(|name| {
        let snippet = SNIPPETS
            .iter()
            .find(|(n, _)| n == name)
            .map_or_else(|| format!("{name}(${{1}})"), |(_, s)| s.to_string());
        let described = if SOURCES.contains(name) {
            "Data source"
        } else if AGGREGATES.contains(name) {
            "Aggregate or selector"
        } else {
            "Function"
        };
        SmartSuggestion::function(*name)
            .inserting(snippet)
            .described(described)
    })
}

/// Names assigned earlier in the script.
fn variables(ctx: &CompletionContext) -> Vec<SmartSuggestion> {
    ctx.preceding
        .windows(2)
        .filter(|w| w[0].kind == TokenKind::Identifier && w[1].is_operator("="))
        .map(|w| SmartSuggestion::new(SuggestionKind::Column, w[0].text.clone()).described("Variable"))
        .collect()
}

fn quoted(names: Vec<String>, what: &'static str) -> impl Iterator<Item = SmartSuggestion> {
    names.into_iter().map(move |n| {
        let insert = format!("\"{n}\"");
        SmartSuggestion::value(n).inserting(insert).described(what)
    })
}

fn predicates(call: Option<&str>) -> Vec<SmartSuggestion> {
    let lambda = |text: &str, insert: &str, what: &str| {
        SmartSuggestion::value(text).inserting(insert).described(what)
    };
    match call {
        Some("filter") => vec![
            lambda("(r) => r._measurement == ", "(r) => r._measurement == \"${1}\"", "Measurement predicate"),
            lambda("(r) => r._field == ", "(r) => r._field == \"${1}\"", "Field predicate"),
        ],
        Some("map") => vec![lambda("(r) => ({r with })", "(r) => ({r with ${1}})", "Record mapping")],
        Some("aggregateWindow") => ["mean", "sum", "count", "max", "min", "last", "median"]
            .iter()
            .map(|f| SmartSuggestion::value(*f).described("Aggregate"))
            .collect(),
        _ => vec![lambda("(r) => ", "(r) => ${1}", "Function")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cursor;

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
        assert_eq!(classify(&ctx("from(bucket: \"b\") |> ")), Expect::PipeStage);
        assert_eq!(classify(&ctx("import ")), Expect::Package);
        assert_eq!(
            classify(&ctx("from(bucket: \"b\") |> aggregateWindow(every: ")),
            Expect::Parameter { name: "every".into(), call: Some("aggregateWindow".into()) }
        );
        assert_eq!(
            classify(&ctx("from(bucket: \"b\") |> filter(fn: (r) => r._measurement == ")),
            Expect::ColumnValue("_measurement".into())
        );
        assert_eq!(classify(&ctx("from(bucket: \"b\") |> filter(fn: (r) => r._f")), Expect::Member);
    }

    #[tokio::test]
    async fn members_after_r_dot() {
        let out = offline("from(bucket: \"b\") |> filter(fn: (r) => r._m").await;
        assert_eq!(texts(&out), vec!["_measurement"]);
        let out = offline("from(bucket: \"b\") |> filter(fn: (r) => r.").await;
        assert!(texts(&out).contains(&"_value"));
        assert!(texts(&out).contains(&"host"));
    }

    #[tokio::test]
    async fn parameter_values() {
        let out = offline("from(bucket: ").await;
        let telegraf = out.iter().find(|s| s.text == "telegraf").expect("bucket");
        assert_eq!(telegraf.insert_text, "\"telegraf\"");

        let out = offline("from(bucket: \"b\") |> range(start: ").await;
        assert!(texts(&out).contains(&"-1h"));

        let out = offline("from(bucket: \"b\") |> filter(fn: ").await;
        assert!(out.iter().any(|s| s.insert_text.contains("r._measurement == \"${1}\"")));
    }

    #[tokio::test]
    async fn pipe_stage_offers_snippets_but_no_sources() {
        let out = offline("from(bucket: \"b\") |> ").await;
        assert!(!texts(&out).contains(&"from"));
        let agg = out.iter().find(|s| s.text == "aggregateWindow").expect("aggregateWindow");
        assert!(agg.insert_text.starts_with("aggregateWindow(every: ${1:1m}"));
    }

    #[tokio::test]
    async fn new_line_is_a_new_statement() {
        let out = offline("x = 1\n").await;
        assert!(texts(&out).contains(&"import"));
        assert!(texts(&out).contains(&"x"));
    }

    #[tokio::test]
    async fn nothing_inside_strings_or_comments() {
        assert!(offline("from(bucket: \"tel").await.is_empty());
        assert!(offline("// from(").await.is_empty());
    }
}
