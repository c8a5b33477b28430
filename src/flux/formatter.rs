//! Pipeline layout for Flux.
//!
//! Statements are separated at line breaks outside brackets. Every `|>` stage
//! goes on its own line one level in; a stage (or statement head) that is
//! still too long is broken into one argument per line, recursively. Flux is
//! case-sensitive, so keyword case is never touched.
use crate::format::or_original;
use crate::format::text::{postprocess, preprocess};
use crate::sql::{Token, TokenKind, matching_close, tokenize};
use crate::{Error, FormatOptions, Language, Result};

use super::lexicon::LEXICON;
use super::validator::continues;

#[derive(Debug, Default)]
struct Stage<'t> {
    leading: Vec<&'t str>,
    tokens: Vec<&'t Token>,
    trailing: Option<String>,
}

#[derive(Debug, Default)]
struct Statement<'t> {
    stages: Vec<Stage<'t>>,
}

impl Statement<'_> {
    fn is_pipeline(&self) -> bool {
        self.stages.len() > 1
    }
}

pub fn format(text: &str, options: &FormatOptions) -> String {
    or_original(text, Language::Flux, || layout(text, options))
}

fn layout(text: &str, options: &FormatOptions) -> Result<String> {
    let text = preprocess(text, &LEXICON, options);
    let tokens = tokenize(&text, &LEXICON);
    if let Some(open) = tokens.iter().find(|t| t.is_unterminated()) {
        return Err(Error::Format(format!(
            "unterminated {} at {}:{}",
            open.kind, open.line, open.column
        )));
    }
    let statements = split(&tokens, options);

    let mut out: Vec<String> = Vec::new();
    for (n, statement) in statements.iter().enumerate() {
        if n > 0 && statement.is_pipeline() {
            out.push(String::new());
        }
        for (i, stage) in statement.stages.iter().enumerate() {
            let level = usize::from(i > 0);
            for comment in &stage.leading {
                out.push(format!("{}{comment}", options.indent(level)));
            }
            if stage.tokens.is_empty() {
                continue;
            }
            let mut rendered = if i == 0 {
                render(&stage.tokens, 0, String::new(), options)
            } else {
                let lead = format!("{}|> ", options.indent(1));
                render(&stage.tokens[1..], 1, lead, options)
            };
            if let Some(comment) = &stage.trailing {
                rendered.push(' ');
                rendered.push_str(comment);
            }
            out.push(rendered);
        }
    }
    Ok(postprocess(&out.join("\n")))
}

/// Group tokens into statements of pipeline stages, attaching comments to
/// the stage they precede or trail.
fn split<'t>(tokens: &'t [Token], options: &FormatOptions) -> Vec<Statement<'t>> {
    let mut statements: Vec<Statement<'t>> = Vec::new();
    let mut pending: Vec<&'t str> = Vec::new();
    let mut last: Option<&'t Token> = None;
    let mut depth = 0usize;

    for t in tokens.iter().filter(|t| t.kind != TokenKind::Whitespace) {
        if t.kind == TokenKind::Comment {
            if !options.preserve_comments {
                continue;
            }
            let stage = statements.last_mut().and_then(|s| s.stages.last_mut());
            match (stage, last) {
                (Some(stage), Some(prev)) if prev.line == t.line => {
                    let comment = match stage.trailing.take() {
                        Some(before) => format!("{before} {}", t.text),
                        None => t.text.clone(),
                    };
                    stage.trailing = Some(comment);
                }
                _ => pending.push(&t.text),
            }
            continue;
        }

        let new_statement = depth == 0
            && last.is_none_or(|prev| t.line > prev.line && !continues(prev, t));
        if new_statement {
            statements.push(Statement::default());
        }
        let new_stage = new_statement || (depth == 0 && t.is_operator("|>"));
        if let Some(statement) = statements.last_mut() {
            if new_stage {
                statement.stages.push(Stage {
                    leading: std::mem::take(&mut pending),
                    ..Stage::default()
                });
            }
            if let Some(stage) = statement.stages.last_mut() {
                stage.tokens.push(t);
            }
        }

        if is_close(t) {
            depth = depth.saturating_sub(1);
        } else if is_open(t) {
            depth += 1;
        }
        last = Some(t);
    }
    if !pending.is_empty() {
        statements.push(Statement {
            stages: vec![Stage {
                leading: pending,
                ..Stage::default()
            }],
        });
    }
    statements
}

/// `lead` followed by `tokens` on one line when it fits, otherwise with the
/// outermost trailing call broken into one argument per line.
fn render(tokens: &[&Token], level: usize, lead: String, options: &FormatOptions) -> String {
    let line = format!("{lead}{}", inline(tokens));
    if !options.exceeds(line.chars().count()) {
        return line;
    }
    let Some(open) = trailing_call(tokens) else {
        return line;
    };
    let close = tokens.len() - 1;
    let args = arguments(&tokens[open + 1..close]);
    if args.is_empty() {
        return line;
    }
    let mut out = format!("{lead}{}", inline(&tokens[..=open]));
    let last = args.len() - 1;
    for (i, arg) in args.iter().enumerate() {
        out.push('\n');
        out.push_str(&render(arg, level + 1, options.indent(level + 1), options));
        if i < last {
            out.push(',');
        }
    }
    out.push('\n');
    out.push_str(&options.indent(level));
    out.push(')');
    out
}

/// Index of the `(` of a call that closes at the last token.
fn trailing_call(tokens: &[&Token]) -> Option<usize> {
    if !tokens.last()?.is_punct(")") {
        return None;
    }
    (1..tokens.len()).find(|&open| {
        tokens[open].is_punct("(")
            && tokens[open - 1].kind.is_word()
            && matching_close(tokens, open) == Some(tokens.len() - 1)
    })
}

/// Split an argument list on commas outside brackets.
fn arguments<'a, 't>(tokens: &'a [&'t Token]) -> Vec<&'a [&'t Token]> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, t) in tokens.iter().enumerate() {
        if is_open(t) {
            depth += 1;
        } else if is_close(t) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && t.is_punct(",") {
            out.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    out.push(&tokens[start..]);
    out.retain(|arg| !arg.is_empty());
    out
}

/// Tokens joined with Flux spacing.
fn inline(tokens: &[&Token]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        if is_close(t) {
            depth = depth.saturating_sub(1);
        }
        if i > 0 && spaced(tokens, i, depth) {
            out.push(' ');
        }
        out.push_str(&t.text);
        if is_open(t) {
            depth += 1;
        }
    }
    out
}

/// Whether a space separates `tokens[i - 1]` and `tokens[i]`.
fn spaced(tokens: &[&Token], i: usize, depth: usize) -> bool {
    let (prev, t) = (tokens[i - 1], tokens[i]);
    if [",", ")", "]", "}", ".", ":"].iter().any(|p| t.is_punct(p)) {
        return false;
    }
    if ["(", "[", "{", "."].iter().any(|p| prev.is_punct(p)) {
        return false;
    }
    if (t.is_punct("(") || t.is_punct("[")) && (prev.kind.is_word() || is_close(prev)) {
        return false;
    }
    // Parameter defaults: `(tables=<-, n=5)`.
    if depth > 0 && (t.is_operator("=") || prev.is_operator("=")) {
        return false;
    }
    if t.is_operator("<-") && prev.is_operator("=") {
        return false;
    }
    !is_unary(tokens, i - 1)
}

/// `-`/`+` in prefix position (`start: -1h`).
fn is_unary(tokens: &[&Token], i: usize) -> bool {
    let t = tokens[i];
    if !(t.is_operator("-") || t.is_operator("+")) {
        return false;
    }
    match i.checked_sub(1).map(|j| tokens[j]) {
        None => true,
        Some(before) => {
            before.kind == TokenKind::Operator
                || before.kind == TokenKind::Keyword
                || ["(", "[", "{", ",", ":"].iter().any(|p| before.is_punct(p))
        }
    }
}

fn is_open(t: &Token) -> bool {
    t.is_punct("(") || t.is_punct("[") || t.is_punct("{")
}

fn is_close(t: &Token) -> bool {
    t.is_punct(")") || t.is_punct("]") || t.is_punct("}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn one_stage_per_line() {
        let out = format(
            "from(bucket:\"telegraf\")|>range(start:-1h)|>filter(fn:(r)=>r._measurement==\"cpu\")",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "from(bucket: \"telegraf\")\n  |> range(start: -1h)\n  |> filter(fn: (r) => r._measurement == \"cpu\")"
        );
    }

    #[test]
    fn declarations_stay_single_line_and_pipelines_get_a_blank_line() {
        let text = "import \"strings\"\noption v = {bucket: \"b\"}\nn=5\nfrom(bucket: v.bucket) |> range(start: -1h)\nfrom(bucket: \"x\") |> range(start: -2h)";
        assert_eq!(
            format(text, &FormatOptions::default()),
            "import \"strings\"\noption v = {bucket: \"b\"}\nn = 5\n\n\
             from(bucket: v.bucket)\n  |> range(start: -1h)\n\n\
             from(bucket: \"x\")\n  |> range(start: -2h)"
        );
    }

    #[test]
    fn long_calls_break_one_argument_per_line() {
        let options = FormatOptions {
            max_line_length: 40,
            ..FormatOptions::default()
        };
        let out = format(
            "from(bucket: \"b\") |> aggregateWindow(every: 1m, fn: mean, createEmpty: false)",
            &options,
        );
        assert_eq!(
            out,
            "from(bucket: \"b\")\n  |> aggregateWindow(\n    every: 1m,\n    fn: mean,\n    createEmpty: false\n  )"
        );
    }

    #[test]
    fn function_definitions_and_records() {
        let out = format(
            "double = (tables=<-) => tables |> map(fn: (r) => ({r with _value: r._value * 2.0}))",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "double = (tables=<-) => tables\n  |> map(fn: (r) => ({r with _value: r._value * 2.0}))"
        );
    }

    #[test]
    fn keyword_case_is_left_alone() {
        let options = FormatOptions {
            keyword_case: crate::KeywordCase::Upper,
            ..FormatOptions::default()
        };
        let out = format("from(bucket: \"b\") |> filter(fn: (r) => r.a == 1 and not r.b == 2)", &options);
        assert!(out.contains(" and not "));
    }

    #[test]
    fn comments_are_kept() {
        let out = format(
            "// cpu usage\nfrom(bucket: \"b\") // source\n  |> range(start: -1h)",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "// cpu usage\nfrom(bucket: \"b\") // source\n  |> range(start: -1h)"
        );
    }

    #[test]
    fn broken_input_is_returned_unchanged() {
        let text = "from(bucket: \"b) |> range(start: -1h)";
        assert_eq!(format(text, &FormatOptions::default()), text);
    }

    #[rstest]
    #[case("from(bucket: \"b\") |> range(start: -1h) |> filter(fn: (r) => r._measurement == \"cpu\" and r._field == \"usage_idle\" and r.host =~ /web.*/) |> aggregateWindow(every: 5m, fn: mean, createEmpty: false) |> yield(name: \"mean\")")]
    #[case("import \"strings\"\n\n\n\nx = 1\ndata = from(bucket: \"b\")\n |> range(start: 2021-01-01T00:00:00Z, stop: now())\ndata |> yield()")]
    #[case("// only\n// comments")]
    #[case("option task = {name: \"t\", every: 1h}\nfrom(bucket: \"b\") |> range(start: -task.every) |> to(bucket: \"c\") // sink")]
    fn idempotent(#[case] text: &str) {
        let options = FormatOptions::default();
        let once = format(text, &options);
        assert_eq!(format(&once, &options), once);
    }
}
