use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tsq::prelude::*;
use tsq::{Error, Result};

#[derive(Parser)]
#[command(name = "tsq")]
#[command(about = "Validate, format and complete time-series queries", long_about = None)]
struct Cli {
    /// Database type the query targets (influxdb1, influxdb2, influxdb3, iotdb)
    #[arg(short, long, global = true, default_value = "influxdb1")]
    database_type: DatabaseType,

    /// Query language; defaults to the database type's primary language
    #[arg(short, long, global = true)]
    language: Option<Language>,

    /// Query text; read from stdin when omitted
    #[arg(short, long, global = true)]
    query: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report syntax, semantic, reference and type diagnostics
    Validate,
    /// Lay the query out
    Format {
        #[arg(long)]
        keyword_case: Option<KeywordCase>,
        #[arg(long)]
        indent_size: Option<usize>,
        #[arg(long)]
        max_line_length: Option<usize>,
    },
    /// Suggest completions at a caret position (end of the query by default)
    Suggest {
        #[arg(long, requires = "column")]
        line: Option<usize>,
        #[arg(long, requires = "line")]
        column: Option<usize>,
        /// Database, bucket or storage group in use
        #[arg(long)]
        database: Option<String>,
        /// JSON schema snapshot to complete against
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Estimate query cost and whether it only reads
    Complexity,
}

fn read_query(query: Option<String>) -> Result<String> {
    match query {
        Some(text) => Ok(text),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print(value: &impl serde::Serialize) -> Result {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tsq=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = QueryEngine::new(cli.database_type);
    let language = cli.language.unwrap_or_else(|| engine.default_language());
    let query = Query::new(read_query(cli.query)?, language, cli.database_type);

    match cli.command {
        Commands::Validate => {
            let result = engine.validate_query(&query);
            print(&result)?;
            if !result.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Format {
            keyword_case,
            indent_size,
            max_line_length,
        } => {
            let defaults = engine.format_options().clone();
            let options = FormatOptions {
                keyword_case: keyword_case.unwrap_or(defaults.keyword_case),
                indent_size: indent_size.unwrap_or(defaults.indent_size),
                max_line_length: max_line_length.unwrap_or(defaults.max_line_length),
                ..defaults
            };
            println!("{}", engine.format_query_with(&query, &options));
        }
        Commands::Suggest {
            line,
            column,
            database,
            schema,
        } => {
            let cursor = match (line, column) {
                (Some(line), Some(column)) => Cursor::new(line, column),
                _ => Cursor::end_of(&query.text),
            };
            let schema = match schema {
                Some(path) => {
                    let json = tokio::fs::read_to_string(&path).await?;
                    let schema = MemorySchema::from_json(&json)?;
                    info!("loaded schema from {}", path.display());
                    Some(schema)
                }
                None => None,
            };
            let provider = schema.as_ref().map(|s| s as &dyn SchemaProvider);
            let suggestions = engine
                .get_smart_suggestions(&query, cursor, database.as_deref(), provider)
                .await;
            print(&suggestions)?;
        }
        Commands::Complexity => {
            if !engine.supports_language(language) {
                return Err(Error::UnsupportedLanguage {
                    language,
                    database: cli.database_type,
                });
            }
            print(&json!({
                "complexity": engine.estimate_query_complexity(&query),
                "readOnly": engine.is_read_only_query(&query),
            }))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
