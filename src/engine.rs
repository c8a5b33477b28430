//! The per-database façade binding one dialect toolchain per supported
//! language.
//!
//! - `toolchain`  : [`Toolchain`], the table of dialect function pointers.
//! - `executor`   : [`QueryExecutor`] seam and [`ExecutionResult`].
//! - `complexity` : [`QueryComplexity`] estimation.
mod complexity;
mod executor;
mod toolchain;


pub use complexity::QueryComplexity;
pub use executor::{ExecutionResult, QueryExecutor, QueryOutput};
pub use toolchain::{SuggestFn, Toolchain};

use std::time::{Duration, Instant};

use crate::{
    CompletionContext, Cursor, DatabaseType, Error, ErrorType, FormatOptions, Language, Query,
    Result, SchemaLookup, SchemaProvider, SmartSuggestion, ValidationResult, config, debug, error,
    warn,
};

/// Validation, formatting, completion and execution gatekeeping for one
/// [`DatabaseType`].
///
/// The engine holds no per-query state. Its [`FormatOptions`] may be replaced
/// between calls; every other operation is a pure dispatch to the dialect
/// toolchain, so one engine can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    database_type: DatabaseType,
    format_options: FormatOptions,
    schema_timeout: Duration,
}

impl QueryEngine {
    /// Engine with format options and schema timeout taken from [`config()`].
    pub fn new(database_type: DatabaseType) -> Self {
        let config = config();
        Self {
            database_type,
            format_options: FormatOptions::from_config(config),
            schema_timeout: config.schema_timeout(),
        }
    }

    pub fn with_format_options(mut self, options: FormatOptions) -> Self {
        self.format_options = options;
        self
    }

    pub fn with_schema_timeout(mut self, timeout: Duration) -> Self {
        self.schema_timeout = timeout;
        self
    }

    pub fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    pub fn format_options(&self) -> &FormatOptions {
        &self.format_options
    }

    pub fn update_format_options(&mut self, options: FormatOptions) {
        self.format_options = options;
    }

    pub fn supported_languages(&self) -> &'static [Language] {
        self.database_type.supported_languages()
    }

    pub fn supports_language(&self, language: Language) -> bool {
        self.database_type.supports(language)
    }

    pub fn default_language(&self) -> Language {
        self.database_type.default_language()
    }

    fn toolchain(&self, language: Language) -> Result<&'static Toolchain> {
        Toolchain::lookup(self.database_type, language).ok_or(Error::UnsupportedLanguage {
            language,
            database: self.database_type,
        })
    }

    /// Diagnostics for `query`. An unsupported language yields a rejected
    /// result rather than an error.
    pub fn validate_query(&self, query: &Query) -> ValidationResult {
        match self.toolchain(query.language) {
            Ok(toolchain) => {
                let result = (toolchain.validate)(&query.text);
                debug!(
                    "validated {} query: {} error(s), {} warning(s)",
                    query.language,
                    result.errors.len(),
                    result.warnings.len()
                );
                result
            }
            Err(e) => {
                warn!("{e}");
                ValidationResult::rejected(e.to_string(), ErrorType::Syntax)
            }
        }
    }

    /// `query` laid out with the engine's current options.
    pub fn format_query(&self, query: &Query) -> String {
        self.format_query_with(query, &self.format_options)
    }

    /// `query` laid out with explicit `options`. Returns the text unchanged
    /// when the language is unsupported or the layout fails.
    pub fn format_query_with(&self, query: &Query, options: &FormatOptions) -> String {
        match self.toolchain(query.language) {
            Ok(toolchain) => (toolchain.format)(&query.text, options),
            Err(e) => {
                warn!("{e}, returning input unchanged");
                query.text.clone()
            }
        }
    }

    /// Validate, then hand `query` to `executor`. An invalid query never
    /// reaches the executor; its result carries the joined error messages.
    pub async fn execute_query(&self, query: &Query, executor: &dyn QueryExecutor) -> ExecutionResult {
        let validation = self.validate_query(query);
        if !validation.valid {
            let summary = validation.error_summary();
            error!("refusing to execute invalid {} query: {summary}", query.language);
            return ExecutionResult::failure(summary, Duration::ZERO);
        }
        let started = Instant::now();
        match executor.execute(query).await {
            Ok(output) => {
                let result = ExecutionResult::success(output, started.elapsed());
                debug!(
                    "{} query returned {} row(s) in {}ms",
                    query.language, result.row_count, result.execution_time_ms
                );
                result
            }
            Err(e) => {
                error!("{} query failed: {e}", query.language);
                ExecutionResult::failure(e.to_string(), started.elapsed())
            }
        }
    }

    /// Ranked completions at `cursor`. Schema lookups go through `provider`
    /// when given, bounded by the engine's schema timeout.
    pub async fn get_smart_suggestions(
        &self,
        query: &Query,
        cursor: Cursor,
        database: Option<&str>,
        provider: Option<&dyn SchemaProvider>,
    ) -> Vec<SmartSuggestion> {
        let toolchain = match self.toolchain(query.language) {
            Ok(toolchain) => toolchain,
            Err(e) => {
                warn!("{e}, no suggestions");
                return Vec::new();
            }
        };
        let ctx = CompletionContext::new(&query.text, cursor, toolchain.lexicon).with_database(database);
        let schema = SchemaLookup::new(provider, self.schema_timeout);
        (toolchain.suggest)(&ctx, schema).await
    }

    /// Whether `query` only reads. Unsupported languages count as writes.
    pub fn is_read_only_query(&self, query: &Query) -> bool {
        self.toolchain(query.language)
            .is_ok_and(|toolchain| (toolchain.is_read_only)(&query.text))
    }

    pub fn estimate_query_complexity(&self, query: &Query) -> QueryComplexity {
        QueryComplexity::estimate(query)
    }
}
