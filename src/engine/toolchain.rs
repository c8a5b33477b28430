use futures::future::BoxFuture;

use crate::sql::{Lexicon, Token};
use crate::{
    CompletionContext, DatabaseType, FormatOptions, Language, SchemaLookup, SmartSuggestion,
    ValidationResult,
};

/// Completion entry point of a dialect.
pub type SuggestFn =
    for<'a> fn(&'a CompletionContext, SchemaLookup<'a>) -> BoxFuture<'a, Vec<SmartSuggestion>>;

/// One dialect's operations, as plain function pointers. Each dialect module
/// exposes exactly one `static TOOLCHAIN`.
#[derive(Debug)]
pub struct Toolchain {
    pub language: Language,
    pub lexicon: &'static Lexicon,
    pub tokenize: fn(&str) -> Vec<Token>,
    pub validate: fn(&str) -> ValidationResult,
    pub format: fn(&str, &FormatOptions) -> String,
    pub suggest: SuggestFn,
    pub is_read_only: fn(&str) -> bool,
}

impl Toolchain {
    pub fn of(language: Language) -> &'static Toolchain {
        match language {
            Language::InfluxQL => &crate::influxql::TOOLCHAIN,
            Language::Flux => &crate::flux::TOOLCHAIN,
            Language::IoTDBSQL => &crate::iotdb::TOOLCHAIN,
        }
    }

    /// Toolchain for `language` when `database` accepts it.
    pub fn lookup(database: DatabaseType, language: Language) -> Option<&'static Toolchain> {
        database.supports(language).then(|| Self::of(language))
    }
}
