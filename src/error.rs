use std::time::Duration;

use crate::{DatabaseType, Language};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema lookup error: {0}")]
    Schema(String),

    #[error("Schema lookup timed out after {0:?}")]
    SchemaTimeout(Duration),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Language {language} is not supported by {database}")]
    UnsupportedLanguage {
        language: Language,
        database: DatabaseType,
    },

    #[error("Unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Formatting error: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T = ()> = std::result::Result<T, Error>;
