use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Config, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentType {
    #[default]
    Spaces,
    Tabs,
}

/// Casing applied to keyword tokens. Functions, identifiers and literals are
/// never re-cased.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCase {
    #[default]
    #[display("upper")]
    Upper,
    #[display("lower")]
    Lower,
    #[display("preserve")]
    Preserve,
}

impl KeywordCase {
    pub fn apply(self, word: &str) -> String {
        match self {
            KeywordCase::Upper => word.to_uppercase(),
            KeywordCase::Lower => word.to_lowercase(),
            KeywordCase::Preserve => word.to_string(),
        }
    }
}

impl FromStr for KeywordCase {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upper" => Ok(KeywordCase::Upper),
            "lower" => Ok(KeywordCase::Lower),
            "preserve" => Ok(KeywordCase::Preserve),
            other => Err(crate::Error::Config(format!("unknown keyword case '{other}'"))),
        }
    }
}

/// Style rules for every formatter. Plain data: callers persist it and pass
/// it per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    pub indent_size: usize,
    pub indent_type: IndentType,
    pub keyword_case: KeywordCase,
    /// Break lines before major and clause keywords.
    pub line_break_after_keywords: bool,
    /// Put each select-list item on its own line.
    pub align_columns: bool,
    /// Soft limit used for wrapping; `0` disables wrapping.
    pub max_line_length: usize,
    pub remove_extra_whitespace: bool,
    pub preserve_comments: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            indent_type: IndentType::Spaces,
            keyword_case: KeywordCase::Upper,
            line_break_after_keywords: true,
            align_columns: false,
            max_line_length: 100,
            remove_extra_whitespace: true,
            preserve_comments: true,
        }
    }
}

impl FormatOptions {
    /// Defaults seeded from the environment configuration.
    pub fn from_config(config: &Config) -> Self {
        let keyword_case = config.keyword_case.parse().unwrap_or_else(|e| {
            warn!("{e}, falling back to upper-case keywords");
            KeywordCase::Upper
        });
        Self {
            indent_size: config.indent_size,
            keyword_case,
            max_line_length: config.max_line_length,
            ..Self::default()
        }
    }

    pub fn indent(&self, level: usize) -> String {
        match self.indent_type {
            IndentType::Spaces => " ".repeat(self.indent_size * level),
            IndentType::Tabs => "\t".repeat(level),
        }
    }

    /// Whether a line of `width` characters is over the wrapping limit.
    pub fn exceeds(&self, width: usize) -> bool {
        self.max_line_length > 0 && width > self.max_line_length
    }
}
