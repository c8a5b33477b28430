//! Formatting shared by every dialect.
//!
//! - `options` : [`FormatOptions`] and its enums, seeded from [`Config`](crate::Config).
//! - `text`    : line-level pre/post-processing.
//! - `layout`  : clause-based layout used by InfluxQL and IoTDB-SQL.
//!
//! Dialect formatters are pure `(text, options) -> String` functions. They
//! never fail from the caller's point of view: internal faults surface as
//! `Err` inside the crate and [`or_original`] turns them into the unchanged
//! input.
mod options;
pub mod layout;
pub mod text;

pub use layout::{SqlLayout, layout};
pub use options::{FormatOptions, IndentType, KeywordCase};

use crate::{Language, Result, warn};

/// Run a dialect formatter, returning `text` unchanged if it fails.
pub fn or_original(text: &str, language: Language, run: impl FnOnce() -> Result<String>) -> String {
    match run() {
        Ok(formatted) => formatted,
        Err(e) => {
            warn!("{language} formatting failed, returning input unchanged: {e}");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn failure_returns_input() {
        let out = or_original("select 'x", Language::InfluxQL, || {
            Err(Error::Format("boom".into()))
        });
        assert_eq!(out, "select 'x");
    }

    #[test]
    fn success_passes_through() {
        let out = or_original("a", Language::Flux, || Ok("b".into()));
        assert_eq!(out, "b");
    }
}
