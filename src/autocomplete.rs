//! Context-aware completion shared by every dialect.
//!
//! A request flows through three steps:
//! 1. [`CompletionContext::new`] derives the words around the caret and the
//!    string/comment flags from `(text, cursor)`.
//! 2. The dialect engine classifies the expected shape from the preceding
//!    tokens and gathers candidates from its static tables, the schema (through
//!    [`SchemaLookup`]) and enum-like value tables.
//! 3. [`rank`] filters by the current word, de-duplicates and sorts.
mod context;
mod cursor;
mod schema;
pub mod suggestion;

#[cfg(test)]
mod suggestion_tests;

pub use context::CompletionContext;
pub use cursor::Cursor;
pub use schema::{SchemaLookup, SchemaProvider};
pub use suggestion::{SmartSuggestion, SuggestionKind, rank};
