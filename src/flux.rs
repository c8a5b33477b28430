//! Flux, the functional pipeline language of InfluxDB 2.x.
//!
//! A query is a sequence of statements (imports, options, assignments and
//! pipeline expressions) separated by line breaks; `|>` pipes tables from one
//! call into the next. Keywords are lower-case and significant, so the
//! formatter only re-indents.
mod complete;
mod formatter;
mod lexicon;
mod validator;

pub use complete::suggest;
pub use formatter::format;
pub use lexicon::*;
pub use validator::{is_read_only, validate};

use crate::sql::Token;
use crate::{Language, Toolchain};

pub fn tokenize(text: &str) -> Vec<Token> {
    crate::sql::tokenize(text, &LEXICON)
}

pub static TOOLCHAIN: Toolchain = Toolchain {
    language: Language::Flux,
    lexicon: &LEXICON,
    tokenize,
    validate,
    format,
    suggest: complete::suggest_boxed,
    is_read_only,
};
