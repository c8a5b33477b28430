//! InfluxQL, the SQL-like language of InfluxDB 1.x (and the compatibility
//! endpoint of 2.x/3.x).
//!
//! Statements are laid out clause by clause through the shared
//! [`SqlLayout`](crate::format::SqlLayout); measurements may be quoted with
//! `"..."` and regular expressions appear as `/.../` after `=~` and `!~`.
mod complete;
mod formatter;
mod lexicon;
mod validator;

pub use complete::suggest;
pub use formatter::{LAYOUT, format};
pub use lexicon::*;
pub use validator::{is_read_only, validate};

use crate::sql::Token;
use crate::{Language, Toolchain};

pub fn tokenize(text: &str) -> Vec<Token> {
    crate::sql::tokenize(text, &LEXICON)
}

pub static TOOLCHAIN: Toolchain = Toolchain {
    language: Language::InfluxQL,
    lexicon: &LEXICON,
    tokenize,
    validate,
    format,
    suggest: complete::suggest_boxed,
    is_read_only,
};
