//! IoTDB-SQL, the dialect of Apache IoTDB.
//!
//! Data lives in a tree of dotted paths (`root.sg1.d1.s1`): storage groups
//! hold devices, devices hold sensors. Paths are single tokens and may end in
//! the wildcards `*` (one level) or `**` (any depth). `GROUP BY` windows use
//! half-open intervals like `[2017-11-01T00:00:00, 2017-11-07T23:00:00)`.
mod complete;
mod formatter;
mod lexicon;
pub mod types;
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
    language: Language::IoTDBSQL,
    lexicon: &LEXICON,
    tokenize,
    validate,
    format,
    suggest: complete::suggest_boxed,
    is_read_only,
};
