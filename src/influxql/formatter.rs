use crate::format::{SqlLayout, layout, or_original};
use crate::{FormatOptions, Language};

use super::lexicon::LEXICON;

pub static LAYOUT: SqlLayout = SqlLayout {
    lexicon: &LEXICON,
    major: &[
        "SELECT", "FROM", "SHOW", "CREATE", "DROP", "DELETE", "ALTER", "GRANT", "REVOKE", "KILL",
        "EXPLAIN", "SET",
    ],
    clauses: &[
        "INTO", "WHERE", "GROUP BY", "ORDER BY", "FILL", "LIMIT", "OFFSET", "SLIMIT", "SOFFSET",
        "TZ", "ON", "WITH", "BEGIN", "END", "RESAMPLE",
    ],
    calls: &["FILL", "TZ"],
};

pub fn format(text: &str, options: &FormatOptions) -> String {
    or_original(text, Language::InfluxQL, || layout(text, &LAYOUT, options))
}
