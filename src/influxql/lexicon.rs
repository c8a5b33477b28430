use crate::sql::Lexicon;

pub static LEXICON: Lexicon = Lexicon {
    keywords: KEYWORDS,
    functions: FUNCTIONS,
    compounds: &[&["GROUP", "BY"], &["ORDER", "BY"]],
    operators: &["!=", "<>", "<=", ">=", "=~", "!~"],
    line_comment: "--",
    block_comments: true,
    path_identifiers: false,
    quoted_identifiers: true,
    date_time_literals: false,
};

pub const KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "ANALYZE", "AND", "ANY", "AS", "ASC", "BEGIN", "BY", "CARDINALITY", "CONTINUOUS",
    "CREATE", "DATABASE", "DATABASES", "DEFAULT", "DELETE", "DESC", "DESTINATIONS",
    "DIAGNOSTICS", "DISTINCT", "DROP", "DURATION", "END", "EVERY", "EXACT", "EXPLAIN", "FALSE",
    "FIELD", "FILL", "FOR", "FROM", "GRANT", "GRANTS", "GROUP", "GROUPS", "IN", "INF", "INTO",
    "KEY", "KEYS", "KILL", "LIMIT", "MEASUREMENT", "MEASUREMENTS", "NOT", "NULL", "OFFSET",
    "ON", "OR", "ORDER", "PASSWORD", "POLICIES", "POLICY", "PRIVILEGES", "QUERIES", "QUERY",
    "READ", "REPLICATION", "RESAMPLE", "RETENTION", "REVOKE", "SELECT", "SERIES", "SET",
    "SHARD", "SHARDS", "SHOW", "SLIMIT", "SOFFSET", "STATS", "SUBSCRIPTION", "SUBSCRIPTIONS",
    "TAG", "TO", "TRUE", "TZ", "USER", "USERS", "VALUES", "WHERE", "WITH", "WRITE",
];

pub const FUNCTIONS: &[&str] = &[
    // aggregations
    "count", "distinct", "integral", "mean", "median", "mode", "spread", "stddev", "sum",
    // selectors
    "bottom", "first", "last", "max", "min", "percentile", "sample", "top",
    // transformations
    "abs", "acos", "asin", "atan", "atan2", "ceil", "cos", "cumulative_sum", "derivative",
    "difference", "elapsed", "exp", "floor", "histogram", "ln", "log", "log2", "log10",
    "moving_average", "non_negative_derivative", "non_negative_difference", "pow", "round",
    "sin", "sqrt", "tan",
    // predictors and technical analysis
    "holt_winters", "holt_winters_with_fit", "chande_momentum_oscillator",
    "exponential_moving_average", "double_exponential_moving_average",
    "kaufmans_efficiency_ratio", "kaufmans_adaptive_moving_average",
    "triple_exponential_moving_average", "triple_exponential_derivative",
    "relative_strength_index",
    // time
    "now", "time",
];

/// Functions that satisfy `GROUP BY`.
pub const AGGREGATES: &[&str] = &[
    "count", "distinct", "integral", "mean", "median", "mode", "spread", "stddev", "sum",
    "bottom", "first", "last", "max", "min", "percentile", "sample", "top", "holt_winters",
    "holt_winters_with_fit",
];

/// Keywords a statement may start with.
pub const LEADING: &[&str] = &[
    "SELECT", "SHOW", "CREATE", "DROP", "DELETE", "GRANT", "REVOKE", "ALTER", "KILL", "EXPLAIN",
    "SET",
];

/// Every `SHOW` statement, longest spelling first within a family.
pub const SHOW_VARIANTS: &[&[&str]] = &[
    &["DATABASES"],
    &["MEASUREMENT", "EXACT", "CARDINALITY"],
    &["MEASUREMENT", "CARDINALITY"],
    &["MEASUREMENTS"],
    &["SERIES", "EXACT", "CARDINALITY"],
    &["SERIES", "CARDINALITY"],
    &["SERIES"],
    &["TAG", "KEY", "EXACT", "CARDINALITY"],
    &["TAG", "KEY", "CARDINALITY"],
    &["TAG", "KEYS"],
    &["TAG", "VALUES", "EXACT", "CARDINALITY"],
    &["TAG", "VALUES", "CARDINALITY"],
    &["TAG", "VALUES"],
    &["FIELD", "KEY", "EXACT", "CARDINALITY"],
    &["FIELD", "KEY", "CARDINALITY"],
    &["FIELD", "KEYS"],
    &["RETENTION", "POLICIES"],
    &["CONTINUOUS", "QUERIES"],
    &["SHARD", "GROUPS"],
    &["SHARDS"],
    &["SUBSCRIPTIONS"],
    &["USERS"],
    &["GRANTS"],
    &["QUERIES"],
    &["STATS"],
    &["DIAGNOSTICS"],
];

/// Objects `CREATE` and `DROP` act on.
pub const CREATE_TARGETS: &[&[&str]] = &[
    &["DATABASE"],
    &["RETENTION", "POLICY"],
    &["CONTINUOUS", "QUERY"],
    &["USER"],
    &["SUBSCRIPTION"],
];

pub const DROP_TARGETS: &[&[&str]] = &[
    &["DATABASE"],
    &["MEASUREMENT"],
    &["SERIES"],
    &["RETENTION", "POLICY"],
    &["CONTINUOUS", "QUERY"],
    &["USER"],
    &["SHARD"],
    &["SUBSCRIPTION"],
];

/// Values accepted by `FILL(...)` besides a number.
pub const FILL_OPTIONS: &[&str] = &["null", "none", "previous", "linear"];

/// Measurements offered when no schema is reachable.
pub const EXAMPLE_MEASUREMENTS: &[&str] = &["cpu", "mem", "disk", "net", "system"];
pub const EXAMPLE_FIELDS: &[&str] = &["usage_idle", "usage_user", "usage_system", "value"];
pub const EXAMPLE_TAGS: &[&str] = &["host", "region", "cpu"];
pub const EXAMPLE_DATABASES: &[&str] = &["telegraf", "_internal"];
