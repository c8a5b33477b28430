use crate::sql::Lexicon;

pub static LEXICON: Lexicon = Lexicon {
    keywords: KEYWORDS,
    functions: FUNCTIONS,
    compounds: &[
        &["ALIGN", "BY", "DEVICE"],
        &["ALIGN", "BY", "TIME"],
        &["IS", "NOT", "NULL"],
        &["STORAGE", "GROUP"],
        &["GROUP", "BY"],
        &["ORDER", "BY"],
    ],
    operators: &["!=", "<>", "<=", ">=", "=="],
    line_comment: "--",
    block_comments: true,
    path_identifiers: true,
    quoted_identifiers: false,
    date_time_literals: true,
};

pub const KEYWORDS: &[&str] = &[
    "ADD", "ALIAS", "ALIGN", "ALIGNED", "ALL", "ALTER", "AND", "AS", "ASC", "ATTRIBUTES",
    "BETWEEN", "BY", "CHILD", "CLUSTER", "COMPRESSION", "COMPRESSOR", "COUNT", "CREATE",
    "DATABASE", "DATABASES", "DATATYPE", "DELETE", "DESC", "DEVICE", "DEVICES", "DROP",
    "ENCODING", "EXPLAIN", "FALSE", "FILL", "FLUSH", "FROM", "FUNCTION", "FUNCTIONS", "GRANT",
    "GROUP", "HAVING", "IN", "INSERT", "INTO", "IS", "LATEST", "LEVEL", "LIKE", "LIMIT", "LIST",
    "NODES", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "PATHS", "PRIVILEGES", "QUERIES",
    "REGEXP", "REGIONS", "REVOKE", "ROLE", "ROLES", "SCHEMA", "SELECT", "SET", "SHOW", "SLIMIT",
    "SOFFSET", "STORAGE", "TAGS", "TEMPLATE", "TIME", "TIMESERIES", "TO", "TRIGGER", "TRIGGERS",
    "TRUE", "TTL", "UNSET", "USER", "USERS", "VALUES", "VARIABLES", "VERSION", "WHERE", "WITH",
    "WITHOUT",
];

pub const FUNCTIONS: &[&str] = &[
    // aggregations
    "count", "sum", "avg", "extreme", "max_value", "min_value", "first_value", "last_value",
    "max_time", "min_time", "mode", "stddev", "variance", "time_duration", "count_if",
    // scalar
    "now", "date_bin", "cast", "abs", "sign", "ceil", "floor", "round", "exp", "ln", "log10",
    "sqrt", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "degrees",
    "radians", "diff", "replace", "substring", "upper", "lower", "trim", "strcmp", "length",
    "locate", "startswith", "endswith", "concat", "string_contains", "string_matches",
    // selection and sampling
    "top_k", "bottom_k", "m4", "change_points", "in_range", "on_off", "zero_duration",
    "non_zero_duration", "zero_count", "non_zero_count", "equal_size_bucket_random_sample",
];

pub const AGGREGATES: &[&str] = &[
    "count", "sum", "avg", "extreme", "max_value", "min_value", "first_value", "last_value",
    "max_time", "min_time", "mode", "stddev", "variance", "time_duration", "count_if",
];

pub const LEADING: &[&str] = &[
    "SELECT", "INSERT", "CREATE", "DROP", "DELETE", "SHOW", "SET", "UNSET", "ALTER", "GRANT",
    "REVOKE", "COUNT", "FLUSH", "EXPLAIN", "LIST",
];

pub const SHOW_VARIANTS: &[&[&str]] = &[
    &["DATABASES"],
    &["STORAGE GROUP"],
    &["LATEST", "TIMESERIES"],
    &["TIMESERIES"],
    &["DEVICES"],
    &["CHILD", "PATHS"],
    &["CHILD", "NODES"],
    &["ALL", "TTL"],
    &["TTL"],
    &["FUNCTIONS"],
    &["TRIGGERS"],
    &["VERSION"],
    &["CLUSTER"],
    &["REGIONS"],
    &["QUERIES"],
    &["VARIABLES"],
    &["SCHEMA", "TEMPLATE"],
];

pub const CREATE_TARGETS: &[&[&str]] = &[
    &["DATABASE"],
    &["STORAGE GROUP"],
    &["ALIGNED", "TIMESERIES"],
    &["TIMESERIES"],
    &["USER"],
    &["ROLE"],
    &["FUNCTION"],
    &["TRIGGER"],
    &["SCHEMA", "TEMPLATE"],
];

pub const DROP_TARGETS: &[&[&str]] = &[
    &["DATABASE"],
    &["STORAGE GROUP"],
    &["TIMESERIES"],
    &["USER"],
    &["ROLE"],
    &["FUNCTION"],
    &["TRIGGER"],
    &["SCHEMA", "TEMPLATE"],
];

pub const ALIGN_OPTIONS: &[&str] = &["DEVICE", "TIME"];
pub const FILL_OPTIONS: &[&str] = &["PREVIOUS", "LINEAR", "0"];

/// Clause keywords that end a `FROM` path list.
pub const CLAUSES: &[&str] = &[
    "WHERE", "GROUP BY", "ORDER BY", "HAVING", "FILL", "LIMIT", "OFFSET", "SLIMIT", "SOFFSET",
    "ALIGN BY DEVICE", "ALIGN BY TIME", "INTO",
];

pub const EXAMPLE_DATABASES: &[&str] = &["root.sg1", "root.ln"];
pub const EXAMPLE_DEVICES: &[&str] = &["root.sg1.d1", "root.sg1.d2", "root.ln.wf01.wt01"];
pub const EXAMPLE_SENSORS: &[&str] = &["s1", "s2", "temperature", "status"];
