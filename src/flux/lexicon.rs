use crate::sql::Lexicon;

pub static LEXICON: Lexicon = Lexicon {
    keywords: KEYWORDS,
    functions: FUNCTIONS,
    compounds: &[],
    operators: &["|>", "=>", "<-", "==", "!=", "<=", ">=", "=~", "!~"],
    line_comment: "//",
    block_comments: false,
    path_identifiers: false,
    quoted_identifiers: false,
    date_time_literals: true,
};

/// Flux keywords. Flux is case-sensitive; the lower-cased spelling is the
/// only valid one, the table is upper-cased like every other lexicon.
pub const KEYWORDS: &[&str] = &[
    "AND", "BUILTIN", "ELSE", "EXISTS", "FALSE", "IF", "IMPORT", "NOT", "OPTION", "OR",
    "PACKAGE", "RETURN", "THEN", "TESTCASE", "TRUE", "WITH",
];

/// Keywords as written in Flux source, for completion.
pub const SOURCE_KEYWORDS: &[&str] = &[
    "and", "else", "exists", "false", "if", "import", "not", "option", "or", "return", "then",
    "true", "with",
];

pub const FUNCTIONS: &[&str] = &[
    // sources
    "from", "buckets", "union", "join",
    // filters and windowing
    "range", "filter", "window", "aggregateWindow", "group",
    // aggregates
    "count", "mean", "median", "mode", "spread", "stddev", "sum", "integral", "quantile",
    "reduce", "histogram", "cov", "pearsonr",
    // selectors
    "first", "last", "max", "min", "top", "bottom", "distinct", "unique", "sample",
    "highestMax", "highestAverage", "lowestMin", "lowestAverage",
    // transformations
    "map", "keep", "drop", "rename", "duplicate", "pivot", "fill", "sort", "limit", "tail",
    "set", "columns", "keys", "keyValues", "timeShift", "truncateTimeColumn", "elapsed",
    "derivative", "difference", "cumulativeSum", "movingAverage", "exponentialMovingAverage",
    "timedMovingAverage", "doubleExponentialMovingAverage", "increase", "holtWinters",
    "stateCount", "stateDuration", "hourSelection", "chandeMomentumOscillator",
    "relativeStrengthIndex", "kaufmansER", "kaufmansAMA", "tripleEMA",
    // conversions
    "bool", "bytes", "duration", "float", "int", "string", "time", "uint", "toBool",
    "toFloat", "toInt", "toString", "toTime", "toUInt",
    // outputs and misc
    "yield", "to", "wideTo", "now", "length", "contains", "display", "findColumn",
    "findRecord", "getColumn", "getRecord", "tableFind", "die", "sleep",
];

/// Functions that produce a stream without a piped input.
pub const SOURCES: &[&str] = &["from", "buckets", "union", "join"];

/// Functions that reduce each table to few rows.
pub const AGGREGATES: &[&str] = &[
    "count", "mean", "median", "mode", "spread", "stddev", "sum", "integral", "quantile",
    "reduce", "first", "last", "max", "min", "top", "bottom", "distinct", "unique",
    "aggregateWindow", "limit", "tail", "sample",
];

/// Functions that write data.
pub const WRITERS: &[&str] = &["to", "wideTo"];

/// Columns present on every Flux record.
pub const RECORD_COLUMNS: &[&str] = &["_measurement", "_field", "_value", "_time", "_start", "_stop"];

/// Standard library packages offered after `import`.
pub const PACKAGES: &[&str] = &[
    "array", "csv", "date", "experimental", "http", "influxdata/influxdb/schema",
    "influxdata/influxdb/v1", "join", "json", "math", "regexp", "runtime", "sql", "strings",
    "system", "timezone", "types",
];

/// Call snippets for the functions people type most.
pub const SNIPPETS: &[(&str, &str)] = &[
    ("from", "from(bucket: \"${1}\")"),
    ("range", "range(start: ${1:-1h})"),
    ("filter", "filter(fn: (r) => ${1})"),
    ("aggregateWindow", "aggregateWindow(every: ${1:1m}, fn: ${2:mean}, createEmpty: false)"),
    ("map", "map(fn: (r) => ({r with ${1}}))"),
    ("group", "group(columns: [${1}])"),
    ("keep", "keep(columns: [${1}])"),
    ("drop", "drop(columns: [${1}])"),
    ("sort", "sort(columns: [\"${1:_time}\"], desc: ${2:true})"),
    ("limit", "limit(n: ${1:10})"),
    ("yield", "yield(name: \"${1}\")"),
    ("window", "window(every: ${1:1m})"),
    ("pivot", "pivot(rowKey: [\"_time\"], columnKey: [\"_field\"], valueColumn: \"_value\")"),
    ("to", "to(bucket: \"${1}\")"),
];

pub const EXAMPLE_BUCKETS: &[&str] = &["telegraf", "example-bucket", "_monitoring"];
pub const EXAMPLE_MEASUREMENTS: &[&str] = &["cpu", "mem", "disk", "net", "system"];
pub const EXAMPLE_FIELDS: &[&str] = &["usage_idle", "usage_user", "usage_system", "value"];
pub const EXAMPLE_TAGS: &[&str] = &["host", "region", "cpu"];
pub const EXAMPLE_DURATIONS: &[&str] = &["10s", "1m", "5m", "1h", "1d"];
pub const EXAMPLE_STARTS: &[&str] = &["-1h", "-24h", "-7d", "-30d"];
