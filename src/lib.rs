//! Multi-dialect query toolchain for time-series databases.
//!
//! Tokenizers, validators, formatters and context-aware autocomplete for
//! InfluxQL, Flux and IoTDB-SQL, bound together per database type by
//! [`QueryEngine`]. Nothing here touches a socket: callers hand in query text
//! (plus an optional [`SchemaProvider`] for completion) and get plain data back.
//!
//! ```rust
//! use tsq::prelude::*;
//!
//! let engine = QueryEngine::new(DatabaseType::InfluxDB1);
//! let query = Query::new("SELECT * FROM cpu", Language::InfluxQL, DatabaseType::InfluxDB1);
//! let result = engine.validate_query(&query);
//! assert!(result.valid);
//! assert!(!result.warnings.is_empty());
//! ```

reexport!(testing, test);
reexport!(error);
reexport!(config);
reexport!(dialect);
reexport!(validation);
reexport!(format);
reexport!(autocomplete);
reexport!(metadata);
reexport!(engine);

pub mod flux;
pub mod influxql;
pub mod iotdb;
pub mod sql;

#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn};

/// Convenience prelude re-exporting the types most callers need.
pub mod prelude {
    pub use crate::{
        Cursor, DatabaseType, ExecutionResult, FormatOptions, KeywordCase, Language,
        MemorySchema, Query, QueryComplexity, QueryEngine, QueryExecutor, SchemaProvider,
        SmartSuggestion, SuggestionKind, ValidationResult,
    };
}

#[macro_export]
macro_rules! reexport {
    ($module:ident) => {
        $crate::reexport!($module, false);
    };
    ($module:ident, test) => {
        $crate::reexport!($module, true);
    };
    ($module:ident, $is_test:literal) => {
        #[cfg_attr($is_test, cfg(test))]
        mod $module;
        #[cfg_attr($is_test, cfg(test))]
        #[allow(unused_imports)]
        #[allow(ambiguous_glob_reexports)]
        pub use $module::*;
    };
}
