use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Query, Result};

/// Rows produced by a backend for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Backend that runs a validated query against a live database. The
/// toolchain never implements this itself.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &Query) -> Result<QueryOutput>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub output: Option<QueryOutput>,
    pub error: Option<String>,
    pub execution_time_ms: u64,
    pub row_count: usize,
}

impl ExecutionResult {
    pub fn success(output: QueryOutput, elapsed: Duration) -> Self {
        Self {
            success: true,
            row_count: output.rows.len(),
            output: Some(output),
            error: None,
            execution_time_ms: millis(elapsed),
        }
    }

    pub fn failure(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(message.into()),
            execution_time_ms: millis(elapsed),
            row_count: 0,
        }
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_counts_rows() {
        let output = QueryOutput {
            columns: vec!["time".into(), "value".into()],
            rows: vec![vec![json!(1), json!(0.5)], vec![json!(2), json!(0.7)]],
        };
        let result = ExecutionResult::success(output, Duration::from_millis(12));
        assert!(result.success);
        assert_eq!(result.row_count, 2);
        assert_eq!(result.execution_time_ms, 12);
    }

    #[test]
    fn serializes_camel_case() {
        let result = ExecutionResult::failure("boom", Duration::ZERO);
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["executionTimeMs"], json!(0));
        assert_eq!(value["rowCount"], json!(0));
        assert_eq!(value["error"], json!("boom"));
    }
}
