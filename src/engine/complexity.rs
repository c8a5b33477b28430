use serde::Serialize;

use crate::sql::{TokenKind, significant};
use crate::{Query, Toolchain};

/// Advisory cost class of a query, from a weighted score over its length,
/// keyword count and structural markers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum QueryComplexity {
    #[display("low")]
    Low,
    #[display("medium")]
    Medium,
    #[display("high")]
    High,
}

/// Upper-cased substrings and their weights.
const MARKERS: &[(&str, u32)] = &[
    ("GROUP BY", 1),
    ("ORDER BY", 1),
    ("JOIN", 2),
    ("UNION", 1),
    ("DISTINCT", 1),
    ("=~", 1),
    ("REGEXP", 1),
    ("FILL", 1),
    ("ROOT.**", 2),
    ("ALIGN BY DEVICE", 1),
    ("PIVOT(", 1),
    ("AGGREGATEWINDOW(", 1),
    ("MAP(", 1),
];

impl QueryComplexity {
    pub fn estimate(query: &Query) -> Self {
        Self::from_score(score(query))
    }

    pub fn from_score(score: u32) -> Self {
        match score {
            0..=2 => QueryComplexity::Low,
            3..=5 => QueryComplexity::Medium,
            _ => QueryComplexity::High,
        }
    }
}

pub(crate) fn score(query: &Query) -> u32 {
    let text = &query.text;
    let mut score = match text.chars().count() {
        n if n > 1000 => 3,
        n if n > 500 => 2,
        n if n > 200 => 1,
        _ => 0,
    };
    let upper = text.to_uppercase();
    score += MARKERS
        .iter()
        .filter(|(marker, _)| upper.contains(marker))
        .map(|(_, weight)| weight)
        .sum::<u32>();

    let tokens = (Toolchain::of(query.language).tokenize)(text);
    let tokens = significant(&tokens);
    let keywords = tokens.iter().filter(|t| t.kind == TokenKind::Keyword).count();
    let subqueries = tokens
        .windows(2)
        .filter(|w| w[0].is_punct("(") && w[1].is_keyword("SELECT"))
        .count();
    let pipes = tokens.iter().filter(|t| t.is_operator("|>")).count();
    score += u32::try_from(keywords / 10 + subqueries * 3 + pipes / 5).unwrap_or(u32::MAX);
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatabaseType, Language};
    use rstest::rstest;

    fn influxql(text: &str) -> Query {
        Query::new(text, Language::InfluxQL, DatabaseType::InfluxDB1)
    }

    #[rstest]
    #[case("SELECT * FROM cpu", QueryComplexity::Low)]
    #[case(
        "SELECT mean(v) FROM m WHERE time > now() - 1h GROUP BY time(1m) FILL(none) ORDER BY time DESC",
        QueryComplexity::Medium
    )]
    #[case(
        "SELECT max(v) FROM (SELECT mean(v) AS v FROM m WHERE host =~ /web/ GROUP BY time(1m), host) WHERE time > now() - 1d GROUP BY time(1h) ORDER BY time DESC",
        QueryComplexity::High
    )]
    fn influxql_queries(#[case] text: &str, #[case] expected: QueryComplexity) {
        assert_eq!(QueryComplexity::estimate(&influxql(text)), expected);
    }

    #[test]
    fn length_alone_counts() {
        let fields: Vec<String> = (0..150).map(|i| format!("field_{i}")).collect();
        let text = format!("SELECT {} FROM m", fields.join(", "));
        assert!(text.len() > 1000);
        assert_eq!(score(&influxql(&text)), 3);
    }

    #[test]
    fn iotdb_wildcards_weigh_more() {
        let query = Query::new(
            "SELECT count(s1) FROM root.** GROUP BY LEVEL = 1",
            Language::IoTDBSQL,
            DatabaseType::IoTDB,
        );
        assert_eq!(score(&query), 3);
        assert_eq!(QueryComplexity::estimate(&query), QueryComplexity::Medium);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&QueryComplexity::High).ok(), Some("\"high\"".into()));
    }
}
