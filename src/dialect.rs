//! Closed sets of query languages and database types, and the table of which
//! languages each database type accepts.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::sql::Lexicon;

/// Query language understood by the toolchain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Language {
    #[display("InfluxQL")]
    #[serde(rename = "influxql")]
    InfluxQL,
    #[display("Flux")]
    #[serde(rename = "flux")]
    Flux,
    #[display("IoTDB-SQL")]
    #[serde(rename = "iotdb-sql")]
    IoTDBSQL,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::InfluxQL, Language::Flux, Language::IoTDBSQL];

    /// Static vocabulary of this language.
    pub fn lexicon(self) -> &'static Lexicon {
        match self {
            Language::InfluxQL => &crate::influxql::LEXICON,
            Language::Flux => &crate::flux::LEXICON,
            Language::IoTDBSQL => &crate::iotdb::LEXICON,
        }
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "influxql" => Ok(Language::InfluxQL),
            "flux" => Ok(Language::Flux),
            "iotdb-sql" | "iotdbsql" | "iotdb" | "sql" => Ok(Language::IoTDBSQL),
            other => Err(crate::Error::Config(format!("unknown language '{other}'"))),
        }
    }
}

/// Database family a [`QueryEngine`](crate::QueryEngine) is bound to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum DatabaseType {
    #[display("InfluxDB 1.x")]
    #[serde(rename = "influxdb1")]
    InfluxDB1,
    #[display("InfluxDB 2.x")]
    #[serde(rename = "influxdb2")]
    InfluxDB2,
    #[display("InfluxDB 3.x")]
    #[serde(rename = "influxdb3")]
    InfluxDB3,
    #[display("IoTDB")]
    #[serde(rename = "iotdb")]
    IoTDB,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 4] = [
        DatabaseType::InfluxDB1,
        DatabaseType::InfluxDB2,
        DatabaseType::InfluxDB3,
        DatabaseType::IoTDB,
    ];

    /// Languages accepted by this database type, default first.
    pub const fn supported_languages(self) -> &'static [Language] {
        match self {
            DatabaseType::InfluxDB1 => &[Language::InfluxQL],
            DatabaseType::InfluxDB2 => &[Language::Flux, Language::InfluxQL],
            DatabaseType::InfluxDB3 => &[Language::InfluxQL],
            DatabaseType::IoTDB => &[Language::IoTDBSQL],
        }
    }

    pub const fn default_language(self) -> Language {
        self.supported_languages()[0]
    }

    pub fn supports(self, language: Language) -> bool {
        self.supported_languages().contains(&language)
    }
}

impl FromStr for DatabaseType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "influxdb1" | "influxdb" | "influx1" => Ok(DatabaseType::InfluxDB1),
            "influxdb2" | "influx2" => Ok(DatabaseType::InfluxDB2),
            "influxdb3" | "influx3" => Ok(DatabaseType::InfluxDB3),
            "iotdb" => Ok(DatabaseType::IoTDB),
            other => Err(crate::Error::Config(format!("unknown database type '{other}'"))),
        }
    }
}

/// The sole externally supplied input. Read-only to the toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub text: String,
    pub language: Language,
    pub database_type: DatabaseType,
}

impl Query {
    pub fn new(text: impl Into<String>, language: Language, database_type: DatabaseType) -> Self {
        Self {
            text: text.into(),
            language,
            database_type,
        }
    }
}
