//! In-memory schema: databases -> measurements -> fields/tags, plus IoTDB
//! device paths. Serves completion through [`SchemaProvider`] for callers that
//! already hold a schema snapshot, and for tests.
crate::reexport!(measurement);
crate::reexport!(database);

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

use crate::{Error, Result, SchemaProvider};

pub type Data<T> = RwLock<HashMap<String, T>>;

#[derive(Debug, Default)]
pub struct MemorySchema {
    pub databases: Data<Database>,
}

impl MemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON array of [`DatabaseSnapshot`]s.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshots: Vec<DatabaseSnapshot> = serde_json::from_str(json)?;
        Ok(Self::from_snapshots(snapshots))
    }

    pub fn from_snapshots(snapshots: impl IntoIterator<Item = DatabaseSnapshot>) -> Self {
        Self {
            databases: Data::new(
                snapshots
                    .into_iter()
                    .map(|s| (s.name.clone(), Database::from(s)))
                    .collect(),
            ),
        }
    }

    pub async fn to_json(&self) -> Result<String> {
        let databases = self.databases.read().await;
        let mut snapshots = Vec::with_capacity(databases.len());
        for database in databases.values() {
            snapshots.push(database.snapshot().await);
        }
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(serde_json::to_string_pretty(&snapshots)?)
    }

    /// Add (or create) the database and insert the measurement.
    pub async fn insert_measurement(&self, database: &str, measurement: Measurement) {
        self.databases
            .write()
            .await
            .entry(database.to_string())
            .or_insert_with(|| Database::new(database)) // Create/return database
            .insert_measurement(measurement)
            .await;
    }

    /// Add (or create) the database and record a device path.
    pub async fn insert_device(&self, database: &str, path: impl Into<String>) {
        self.databases
            .write()
            .await
            .entry(database.to_string())
            .or_insert_with(|| Database::new(database))
            .insert_device(path)
            .await;
    }

    /// Measurement named `name` in any database, first match by database name.
    async fn measurement(&self, name: &str) -> Option<Measurement> {
        let databases = self.databases.read().await;
        let mut names: Vec<&String> = databases.keys().collect();
        names.sort();
        for db in names {
            if let Some(m) = databases[db].measurements.read().await.get(name) {
                return Some(m.clone());
            }
        }
        None
    }
}

#[async_trait]
impl SchemaProvider for MemorySchema {
    async fn databases(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.databases.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn measurements(&self, database: Option<&str>) -> Result<Vec<String>> {
        let databases = self.databases.read().await;
        match database {
            Some(name) => match databases.get(name) {
                Some(db) => Ok(db.measurement_names().await),
                None => Err(Error::Schema(format!("unknown database '{name}'"))),
            },
            None => {
                let mut all = BTreeSet::new();
                for db in databases.values() {
                    all.extend(db.measurement_names().await);
                }
                Ok(all.into_iter().collect())
            }
        }
    }

    async fn devices(&self, database: Option<&str>) -> Result<Vec<String>> {
        let databases = self.databases.read().await;
        match database {
            Some(name) => match databases.get(name) {
                Some(db) => Ok(db.devices.read().await.clone()),
                None => Err(Error::Schema(format!("unknown storage group '{name}'"))),
            },
            None => {
                let mut all = BTreeSet::new();
                for db in databases.values() {
                    all.extend(db.devices.read().await.iter().cloned());
                }
                Ok(all.into_iter().collect())
            }
        }
    }

    async fn fields(&self, measurement: &str) -> Result<Vec<String>> {
        Ok(self.measurement(measurement).await.map(|m| m.fields).unwrap_or_default())
    }

    async fn tags(&self, measurement: &str) -> Result<Vec<String>> {
        Ok(self.measurement(measurement).await.map(|m| m.tags).unwrap_or_default())
    }
}
