use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::*;

/// One database (InfluxDB database or bucket, IoTDB storage group).
#[derive(Debug)]
pub struct Database {
    pub name: String,
    pub measurements: Data<Measurement>,
    /// Device paths, kept sorted and unique.
    pub devices: RwLock<Vec<String>>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurements: Data::new(HashMap::new()),
            devices: RwLock::new(Vec::new()),
        }
    }

    /// Insert (or overwrite) a measurement.
    pub async fn insert_measurement(&self, measurement: Measurement) {
        self.measurements
            .write()
            .await
            .insert(measurement.name.clone(), measurement);
    }

    pub async fn insert_device(&self, path: impl Into<String>) {
        let path = path.into();
        let mut devices = self.devices.write().await;
        if let Err(at) = devices.binary_search(&path) {
            devices.insert(at, path);
        }
    }

    pub async fn measurement_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.measurements.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn snapshot(&self) -> DatabaseSnapshot {
        let mut measurements: Vec<Measurement> =
            self.measurements.read().await.values().cloned().collect();
        measurements.sort_by(|a, b| a.name.cmp(&b.name));
        DatabaseSnapshot {
            name: self.name.clone(),
            measurements,
            devices: self.devices.read().await.clone(),
        }
    }
}

/// Serializable form of a [`Database`], used to load schema from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub name: String,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub devices: Vec<String>,
}

impl From<DatabaseSnapshot> for Database {
    fn from(snapshot: DatabaseSnapshot) -> Self {
        let mut devices = snapshot.devices;
        devices.sort();
        devices.dedup();
        Self {
            name: snapshot.name,
            measurements: Data::new(
                snapshot
                    .measurements
                    .into_iter()
                    .map(|m| (m.name.clone(), m))
                    .collect(),
            ),
            devices: RwLock::new(devices),
        }
    }
}
