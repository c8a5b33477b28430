use async_trait::async_trait;
use std::time::Duration;

use crate::{Error, Result, SchemaProvider};

/// Provider whose every lookup fails, as an unreachable server would.
pub struct FailingSchema;

#[async_trait]
impl SchemaProvider for FailingSchema {
    async fn databases(&self) -> Result<Vec<String>> {
        Err(Error::Schema("connection refused".into()))
    }

    async fn measurements(&self, _database: Option<&str>) -> Result<Vec<String>> {
        Err(Error::Schema("connection refused".into()))
    }

    async fn devices(&self, _database: Option<&str>) -> Result<Vec<String>> {
        Err(Error::Schema("connection refused".into()))
    }

    async fn fields(&self, _measurement: &str) -> Result<Vec<String>> {
        Err(Error::Schema("connection refused".into()))
    }

    async fn tags(&self, _measurement: &str) -> Result<Vec<String>> {
        Err(Error::Schema("connection refused".into()))
    }
}

/// Provider that answers `live` only after `delay`, for timeout tests.
pub struct SlowSchema {
    delay: Duration,
    live: Vec<String>,
}

impl SlowSchema {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            live: vec!["live_only".to_string()],
        }
    }

    async fn answer(&self) -> Result<Vec<String>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.live.clone())
    }
}

#[async_trait]
impl SchemaProvider for SlowSchema {
    async fn databases(&self) -> Result<Vec<String>> {
        self.answer().await
    }

    async fn measurements(&self, _database: Option<&str>) -> Result<Vec<String>> {
        self.answer().await
    }

    async fn devices(&self, _database: Option<&str>) -> Result<Vec<String>> {
        self.answer().await
    }

    async fn fields(&self, _measurement: &str) -> Result<Vec<String>> {
        self.answer().await
    }

    async fn tags(&self, _measurement: &str) -> Result<Vec<String>> {
        self.answer().await
    }
}
