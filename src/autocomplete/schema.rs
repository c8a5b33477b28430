use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::{Error, Result, trace, warn};

/// Live metadata source consulted during completion.
///
/// Implementations may talk to a server, read a cache or serve a snapshot
/// (see [`MemorySchema`](crate::MemorySchema)). Errors are never shown to the
/// user: [`SchemaLookup`] logs them and substitutes example data.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Databases, buckets or storage groups.
    async fn databases(&self) -> Result<Vec<String>>;

    /// Measurements (tables) of `database`, or of every database.
    async fn measurements(&self, database: Option<&str>) -> Result<Vec<String>>;

    /// Full device paths (`root.sg1.d1`) of `database`, or of every database.
    async fn devices(&self, database: Option<&str>) -> Result<Vec<String>>;

    /// Field (column) names of `measurement`.
    async fn fields(&self, measurement: &str) -> Result<Vec<String>>;

    /// Tag (attribute) names of `measurement`.
    async fn tags(&self, measurement: &str) -> Result<Vec<String>>;
}

/// Bounded, failure-absorbing view over an optional [`SchemaProvider`].
///
/// Every call is wrapped in a timeout. A provider error or an expired timeout
/// is logged at `warn` and answered with the caller's fallback list, exactly
/// as if no provider had been configured.
#[derive(Clone, Copy)]
pub struct SchemaLookup<'a> {
    provider: Option<&'a dyn SchemaProvider>,
    timeout: Duration,
}

impl<'a> SchemaLookup<'a> {
    pub fn new(provider: Option<&'a dyn SchemaProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Lookup without a provider: every call answers its fallback list.
    pub fn offline() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn databases(&self, fallback: &[&str]) -> Vec<String> {
        match self.provider {
            Some(p) => self.bounded("databases", fallback, p.databases()).await,
            None => owned(fallback),
        }
    }

    pub async fn measurements(&self, database: Option<&str>, fallback: &[&str]) -> Vec<String> {
        match self.provider {
            Some(p) => self.bounded("measurements", fallback, p.measurements(database)).await,
            None => owned(fallback),
        }
    }

    pub async fn devices(&self, database: Option<&str>, fallback: &[&str]) -> Vec<String> {
        match self.provider {
            Some(p) => self.bounded("devices", fallback, p.devices(database)).await,
            None => owned(fallback),
        }
    }

    pub async fn fields(&self, measurement: &str, fallback: &[&str]) -> Vec<String> {
        match self.provider {
            Some(p) => self.bounded("fields", fallback, p.fields(measurement)).await,
            None => owned(fallback),
        }
    }

    pub async fn tags(&self, measurement: &str, fallback: &[&str]) -> Vec<String> {
        match self.provider {
            Some(p) => self.bounded("tags", fallback, p.tags(measurement)).await,
            None => owned(fallback),
        }
    }

    async fn bounded(
        &self,
        entity: &str,
        fallback: &[&str],
        lookup: impl Future<Output = Result<Vec<String>>>,
    ) -> Vec<String> {
        let outcome = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(Error::SchemaTimeout(self.timeout)),
        };
        match outcome {
            Ok(items) => {
                trace!("schema lookup for {entity} returned {} entries", items.len());
                items
            }
            Err(e) => {
                warn!("schema lookup for {entity} failed, using examples: {e}");
                owned(fallback)
            }
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingSchema, SlowSchema};

    #[tokio::test]
    async fn offline_answers_fallback() {
        let lookup = SchemaLookup::offline();
        assert!(!lookup.is_live());
        assert_eq!(lookup.measurements(None, &["cpu"]).await, vec!["cpu"]);
    }

    #[tokio::test]
    async fn provider_errors_degrade_to_fallback() {
        let provider = FailingSchema;
        let lookup = SchemaLookup::new(Some(&provider), Duration::from_secs(1));
        assert_eq!(lookup.fields("cpu", &["value"]).await, vec!["value"]);
        assert_eq!(lookup.databases(&[]).await, Vec::<String>::new());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_providers_time_out() {
        let provider = SlowSchema::new(Duration::from_secs(60));
        let lookup = SchemaLookup::new(Some(&provider), Duration::from_millis(50));
        assert_eq!(lookup.tags("cpu", &["host"]).await, vec!["host"]);
    }
}
