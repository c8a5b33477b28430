#![cfg(test)]
crate::reexport!(context);
crate::reexport!(providers);
pub use rstest::*;

pub(crate) fn common_init() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Only initialize once for all tests
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env()) // <- reads RUST_LOG
            .with_test_writer() // ensures it integrates with `cargo test` output
            .init();
    });
}

mod schema_fixture_tests {
    use super::{super::*, *};

    #[test_context(SchemaFixture)]
    #[tokio::test]
    async fn fixture_serves_every_entity(ctx: &mut SchemaFixture) -> Result {
        assert!(ctx.schema.databases().await?.contains(&"telegraf".to_string()));
        assert!(ctx.schema.measurements(Some("telegraf")).await?.contains(&"cpu".to_string()));
        assert_eq!(ctx.schema.devices(Some("root.sg1")).await?, vec!["root.sg1.d1", "root.sg1.d2"]);
        assert!(ctx.schema.tags("cpu").await?.contains(&"host".to_string()));
        Ok(())
    }

    #[rstest]
    #[case("databases")]
    #[case("fields")]
    #[tokio::test]
    async fn failing_schema_always_errors(#[case] entity: &str) {
        let failing = FailingSchema;
        let result = match entity {
            "databases" => failing.databases().await,
            _ => failing.fields("cpu").await,
        };
        assert!(matches!(result, Err(Error::Schema(_))));
    }
}
