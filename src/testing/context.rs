use crate::testing::*;
use crate::{MemorySchema, Measurement};
use test_context::AsyncTestContext;
pub use test_context::test_context;

/// Populated in-memory schema covering the three dialects:
/// - `telegraf` (InfluxDB database / Flux bucket): `cpu`, `mem`, `disk`;
/// - `root.sg1` (IoTDB storage group): devices `d1`, `d2` with sensors.
pub struct SchemaFixture {
    pub schema: MemorySchema,
}

impl AsyncTestContext for SchemaFixture {
    async fn setup() -> Self {
        crate::testing::common_init();
        let schema = MemorySchema::new();
        for measurement in [
            Measurement::new_with(
                "cpu",
                ["usage_idle", "usage_system", "usage_user"],
                ["host", "region", "cpu"],
            ),
            Measurement::new_with("mem", ["used", "free", "used_percent"], ["host"]),
            Measurement::new_with("disk", ["used", "inodes_free"], ["host", "path"]),
        ] {
            schema.insert_measurement("telegraf", measurement).await;
        }
        for (device, sensors) in [
            ("root.sg1.d1", ["s1", "s2", "temperature"]),
            ("root.sg1.d2", ["s1", "s3", "status"]),
        ] {
            schema.insert_device("root.sg1", device).await;
            schema
                .insert_measurement("root.sg1", Measurement::new_with(device, sensors, Vec::<String>::new()))
                .await;
        }
        Self { schema }
    }
}
