#![cfg(test)]
use crate::*;
use rstest::rstest;
use std::time::Duration;

/// Build an in-memory schema with the provided measurements, all in `database`.
async fn schema(database: &str, measurements: &[(&str, Vec<&str>, Vec<&str>)]) -> MemorySchema {
    let schema = MemorySchema::new();
    for (name, fields, tags) in measurements {
        schema
            .insert_measurement(
                database,
                Measurement::new_with(*name, fields.iter().copied(), tags.iter().copied()),
            )
            .await;
    }
    schema
}

/// Build an IoTDB storage group whose devices double as measurements holding
/// their sensors.
async fn storage_group(group: &str, devices: &[(&str, Vec<&str>)]) -> MemorySchema {
    let schema = MemorySchema::new();
    for (device, sensors) in devices {
        schema.insert_device(group, *device).await;
        schema
            .insert_measurement(
                group,
                Measurement::new_with(*device, sensors.iter().copied(), Vec::<String>::new()),
            )
            .await;
    }
    schema
}

/// Run the dialect engine at `(line, column)`, or at the end of `text`.
async fn complete(
    language: Language,
    text: &str,
    at: Option<(usize, usize)>,
    database: Option<&str>,
    schema: &MemorySchema,
) -> Vec<SmartSuggestion> {
    let toolchain = Toolchain::of(language);
    let cursor = at.map_or_else(|| Cursor::end_of(text), |(line, column)| Cursor::new(line, column));
    let ctx = CompletionContext::new(text, cursor, toolchain.lexicon).with_database(database);
    let lookup = SchemaLookup::new(Some(schema), Duration::from_secs(1));
    (toolchain.suggest)(&ctx, lookup).await
}

fn of_kind(suggestions: &[SmartSuggestion], kind: SuggestionKind) -> Vec<&str> {
    suggestions
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.text.as_str())
        .collect()
}

fn weather() -> Vec<(&'static str, Vec<&'static str>, Vec<&'static str>)> {
    vec![
        ("weather", vec!["temp", "humidity"], vec!["location"]),
        ("air", vec!["pm25"], vec!["station"]),
    ]
}

#[cfg(test)]
mod measurement_testing {
    use super::*;

    #[rstest]
    // Case 1: every measurement of the connected database, sorted
    #[case("SELECT * FROM ", vec!["air", "weather"])]
    // Case 2: filtered by the word being typed
    #[case("SELECT * FROM w", vec!["weather"])]
    // Case 3: case-insensitive prefix
    #[case("SELECT * FROM AI", vec!["air"])]
    // Case 4: INTO targets are measurements too
    #[case("SELECT * INTO ", vec!["air", "weather"])]
    #[tokio::test]
    async fn should_recommend_measurements(#[case] text: &str, #[case] expected: Vec<&str>) {
        // When
        let schema = schema("telegraf", &weather()).await;

        // Then
        let result = complete(Language::InfluxQL, text, None, Some("telegraf"), &schema).await;

        // Should
        assert_eq!(of_kind(&result, SuggestionKind::Table), expected);
        assert!(result.iter().all(|s| s.kind == SuggestionKind::Table));
    }

    #[tokio::test]
    async fn unknown_database_falls_back_to_examples() {
        let schema = schema("telegraf", &weather()).await;
        let result = complete(Language::InfluxQL, "SELECT * FROM ", None, Some("missing"), &schema).await;
        assert!(of_kind(&result, SuggestionKind::Table).contains(&"cpu"));
        assert!(!of_kind(&result, SuggestionKind::Table).contains(&"weather"));
    }
}

#[cfg(test)]
mod column_testing {
    use super::*;

    #[rstest]
    // Case 1: select list before FROM
    #[case("SELECT  FROM weather", (1, 8), vec!["humidity", "location", "temp", "time"])]
    // Case 2: WHERE clause after the caret does not hide the measurement
    #[case("SELECT  FROM weather WHERE temp > 0", (1, 8), vec!["humidity", "location", "temp", "time"])]
    // Case 3: second statement sees its own measurement
    #[case("SELECT  FROM weather; SELECT  FROM air", (1, 30), vec!["pm25", "station", "time"])]
    // Case 4: no FROM yet yields only time
    #[case("SELECT ", (1, 8), vec!["time"])]
    // Case 5: measurement not in the schema has no columns
    #[case("SELECT  FROM missing", (1, 8), vec!["time"])]
    // Case 6: WHERE operands
    #[case("SELECT temp FROM weather WHERE ", (1, 32), vec!["humidity", "location", "temp", "time"])]
    #[tokio::test]
    async fn should_recommend_columns(
        #[case] text: &str,
        #[case] (line, column): (usize, usize),
        #[case] expected: Vec<&str>,
    ) {
        let schema = schema("telegraf", &weather()).await;
        let result = complete(Language::InfluxQL, text, Some((line, column)), Some("telegraf"), &schema).await;
        assert_eq!(of_kind(&result, SuggestionKind::Column), expected);
    }

    #[tokio::test]
    async fn group_by_offers_tags_and_time() {
        let schema = schema("telegraf", &weather()).await;
        let result = complete(
            Language::InfluxQL,
            "SELECT mean(temp) FROM weather GROUP BY ",
            None,
            Some("telegraf"),
            &schema,
        )
        .await;
        assert_eq!(of_kind(&result, SuggestionKind::Column), vec!["location"]);
        let time = result.iter().find(|s| s.text == "time").expect("time()");
        assert_eq!(time.insert_text, "time(${1:1m})");
    }
}

#[cfg(test)]
mod flux_testing {
    use super::*;

    const SOURCE: &str = "from(bucket: \"telegraf\") |> range(start: -1h) |> filter(fn: (r) => ";

    #[rstest]
    // Case 1: buckets are quoted on insert
    #[case("from(bucket: ", vec!["telegraf"])]
    // Case 2: measurements of the connected bucket
    #[case(
        "from(bucket: \"telegraf\") |> range(start: -1h) |> filter(fn: (r) => r._measurement == ",
        vec!["air", "weather"]
    )]
    // Case 3: fields of the filtered measurement
    #[case(
        "from(bucket: \"telegraf\") |> range(start: -1h) |> filter(fn: (r) => r._measurement == \"weather\" and r._field == ",
        vec!["humidity", "temp"]
    )]
    #[tokio::test]
    async fn should_recommend_values(#[case] text: &str, #[case] expected: Vec<&str>) {
        let schema = schema("telegraf", &weather()).await;
        let result = complete(Language::Flux, text, None, Some("telegraf"), &schema).await;
        assert_eq!(of_kind(&result, SuggestionKind::Value), expected);
        assert!(result.iter().all(|s| s.insert_text == format!("\"{}\"", s.text)));
    }

    #[tokio::test]
    async fn members_include_tags_of_the_filtered_measurement() {
        let schema = schema("telegraf", &weather()).await;
        let text = format!("{SOURCE}r._measurement == \"weather\" and r.lo");
        let result = complete(Language::Flux, &text, None, Some("telegraf"), &schema).await;
        assert_eq!(of_kind(&result, SuggestionKind::Column), vec!["location"]);
    }
}

#[cfg(test)]
mod device_testing {
    use super::*;

    fn devices() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![
            ("root.sg1.d1", vec!["s1", "s2", "temperature"]),
            ("root.sg1.d2", vec!["s1", "s3", "status"]),
        ]
    }

    #[rstest]
    // Case 1: full device paths after FROM
    #[case("SELECT * FROM ", vec!["root.sg1.d1", "root.sg1.d2"])]
    // Case 2: next path segment below a storage group, then wildcards
    #[case("SELECT * FROM root.sg1.", vec!["d1", "d2", "*", "**"])]
    // Case 3: sensors below a device
    #[case("SELECT * FROM root.sg1.d1.", vec!["s1", "s2", "temperature", "*", "**"])]
    // Case 4: partial segment
    #[case("SELECT * FROM root.sg1.d", vec!["d1", "d2"])]
    // Case 5: storage groups after DATABASE
    #[case("DROP DATABASE ", vec!["root.sg1"])]
    #[tokio::test]
    async fn should_recommend_paths(#[case] text: &str, #[case] expected: Vec<&str>) {
        let schema = storage_group("root.sg1", &devices()).await;
        let result = complete(Language::IoTDBSQL, text, None, None, &schema).await;
        let texts: Vec<&str> = result.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, expected);
    }

    #[tokio::test]
    async fn select_list_offers_sensors_of_the_device() {
        let schema = storage_group("root.sg1", &devices()).await;
        let result = complete(Language::IoTDBSQL, "SELECT  FROM root.sg1.d2", Some((1, 8)), None, &schema).await;
        assert_eq!(of_kind(&result, SuggestionKind::Column), vec!["s1", "s3", "status"]);
        assert!(of_kind(&result, SuggestionKind::Function).contains(&"avg"));
    }
}
