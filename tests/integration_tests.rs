//! End-to-end tests over the in-memory engine
//!
//! Exercises the full discover -> annotate -> sync flow the way the CLI
//! drives it, asserting on the emitted Singer message sequence.

use serde_json::{json, Value};
use tap_athena::catalog::Catalog;
use tap_athena::config::AthenaConfig;
use tap_athena::connector::AthenaConnector;
use tap_athena::engine::{MemoryEngine, MemoryTable};
use tap_athena::messages::MessageWriter;
use tap_athena::state::StateManager;

fn test_config(paginate: bool) -> AthenaConfig {
    AthenaConfig::from_value(&json!({
        "aws_access_key_id": "AKIATEST",
        "aws_secret_access_key": "sekrit",
        "aws_region": "us-east-1",
        "s3_staging_dir": "s3://bucket/staging/",
        "schema_name": "demo",
        "paginate": paginate,
        "paginate_batch_size": 2,
    }))
    .unwrap()
}

fn test_engine() -> MemoryEngine {
    let mut users = MemoryTable::new("demo", "users")
        .with_column("id", "bigint", false)
        .with_column("updated_at", "timestamp", false)
        .with_column("name", "varchar", true);
    for id in 1..=5u64 {
        users = users.with_row(json!({
            "id": id,
            "updated_at": format!("2024-01-0{id}T00:00:00"),
            "name": format!("user-{id}"),
        }));
    }
    MemoryEngine::new()
        .with_table(users)
        .with_table(MemoryTable::new("demo", "empty").with_column("id", "bigint", false))
}

/// Run a sync and return the emitted messages, parsed
fn run_sync(
    connector: &AthenaConnector,
    catalog: &Catalog,
    state: &mut StateManager,
) -> Vec<Value> {
    let mut writer = MessageWriter::new(Vec::new());
    connector.sync(catalog, state, &mut writer).unwrap();

    let output = String::from_utf8(writer.into_inner()).unwrap();
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn records_for<'a>(messages: &'a [Value], stream: &str) -> Vec<&'a Value> {
    messages
        .iter()
        .filter(|m| m["type"] == "RECORD" && m["stream"] == stream)
        .map(|m| &m["record"])
        .collect()
}

#[test]
fn test_discover_then_full_sync() {
    let engine = test_engine();
    let connector = AthenaConnector::with_engine(test_config(false), Box::new(engine));

    let catalog = connector.discover().unwrap();
    assert_eq!(catalog.streams.len(), 2);

    let mut state = StateManager::in_memory();
    let messages = run_sync(&connector, &catalog, &mut state);

    // Per stream: SCHEMA, records, STATE.
    assert_eq!(messages[0]["type"], "SCHEMA");
    assert_eq!(messages[0]["stream"], "demo-users");
    assert_eq!(
        messages[0]["schema"]["properties"]["updated_at"]["format"],
        "date-time"
    );

    let users = records_for(&messages, "demo-users");
    assert_eq!(users.len(), 5);
    assert_eq!(users[0]["name"], "user-1");

    assert!(records_for(&messages, "demo-empty").is_empty());

    let state_messages: Vec<&Value> =
        messages.iter().filter(|m| m["type"] == "STATE").collect();
    assert_eq!(state_messages.len(), 2);

    // Full-table streams record no bookmarks.
    assert!(state.state().bookmarks.is_empty());
}

#[test]
fn test_incremental_sync_advances_and_reuses_bookmark() {
    let engine = test_engine();
    let connector = AthenaConnector::with_engine(test_config(false), Box::new(engine));

    let mut catalog = connector.discover().unwrap();
    let users = catalog.get_stream("demo-users").unwrap().clone();
    catalog.streams = vec![users.with_replication_key("updated_at")];

    let mut state = StateManager::in_memory();
    let messages = run_sync(&connector, &catalog, &mut state);
    assert_eq!(records_for(&messages, "demo-users").len(), 5);
    assert_eq!(
        state.state().get_bookmark("demo-users"),
        Some(&json!("2024-01-05T00:00:00"))
    );

    // Second run resumes from the bookmark; the boundary row is re-included.
    let messages = run_sync(&connector, &catalog, &mut state);
    let records = records_for(&messages, "demo-users");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 5);
}

#[test]
fn test_paginated_sync_matches_unpaginated() {
    let annotate = |connector: &AthenaConnector| {
        let mut catalog = connector.discover().unwrap();
        let users = catalog.get_stream("demo-users").unwrap().clone();
        catalog.streams = vec![users.with_replication_key("id")];
        catalog
    };

    let plain = AthenaConnector::with_engine(test_config(false), Box::new(test_engine()));
    let catalog = annotate(&plain);
    let expected = run_sync(&plain, &catalog, &mut StateManager::in_memory());

    let paginated = AthenaConnector::with_engine(test_config(true), Box::new(test_engine()));
    let catalog = annotate(&paginated);
    let actual = run_sync(&paginated, &catalog, &mut StateManager::in_memory());

    assert_eq!(
        records_for(&actual, "demo-users"),
        records_for(&expected, "demo-users")
    );
}

#[test]
fn test_deselected_streams_are_skipped() {
    let engine = test_engine();
    let connector = AthenaConnector::with_engine(test_config(false), Box::new(engine));

    let mut catalog = connector.discover().unwrap();
    for stream in &mut catalog.streams {
        if stream.tap_stream_id == "demo-users" {
            stream.selected = false;
        }
    }

    let messages = run_sync(&connector, &catalog, &mut StateManager::in_memory());
    assert!(records_for(&messages, "demo-users").is_empty());
    assert!(messages
        .iter()
        .all(|m| m["stream"] != "demo-users" || m["type"] == "STATE"));
}

#[test]
fn test_state_survives_between_runs_via_file() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");

    let connector =
        AthenaConnector::with_engine(test_config(false), Box::new(test_engine()));
    let mut catalog = connector.discover().unwrap();
    let users = catalog.get_stream("demo-users").unwrap().clone();
    catalog.streams = vec![users.with_replication_key("id")];

    let mut state = StateManager::from_file(&state_path).unwrap();
    run_sync(&connector, &catalog, &mut state);

    // A fresh manager sees the bookmark the sync persisted.
    let reloaded = StateManager::from_file(&state_path).unwrap();
    assert_eq!(reloaded.state().get_bookmark("demo-users"), Some(&json!(5)));
}
