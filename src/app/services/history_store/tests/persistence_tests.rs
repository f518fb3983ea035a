//! Tests for loading and saving the history file

use super::*;
use crate::Error;
use crate::app::services::history_store::HistoryStore;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_missing_file_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");

    let store = HistoryStore::load(&path).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_save_then_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");

    let mut store = HistoryStore::new(&path);
    store.merge(
        "PAD",
        &create_paddington_route(),
        create_typical_entry("2024-03-11"),
    );
    store.merge(
        "ABW",
        &create_abbey_wood_route(),
        create_test_entry("2024-03-11", vec![]),
    );
    let expected = store.stations().clone();

    let saved_path = store.save().unwrap();
    assert_eq!(saved_path, path);

    let reloaded = HistoryStore::load(&path).unwrap();
    assert_eq!(reloaded.stations(), &expected);

    // Saving an unchanged store reproduces the same document
    let first = fs::read(&path).unwrap();
    reloaded.save().unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_saved_document_shape() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");

    let mut store = HistoryStore::new(&path);
    store.merge(
        "PAD",
        &create_paddington_route(),
        create_typical_entry("2024-03-11"),
    );
    store.save().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    let station = &json["PAD"];
    assert_eq!(station["meta"]["station_code"], "PAD");
    assert_eq!(station["meta"]["station_name"], "London Paddington");
    assert_eq!(station["meta"]["toc"], "XR");
    assert!(station["meta"]["destination"].is_null());

    let entry = &station["dates"]["2024-03-11"];
    assert_eq!(entry["date"], "2024-03-11");
    assert_eq!(entry["analysis"]["total_services"], 3);
    assert_eq!(entry["analysis"]["total_ran"], 2);
    assert_eq!(entry["analysis"]["total_ontime"], 1);

    let not_run = &entry["services"][2];
    assert_eq!(not_run["planned"], "0915");
    assert!(not_run["actual"].is_null());
    assert!(not_run["delay"].is_null());
    assert_eq!(not_run["ran"], false);

    // Pretty output uses a four-space indent
    assert!(content.contains("\n    \"PAD\": {"));
}

#[test]
fn test_compact_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");

    let mut store = HistoryStore::new(&path).with_pretty(false);
    store.merge(
        "PAD",
        &create_paddington_route(),
        create_typical_entry("2024-03-11"),
    );
    store.save().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains('\n'));
    assert!(HistoryStore::load(&path).unwrap().station("PAD").is_some());
}

#[test]
fn test_save_replaces_existing_file_without_leftovers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, "{}").unwrap();

    let mut store = HistoryStore::load(&path).unwrap();
    store.merge(
        "PAD",
        &create_paddington_route(),
        create_typical_entry("2024-03-11"),
    );
    store.save().unwrap();

    let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(
        entries.len(),
        1,
        "temporary file should be renamed over the target"
    );
    assert!(HistoryStore::load(&path).unwrap().station("PAD").is_some());
}

#[test]
fn test_save_creates_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("public").join("data.json");

    let mut store = HistoryStore::load(&path).unwrap();
    store.merge(
        "ABW",
        &create_abbey_wood_route(),
        create_typical_entry("2024-03-11"),
    );
    store.save().unwrap();

    assert!(path.exists());
}

#[test]
fn test_load_invalid_document_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let result = HistoryStore::load(&path);
    assert!(matches!(result, Err(Error::HistoryStore { .. })));
}

#[test]
fn test_load_legacy_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output.json");
    let legacy = r#"{
        "PDX": {
            "meta": {
                "station": "PDX",
                "origin": "Abbey Wood (Crossrail)",
                "destination": "Terminates here"
            },
            "dates": {
                "2021-06-01": {
                    "date": "2021-06-01",
                    "analysis": {
                        "total_services": 2,
                        "total_ran": 1,
                        "total_ontime": 1,
                        "percent_ran": 0.5,
                        "percent_ontime": 0.5
                    },
                    "services": [
                        {"planned": "0815", "actual": "0816", "ran": true, "ontime": true, "delay": 1.0},
                        {"planned": "0830", "actual": null, "ran": false, "ontime": false, "delay": null}
                    ]
                }
            }
        }
    }"#;
    fs::write(&path, legacy).unwrap();

    let store = HistoryStore::load(&path).unwrap();
    let history = store.station("PDX").unwrap();
    assert_eq!(history.meta.station_code, "PDX");
    assert_eq!(history.meta.toc, None);

    let entry = store.date_entry("PDX", date("2021-06-01")).unwrap();
    assert_eq!(entry.services.len(), 2);
    assert_eq!(entry.services[1].delay, None);
    assert_eq!(entry.analysis.percent_ran, Some(0.5));
}
