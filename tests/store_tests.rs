use std::sync::Arc;
use std::thread;

use serde_json::json;
use tempfile::TempDir;

use relief_planner::error::StorageError;
use relief_planner::store::JsonFileStore;
use relief_planner::traits::{Collection, RegistryStore};

#[test]
fn test_append_and_reload_from_disk() {
    let tmp = TempDir::new().unwrap();

    {
        let store = JsonFileStore::open(tmp.path()).unwrap();
        store
            .append(Collection::Villages, json!({"name": "Gosaba", "lat": 22.165, "lon": 88.807, "needs": "food"}))
            .unwrap();
        store
            .append(Collection::ReliefCenters, json!({"name": "Canning Hub", "lat": 22.31, "lon": 88.66}))
            .unwrap();
    }

    let reopened = JsonFileStore::open(tmp.path()).unwrap();
    let villages = reopened.load(Collection::Villages).unwrap();
    let centers = reopened.load(Collection::ReliefCenters).unwrap();

    assert_eq!(villages.len(), 1);
    assert_eq!(villages[0]["name"], json!("Gosaba"));
    assert_eq!(centers.len(), 1);
    assert_eq!(centers[0]["name"], json!("Canning Hub"));
}

#[test]
fn test_records_stored_verbatim() {
    let tmp = TempDir::new().unwrap();
    let store = JsonFileStore::open(tmp.path()).unwrap();

    // No schema enforcement at the store level.
    let partial = json!({"name": "unfinished", "whatever": [1, 2, 3]});
    store.append(Collection::Villages, partial.clone()).unwrap();

    assert_eq!(store.load(Collection::Villages).unwrap(), vec![partial]);
}

#[test]
fn test_key_order_survives_disk_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = JsonFileStore::open(tmp.path()).unwrap();
    let record: serde_json::Value = serde_json::from_str(r#"{"zeta":1,"name":"Z","alpha":2}"#).unwrap();
    store.append(Collection::Villages, record).unwrap();

    let reopened = JsonFileStore::open(tmp.path()).unwrap();
    let loaded = reopened.load(Collection::Villages).unwrap();
    let keys: Vec<&str> = loaded[0].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "name", "alpha"]);

    let text = std::fs::read_to_string(store.path_for(Collection::Villages)).unwrap();
    assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap(), "{}", text);
}

#[test]
fn test_existing_files_are_kept() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("villages.json"),
        r#"[{"name": "Sagar", "lat": 21.653, "lon": 88.075, "needs": {"food": 40}}]"#,
    )
    .unwrap();

    let store = JsonFileStore::open(tmp.path()).unwrap();
    let villages = store.load(Collection::Villages).unwrap();
    assert_eq!(villages.len(), 1);
    assert_eq!(villages[0]["needs"], json!({"food": 40}));
}

#[test]
fn test_file_is_pretty_printed_array() {
    let tmp = TempDir::new().unwrap();
    let store = JsonFileStore::open(tmp.path()).unwrap();
    store.append(Collection::ReliefCenters, json!({"name": "Kakdwip Hub"})).unwrap();

    let text = std::fs::read_to_string(store.path_for(Collection::ReliefCenters)).unwrap();
    assert!(text.starts_with("[\n  {"), "unexpected layout: {}", text);
    assert!(!tmp.path().join("relief_centers.json.tmp").exists());
}

#[test]
fn test_invalid_json_is_storage_error() {
    let tmp = TempDir::new().unwrap();
    let store = JsonFileStore::open(tmp.path()).unwrap();
    std::fs::write(store.path_for(Collection::Villages), "[{").unwrap();

    assert!(matches!(store.load(Collection::Villages), Err(StorageError::Json { .. })));
    assert!(matches!(
        store.append(Collection::Villages, json!({})),
        Err(StorageError::Json { .. })
    ));
}

#[test]
fn test_concurrent_appends_lose_nothing() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::open(tmp.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..10 {
                    store
                        .append(Collection::Villages, json!({"name": format!("v-{}-{}", worker, i)}))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let villages = store.load(Collection::Villages).unwrap();
    assert_eq!(villages.len(), 80);
    assert!(store.load(Collection::ReliefCenters).unwrap().is_empty());
}
