use std::fs;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

use chatdock_core::domain::{BotConfiguration, BotId, Plan};
use chatdock_store::{ConfigurationStore, JsonFileStore, StoreError};

fn bot(id: &str, name: &str) -> BotConfiguration {
    let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).single().expect("timestamp");
    BotConfiguration::new_at(BotId(id.to_string()), name, at)
}

fn write_document(dir: &TempDir, document: &Value) -> JsonFileStore {
    let path = dir.path().join("bots.json");
    fs::write(&path, serde_json::to_vec(document).expect("encode")).expect("write document");
    JsonFileStore::new(path)
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = TempDir::new().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("absent.json"));

    assert!(store.load_all().await.expect("load").is_empty());
}

#[tokio::test]
async fn save_then_load_round_trips_exactly() {
    let dir = TempDir::new().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nested/dir/bots.json"));

    let mut support = bot("bot-support", "Support");
    support.llm_controls.stop_sequences = "a, b ,c".to_string();
    support.settings.plan = Plan::Scale;
    support.branding.show_branding = false;
    let sales = bot("bot-sales", "Sales");

    store.save_all(vec![support.clone(), sales.clone()]).await.expect("save");
    let loaded = store.load_all().await.expect("load");

    assert_eq!(loaded, vec![support, sales]);
    assert!(!dir.path().join("nested/dir/bots.json.tmp").exists());

    let raw: Value =
        serde_json::from_slice(&fs::read(store.path()).expect("read")).expect("parse document");
    assert_eq!(raw["bots"][0]["id"], json!("bot-support"));
    assert_eq!(raw["bots"][0]["llmControls"]["stopSequences"], json!("a, b ,c"));
}

#[tokio::test]
async fn loaded_documents_are_normalized() {
    let dir = TempDir::new().expect("tempdir");
    let mut legacy = serde_json::to_value(bot("bot-legacy", "Legacy")).expect("encode");
    legacy["branding"]["showBranding"] = json!(false);
    legacy["appearance"]["cornerRadius"] = json!(200);
    let store = write_document(&dir, &json!({ "bots": [legacy] }));

    let loaded = store.load_all().await.expect("load");

    assert!(loaded[0].branding.show_branding, "launch plan always shows branding");
    assert_eq!(loaded[0].appearance.corner_radius, 24);
}

#[tokio::test]
async fn duplicate_ids_in_document_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let twin = serde_json::to_value(bot("bot-twin", "Twin")).expect("encode");
    let store = write_document(&dir, &json!({ "bots": [twin.clone(), twin] }));

    let error = store.load_all().await.expect_err("duplicate ids");
    assert!(matches!(error, StoreError::DuplicateId(ref id) if id == "bot-twin"));
}

#[tokio::test]
async fn malformed_colour_fails_decoding() {
    let dir = TempDir::new().expect("tempdir");
    let mut broken = serde_json::to_value(bot("bot-broken", "Broken")).expect("encode");
    broken["appearance"]["primaryColor"] = json!("blue");
    let store = write_document(&dir, &json!({ "bots": [broken] }));

    let error = store.load_all().await.expect_err("invalid colour");
    assert!(matches!(error, StoreError::Decode { .. }), "{error}");
}

#[tokio::test]
async fn helpers_work_over_the_file() {
    let dir = TempDir::new().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("bots.json"));
    let first = bot("bot-1", "One");
    let second = bot("bot-2", "Two");

    store.upsert(first.clone()).await.expect("upsert first");
    store.upsert(second.clone()).await.expect("upsert second");
    let mut renamed = second.clone();
    renamed.name = "Two, renamed".to_string();
    store.upsert(renamed.clone()).await.expect("upsert renamed");

    assert_eq!(store.find(&second.id).await.expect("find"), Some(renamed));
    assert!(store.delete(&first.id).await.expect("delete"));
    assert_eq!(store.load_all().await.expect("load").len(), 1);
}
