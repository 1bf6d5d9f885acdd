use msglimit_core::{MessageLimitSettings, MsgLimitError, SettingsSource};
use msglimit_settings::{FileSettingsStore, SettingsService, SettingsStore, SETTINGS_KEY};
use serde_json::{json, Value};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Helper: create a FileSettingsStore in a temp directory.
async fn temp_store() -> (Arc<FileSettingsStore>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileSettingsStore::new(tmp.path().join("data").join("settings.json"))
        .await
        .unwrap();
    (Arc::new(store), tmp)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_first_load_creates_file_with_defaults() {
    let (store, _tmp) = temp_store().await;
    assert!(!store.path().exists());

    let service = SettingsService::load(store.clone(), SETTINGS_KEY, Duration::from_millis(10))
        .await
        .unwrap();

    assert_eq!(service.current(), MessageLimitSettings::default());
    assert_eq!(
        read_json(store.path())[SETTINGS_KEY],
        json!({"enabled": false, "quietPrompts": false, "limit": 10, "advanceCount": 1})
    );
}

#[tokio::test]
async fn test_backfill_preserves_other_extensions() {
    let (store, _tmp) = temp_store().await;
    std::fs::write(
        store.path(),
        json!({
            "otherExtension": {"theme": "dark"},
            "messageLimit": {"enabled": true, "limit": 3}
        })
        .to_string(),
    )
    .unwrap();

    let service = SettingsService::load(store.clone(), SETTINGS_KEY, Duration::from_millis(10))
        .await
        .unwrap();
    let settings = service.snapshot();
    assert!(settings.enabled);
    assert_eq!(settings.limit, 3);
    assert!(!settings.quiet_prompts);
    assert_eq!(settings.advance_count.get(), 1);

    let doc = read_json(store.path());
    assert_eq!(doc["otherExtension"], json!({"theme": "dark"}));
    assert_eq!(doc[SETTINGS_KEY]["limit"], json!(3));
    assert_eq!(doc[SETTINGS_KEY]["advanceCount"], json!(1));
    assert_eq!(doc[SETTINGS_KEY]["quietPrompts"], json!(false));
}

#[tokio::test]
async fn test_changes_persist_across_reload() {
    let (store, _tmp) = temp_store().await;
    {
        let service = SettingsService::load(store.clone(), SETTINGS_KEY, Duration::from_millis(10))
            .await
            .unwrap();
        service.set_enabled(true);
        service.set_limit(20);
        service.set_advance_count(NonZeroUsize::new(4).unwrap());
        service.flush().await;
    }

    let reloaded = SettingsService::load(store.clone(), SETTINGS_KEY, Duration::from_millis(10))
        .await
        .unwrap();
    assert_eq!(reloaded.snapshot(), MessageLimitSettings::enabled(20, 4));
}

#[tokio::test]
async fn test_unknown_section_keys_survive_save() {
    let (store, _tmp) = temp_store().await;
    store
        .save_section(
            SETTINGS_KEY,
            json!({"enabled": false, "quietPrompts": false, "limit": 10, "advanceCount": 1, "future": 7}),
        )
        .await
        .unwrap();

    let service = SettingsService::load(store.clone(), SETTINGS_KEY, Duration::from_millis(10))
        .await
        .unwrap();
    service.set_quiet_prompts(true);
    service.flush().await;

    let doc = read_json(store.path());
    assert_eq!(doc[SETTINGS_KEY]["future"], json!(7));
    assert_eq!(doc[SETTINGS_KEY]["quietPrompts"], json!(true));
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let (store, _tmp) = temp_store().await;
    std::fs::write(store.path(), "[1, 2, 3]").unwrap();

    let err = store.load_section(SETTINGS_KEY).await.unwrap_err();
    assert!(matches!(err, MsgLimitError::Settings(_)));

    std::fs::write(store.path(), "{ not json").unwrap();
    let err = SettingsService::load(store.clone(), SETTINGS_KEY, Duration::from_millis(10))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, MsgLimitError::Settings(_)));
}
