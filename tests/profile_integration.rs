//! Integration tests for profile export and import through files.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use lampa_core::{
    APP_VERSION, JsonFilePageStorage, LocalStorageSnapshot, PageStorage, ProfileError,
    SettingsStore, apply_import, export_profile, import_profile, read_profile, write_profile,
};
use serde_json::{Value, json};
use tempfile::TempDir;

#[test]
fn test_profile_round_trip_between_installations() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let profile_path = source.path().join("lampa-profile.json");

    let store = SettingsStore::open_in_dir(source.path()).unwrap();
    store.set_start_url("https://lampa.example").unwrap();
    store.set("theme", json!("dark")).unwrap();
    let page = JsonFilePageStorage::in_dir(source.path());
    let entries: LocalStorageSnapshot = [
        ("favorite".to_string(), r#"{"card":[1,2]}"#.to_string()),
        ("lang".to_string(), "uk".to_string()),
    ]
    .into();
    page.apply(&entries).unwrap();

    let document = export_profile(store.get_all(), page.snapshot().unwrap(), APP_VERSION);
    write_profile(&profile_path, &document).unwrap();

    let target_store = SettingsStore::open_in_dir(target.path()).unwrap();
    target_store.set_skip_updates(true).unwrap();
    let target_page = JsonFilePageStorage::in_dir(target.path());

    let import = import_profile(&read_profile(&profile_path).unwrap()).unwrap();
    let counts = apply_import(import, &target_store, &target_page).unwrap();
    assert_eq!(counts.settings, 2);
    assert_eq!(counts.local_storage, 2);

    let reopened = SettingsStore::open_in_dir(target.path()).unwrap();
    assert_eq!(reopened.start_url(), "https://lampa.example");
    assert_eq!(reopened.get("theme", Value::Null), json!("dark"));
    assert!(reopened.skip_updates(), "keys absent from the profile survive");
    assert_eq!(JsonFilePageStorage::in_dir(target.path()).snapshot().unwrap(), entries);
}

#[test]
fn test_written_profile_has_expected_shape() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("profile.json");
    let mut settings = serde_json::Map::new();
    settings.insert("skipUpdates".to_string(), json!(false));

    write_profile(&path, &export_profile(settings, LocalStorageSnapshot::new(), "1.0.0")).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  \"settings\""), "expected 2-space indentation: {raw}");
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["settings"], json!({"skipUpdates": false}));
    assert_eq!(parsed["localStorage"], json!({}));
    assert_eq!(parsed["appVersion"], json!("1.0.0"));
    assert!(parsed["exportDate"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_import_of_hand_written_profile_stringifies_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manual.json");
    fs::write(
        &path,
        r#"{
            "settings": {"startUrl": "http://lampa.mx/x"},
            "localStorage": {"count": 3, "flag": true, "name": "n"}
        }"#,
    )
    .unwrap();

    let import = import_profile(&read_profile(&path).unwrap()).unwrap();
    let storage = import.local_storage.unwrap();
    assert_eq!(storage["count"], "3");
    assert_eq!(storage["flag"], "true");
    assert_eq!(storage["name"], "n");
}

#[test]
fn test_invalid_profile_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.json");
    fs::write(&path, "not json at all").unwrap();
    assert!(matches!(
        read_profile(&path).unwrap_err(),
        ProfileError::Parse { .. }
    ));

    fs::write(&path, r#"["an", "array"]"#).unwrap();
    let document = read_profile(&path).unwrap();
    assert!(matches!(
        import_profile(&document).unwrap_err(),
        ProfileError::MalformedProfile { .. }
    ));

    assert!(matches!(
        read_profile(&temp.path().join("missing.json")).unwrap_err(),
        ProfileError::Io { .. }
    ));
}
