//! Profile export and import.
//!
//! A profile bundles a copy of the settings store with the hosted page's
//! local storage so a user can move their setup between machines:
//!
//! ```json
//! {
//!   "settings": { "startUrl": "http://lampa.mx" },
//!   "localStorage": { "favorite": "{...}" },
//!   "exportDate": "2026-10-16T09:30:00.000Z",
//!   "appVersion": "1.0.0"
//! }
//! ```
//!
//! Export and import are pure transformations; reading and writing the file
//! and applying the result to live state are separate steps so each can be
//! tested on its own.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::page_storage::{LocalStorageSnapshot, PageStorage, PageStorageError};
use crate::settings::{SettingsError, SettingsMap, SettingsStore};

/// Suggested file name offered by save dialogs.
pub const DEFAULT_PROFILE_FILENAME: &str = "lampa-profile.json";

/// Errors raised while exporting, reading or importing a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The document is not a JSON object, or one of its payload fields has the wrong type.
    #[error("malformed profile: {reason}\n  Suggestion: choose a file created by \"Save profile\"")]
    MalformedProfile { reason: String },

    /// The profile file could not be read or written.
    #[error("profile file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile file is not valid JSON.
    #[error("profile file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The profile could not be encoded.
    #[error("failed to encode profile: {0}")]
    Encode(#[source] serde_json::Error),

    /// Applying settings failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Applying page storage failed.
    #[error(transparent)]
    PageStorage(#[from] PageStorageError),
}

impl ProfileError {
    fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedProfile {
            reason: reason.into(),
        }
    }
}

/// Exported profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub settings: SettingsMap,
    pub local_storage: LocalStorageSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

/// What an imported profile asks the caller to apply.
///
/// `None` means the document had no such section and nothing should be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileImport {
    pub settings: Option<SettingsMap>,
    pub local_storage: Option<LocalStorageSnapshot>,
}

/// Number of entries written by [`apply_import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedCounts {
    pub settings: usize,
    pub local_storage: usize,
}

/// Builds a profile document stamped with the current UTC time.
#[must_use]
pub fn export_profile(
    settings: SettingsMap,
    local_storage: LocalStorageSnapshot,
    app_version: &str,
) -> ProfileDocument {
    ProfileDocument {
        settings,
        local_storage,
        export_date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        app_version: Some(app_version.to_string()),
    }
}

/// Extracts the settings and local storage to apply from a parsed profile.
///
/// The document must be a JSON object. Missing (or `null`) `settings` and
/// `localStorage` sections are reported as `None`; present sections must be
/// objects. Local-storage values that are not strings are kept as their
/// JSON text. Unknown top-level keys are ignored.
///
/// # Errors
///
/// Returns [`ProfileError::MalformedProfile`] for non-object documents or
/// sections of the wrong type.
pub fn import_profile(document: &Value) -> Result<ProfileImport, ProfileError> {
    let Value::Object(fields) = document else {
        return Err(ProfileError::malformed(format!(
            "expected a JSON object, found {}",
            json_type_name(document)
        )));
    };

    let settings = match fields.get("settings") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => {
            return Err(ProfileError::malformed(format!(
                "`settings` must be an object, found {}",
                json_type_name(other)
            )));
        }
    };

    let local_storage = match fields.get("localStorage") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(
            map.iter()
                .map(|(key, value)| (key.clone(), storage_text(value)))
                .collect(),
        ),
        Some(other) => {
            return Err(ProfileError::malformed(format!(
                "`localStorage` must be an object, found {}",
                json_type_name(other)
            )));
        }
    };

    debug!(
        has_settings = settings.is_some(),
        has_local_storage = local_storage.is_some(),
        "Profile document accepted"
    );
    Ok(ProfileImport {
        settings,
        local_storage,
    })
}

/// Applies an imported profile to the live settings store and page storage.
///
/// Settings are merged with [`SettingsStore::set_all`]; keys the profile does
/// not mention keep their current values.
///
/// # Errors
///
/// Returns [`ProfileError::Settings`] or [`ProfileError::PageStorage`] when
/// either collaborator rejects the write. Settings are applied first.
pub fn apply_import(
    import: ProfileImport,
    store: &SettingsStore,
    page_storage: &dyn PageStorage,
) -> Result<AppliedCounts, ProfileError> {
    let mut counts = AppliedCounts::default();

    if let Some(settings) = import.settings {
        counts.settings = settings.len();
        store.set_all(settings)?;
    }
    if let Some(entries) = import.local_storage {
        counts.local_storage = entries.len();
        page_storage.apply(&entries)?;
    }

    info!(
        settings = counts.settings,
        local_storage = counts.local_storage,
        "Profile applied"
    );
    Ok(counts)
}

/// Writes `document` to `path` as 2-space indented UTF-8 JSON.
///
/// # Errors
///
/// Returns [`ProfileError::Io`] when the file cannot be written.
pub fn write_profile(path: &Path, document: &ProfileDocument) -> Result<(), ProfileError> {
    let payload = serde_json::to_string_pretty(document).map_err(ProfileError::Encode)?;
    fs::write(path, payload).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Profile saved");
    Ok(())
}

/// Reads and parses a profile file without interpreting it.
///
/// # Errors
///
/// Returns [`ProfileError::Io`] or [`ProfileError::Parse`].
pub fn read_profile(path: &Path) -> Result<Value, ProfileError> {
    let raw = fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ProfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn storage_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::page_storage::MemoryPageStorage;

    fn sample_settings() -> SettingsMap {
        let Value::Object(map) = json!({
            "startUrl": "https://lampa.example",
            "windowBounds": {"width": 1400, "height": 900, "x": 0, "y": 0},
            "skipUpdates": false
        }) else {
            unreachable!()
        };
        map
    }

    fn sample_storage() -> LocalStorageSnapshot {
        [("favorite", r#"{"card":[1,2]}"#), ("lang", "ru")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_export_sets_metadata() {
        let doc = export_profile(sample_settings(), sample_storage(), "1.2.3");
        assert_eq!(doc.app_version.as_deref(), Some("1.2.3"));
        let date = doc.export_date.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&date).is_ok(), "not ISO-8601: {date}");
        assert!(date.ends_with('Z'), "expected UTC suffix: {date}");
    }

    #[test]
    fn test_export_import_round_trip() {
        let doc = export_profile(sample_settings(), sample_storage(), "1.0.0");
        let value = serde_json::to_value(&doc).unwrap();
        let imported = import_profile(&value).unwrap();
        assert_eq!(imported.settings, Some(sample_settings()));
        assert_eq!(imported.local_storage, Some(sample_storage()));
    }

    #[test]
    fn test_export_uses_camel_case_fields() {
        let doc = export_profile(SettingsMap::new(), LocalStorageSnapshot::new(), "1.0.0");
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("localStorage").is_some());
        assert!(value.get("exportDate").is_some());
        assert!(value.get("appVersion").is_some());
    }

    #[test]
    fn test_import_rejects_non_objects() {
        for bad in [json!(null), json!("string"), json!(7), json!([1, 2]), json!(true)] {
            let err = import_profile(&bad).unwrap_err();
            assert!(
                matches!(err, ProfileError::MalformedProfile { .. }),
                "expected MalformedProfile for {bad}"
            );
        }
    }

    #[test]
    fn test_import_missing_sections_apply_nothing() {
        let imported = import_profile(&json!({"appVersion": "0.9"})).unwrap();
        assert_eq!(imported, ProfileImport::default());

        let imported = import_profile(&json!({"settings": null, "localStorage": null})).unwrap();
        assert_eq!(imported, ProfileImport::default());
    }

    #[test]
    fn test_import_rejects_wrongly_typed_sections() {
        let err = import_profile(&json!({"settings": "oops"})).unwrap_err();
        assert!(err.to_string().contains("`settings` must be an object"), "got: {err}");

        let err = import_profile(&json!({"localStorage": [1]})).unwrap_err();
        assert!(err.to_string().contains("`localStorage`"), "got: {err}");
    }

    #[test]
    fn test_import_stringifies_non_string_storage_values() {
        let imported =
            import_profile(&json!({"localStorage": {"n": 5, "o": {"a": true}, "s": "x"}})).unwrap();
        let storage = imported.local_storage.unwrap();
        assert_eq!(storage["n"], "5");
        assert_eq!(storage["o"], r#"{"a":true}"#);
        assert_eq!(storage["s"], "x");
    }

    #[test]
    fn test_import_ignores_unknown_keys() {
        let imported =
            import_profile(&json!({"settings": {"a": 1}, "schema": 9, "extra": [1]})).unwrap();
        assert_eq!(imported.settings.unwrap().len(), 1);
    }

    #[test]
    fn test_apply_import_is_additive() {
        let store = SettingsStore::in_memory();
        store.set("skipUpdates", json!(true)).unwrap();
        let page = MemoryPageStorage::new();

        let imported =
            import_profile(&json!({"settings": {"startUrl": "https://new.example"}})).unwrap();
        let counts = apply_import(imported, &store, &page).unwrap();

        assert_eq!(counts, AppliedCounts { settings: 1, local_storage: 0 });
        assert_eq!(store.get("skipUpdates", json!(false)), json!(true));
        assert_eq!(store.start_url(), "https://new.example");
        assert!(page.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_profile_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_PROFILE_FILENAME);
        let doc = export_profile(sample_settings(), sample_storage(), "1.0.0");
        write_profile(&path, &doc).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n  \""), "expected 2-space indent: {raw}");

        let value = read_profile(&path).unwrap();
        let parsed: ProfileDocument = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_read_profile_reports_parse_and_io_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");
        assert!(matches!(read_profile(&missing).unwrap_err(), ProfileError::Io { .. }));

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        assert!(matches!(read_profile(&broken).unwrap_err(), ProfileError::Parse { .. }));
    }
}
