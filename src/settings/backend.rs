//! Persistence backends for the settings store.
//!
//! The store only needs to load the whole mapping once and save the whole
//! mapping after each mutation, so backends deal in complete snapshots.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::SettingsMap;
use super::error::SettingsError;
use crate::paths::replace_file;

/// File name of the settings document inside the app config directory.
pub const SETTINGS_FILE_NAME: &str = "config.json";

/// Durable storage for a [`SettingsMap`].
pub trait SettingsBackend: Send + Sync + fmt::Debug {
    /// Loads the persisted mapping. A store that was never written loads empty.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Persistence`] when the backing data cannot be
    /// read or does not hold a JSON object.
    fn load(&self) -> Result<SettingsMap, SettingsError>;

    /// Replaces the persisted mapping with `values`. Must be durable on return.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Persistence`] when the write fails.
    fn save(&self, values: &SettingsMap) -> Result<(), SettingsError>;
}

/// Ephemeral backend that keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saved: Mutex<SettingsMap>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that loads `values` as if they had been persisted earlier.
    #[must_use]
    pub fn with_values(values: SettingsMap) -> Self {
        Self {
            saved: Mutex::new(values),
        }
    }

    /// Returns the most recently saved snapshot.
    #[must_use]
    pub fn saved(&self) -> SettingsMap {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<SettingsMap, SettingsError> {
        Ok(self.saved())
    }

    fn save(&self, values: &SettingsMap) -> Result<(), SettingsError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = values.clone();
        Ok(())
    }
}

/// Backend persisting the mapping as a pretty-printed JSON object on disk.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Creates a backend for an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a backend for `config.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SETTINGS_FILE_NAME))
    }

    /// Returns the settings file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsBackend for JsonFileBackend {
    fn load(&self) -> Result<SettingsMap, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No settings file yet; starting empty");
            return Ok(SettingsMap::new());
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| SettingsError::io(&self.path, "failed to read settings file", e))?;
        if raw.trim().is_empty() {
            return Ok(SettingsMap::new());
        }

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Object(values)) => Ok(values),
            Ok(_) => Err(SettingsError::persistence(
                &self.path,
                "settings file does not contain a JSON object",
            )),
            Err(e) => Err(SettingsError::persistence(
                &self.path,
                format!("settings file is not valid JSON: {e}"),
            )),
        }
    }

    fn save(&self, values: &SettingsMap) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::io(parent, "failed to create settings directory", e))?;
        }

        let payload = serde_json::to_vec_pretty(values).map_err(|e| {
            SettingsError::persistence(&self.path, format!("failed to encode settings: {e}"))
        })?;

        replace_file(&self.path, &payload)
            .map_err(|e| SettingsError::io(&self.path, "failed to write settings file", e))?;

        debug!(path = %self.path.display(), keys = values.len(), "Settings saved");
        Ok(())
    }
}
