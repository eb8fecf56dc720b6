//! Persistent key-value settings store.
//!
//! The store maps string keys to arbitrary JSON values and is written through
//! to its [`SettingsBackend`] on every mutation. It is an ordinary owned
//! object: hosts construct one and share it (usually behind an `Arc`) with
//! whatever needs it, and tests construct their own over a [`MemoryBackend`].
//!
//! # Example
//!
//! ```
//! use lampa_core::SettingsStore;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), lampa_core::SettingsError> {
//! let store = SettingsStore::in_memory();
//! assert_eq!(store.get("startUrl", json!("http://lampa.mx")), json!("http://lampa.mx"));
//! store.set("startUrl", json!("https://example.org"))?;
//! assert_eq!(store.get("startUrl", json!(null)), json!("https://example.org"));
//! # Ok(())
//! # }
//! ```

mod backend;
mod bounds;
mod error;

use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::paths::default_app_config_dir;

pub use backend::{JsonFileBackend, MemoryBackend, SETTINGS_FILE_NAME, SettingsBackend};
pub use bounds::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, WindowBounds,
};
pub use error::SettingsError;

/// The persisted mapping: setting name to JSON value.
pub type SettingsMap = serde_json::Map<String, Value>;

/// Start page loaded when no `startUrl` has been saved.
pub const DEFAULT_START_URL: &str = "http://lampa.mx";

/// Well-known setting names.
pub mod keys {
    /// Page loaded into the main window at startup.
    pub const START_URL: &str = "startUrl";
    /// Last main-window geometry.
    pub const WINDOW_BOUNDS: &str = "windowBounds";
    /// Disables automatic update checks when `true`.
    pub const SKIP_UPDATES: &str = "skipUpdates";
    /// Epoch milliseconds of the last update check attempt.
    pub const LAST_UPDATE_CHECK: &str = "lastUpdateCheck";
}

/// Settings store writing through to a pluggable backend.
#[derive(Debug)]
pub struct SettingsStore {
    backend: Box<dyn SettingsBackend>,
    values: RwLock<SettingsMap>,
}

impl SettingsStore {
    /// Opens a store over `backend`, loading whatever it has persisted.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Persistence`] when the backend cannot load.
    pub fn open(backend: impl SettingsBackend + 'static) -> Result<Self, SettingsError> {
        let values = backend.load()?;
        debug!(keys = values.len(), "Settings store opened");
        Ok(Self {
            backend: Box::new(backend),
            values: RwLock::new(values),
        })
    }

    /// Opens a store backed by `config.json` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Persistence`] when an existing file is unreadable or corrupt.
    pub fn open_in_dir(dir: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::open(JsonFileBackend::in_dir(dir))
    }

    /// Opens a store in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ConfigDirUnavailable`] when no config directory
    /// can be determined, or a persistence error from loading.
    pub fn open_default() -> Result<Self, SettingsError> {
        Self::open_in_dir(default_app_config_dir()?)
    }

    /// Creates an empty store that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
            values: RwLock::new(SettingsMap::new()),
        }
    }

    // ==================== Raw key-value API ====================

    /// Returns the value stored under `key`, or `default` if it is absent.
    #[must_use]
    pub fn get(&self, key: &str, default: Value) -> Value {
        self.read().get(key).cloned().unwrap_or(default)
    }

    /// Stores `value` under `key` and persists before returning.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Persistence`] when the backend write fails;
    /// the in-memory value is rolled back in that case.
    pub fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut values = self.write();
        let previous = values.insert(key.to_string(), value);

        if let Err(error) = self.backend.save(&values) {
            match previous {
                Some(previous) => values.insert(key.to_string(), previous),
                None => values.remove(key),
            };
            warn!(key, error = %error, "Setting write failed; rolled back");
            return Err(error);
        }

        debug!(key, "Setting stored");
        Ok(())
    }

    /// Returns a snapshot of every stored key.
    #[must_use]
    pub fn get_all(&self) -> SettingsMap {
        self.read().clone()
    }

    /// Merges `entries` into the store key-by-key and persists once.
    ///
    /// Keys that are stored but absent from `entries` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Persistence`] when the backend write fails;
    /// the store is left exactly as it was before the call.
    pub fn set_all(&self, entries: SettingsMap) -> Result<(), SettingsError> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut values = self.write();
        let snapshot = values.clone();
        let count = entries.len();
        values.extend(entries);

        if let Err(error) = self.backend.save(&values) {
            *values = snapshot;
            warn!(error = %error, "Bulk settings write failed; rolled back");
            return Err(error);
        }

        debug!(keys = count, "Settings merged");
        Ok(())
    }

    /// Removes every key.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Persistence`] when the backend write fails.
    pub fn clear(&self) -> Result<(), SettingsError> {
        let mut values = self.write();
        let snapshot = std::mem::take(&mut *values);

        if let Err(error) = self.backend.save(&values) {
            *values = snapshot;
            return Err(error);
        }

        info!("Settings reset");
        Ok(())
    }

    // ==================== Typed helpers ====================

    /// Reads `key` as `T`, falling back to `default` when absent or of the wrong shape.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.read().get(key).cloned() else {
            return default;
        };
        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(key, error = %error, "Stored setting has unexpected shape; using default");
                default
            }
        }
    }

    /// Serializes `value` and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Serialize`] when `value` cannot be represented
    /// as JSON, or a persistence error from [`SettingsStore::set`].
    pub fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value).map_err(|source| SettingsError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set(key, value)
    }

    /// Returns the saved start URL or [`DEFAULT_START_URL`].
    #[must_use]
    pub fn start_url(&self) -> String {
        self.get_as(keys::START_URL, DEFAULT_START_URL.to_string())
    }

    /// Validates and stores a new start URL.
    ///
    /// Only absolute `http`/`https` URLs are accepted; anything else leaves
    /// the stored value unchanged. The trimmed input is stored as typed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidStartUrl`] for unusable input, or a
    /// persistence error from the write.
    pub fn set_start_url(&self, input: &str) -> Result<Url, SettingsError> {
        let url = validate_start_url(input)?;
        self.set(keys::START_URL, Value::String(input.trim().to_string()))?;
        info!(url = %url, "Start URL changed");
        Ok(url)
    }

    /// Returns the saved window geometry, clamped to the minimum size.
    #[must_use]
    pub fn window_bounds(&self) -> WindowBounds {
        self.get_as(keys::WINDOW_BOUNDS, WindowBounds::default())
            .clamped()
    }

    /// Stores window geometry.
    ///
    /// # Errors
    ///
    /// Returns a persistence error from the write.
    pub fn set_window_bounds(&self, bounds: WindowBounds) -> Result<(), SettingsError> {
        self.set_as(keys::WINDOW_BOUNDS, &bounds)
    }

    /// Whether automatic update checks are disabled.
    #[must_use]
    pub fn skip_updates(&self) -> bool {
        self.get_as(keys::SKIP_UPDATES, false)
    }

    /// Enables or disables automatic update checks.
    ///
    /// # Errors
    ///
    /// Returns a persistence error from the write.
    pub fn set_skip_updates(&self, skip: bool) -> Result<(), SettingsError> {
        self.set(keys::SKIP_UPDATES, Value::Bool(skip))
    }

    /// Epoch milliseconds of the last update check, if one was ever recorded.
    #[must_use]
    pub fn last_update_check(&self) -> Option<i64> {
        self.get_as(keys::LAST_UPDATE_CHECK, None)
    }

    /// Records the time of an update check attempt.
    ///
    /// # Errors
    ///
    /// Returns a persistence error from the write.
    pub fn set_last_update_check(&self, epoch_millis: i64) -> Result<(), SettingsError> {
        self.set(keys::LAST_UPDATE_CHECK, Value::from(epoch_millis))
    }

    fn read(&self) -> RwLockReadGuard<'_, SettingsMap> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SettingsMap> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parses `input` as an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidStartUrl`] describing why the input was rejected.
pub fn validate_start_url(input: &str) -> Result<Url, SettingsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SettingsError::invalid_start_url(input, "URL is empty"));
    }

    let url =
        Url::parse(trimmed).map_err(|e| SettingsError::invalid_start_url(input, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SettingsError::invalid_start_url(
            input,
            format!("unsupported scheme '{other}'"),
        )),
    }
}
