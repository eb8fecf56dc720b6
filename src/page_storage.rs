//! Hosted page local-storage collaborator.
//!
//! The web page owns its `localStorage`; the core only needs to snapshot it
//! for export and merge entries back in on import. A GUI host implements
//! [`PageStorage`] over its web view, the CLI host uses [`JsonFilePageStorage`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::paths::replace_file;

/// Flat string-to-string snapshot of a page's local storage.
pub type LocalStorageSnapshot = BTreeMap<String, String>;

/// File name of the page storage document inside the app config directory.
pub const PAGE_STORAGE_FILE_NAME: &str = "local-storage.json";

/// Errors raised by page storage implementations.
#[derive(Debug, Error)]
pub enum PageStorageError {
    /// Reading or writing the backing file failed.
    #[error("page storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a flat JSON object of strings.
    #[error("page storage at {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Access to the hosted page's local storage.
pub trait PageStorage: Send + Sync + fmt::Debug {
    /// Returns every entry currently stored by the page.
    ///
    /// # Errors
    ///
    /// Returns [`PageStorageError`] when the storage cannot be read.
    fn snapshot(&self) -> Result<LocalStorageSnapshot, PageStorageError>;

    /// Writes `entries` key-by-key; keys not in `entries` are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`PageStorageError`] when the storage cannot be written.
    fn apply(&self, entries: &LocalStorageSnapshot) -> Result<(), PageStorageError>;
}

/// In-memory page storage.
#[derive(Debug, Default)]
pub struct MemoryPageStorage {
    entries: Mutex<LocalStorageSnapshot>,
}

impl MemoryPageStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries(entries: LocalStorageSnapshot) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl PageStorage for MemoryPageStorage {
    fn snapshot(&self) -> Result<LocalStorageSnapshot, PageStorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn apply(&self, entries: &LocalStorageSnapshot) -> Result<(), PageStorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}

/// Page storage kept in a JSON file, used when no web view is attached.
#[derive(Debug, Clone)]
pub struct JsonFilePageStorage {
    path: PathBuf,
}

impl JsonFilePageStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Page storage file `local-storage.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PAGE_STORAGE_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PageStorageError {
        PageStorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PageStorage for JsonFilePageStorage {
    fn snapshot(&self) -> Result<LocalStorageSnapshot, PageStorageError> {
        if !self.path.exists() {
            return Ok(LocalStorageSnapshot::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&raw).map_err(|e| PageStorageError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn apply(&self, entries: &LocalStorageSnapshot) -> Result<(), PageStorageError> {
        let mut merged = self.snapshot()?;
        merged.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let payload =
            serde_json::to_vec_pretty(&merged).map_err(|e| PageStorageError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        replace_file(&self.path, &payload).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), applied = entries.len(), "Page storage updated");
        Ok(())
    }
}
