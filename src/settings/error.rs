//! Error types for the settings module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, persisting or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The backing store could not be read or written.
    #[error("settings persistence failed for {path}: {reason}")]
    Persistence {
        /// The settings file (or `<memory>`) involved.
        path: PathBuf,
        /// What went wrong.
        reason: String,
        /// Underlying I/O error, when there was one.
        #[source]
        source: Option<std::io::Error>,
    },

    /// A value could not be converted to JSON for storage.
    #[error("failed to serialize setting '{key}': {source}")]
    Serialize {
        /// The key being written.
        key: String,
        /// The serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A start URL was rejected before it reached the store.
    #[error(
        "invalid start URL '{url}': {reason}\n  \
         Suggestion: enter a full address such as https://lampa.mx"
    )]
    InvalidStartUrl {
        /// The rejected input.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No suitable user config directory is available.
    #[error("unable to determine config directory (set LAMPA_CONFIG_DIR, XDG_CONFIG_HOME or HOME)")]
    ConfigDirUnavailable,
}

impl SettingsError {
    /// Creates a persistence error carrying an I/O source.
    pub fn io(path: impl Into<PathBuf>, reason: impl Into<String>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Creates a persistence error without an I/O source (e.g. corrupt content).
    pub fn persistence(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates an invalid start URL error.
    pub fn invalid_start_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStartUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
