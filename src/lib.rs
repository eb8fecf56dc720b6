//! Lampa Desktop Core Library
//!
//! Non-UI core of the Lampa desktop shell: the pieces a windowing host calls
//! into when it starts up, saves its geometry, exports or imports a profile,
//! or checks for a newer release.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`settings`] - Persistent key-value settings store with pluggable backends
//! - [`version`] - Dotted version string comparison
//! - [`profile`] - Profile export/import (settings + page local storage)
//! - [`update`] - Release metadata fetch and update scheduling
//! - [`page_storage`] - Hosted page local-storage collaborator
//! - [`bridge`] - Typed request/response contract between page and host
//! - [`paths`] - Platform config directory resolution

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod page_storage;
pub mod paths;
pub mod profile;
pub mod settings;
#[cfg(test)]
pub mod test_support;
pub mod update;
pub(crate) mod user_agent;
pub mod version;

/// Application version reported to the release checker and stamped into profiles.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use bridge::{Bridge, BridgeError, BridgeRequest, BridgeResponse};
pub use page_storage::{
    JsonFilePageStorage, LocalStorageSnapshot, MemoryPageStorage, PageStorage, PageStorageError,
};
pub use paths::{default_app_config_dir, resolve_app_config_dir};
pub use profile::{
    AppliedCounts, DEFAULT_PROFILE_FILENAME, ProfileDocument, ProfileError, ProfileImport,
    apply_import, export_profile, import_profile, read_profile, write_profile,
};
pub use settings::{
    DEFAULT_START_URL, JsonFileBackend, MemoryBackend, SettingsBackend, SettingsError,
    SettingsMap, SettingsStore, WindowBounds,
};
pub use update::{
    CheckFailure, DEFAULT_CHECK_INTERVAL, DEFAULT_RELEASE_API_BASE, DEFAULT_RELEASE_REPO,
    DEFAULT_UPDATE_TIMEOUT, ReleaseDescriptor, UpdateChecker, UpdateResult, UpdateScheduler,
    UpdateState,
};
pub use version::{compare_versions, strip_tag_prefix};
