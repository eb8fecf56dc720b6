//! Shared helpers for unit tests inside the crate.

#[path = "../../tests/support/socket_guard.rs"]
pub mod socket_guard;

use std::path::PathBuf;
use std::sync::Arc;

use crate::settings::{MemoryBackend, SettingsBackend, SettingsError, SettingsMap};

/// Backend that loads seeded values and refuses every write.
#[derive(Debug, Default)]
pub struct FailingBackend {
    seeded: SettingsMap,
}

impl FailingBackend {
    pub fn with_values(seeded: SettingsMap) -> Self {
        Self { seeded }
    }
}

impl SettingsBackend for FailingBackend {
    fn load(&self) -> Result<SettingsMap, SettingsError> {
        Ok(self.seeded.clone())
    }

    fn save(&self, _values: &SettingsMap) -> Result<(), SettingsError> {
        Err(SettingsError::persistence(
            PathBuf::from("<failing>"),
            "disk is read-only",
        ))
    }
}

/// Lets a test keep a handle on the backend it gave to a store.
#[derive(Debug)]
pub struct SharedBackend(pub Arc<MemoryBackend>);

impl SettingsBackend for SharedBackend {
    fn load(&self) -> Result<SettingsMap, SettingsError> {
        self.0.load()
    }

    fn save(&self, values: &SettingsMap) -> Result<(), SettingsError> {
        self.0.save(values)
    }
}
