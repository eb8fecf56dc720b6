//! CLI command handlers.

mod profile;
mod settings;
mod update;
mod url;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use lampa_core::{JsonFilePageStorage, SettingsStore, default_app_config_dir};
use tracing::debug;

use crate::app_config::{FileConfig, load_file_config};

pub use profile::{run_profile_export_command, run_profile_import_command};
pub use settings::{
    run_settings_get_command, run_settings_reset_command, run_settings_set_command,
    run_settings_show_command,
};
pub use update::{run_update_check_command, run_update_skip_command};
pub use url::run_url_command;

/// Everything a command needs: file config and the two stores.
pub struct HostContext {
    pub file_config: FileConfig,
    pub store: Arc<SettingsStore>,
    pub page_storage: Arc<JsonFilePageStorage>,
}

impl HostContext {
    /// Resolves the config directory and opens the settings and page stores in it.
    pub fn open(config_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => default_app_config_dir()?,
        };
        debug!(config_dir = %config_dir.display(), "Using config directory");

        let loaded = load_file_config(&config_dir)?;
        debug!(
            path = %loaded.path.display(),
            loaded = loaded.loaded_from_file,
            "Host config resolved"
        );
        let store = SettingsStore::open_in_dir(&config_dir).with_context(|| {
            format!("Failed to open settings in '{}'", config_dir.display())
        })?;
        let page_storage = JsonFilePageStorage::in_dir(&config_dir);

        Ok(Self {
            file_config: loaded.config,
            store: Arc::new(store),
            page_storage: Arc::new(page_storage),
        })
    }

    /// Start URL honoring a configured `default_url`.
    #[must_use]
    pub fn start_url(&self) -> String {
        self.store.get_as(
            lampa_core::settings::keys::START_URL,
            self.file_config.default_url().to_string(),
        )
    }
}
