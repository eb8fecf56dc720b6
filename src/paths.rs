//! Platform config directory resolution.
//!
//! Settings, page storage and the optional `config.toml` all live in one
//! application directory:
//! `$LAMPA_CONFIG_DIR`, else `$XDG_CONFIG_HOME/lampa-desktop`, else
//! `~/.config/lampa-desktop`, else `%APPDATA%/lampa-desktop`.
//!
//! Files in that directory are replaced with [`replace_file`], never
//! rewritten in place.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::settings::SettingsError;

/// Directory name under the platform config root.
pub const APP_DIR_NAME: &str = "lampa-desktop";

/// Environment variable that pins the application config directory directly.
pub const CONFIG_DIR_ENV: &str = "LAMPA_CONFIG_DIR";

/// Resolves the application config directory from the process environment.
///
/// # Errors
///
/// Returns [`SettingsError::ConfigDirUnavailable`] when none of the
/// candidate environment variables are set.
pub fn default_app_config_dir() -> Result<PathBuf, SettingsError> {
    resolve_app_config_dir(
        sanitize_env_path(env::var_os(CONFIG_DIR_ENV)),
        sanitize_env_path(env::var_os("XDG_CONFIG_HOME")),
        sanitize_env_path(env::var_os("HOME")),
        sanitize_env_path(env::var_os("APPDATA")),
    )
}

/// Picks the config directory from explicit candidates, highest priority first.
///
/// # Errors
///
/// Returns [`SettingsError::ConfigDirUnavailable`] when every candidate is `None`.
pub fn resolve_app_config_dir(
    explicit: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
    app_data: Option<PathBuf>,
) -> Result<PathBuf, SettingsError> {
    if let Some(explicit) = explicit {
        return Ok(explicit);
    }
    if let Some(xdg) = xdg_config_home {
        return Ok(xdg.join(APP_DIR_NAME));
    }
    if let Some(home) = home {
        return Ok(home.join(".config").join(APP_DIR_NAME));
    }
    if let Some(app_data) = app_data {
        return Ok(app_data.join(APP_DIR_NAME));
    }

    Err(SettingsError::ConfigDirUnavailable)
}

/// `<name>.tmp` next to `path`; holds the new contents until the rename.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `payload` to a temp sibling of `path` and renames it over `path`.
///
/// A write that fails part-way leaves the previous contents of `path` intact.
pub(crate) fn replace_file(path: &Path, payload: &[u8]) -> io::Result<()> {
    let temp = temp_sibling(path);
    fs::write(&temp, payload)?;
    if let Err(error) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(error);
    }
    Ok(())
}

fn sanitize_env_path(value: Option<OsString>) -> Option<PathBuf> {
    let value = value?;
    if value.to_string_lossy().trim().is_empty() {
        return None;
    }

    Some(PathBuf::from(value))
}
