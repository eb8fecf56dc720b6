//! Optional `config.toml` for host defaults.
//!
//! Lives next to the settings file in the app config directory. Every key is
//! optional; a missing file means compile-time defaults.
//!
//! ```toml
//! default_url = "http://lampa.mx"
//! release_repo = "owner/name"
//! release_api_base = "https://api.github.com"
//! update_timeout_secs = 10
//! update_interval_hours = 24
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use lampa_core::settings::validate_start_url;
use lampa_core::{
    DEFAULT_CHECK_INTERVAL, DEFAULT_RELEASE_API_BASE, DEFAULT_START_URL, DEFAULT_UPDATE_TIMEOUT,
    update::DEFAULT_RELEASE_REPO,
};

/// File name of the host config inside the app config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Parsed file configuration; `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Start page used when no `startUrl` is saved and after a reset.
    pub default_url: Option<String>,
    /// `owner/name` repository polled for releases.
    pub release_repo: Option<String>,
    /// Release API base URL.
    pub release_api_base: Option<String>,
    /// Bound on a single release request, in seconds.
    pub update_timeout_secs: Option<u64>,
    /// Spacing between automatic update checks, in hours.
    pub update_interval_hours: Option<u64>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.default_url {
            validate_start_url(url)
                .with_context(|| "Invalid config value for `default_url`".to_string())?;
        }
        if let Some(repo) = &self.release_repo
            && repo.split('/').filter(|s| !s.is_empty()).count() != 2
        {
            bail!("Invalid config value for `release_repo`: '{repo}'. Expected owner/name");
        }
        if let Some(timeout) = self.update_timeout_secs
            && !(1..=120).contains(&timeout)
        {
            bail!(
                "Invalid config value for `update_timeout_secs`: {timeout}. Expected range: 1..=120"
            );
        }
        if let Some(hours) = self.update_interval_hours
            && !(1..=720).contains(&hours)
        {
            bail!(
                "Invalid config value for `update_interval_hours`: {hours}. Expected range: 1..=720"
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn default_url(&self) -> &str {
        self.default_url.as_deref().unwrap_or(DEFAULT_START_URL)
    }

    #[must_use]
    pub fn release_repo(&self) -> &str {
        self.release_repo.as_deref().unwrap_or(DEFAULT_RELEASE_REPO)
    }

    #[must_use]
    pub fn release_api_base(&self) -> &str {
        self.release_api_base
            .as_deref()
            .unwrap_or(DEFAULT_RELEASE_API_BASE)
    }

    #[must_use]
    pub fn update_timeout(&self) -> Duration {
        self.update_timeout_secs
            .map_or(DEFAULT_UPDATE_TIMEOUT, Duration::from_secs)
    }

    #[must_use]
    pub fn update_interval(&self) -> Duration {
        self.update_interval_hours
            .map_or(DEFAULT_CHECK_INTERVAL, |h| Duration::from_secs(h * 3600))
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: FileConfig,
    pub loaded_from_file: bool,
}

/// Loads `config.toml` from `config_dir` if present.
pub fn load_file_config(config_dir: &Path) -> Result<LoadedConfig> {
    let path = config_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(LoadedConfig {
            path,
            config: FileConfig::default(),
            loaded_from_file: false,
        });
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    Ok(LoadedConfig {
        path,
        config,
        loaded_from_file: true,
    })
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_no = line_index + 1;

        match key {
            "default_url" => {
                cfg.default_url = Some(parse_string_literal(value).with_context(|| {
                    format!("Invalid `default_url` value on line {line_no}")
                })?);
            }
            "release_repo" => {
                cfg.release_repo = Some(parse_string_literal(value).with_context(|| {
                    format!("Invalid `release_repo` value on line {line_no}")
                })?);
            }
            "release_api_base" => {
                cfg.release_api_base = Some(parse_string_literal(value).with_context(|| {
                    format!("Invalid `release_api_base` value on line {line_no}")
                })?);
            }
            "update_timeout_secs" => {
                cfg.update_timeout_secs = Some(parse_integer_u64(value).with_context(|| {
                    format!("Invalid `update_timeout_secs` value on line {line_no}")
                })?);
            }
            "update_interval_hours" => {
                cfg.update_interval_hours = Some(parse_integer_u64(value).with_context(|| {
                    format!("Invalid `update_interval_hours` value on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
# host defaults
release_repo = "someone/lampa-desktop"   # polled for releases
update_timeout_secs = 5
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.release_repo(), "someone/lampa-desktop");
        assert_eq!(cfg.update_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.default_url(), DEFAULT_START_URL);
        assert_eq!(cfg.update_interval(), DEFAULT_CHECK_INTERVAL);
    }

    #[test]
    fn test_parse_config_keeps_hash_inside_string() {
        let cfg = parse_config_str(r#"default_url = "https://lampa.example/#/main""#).unwrap();
        assert_eq!(cfg.default_url(), "https://lampa.example/#/main");
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config_str("colour = \"blue\"").expect_err("unknown key");
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_timeout() {
        let err = parse_config_str("update_timeout_secs = 0").expect_err("zero timeout");
        assert!(format!("{err:#}").contains("update_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_bad_repo_and_url() {
        assert!(parse_config_str(r#"release_repo = "justone""#).is_err());
        assert!(parse_config_str(r#"default_url = "ftp://x""#).is_err());
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("release_repo = a/b").expect_err("unquoted");
        assert!(format!("{err:#}").contains("double-quoted"));
    }

    #[test]
    fn test_load_file_config_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = load_file_config(temp.path()).unwrap();
        assert!(!loaded.loaded_from_file);
        assert_eq!(loaded.config, FileConfig::default());
        assert_eq!(loaded.path, temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_file_config_reads_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "update_interval_hours = 6\n").unwrap();
        let loaded = load_file_config(temp.path()).unwrap();
        assert!(loaded.loaded_from_file);
        assert_eq!(loaded.config.update_interval(), Duration::from_secs(6 * 3600));
    }
}
