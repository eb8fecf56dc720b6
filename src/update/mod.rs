//! Update notifications driven by a release-metadata API.
//!
//! [`UpdateChecker`] performs a single bounded fetch and turns it into an
//! [`UpdateResult`]; [`UpdateScheduler`] decides when to run it (skip flag,
//! 24 hour interval) and records each attempt in the settings store.
//!
//! # Flow
//!
//! ```text
//! Idle -> Checking -> UpToDate | UpdateAvailable | CheckFailed -> (reported) -> Idle
//! ```

mod checker;
mod error;
mod schedule;

use std::time::Duration;

use serde::Serialize;

use crate::version::strip_tag_prefix;

pub use checker::{UpdateChecker, evaluate_release};
pub use error::CheckFailure;
pub use schedule::{UpdateScheduler, UpdateState, now_millis};

/// Public GitHub REST API base.
pub const DEFAULT_RELEASE_API_BASE: &str = "https://api.github.com";

/// Repository whose releases are polled unless `release_repo` is configured.
pub const DEFAULT_RELEASE_REPO: &str = "lampa-desktop/lampa-desktop";

/// Bound on a single release request.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum spacing between automatic checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Metadata describing the latest published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDescriptor {
    /// Release tag, conventionally `v`-prefixed.
    pub tag_name: String,
    /// Changelog text; empty when the release has none.
    pub body: String,
    /// Release page URL.
    pub html_url: String,
}

impl ReleaseDescriptor {
    /// Tag with the leading `v` removed.
    #[must_use]
    pub fn latest_version(&self) -> &str {
        strip_tag_prefix(&self.tag_name)
    }
}

/// Outcome of one update check, ready for the host to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UpdateResult {
    /// The running version is the latest (or newer).
    UpToDate {
        current_version: String,
        latest_version: String,
    },
    /// A newer release exists.
    UpdateAvailable {
        latest_version: String,
        release_notes: String,
        download_url: String,
    },
    /// The check could not complete.
    CheckFailed { reason: CheckFailure },
}

impl UpdateResult {
    /// Whether the host should prompt the user.
    #[must_use]
    pub fn should_prompt(&self) -> bool {
        matches!(self, Self::UpdateAvailable { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_release_descriptor_strips_prefix() {
        let release = ReleaseDescriptor {
            tag_name: "v1.4.2".to_string(),
            body: String::new(),
            html_url: String::new(),
        };
        assert_eq!(release.latest_version(), "1.4.2");
    }

    #[test]
    fn test_update_result_serializes_camel_case() {
        let result = UpdateResult::UpdateAvailable {
            latest_version: "1.1.0".to_string(),
            release_notes: "fixes".to_string(),
            download_url: "https://example.com".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "updateAvailable");
        assert_eq!(value["latestVersion"], "1.1.0");
        assert_eq!(value["downloadUrl"], "https://example.com");
        assert!(result.should_prompt());
    }
}
