//! Release metadata fetch and version verdict.

use std::cmp::Ordering;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::CheckFailure;
use super::{DEFAULT_RELEASE_API_BASE, DEFAULT_UPDATE_TIMEOUT, ReleaseDescriptor, UpdateResult};
use crate::user_agent;
use crate::version::compare_versions;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Shape of the release endpoint payload; only `tag_name` is required.
#[derive(Debug, Deserialize)]
struct RawRelease {
    tag_name: Option<String>,
    body: Option<String>,
    html_url: Option<String>,
}

/// Fetches the latest release for a repository and compares it to the running version.
///
/// The checker is cheap to clone and reuses its connection pool across checks.
///
/// # Example
///
/// ```no_run
/// use lampa_core::{UpdateChecker, UpdateResult};
///
/// # async fn example() {
/// let checker = UpdateChecker::new();
/// match checker.check_for_updates("1.0.0", "owner/repo").await {
///     UpdateResult::UpdateAvailable { latest_version, .. } => println!("new: {latest_version}"),
///     UpdateResult::UpToDate { .. } => println!("up to date"),
///     UpdateResult::CheckFailed { reason } => eprintln!("{reason}"),
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: Client,
    api_base: String,
    timeout: Duration,
}

impl Default for UpdateChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateChecker {
    /// Creates a checker against the public release API with the default timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_RELEASE_API_BASE, DEFAULT_UPDATE_TIMEOUT)
            .expect("default update checker configuration must build")
    }

    /// Creates a checker for a custom API base URL and timeout bound.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] if the client cannot be built.
    pub fn with_endpoint(
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Timeout applied to each release request.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Release endpoint URL for `repo` (`owner/name`).
    #[must_use]
    pub fn release_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, repo.trim())
    }

    /// Runs one update check. Never fails: problems become [`UpdateResult::CheckFailed`].
    #[tracing::instrument(skip(self), fields(repo = %repo))]
    pub async fn check_for_updates(&self, current_version: &str, repo: &str) -> UpdateResult {
        match self.fetch_latest_release(repo).await {
            Ok(release) => evaluate_release(current_version, &release),
            Err(reason) => {
                warn!(error = %reason, "Update check failed");
                UpdateResult::CheckFailed { reason }
            }
        }
    }

    /// Fetches and parses the latest release descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailure::Timeout`] when no response arrives in time,
    /// [`CheckFailure::FetchError`] for transport failures, invalid
    /// repository identifiers and non-2xx statuses, and
    /// [`CheckFailure::MalformedResponse`] when the body lacks `tag_name`.
    pub async fn fetch_latest_release(
        &self,
        repo: &str,
    ) -> Result<ReleaseDescriptor, CheckFailure> {
        let url = self.release_url(repo);
        if !is_valid_repo(repo) {
            return Err(CheckFailure::network(
                url,
                format!("invalid repository identifier '{repo}' (expected owner/name)"),
            ));
        }

        debug!(api_url = %url, "Requesting latest release");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|e| self.transport_failure(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckFailure::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_failure(&url, &e))?;
        let raw: RawRelease = serde_json::from_str(&body)
            .map_err(|e| CheckFailure::malformed(&url, format!("body is not release JSON: {e}")))?;

        let tag_name = raw
            .tag_name
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .ok_or_else(|| CheckFailure::malformed(&url, "missing `tag_name`"))?;

        Ok(ReleaseDescriptor {
            tag_name,
            body: raw.body.unwrap_or_default(),
            html_url: raw
                .html_url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| format!("https://github.com/{}/releases/latest", repo.trim())),
        })
    }

    fn transport_failure(&self, url: &str, error: &reqwest::Error) -> CheckFailure {
        if error.is_timeout() {
            CheckFailure::timeout(url, self.timeout)
        } else {
            CheckFailure::network(url, error.to_string())
        }
    }
}

/// Compares the running version against a fetched release.
#[must_use]
pub fn evaluate_release(current_version: &str, release: &ReleaseDescriptor) -> UpdateResult {
    let latest_version = release.latest_version().to_string();
    match compare_versions(current_version, &latest_version) {
        Ordering::Less => {
            info!(current = current_version, latest = %latest_version, "Update available");
            UpdateResult::UpdateAvailable {
                latest_version,
                release_notes: release.body.clone(),
                download_url: release.html_url.clone(),
            }
        }
        Ordering::Equal | Ordering::Greater => {
            debug!(current = current_version, latest = %latest_version, "Already up to date");
            UpdateResult::UpToDate {
                current_version: current_version.to_string(),
                latest_version,
            }
        }
    }
}

fn is_valid_repo(repo: &str) -> bool {
    let mut parts = repo.trim().split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if is_repo_segment(owner) && is_repo_segment(name)
    )
}

fn is_repo_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.chars().all(|c| c == '.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
