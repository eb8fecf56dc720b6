//! Failure reasons for an update check.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Why an update check could not produce a verdict.
///
/// Carried inside [`UpdateResult::CheckFailed`](super::UpdateResult::CheckFailed)
/// rather than returned as an `Err`, so callers always get a result to report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CheckFailure {
    /// Network error, invalid endpoint, or non-2xx HTTP status.
    #[error("failed to fetch release metadata from {url}: {reason}")]
    FetchError {
        url: String,
        /// HTTP status when the server answered.
        status: Option<u16>,
        reason: String,
    },

    /// No response within the configured bound.
    #[error("release metadata request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Unparseable body or missing `tag_name`.
    #[error("release metadata from {url} is malformed: {reason}")]
    MalformedResponse { url: String, reason: String },
}

impl CheckFailure {
    /// Creates a fetch error for a transport failure.
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FetchError {
            url: url.into(),
            status: None,
            reason: reason.into(),
        }
    }

    /// Creates a fetch error for a non-success HTTP status.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        let reason = match status {
            404 => "no published release found (HTTP 404)".to_string(),
            403 | 429 => format!("release API rate limit reached (HTTP {status}); try again later"),
            s if s >= 500 => format!("release API unavailable (HTTP {s}); try again later"),
            s => format!("release API returned HTTP {s}"),
        };
        Self::FetchError {
            url: url.into(),
            status: Some(status),
            reason,
        }
    }

    /// Creates a timeout failure.
    pub fn timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            url: url.into(),
            timeout,
        }
    }

    /// Creates a malformed-response failure.
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether this failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
