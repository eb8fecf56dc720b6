//! When to check for updates, and bookkeeping around each check.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use super::{DEFAULT_CHECK_INTERVAL, UpdateChecker, UpdateResult};
use crate::settings::SettingsStore;

/// Where the scheduler is in its check cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Idle,
    Checking,
    UpToDate,
    UpdateAvailable,
    CheckFailed,
}

impl UpdateState {
    fn reported(result: &UpdateResult) -> Self {
        match result {
            UpdateResult::UpToDate { .. } => Self::UpToDate,
            UpdateResult::UpdateAvailable { .. } => Self::UpdateAvailable,
            UpdateResult::CheckFailed { .. } => Self::CheckFailed,
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Applies the update policy on top of an [`UpdateChecker`].
///
/// - nothing runs while `skipUpdates` is `true`;
/// - a check is due when more than `interval` has passed since `lastUpdateCheck`;
/// - every attempt, successful or not, records `lastUpdateCheck`.
#[derive(Debug)]
pub struct UpdateScheduler {
    checker: UpdateChecker,
    store: Arc<SettingsStore>,
    current_version: String,
    repo: String,
    interval: Duration,
    state: Mutex<UpdateState>,
    last_result: Mutex<Option<UpdateResult>>,
}

impl UpdateScheduler {
    /// Creates a scheduler with the default 24 hour interval.
    pub fn new(
        checker: UpdateChecker,
        store: Arc<SettingsStore>,
        current_version: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            checker,
            store,
            current_version: current_version.into(),
            repo: repo.into(),
            interval: DEFAULT_CHECK_INTERVAL,
            state: Mutex::new(UpdateState::Idle),
            last_result: Mutex::new(None),
        }
    }

    /// Overrides the check interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn state(&self) -> UpdateState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Result of the most recent check in this process.
    #[must_use]
    pub fn last_result(&self) -> Option<UpdateResult> {
        self.last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether an automatic check should run at `now` (epoch milliseconds).
    ///
    /// A `lastUpdateCheck` in the future (clock moved backwards) counts as due.
    #[must_use]
    pub fn is_due(&self, now: i64) -> bool {
        if self.store.skip_updates() {
            return false;
        }
        let Some(last) = self.store.last_update_check() else {
            return true;
        };
        let interval_ms = i64::try_from(self.interval.as_millis()).unwrap_or(i64::MAX);
        last > now || now.saturating_sub(last) > interval_ms
    }

    /// Runs a check unconditionally and records `now` as `lastUpdateCheck`.
    pub async fn run_once(&self, now: i64) -> UpdateResult {
        self.set_state(UpdateState::Checking);
        let result = self
            .checker
            .check_for_updates(&self.current_version, &self.repo)
            .await;

        if let Err(error) = self.store.set_last_update_check(now) {
            warn!(error = %error, "Failed to record update check time");
        }

        self.set_state(UpdateState::reported(&result));
        *self
            .last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
        result
    }

    /// Runs a check only if [`UpdateScheduler::is_due`] says so.
    pub async fn check_if_due(&self, now: i64) -> Option<UpdateResult> {
        if !self.is_due(now) {
            debug!("Update check not due");
            return None;
        }
        Some(self.run_once(now).await)
    }

    /// Hands `result` to the host and returns to `Idle`.
    pub fn report<F: FnMut(&UpdateResult)>(&self, result: &UpdateResult, on_result: &mut F) {
        on_result(result);
        self.set_state(UpdateState::Idle);
    }

    /// Checks once if due, then every interval for the life of the task.
    ///
    /// Returns immediately when updates are skipped at startup. Ticks that
    /// land while the skip flag has been turned on are ignored.
    pub async fn run_forever<F: FnMut(&UpdateResult)>(&self, mut on_result: F) {
        if self.store.skip_updates() {
            info!("Automatic update checks disabled");
            return;
        }

        if let Some(result) = self.check_if_due(now_millis()).await {
            self.report(&result, &mut on_result);
        }

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if self.store.skip_updates() {
                debug!("Skipping scheduled update check");
                continue;
            }
            let result = self.run_once(now_millis()).await;
            self.report(&result, &mut on_result);
        }
    }

    fn set_state(&self, next: UpdateState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(from = ?*state, to = ?next, "Update state");
        *state = next;
    }
}
