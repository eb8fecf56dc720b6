//! Update command handlers: check and skip.

use anyhow::{Result, bail};
use lampa_core::update::now_millis;
use lampa_core::{APP_VERSION, UpdateChecker, UpdateResult, UpdateScheduler};
use tracing::debug;

use super::HostContext;
use crate::cli::Toggle;

pub async fn run_update_check_command(ctx: &HostContext, force: bool) -> Result<()> {
    let config = &ctx.file_config;
    let checker = UpdateChecker::with_endpoint(config.release_api_base(), config.update_timeout())?;
    let scheduler = UpdateScheduler::new(
        checker,
        ctx.store.clone(),
        APP_VERSION,
        config.release_repo(),
    )
    .with_interval(config.update_interval());

    let now = now_millis();
    let result = if force {
        scheduler.run_once(now).await
    } else if ctx.store.skip_updates() {
        println!("Automatic update checks are off (use --force or `lampa update skip off`).");
        return Ok(());
    } else if let Some(result) = scheduler.check_if_due(now).await {
        result
    } else {
        println!("Checked recently; next automatic check is not due yet (use --force).");
        return Ok(());
    };

    let mut outcome = Ok(());
    scheduler.report(&result, &mut |result: &UpdateResult| {
        outcome = present(result);
    });
    debug!(state = ?scheduler.state(), "Update check reported");
    outcome
}

pub fn run_update_skip_command(ctx: &HostContext, state: Toggle) -> Result<()> {
    let skip = state == Toggle::On;
    ctx.store.set_skip_updates(skip)?;
    if skip {
        println!("Automatic update checks disabled.");
    } else {
        println!("Automatic update checks enabled.");
    }
    Ok(())
}

fn present(result: &UpdateResult) -> Result<()> {
    match result {
        UpdateResult::UpToDate {
            current_version,
            latest_version,
        } => {
            println!("Up to date (installed {current_version}, latest {latest_version}).");
            Ok(())
        }
        UpdateResult::UpdateAvailable {
            latest_version,
            release_notes,
            download_url,
        } => {
            println!("Update available: {latest_version} (installed {APP_VERSION})");
            println!("Download: {download_url}");
            if !release_notes.trim().is_empty() {
                println!();
                println!("{}", release_notes.trim());
            }
            Ok(())
        }
        UpdateResult::CheckFailed { reason } => bail!("Update check failed: {reason}"),
    }
}
