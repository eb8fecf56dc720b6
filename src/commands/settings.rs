//! Settings command handlers: show, get, set, reset.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use super::HostContext;

pub fn run_settings_show_command(ctx: &HostContext) -> Result<()> {
    let all = ctx.store.get_all();
    println!("{}", serde_json::to_string_pretty(&all)?);
    Ok(())
}

pub fn run_settings_get_command(ctx: &HostContext, key: &str) -> Result<()> {
    let value = ctx.store.get(key, Value::Null);
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn run_settings_set_command(ctx: &HostContext, key: &str, raw_value: &str) -> Result<()> {
    let value = parse_cli_value(raw_value);
    ctx.store
        .set(key, value.clone())
        .with_context(|| format!("Failed to store setting '{key}'"))?;
    println!("{key} = {value}");
    Ok(())
}

pub fn run_settings_reset_command(ctx: &HostContext) -> Result<()> {
    ctx.store.clear().context("Failed to reset settings")?;
    info!("All settings removed");
    println!("Settings reset. Start URL: {}", ctx.start_url());
    Ok(())
}

/// Reads a CLI value as JSON, or as a plain string when it is not valid JSON.
fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
