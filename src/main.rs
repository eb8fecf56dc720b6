//! CLI entry point for the Lampa desktop shell core.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;

use cli::{Cli, Command, ProfileCommand, SettingsCommand, UpdateCommand};
use commands::HostContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?cli, "CLI arguments parsed");

    let ctx = HostContext::open(cli.config_dir.clone())?;

    match &cli.command {
        Command::Settings(SettingsCommand::Show) => commands::run_settings_show_command(&ctx),
        Command::Settings(SettingsCommand::Get { key }) => {
            commands::run_settings_get_command(&ctx, key)
        }
        Command::Settings(SettingsCommand::Set { key, value }) => {
            commands::run_settings_set_command(&ctx, key, value)
        }
        Command::Settings(SettingsCommand::Reset) => commands::run_settings_reset_command(&ctx),
        Command::Url { new_url } => commands::run_url_command(&ctx, new_url.as_deref()),
        Command::Profile(ProfileCommand::Export { path }) => {
            commands::run_profile_export_command(&ctx, path.as_deref())
        }
        Command::Profile(ProfileCommand::Import { path }) => {
            commands::run_profile_import_command(&ctx, path)
        }
        Command::Update(UpdateCommand::Check { force }) => {
            commands::run_update_check_command(&ctx, *force).await
        }
        Command::Update(UpdateCommand::Skip { state }) => {
            commands::run_update_skip_command(&ctx, *state)
        }
    }
}
