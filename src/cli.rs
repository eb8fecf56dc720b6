//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Headless host for the Lampa desktop shell.
///
/// Manages the settings, profiles and update checks that the desktop window
/// uses, without opening a window.
#[derive(Parser, Debug)]
#[command(name = "lampa")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this directory for settings, page storage and config.toml
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or change stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Show the start URL, or change it
    Url {
        /// New start URL (http or https)
        new_url: Option<String>,
    },

    /// Save or load a profile (settings + page storage)
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Check for a newer release or change update preferences
    #[command(subcommand)]
    Update(UpdateCommand),
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print every stored setting as JSON
    Show,
    /// Print one setting as JSON
    Get { key: String },
    /// Store a setting; VALUE is parsed as JSON, falling back to a plain string
    Set { key: String, value: String },
    /// Remove every setting
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Write the current profile to a file
    Export {
        /// Output file (defaults to ./lampa-profile.json)
        path: Option<PathBuf>,
    },
    /// Apply a profile file on top of the current settings
    Import { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum UpdateCommand {
    /// Check the release API
    Check {
        /// Check even if skipped or checked recently
        #[arg(long)]
        force: bool,
    },
    /// Turn automatic update checks off (on) or back on (off)
    Skip {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}
