//! CLI command definitions and handlers.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Load configuration with graceful fallback to defaults.
///
/// If the config file doesn't exist or can't be parsed, it falls back to defaults.
pub fn load_config() -> dropgate_core::config::Config {
    dropgate_core::config::Config::load().unwrap_or_else(|e| {
        tracing::warn!("{e}; using default configuration");
        dropgate_core::config::Config::default()
    })
}

pub mod auto_accept;
pub mod config;
pub mod replay;

/// Dropgate - consent for incoming nearby-share transfers
#[derive(Parser)]
#[command(name = "dropgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Replay a JSON Lines script of transfer events
    Replay(ReplayArgs),

    /// Show or change the auto-accept setting
    AutoAccept(AutoAcceptArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the replay command
#[derive(Parser)]
pub struct ReplayArgs {
    /// Script file (`-` for stdin)
    pub script: PathBuf,

    /// Override the configured auto-accept setting
    #[arg(long)]
    pub auto_accept: Option<bool>,

    /// Deliver transport and user events on independent tasks
    #[arg(long)]
    pub concurrent: bool,

    /// Don't print notifications, only the summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Output summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the auto-accept command
#[derive(Parser)]
pub struct AutoAcceptArgs {
    /// New state (omit to show the current one)
    #[arg(value_enum)]
    pub state: Option<SwitchState>,
}

/// Auto-accept states accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
pub enum SwitchState {
    /// Accept every new offer without asking
    On,
    /// Ask for every new offer
    Off,
    /// Flip the current setting
    Toggle,
}

/// Arguments for the config command
#[derive(Parser)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Show all configuration
    Show,

    /// List all available configuration keys
    List,

    /// Show the configuration file path
    Path,

    /// Reset to defaults
    Reset,
}
