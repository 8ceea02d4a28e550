//! Dropgate CLI - consent front end for incoming nearby-share transfers
//!
//! Dropgate decides whether files offered by nearby devices are accepted,
//! either by asking or by an auto-accept policy.
//!
//! ## Quick Start
//!
//! ```bash
//! # Accept everything without asking
//! dropgate auto-accept on
//!
//! # Replay a scripted session of offers, answers and completions
//! dropgate replay session.jsonl
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

use anyhow::Result;
use clap::Parser;

mod commands;
pub mod ui;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay(args) => commands::replay::run(args).await,
        Command::AutoAccept(args) => commands::auto_accept::run(args).await,
        Command::Config(args) => commands::config::run(args).await,
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,dropgate=info,dropgate_core=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
