//! # hashnav
//!
//! Replays navigation scripts against the hashnav state machine over a
//! simulated browser tab.
//!
//! ## Commands
//!
//! - `replay`: Run a script and print the virtual stack after each step
//! - `config`: Print the effective configuration
//!
//! ## Example
//!
//! ```bash
//! cat > nav.txt <<'SCRIPT'
//! push /inbox
//! push /inbox/42 {"unread": true}
//! user-back
//! user-edit /settings
//! SCRIPT
//!
//! hashnav replay nav.txt
//! hashnav replay nav.txt --json --initial /start
//! hashnav config --config hashnav.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hashnav::HistoryConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod script;

use commands::{config, replay};

/// Replay navigation scripts against hashnav.
#[derive(Parser, Debug)]
#[command(name = "hashnav")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a navigation script
    Replay {
        /// Script file
        script: PathBuf,

        /// Address the simulated tab starts at
        #[arg(long, default_value = "/")]
        initial: String,

        /// Print each stack as a JSON array of snapshots
        #[arg(long)]
        json: bool,

        /// Milliseconds to wait after a simulated user gesture
        #[arg(long, default_value = "20")]
        settle_ms: u64,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let history_config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay {
            script,
            initial,
            json,
            settle_ms,
        } => {
            let options = replay::ReplayOptions {
                initial,
                json,
                settle: Duration::from_millis(settle_ms),
            };
            replay::run(&script, history_config, &options).await?;
        }
        Commands::Config => {
            config::run(&history_config)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<HistoryConfig> {
    match path {
        Some(path) => HistoryConfig::from_file(path).context("Failed to load configuration"),
        None => Ok(HistoryConfig::default()),
    }
}
