//! `handle-verifier`: check a fediverse account handle from the terminal
//!
//! Drives the same field lifecycle a settings page would (load, edit, save)
//! against live servers and prints the messages the user would see.

mod commands;
mod config;
mod surface;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::Session;
use config::{CliConfig, Overrides};

#[derive(Parser)]
#[command(name = "handle-verifier")]
#[command(version, about = "Verify fediverse account handles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <config dir>/handle-verifier/config.json)
    #[arg(long, global = true, env = "HANDLE_VERIFIER_CONFIG")]
    config: Option<PathBuf>,

    /// URL scheme used to reach servers
    #[arg(long, global = true)]
    scheme: Option<String>,

    /// Retries for transient failures
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Settings field id
    #[arg(long, global = true)]
    field_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and save one handle
    Check {
        /// Handle such as alice@mastodon.social
        handle: String,
    },

    /// Edit the field line by line
    Interactive,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the field messages
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = CliConfig::load(cli.config.as_deref())?.apply(Overrides {
        scheme: cli.scheme,
        max_retries: cli.max_retries,
        timeout_secs: cli.timeout,
        field_id: cli.field_id,
    });
    tracing::debug!("Using {config:?}");

    let session = Session::new(config)?;

    match cli.command {
        Commands::Check { handle } => commands::check(&session, &handle).await,
        Commands::Interactive => {
            commands::interactive(&session).await?;
            Ok(true)
        }
    }
}
