//! Bountyboard - command-line client for the bounty marketplace
//!
//! Main entry point for the bountyboard CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, bookmarks, config, winners};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Bountyboard - browse bounties, keep bookmarks and pick winners
#[derive(Parser)]
#[command(name = "bountyboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend URL (default: http://localhost:4000)
    #[arg(long, global = true, env = "BOUNTYBOARD_BACKEND_URL")]
    pub backend: Option<String>,

    /// Directory holding the session, bookmarks and winner drafts
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in, verify and inspect the stored session
    Auth(auth::AuthArgs),

    /// Manage saved bounties and projects
    Bookmarks(bookmarks::BookmarksArgs),

    /// Draft and submit the winners of a bounty
    Winners(winners::WinnersArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "bountyboard=debug,bountyboard_client=debug,bountyboard_auth=debug,bountyboard_state=debug,bountyboard_storage=debug,info"
    } else {
        "bountyboard=info,bountyboard_client=warn,bountyboard_state=warn,bountyboard_storage=warn,warn"
    };

    let log_dir = bountyboard_config::config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "bountyboard.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "bountyboard=trace,bountyboard_client=trace,bountyboard_auth=trace,bountyboard_state=trace,bountyboard_storage=trace,bountyboard_config=trace,info",
                )),
        )
        .init();

    let loaded = bountyboard_config::load_config(None)?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let ctx = commands::Context::new(loaded, cli.backend, cli.data_dir, cli.json, cli.verbose);

    match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Bookmarks(args) => bookmarks::run(args, &ctx).await,
        Commands::Winners(args) => winners::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
