//! onboardd - HR onboarding tracker daemon
//!
//! Serves onboarding requests, task checklists, reminders and the HR
//! question assistant over a local HTTP API.

use anyhow::Result;
use clap::Parser;
use onboardd::config::Config;
use onboardd::server::{self, AppState};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "onboardd", version, about = "HR onboarding tracker daemon")]
struct Args {
    /// Config file (defaults to /etc/onboard/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long)]
    bind: Option<String>,

    /// Override the database path
    #[arg(long)]
    db: Option<String>,

    /// Write a default config to this path and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Some(path) = args.init_config {
        Config::save_default(&path)?;
        return Ok(());
    }

    info!("onboardd v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_explicit(path)?,
        None => Config::load(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(db) = args.db {
        config.server.db_path = db;
    }

    let state = AppState::from_config(&config)?;
    server::run(state, &config.server.bind_addr).await
}
