// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kl - keylock CLI

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{run, status, unlock};
use config::CliConfig;
use kl_adapters::{FileLeaseStore, TracedLeaseStore};
use kl_core::CoordinatorFactory;
use std::path::PathBuf;
use std::process::ExitCode;

/// Store the CLI coordinates through
pub type CliStore = TracedLeaseStore<FileLeaseStore>;

#[derive(Parser)]
#[command(
    name = "kl",
    version,
    about = "keylock - Lease-based locks for cluster-wide critical sections"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Lease directory, overrides `[store] path`
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command while holding a lock
    Run(run::RunArgs),
    /// Show who holds each lock
    Status(status::StatusArgs),
    /// Delete the leases of every configured domain
    ForceUnlock,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let config = CliConfig::load(cli.config.as_deref())?;
    let store_dir = config.store_dir(cli.store)?;
    let store = TracedLeaseStore::new(FileLeaseStore::open(&store_dir)?);
    tracing::debug!(store = %store_dir.display(), "opened lease store");

    let factory = CoordinatorFactory::new(store, config.lock).await?;

    match cli.command {
        Commands::Run(args) => run::run(args, &factory).await,
        Commands::Status(args) => status::status(args, &factory).await,
        Commands::ForceUnlock => unlock::force_unlock(&factory).await,
    }
}

/// Log to stderr so command output on stdout stays clean
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
