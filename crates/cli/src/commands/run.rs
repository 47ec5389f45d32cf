// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kl run <domain> -- <cmd> [args]` - Run a command inside a lock

use crate::CliStore;
use anyhow::{Context, Result};
use clap::Args;
use kl_core::{CoordinatorFactory, LockDomain};
use std::process::{ExitCode, ExitStatus};

/// Exit status when the lock could not be acquired
pub const LOCK_FAILED: u8 = 2;

#[derive(Args)]
pub struct RunArgs {
    /// Lock domain (e.g., "database", "keycloak-boot")
    pub domain: String,

    /// Command and arguments to run while holding the lock
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

pub async fn run(args: RunArgs, factory: &CoordinatorFactory<CliStore>) -> Result<ExitCode> {
    let domain: LockDomain = args.domain.parse()?;
    let (program, program_args) = args.command.split_first().context("no command given")?;

    let coordinator = factory.create();
    if let Err(e) = coordinator.wait_for_lock(&domain).await {
        eprintln!("error: {}", e);
        return Ok(ExitCode::from(LOCK_FAILED));
    }

    let status = tokio::process::Command::new(program)
        .args(program_args)
        .status()
        .await;

    // Release before reporting so a failed spawn does not leave the lease behind
    if let Err(e) = coordinator.release_lock().await {
        tracing::warn!(%domain, error = %e, "release failed, lease will expire");
    }

    let status = status.with_context(|| format!("failed to run {}", program))?;
    Ok(exit_code(status))
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => ExitCode::from(code as u8),
        // Killed by a signal
        None => ExitCode::FAILURE,
    }
}
