// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kl force-unlock` - Delete every configured lease

use crate::CliStore;
use anyhow::Result;
use kl_core::CoordinatorFactory;
use std::process::ExitCode;

pub async fn force_unlock(factory: &CoordinatorFactory<CliStore>) -> Result<ExitCode> {
    let coordinator = factory.create();
    if !coordinator.supports_forced_unlock() {
        anyhow::bail!("this lease store does not support forced unlock");
    }

    let removed = coordinator.destroy_lock_info().await?;
    println!(
        "Removed {} lease{} in namespace {}",
        removed,
        if removed == 1 { "" } else { "s" },
        factory.config().namespace
    );
    Ok(ExitCode::SUCCESS)
}
