// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kl status [domain...]` - Show lease holders

use crate::output::{print_list, OutputFormat};
use crate::CliStore;
use anyhow::Result;
use clap::Args;
use kl_core::{CoordinatorFactory, LockDomain};
use serde::Serialize;
use std::fmt;
use std::process::ExitCode;

#[derive(Args)]
pub struct StatusArgs {
    /// Domains to show (default: every configured domain)
    pub domains: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct LeaseStatus {
    pub domain: String,
    pub key: String,
    pub holder: Option<String>,
}

impl fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.holder {
            Some(holder) => write!(f, "{} {} held {}", self.domain, self.key, holder),
            None => write!(f, "{} {} free", self.domain, self.key),
        }
    }
}

pub async fn status(args: StatusArgs, factory: &CoordinatorFactory<CliStore>) -> Result<ExitCode> {
    let domains = if args.domains.is_empty() {
        factory.config().domains.clone()
    } else {
        args.domains
            .iter()
            .map(|d| d.parse::<LockDomain>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let coordinator = factory.create();
    let mut rows = Vec::with_capacity(domains.len());
    for domain in &domains {
        let holder = coordinator.lease_info(domain).await?;
        rows.push(LeaseStatus {
            domain: domain.to_string(),
            key: coordinator.key_for(domain),
            holder: holder.map(|token| token.to_string()),
        });
    }

    print_list(&rows, args.format);
    Ok(ExitCode::SUCCESS)
}
