// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration file
//!
//! ```toml
//! [lock]
//! namespace = "keylock"
//! lock-wait-timeout = "15m"
//!
//! [store]
//! path = "/var/lib/keylock/leases"
//! ```

use anyhow::{Context, Result};
use kl_core::LockConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub lock: LockConfig,
    pub store: StoreSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// Directory holding lease files
    pub path: Option<PathBuf>,
}

impl CliConfig {
    /// Read `path`, or fall back to defaults when no file was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.lock.validate()?;
        Ok(config)
    }

    /// Lease directory: flag, then config file, then the user state dir
    pub fn store_dir(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = flag.or_else(|| self.store.path.clone()) {
            return Ok(dir);
        }
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|dir| dir.join("keylock").join("leases"))
            .context("no state directory available, pass --store")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
