// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock coordinator configuration
//!
//! Keys are kebab-case to match the option names operators already use:
//!
//! ```toml
//! namespace = "keylock"
//! lock-recheck-time = 25          # milliseconds
//! lock-wait-timeout = "15m"       # or a humantime string
//! lock-lease = "15m"
//! force-unlock-on-startup = false
//! ```

use crate::domain::LockDomain;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_NAMESPACE: &str = "keylock";

/// Settings shared by a factory and every coordinator it creates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LockConfig {
    /// Prefix under which lock keys are built
    pub namespace: String,
    /// Poll interval between acquisition attempts
    #[serde(rename = "lock-recheck-time", with = "duration")]
    pub recheck_interval: Duration,
    /// Maximum time to wait before acquisition fails
    #[serde(rename = "lock-wait-timeout", with = "duration")]
    pub wait_timeout: Duration,
    /// TTL written with each successful acquisition
    #[serde(rename = "lock-lease", with = "duration")]
    pub lease: Duration,
    /// Clear stale leases once when the factory starts
    pub force_unlock_on_startup: bool,
    /// Release with compare-and-delete against the holder token when the
    /// store supports it
    pub fenced_release: bool,
    /// Domains that forced unlock and startup reconciliation act on
    pub domains: Vec<LockDomain>,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            recheck_interval: Duration::from_secs(1),
            wait_timeout: Duration::from_secs(900),
            lease: Duration::from_secs(900),
            force_unlock_on_startup: false,
            fenced_release: true,
            domains: LockDomain::builtin(),
        }
    }
}

impl LockConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_recheck_interval(mut self, interval: Duration) -> Self {
        self.recheck_interval = interval;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    pub fn with_force_unlock_on_startup(mut self, enabled: bool) -> Self {
        self.force_unlock_on_startup = enabled;
        self
    }

    pub fn with_fenced_release(mut self, enabled: bool) -> Self {
        self.fenced_release = enabled;
        self
    }

    pub fn with_domains(mut self, domains: impl IntoIterator<Item = LockDomain>) -> Self {
        self.domains = domains.into_iter().collect();
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: LockConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        let reserved = |c: char| c == ':' || c.is_whitespace();
        if self.namespace.chars().any(reserved) {
            return Err(ConfigError::InvalidNamespace(self.namespace.clone()));
        }
        if self.recheck_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("lock-recheck-time"));
        }
        if self.wait_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("lock-wait-timeout"));
        }
        if self.lease.is_zero() {
            return Err(ConfigError::ZeroDuration("lock-lease"));
        }
        if self.recheck_interval > self.wait_timeout {
            return Err(ConfigError::RecheckExceedsTimeout {
                recheck: self.recheck_interval,
                timeout: self.wait_timeout,
            });
        }
        if self.domains.is_empty() {
            return Err(ConfigError::NoDomains);
        }
        Ok(())
    }
}

/// Durations as integer milliseconds or humantime strings
mod duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(u64),
        Text(#[serde(with = "humantime_serde")] Duration),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        humantime_serde::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Duration::from_millis(ms),
            Raw::Text(value) => value,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
