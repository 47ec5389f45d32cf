// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lock coordination

use crate::domain::LockDomain;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

fn fmt_duration(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

/// Invalid or unreadable configuration, detected before any store I/O
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("namespace must not be empty")]
    EmptyNamespace,
    #[error("namespace {0:?} must not contain whitespace or ':'")]
    InvalidNamespace(String),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error(
        "lock-recheck-time ({}) must not exceed lock-wait-timeout ({})",
        fmt_duration(.recheck),
        fmt_duration(.timeout)
    )]
    RecheckExceedsTimeout {
        recheck: Duration,
        timeout: Duration,
    },
    #[error("at least one lock domain must be configured")]
    NoDomains,
    #[error("invalid lock domain: {0:?}")]
    InvalidDomain(String),
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failures talking to the backing lease store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lease store unavailable: {0}")]
    Unavailable(String),
    #[error("lease store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt lease record for {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("operation not supported by this lease store: {0}")]
    Unsupported(&'static str),
}

/// Errors surfaced by `LockCoordinator` and `CoordinatorFactory`
#[derive(Debug, Error)]
pub enum LockError {
    #[error("invalid lock configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error(
        "Trying to get a lock while already holding one (held: {held}, requested: {requested})"
    )]
    NestedLock {
        held: LockDomain,
        requested: LockDomain,
    },
    #[error(
        "Failed to acquire DB lock for {domain} within {}",
        fmt_duration(.timeout)
    )]
    AcquisitionTimeout {
        domain: LockDomain,
        timeout: Duration,
        attempts: u32,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LockError {
    /// True for errors a caller may resolve by retrying later
    pub fn is_retryable(&self) -> bool {
        matches!(self, LockError::AcquisitionTimeout { .. } | LockError::Store(_))
    }
}
