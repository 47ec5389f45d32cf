// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock domains: named critical sections

use crate::error::ConfigError;
use crate::key::dash_case;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// A named critical section that at most one process may enter at a time.
///
/// Callers own the set of domains; the coordinator only uses the name as
/// key-building input. Two domains whose names dash-case to the same string
/// share a lease key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockDomain(Cow<'static, str>);

impl LockDomain {
    /// Schema migration
    pub const DATABASE: LockDomain = LockDomain(Cow::Borrowed("DATABASE"));
    /// Cluster boot sequence
    pub const KEYCLOAK_BOOT: LockDomain = LockDomain(Cow::Borrowed("KEYCLOAK_BOOT"));
    /// Offline session preloading
    pub const OFFLINE_SESSIONS: LockDomain = LockDomain(Cow::Borrowed("OFFLINE_SESSIONS"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// The domains every deployment knows about
    pub fn builtin() -> Vec<LockDomain> {
        vec![Self::DATABASE, Self::KEYCLOAK_BOOT, Self::OFFLINE_SESSIONS]
    }
}

impl std::fmt::Display for LockDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses user input such as `database`, `keycloak-boot` or `offlineSessions`
/// into the canonical upper snake case name.
impl FromStr for LockDomain {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dashed = dash_case(s);
        if dashed.is_empty() {
            return Err(ConfigError::InvalidDomain(s.to_string()));
        }
        Ok(Self::new(dashed.to_uppercase().replace('-', "_")))
    }
}
