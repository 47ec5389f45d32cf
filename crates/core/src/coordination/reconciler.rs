// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forced removal of leases, at startup or on operator request

use crate::domain::LockDomain;
use crate::error::StoreError;
use crate::key::LockKeyBuilder;
use crate::store::LeaseStore;
use tracing::{info, warn};

/// Clears leases left behind by a crashed process.
///
/// A lease expires on its own after its TTL; this shortens the recovery
/// window on a controlled restart.
#[derive(Clone, Debug)]
pub struct StartupReconciler {
    keys: LockKeyBuilder,
    domains: Vec<LockDomain>,
}

impl StartupReconciler {
    pub fn new(keys: LockKeyBuilder, domains: Vec<LockDomain>) -> Self {
        Self { keys, domains }
    }

    pub fn domains(&self) -> &[LockDomain] {
        &self.domains
    }

    /// Delete every configured domain's key. Returns how many leases existed.
    pub async fn run<S: LeaseStore + ?Sized>(&self, store: &S) -> Result<usize, StoreError> {
        let removed = clear_leases(store, &self.keys, &self.domains).await?;
        if removed > 0 {
            warn!(
                namespace = self.keys.prefix(),
                removed, "cleared stale leases at startup"
            );
        } else {
            info!(namespace = self.keys.prefix(), "no stale leases at startup");
        }
        Ok(removed)
    }
}

/// Unconditionally delete the key of each domain, whoever holds it
pub(crate) async fn clear_leases<S: LeaseStore + ?Sized>(
    store: &S,
    keys: &LockKeyBuilder,
    domains: &[LockDomain],
) -> Result<usize, StoreError> {
    let mut removed = 0;
    for domain in domains {
        let key = keys.build(domain);
        if store.delete(&key).await? {
            info!(%domain, key = %key, "lease destroyed");
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
