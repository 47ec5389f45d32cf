// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds lock coordinators from a store handle and configuration

use super::coordinator::LockCoordinator;
use super::reconciler::StartupReconciler;
use crate::config::LockConfig;
use crate::error::LockError;
use crate::key::LockKeyBuilder;
use crate::store::LeaseStore;
use crate::token::{TokenGen, UuidTokenGen};
use std::sync::Arc;
use tracing::info;

/// Owns the lease store and hands out coordinators that borrow it.
///
/// Construction validates the configuration and, when
/// `force-unlock-on-startup` is set, clears stale leases exactly once before
/// any coordinator exists.
pub struct CoordinatorFactory<S: LeaseStore, G: TokenGen = UuidTokenGen> {
    store: Arc<S>,
    config: Arc<LockConfig>,
    tokens: G,
    startup_cleared: Option<usize>,
}

impl<S: LeaseStore> CoordinatorFactory<S> {
    pub async fn new(store: S, config: LockConfig) -> Result<Self, LockError> {
        Self::with_token_gen(store, config, UuidTokenGen).await
    }
}

impl<S: LeaseStore, G: TokenGen> CoordinatorFactory<S, G> {
    pub async fn with_token_gen(
        store: S,
        config: LockConfig,
        tokens: G,
    ) -> Result<Self, LockError> {
        config.validate()?;
        let store = Arc::new(store);

        let startup_cleared = if config.force_unlock_on_startup {
            let reconciler = StartupReconciler::new(
                LockKeyBuilder::new(config.namespace.clone()),
                config.domains.clone(),
            );
            Some(reconciler.run(store.as_ref()).await?)
        } else {
            None
        };

        info!(
            namespace = %config.namespace,
            recheck_ms = config.recheck_interval.as_millis() as u64,
            wait_timeout_ms = config.wait_timeout.as_millis() as u64,
            lease_ms = config.lease.as_millis() as u64,
            "lock coordinator factory ready"
        );

        Ok(Self {
            store,
            config: Arc::new(config),
            tokens,
            startup_cleared,
        })
    }

    /// A fresh coordinator in the Free state
    pub fn create(&self) -> LockCoordinator<S, G> {
        LockCoordinator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.config),
            self.tokens.clone(),
        )
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Leases removed by startup reconciliation, or None if it did not run
    pub fn startup_cleared(&self) -> Option<usize> {
        self.startup_cleared
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
