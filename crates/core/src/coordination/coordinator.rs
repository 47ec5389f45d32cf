// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-unit-of-work lock coordinator
//!
//! Acquisition is a cooperative poll loop: try the store's set-if-absent,
//! sleep for the recheck interval, try again until the wait timeout. Each
//! attempt runs on its own task. If the caller drops `wait_for_lock` while an
//! attempt is in flight, the attempt still finishes and a lease it created is
//! removed again.

use super::reconciler::clear_leases;
use super::state::LockState;
use crate::config::LockConfig;
use crate::domain::LockDomain;
use crate::error::{LockError, StoreError};
use crate::key::LockKeyBuilder;
use crate::store::LeaseStore;
use crate::token::{HolderToken, TokenGen, UuidTokenGen};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Acquires and releases lock domains against a shared lease store.
///
/// One coordinator holds at most one domain at a time; there is no
/// reentrancy. Coordinators are cheap and meant to be created per logical
/// unit of work by a [`CoordinatorFactory`](super::CoordinatorFactory).
pub struct LockCoordinator<S: LeaseStore, G: TokenGen = UuidTokenGen> {
    store: Arc<S>,
    config: Arc<LockConfig>,
    keys: LockKeyBuilder,
    tokens: G,
    state: Mutex<LockState>,
}

impl<S: LeaseStore, G: TokenGen> LockCoordinator<S, G> {
    pub(crate) fn new(store: Arc<S>, config: Arc<LockConfig>, tokens: G) -> Self {
        let keys = LockKeyBuilder::new(config.namespace.clone());
        Self {
            store,
            config,
            keys,
            tokens,
            state: Mutex::new(LockState::Free),
        }
    }

    /// Block until `domain` is held or the wait timeout passes.
    ///
    /// Fails with `NestedLock`, without touching the store, if this
    /// coordinator already holds or is acquiring a domain. Store errors during
    /// polling count as failed attempts.
    pub async fn wait_for_lock(&self, domain: &LockDomain) -> Result<(), LockError> {
        self.lock_state().begin_acquire(domain)?;
        let key = self.keys.build(domain);
        let mut pending = PendingAcquire {
            state: &self.state,
            store: &self.store,
            key: key.clone(),
            in_flight: None,
            armed: true,
        };

        let timeout = self.config.wait_timeout;
        let started = Instant::now();
        let deadline = started + timeout;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let token = self.tokens.next();
            match pending.attempt(&token, self.config.lease).await {
                Ok(true) => {
                    pending.complete(token);
                    info!(
                        %domain,
                        key = %key,
                        attempts,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "lock acquired"
                    );
                    return Ok(());
                }
                Ok(false) => debug!(%domain, attempts, "lease held elsewhere, waiting"),
                Err(e) => warn!(%domain, attempts, error = %e, "lease store error while acquiring"),
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(self.config.recheck_interval.min(deadline - now)).await;
        }

        drop(pending);
        warn!(%domain, key = %key, attempts, "timed out waiting for lock");
        Err(LockError::AcquisitionTimeout {
            domain: domain.clone(),
            timeout,
            attempts,
        })
    }

    /// Release the held domain. Releasing while free is a no-op.
    ///
    /// The local state is Free afterwards even if the store call fails; the
    /// lease then runs out on its own.
    pub async fn release_lock(&self) -> Result<(), LockError> {
        let released = self.lock_state().release();
        let Some((domain, token)) = released else {
            debug!("release requested while not holding a lock");
            return Ok(());
        };

        let key = self.keys.build(&domain);
        if self.config.fenced_release && self.store.supports_conditional_delete() {
            if self.store.delete_if_matches(&key, token.as_str()).await? {
                info!(%domain, key = %key, "lock released");
            } else {
                // Our lease expired and may now belong to someone else
                warn!(%domain, key = %key, %token, "lease no longer owned at release");
            }
        } else {
            self.store.delete(&key).await?;
            info!(%domain, key = %key, "lock released");
        }
        Ok(())
    }

    /// Hold `domain` for the duration of `work`, releasing afterwards.
    ///
    /// Only acquisition can fail. Once `work` has run its output is returned
    /// even if the release fails; that failure is logged and the lease is
    /// left to expire.
    pub async fn run_locked<F, T>(&self, domain: &LockDomain, work: F) -> Result<T, LockError>
    where
        F: Future<Output = T>,
    {
        self.wait_for_lock(domain).await?;
        let output = work.await;
        if let Err(e) = self.release_lock().await {
            warn!(%domain, error = %e, "release after locked work failed, lease left to expire");
        }
        Ok(output)
    }

    /// The domain this coordinator holds. Local read, no store I/O.
    pub fn current_lock(&self) -> Option<LockDomain> {
        self.lock_state().held_domain().cloned()
    }

    /// Snapshot of the local state machine
    pub fn state(&self) -> LockState {
        self.lock_state().clone()
    }

    /// Delete the leases of every configured domain, whoever holds them.
    ///
    /// Administrative recovery for orphaned leases. Returns how many leases
    /// existed.
    pub async fn destroy_lock_info(&self) -> Result<usize, LockError> {
        let mut domains = self.config.domains.clone();
        let held = self.lock_state().held_domain().cloned();
        if let Some(held) = held {
            if !domains.contains(&held) {
                domains.push(held);
            }
        }

        let removed = clear_leases(self.store.as_ref(), &self.keys, &domains).await?;
        self.lock_state().forget_if_cleared(&domains);
        info!(namespace = self.keys.prefix(), removed, "lock info destroyed");
        Ok(removed)
    }

    /// This backend always allows administrative unlock
    pub fn supports_forced_unlock(&self) -> bool {
        true
    }

    /// Holder token of the current lease on `domain`, whoever owns it
    pub async fn lease_info(&self, domain: &LockDomain) -> Result<Option<HolderToken>, LockError> {
        let key = self.keys.build(domain);
        Ok(self.store.get(&key).await?.map(HolderToken::new))
    }

    /// Store key for `domain` under this coordinator's namespace
    pub fn key_for(&self, domain: &LockDomain) -> String {
        self.keys.build(domain)
    }

    fn lock_state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Returns the state to Free if acquisition ends without success, including
/// when the `wait_for_lock` future is dropped mid-poll.
///
/// A dropped caller can leave a set-if-absent attempt running. That attempt is
/// handed to a cleanup task which waits for it and deletes the lease if the
/// attempt created one.
struct PendingAcquire<'a, S: LeaseStore> {
    state: &'a Mutex<LockState>,
    store: &'a Arc<S>,
    key: String,
    in_flight: Option<(HolderToken, JoinHandle<Result<bool, StoreError>>)>,
    armed: bool,
}

impl<S: LeaseStore> PendingAcquire<'_, S> {
    /// One set-if-absent attempt, run as its own task
    async fn attempt(&mut self, token: &HolderToken, ttl: Duration) -> Result<bool, StoreError> {
        let store = Arc::clone(self.store);
        let key = self.key.clone();
        let value = token.as_str().to_string();
        let task = tokio::spawn(async move { store.try_set_with_expiry(&key, &value, ttl).await });

        let (_, task) = self.in_flight.insert((token.clone(), task));
        let joined = task.await;
        self.in_flight = None;
        joined.map_err(|e| StoreError::Unavailable(format!("acquire attempt aborted: {}", e)))?
    }

    fn complete(mut self, token: HolderToken) {
        self.armed = false;
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .complete_acquire(token);
    }
}

impl<S: LeaseStore> Drop for PendingAcquire<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .abort_acquire();

        let Some((token, attempt)) = self.in_flight.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(key = %self.key, %token, "no runtime to clean up abandoned acquire attempt");
            return;
        };
        let store = Arc::clone(self.store);
        let key = std::mem::take(&mut self.key);
        runtime.spawn(async move {
            if let Ok(Ok(true)) = attempt.await {
                remove_abandoned_lease(store.as_ref(), &key, &token).await;
            }
        });
    }
}

/// Delete a lease won by an attempt whose caller already gave up
async fn remove_abandoned_lease<S: LeaseStore>(store: &S, key: &str, token: &HolderToken) {
    let removed = if store.supports_conditional_delete() {
        store.delete_if_matches(key, token.as_str()).await
    } else {
        store.delete(key).await
    };
    match removed {
        Ok(removed) => debug!(key, %token, removed, "removed lease of abandoned acquire attempt"),
        Err(e) => {
            warn!(key, %token, error = %e, "could not remove lease of abandoned acquire attempt");
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
