// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process lease store
//!
//! Shared by every coordinator in one process. Clones share state, so a
//! store handed to several factories behaves as a single backend.

use super::LeaseStore;
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct Lease {
    value: String,
    expires_at: Instant,
}

/// Lease store backed by a mutex-guarded map with clock-driven expiry
#[derive(Clone)]
pub struct MemoryLeaseStore<C: Clock = SystemClock> {
    leases: Arc<Mutex<HashMap<String, Lease>>>,
    clock: C,
}

impl MemoryLeaseStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryLeaseStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryLeaseStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            leases: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Keys of all unexpired leases, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.leases().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Lock the map after dropping anything that has expired
    fn leases(&self) -> MutexGuard<'_, HashMap<String, Lease>> {
        let now = self.clock.now();
        let mut leases = self.leases.lock().unwrap_or_else(|e| e.into_inner());
        leases.retain(|_, lease| lease.expires_at > now);
        leases
    }
}

#[async_trait]
impl<C: Clock + 'static> LeaseStore for MemoryLeaseStore<C> {
    async fn try_set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let expires_at = self.clock.now() + ttl;
        let mut leases = self.leases();
        if leases.contains_key(key) {
            return Ok(false);
        }
        leases.insert(
            key.to_string(),
            Lease {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.leases().get(key).map(|lease| lease.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.leases().remove(key).is_some())
    }

    async fn delete_if_matches(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let mut leases = self.leases();
        match leases.get(key) {
            Some(lease) if lease.value == expected => {
                leases.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn supports_conditional_delete(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
