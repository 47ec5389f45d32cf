// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lease store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use kl_core::{FakeClock, LeaseStore, MemoryLeaseStore, StoreError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    TrySet {
        key: String,
        value: String,
        ttl: Duration,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
    DeleteIfMatches {
        key: String,
        expected: String,
    },
}

/// In-memory lease store that records every call and can inject failures.
///
/// Expiry follows a `FakeClock`, so tests advance time explicitly.
#[derive(Clone)]
pub struct FakeLeaseStore {
    inner: MemoryLeaseStore<FakeClock>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<AtomicUsize>,
    conditional_delete: Arc<AtomicBool>,
}

impl Default for FakeLeaseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLeaseStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryLeaseStore::with_clock(FakeClock::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(AtomicUsize::new(0)),
            conditional_delete: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Behave like a store without compare-and-delete
    pub fn without_conditional_delete(self) -> Self {
        self.conditional_delete.store(false, Ordering::SeqCst);
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Make the next `n` calls fail with `StoreError::Unavailable`
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Clock driving lease expiry
    pub fn clock(&self) -> &FakeClock {
        self.inner.clock()
    }

    /// Unexpired keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    /// Plant a lease without recording a call
    pub async fn seed(&self, key: &str, value: &str, ttl: Duration) {
        let _ = self.inner.try_set_with_expiry(key, value, ttl).await;
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);

        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LeaseStore for FakeLeaseStore {
    async fn try_set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        self.record(StoreCall::TrySet {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        })?;
        self.inner.try_set_with_expiry(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.record(StoreCall::Get {
            key: key.to_string(),
        })?;
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::Delete {
            key: key.to_string(),
        })?;
        self.inner.delete(key).await
    }

    async fn delete_if_matches(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        if !self.supports_conditional_delete() {
            return Err(StoreError::Unsupported("delete_if_matches"));
        }
        self.record(StoreCall::DeleteIfMatches {
            key: key.to_string(),
            expected: expected.to_string(),
        })?;
        self.inner.delete_if_matches(key, expected).await
    }

    fn supports_conditional_delete(&self) -> bool {
        self.conditional_delete.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
