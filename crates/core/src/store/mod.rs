// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease store contract
//!
//! The coordinator never implements mutual exclusion itself: the store's
//! atomic set-if-absent is the only thing that keeps two processes out of the
//! same critical section. Every participant must target the same logical
//! store for a given key.

mod memory;

pub use memory::MemoryLeaseStore;

use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value backend holding leases with a time-to-live
#[async_trait]
pub trait LeaseStore: Send + Sync + 'static {
    /// Atomically create `key` with `value`, expiring after `ttl`.
    ///
    /// Returns true iff this call created the key. An expired lease counts as
    /// absent.
    async fn try_set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    /// Current value of an unexpired lease
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key` unconditionally. Returns true if a lease was removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Remove `key` only if its value equals `expected`
    async fn delete_if_matches(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let _ = (key, expected);
        Err(StoreError::Unsupported("delete_if_matches"))
    }

    /// Whether `delete_if_matches` is implemented
    fn supports_conditional_delete(&self) -> bool {
        false
    }
}

#[async_trait]
impl<S: LeaseStore + ?Sized> LeaseStore for std::sync::Arc<S> {
    async fn try_set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        (**self).try_set_with_expiry(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key).await
    }

    async fn delete_if_matches(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        (**self).delete_if_matches(key, expected).await
    }

    fn supports_conditional_delete(&self) -> bool {
        (**self).supports_conditional_delete()
    }
}
