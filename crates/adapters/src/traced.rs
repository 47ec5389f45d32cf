// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced lease store wrapper for consistent observability

use async_trait::async_trait;
use kl_core::{LeaseStore, StoreError};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Wrapper that adds tracing to any LeaseStore
#[derive(Clone)]
pub struct TracedLeaseStore<S> {
    inner: S,
}

impl<S> TracedLeaseStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl<S: LeaseStore> LeaseStore for TracedLeaseStore<S> {
    async fn try_set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.try_set", key);
        let start = Instant::now();
        let result = self
            .inner
            .try_set_with_expiry(key, value, ttl)
            .instrument(span.clone())
            .await;
        let _guard = span.enter();

        match &result {
            Ok(true) => tracing::info!(
                holder = value,
                ttl_ms = ttl.as_millis() as u64,
                elapsed_ms = elapsed_ms(start),
                "lease created"
            ),
            Ok(false) => tracing::debug!(elapsed_ms = elapsed_ms(start), "lease already held"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed_ms(start),
                error = %e,
                "try_set failed"
            ),
        }

        result
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let result = self.inner.get(key).await;
        tracing::trace!(key, found = ?result.as_ref().ok().map(|v| v.is_some()), "checked");
        result
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.delete", key);
        let start = Instant::now();
        let result = self.inner.delete(key).instrument(span.clone()).await;
        let _guard = span.enter();

        match &result {
            Ok(removed) => tracing::info!(removed, elapsed_ms = elapsed_ms(start), "deleted"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed_ms(start),
                error = %e,
                "delete failed"
            ),
        }

        result
    }

    async fn delete_if_matches(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.delete_if_matches", key);
        let start = Instant::now();
        let result = self
            .inner
            .delete_if_matches(key, expected)
            .instrument(span.clone())
            .await;
        let _guard = span.enter();

        match &result {
            Ok(true) => tracing::info!(elapsed_ms = elapsed_ms(start), "released"),
            // Lease expired or was taken over; not ours to remove
            Ok(false) => tracing::warn!(
                holder = expected,
                elapsed_ms = elapsed_ms(start),
                "lease no longer held by this holder"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed_ms(start),
                error = %e,
                "conditional delete failed"
            ),
        }

        result
    }

    fn supports_conditional_delete(&self) -> bool {
        self.inner.supports_conditional_delete()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
