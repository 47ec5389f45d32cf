// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store::MemoryLeaseStore;
use std::time::Duration;

const LEASE: Duration = Duration::from_secs(60);

#[tokio::test]
async fn run_removes_stale_keys_for_namespace() {
    let store = MemoryLeaseStore::new();
    store
        .try_set_with_expiry("ns:database", "crashed-holder", LEASE)
        .await
        .unwrap();
    store
        .try_set_with_expiry("ns:keycloak-boot", "crashed-holder", LEASE)
        .await
        .unwrap();

    let reconciler = StartupReconciler::new(LockKeyBuilder::new("ns"), LockDomain::builtin());
    let removed = reconciler.run(&store).await.unwrap();

    assert_eq!(removed, 2);
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn run_leaves_other_namespaces_alone() {
    let store = MemoryLeaseStore::new();
    store
        .try_set_with_expiry("other:database", "someone", LEASE)
        .await
        .unwrap();

    let reconciler = StartupReconciler::new(LockKeyBuilder::new("ns"), LockDomain::builtin());
    assert_eq!(reconciler.run(&store).await.unwrap(), 0);

    assert_eq!(store.keys(), vec!["other:database".to_string()]);
}

#[tokio::test]
async fn run_only_touches_configured_domains() {
    let store = MemoryLeaseStore::new();
    store
        .try_set_with_expiry("ns:database", "a", LEASE)
        .await
        .unwrap();
    store
        .try_set_with_expiry("ns:offline-sessions", "b", LEASE)
        .await
        .unwrap();

    let reconciler = StartupReconciler::new(LockKeyBuilder::new("ns"), vec![LockDomain::DATABASE]);
    assert_eq!(reconciler.run(&store).await.unwrap(), 1);

    assert_eq!(store.keys(), vec!["ns:offline-sessions".to_string()]);
}

#[tokio::test]
async fn run_on_empty_store_is_harmless() {
    let store = MemoryLeaseStore::new();
    let reconciler = StartupReconciler::new(LockKeyBuilder::new("ns"), LockDomain::builtin());
    assert_eq!(reconciler.run(&store).await.unwrap(), 0);
}
