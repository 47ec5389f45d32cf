// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease-based lock coordination
//!
//! This module provides:
//! - **LockState** - Local Free/Acquiring/Held state machine, one per coordinator
//! - **LockCoordinator** - Acquire, release, inspect and force-destroy against a lease store
//! - **StartupReconciler** - One-shot removal of leases left by a crashed process
//! - **CoordinatorFactory** - Validates config, runs reconciliation, creates coordinators

pub mod coordinator;
pub mod factory;
pub mod reconciler;
pub mod state;

pub use coordinator::LockCoordinator;
pub use factory::CoordinatorFactory;
pub use reconciler::StartupReconciler;
pub use state::LockState;
