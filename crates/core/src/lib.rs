// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kl-core: lease-based lock coordination for cluster-wide critical sections
//!
//! This crate provides:
//! - The `LeaseStore` contract and an in-process `MemoryLeaseStore`
//! - Stable lock key construction from a namespace and a lock domain
//! - `LockCoordinator`, a per-unit-of-work acquire/release state machine
//! - `CoordinatorFactory`, which validates config and reconciles stale leases at startup

pub mod clock;
pub mod config;
pub mod coordination;
pub mod domain;
pub mod error;
pub mod key;
pub mod store;
pub mod token;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::LockConfig;
pub use coordination::{CoordinatorFactory, LockCoordinator, LockState, StartupReconciler};
pub use domain::LockDomain;
pub use error::{ConfigError, LockError, StoreError};
pub use key::LockKeyBuilder;
pub use store::{LeaseStore, MemoryLeaseStore};
pub use token::{HolderToken, SequentialTokenGen, TokenGen, UuidTokenGen};
