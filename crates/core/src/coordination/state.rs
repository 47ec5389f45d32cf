// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local lock state for a single coordinator
//!
//! `Free -> Acquiring -> Held -> Free`. The `Acquiring` step exists so that
//! the nested-lock check and the claim happen under one mutex acquisition,
//! while the store round trips that follow run without the mutex held.

use crate::domain::LockDomain;
use crate::error::LockError;
use crate::token::HolderToken;

/// Lock state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LockState {
    /// No domain held or requested
    #[default]
    Free,
    /// Polling the store for `domain`
    Acquiring { domain: LockDomain },
    /// Lease for `domain` written with `token`
    Held {
        domain: LockDomain,
        token: HolderToken,
    },
}

impl LockState {
    pub fn is_free(&self) -> bool {
        matches!(self, LockState::Free)
    }

    /// The domain currently held, if any
    pub fn held_domain(&self) -> Option<&LockDomain> {
        match self {
            LockState::Held { domain, .. } => Some(domain),
            _ => None,
        }
    }

    /// Free -> Acquiring. Any other state is a nested acquisition.
    pub fn begin_acquire(&mut self, requested: &LockDomain) -> Result<(), LockError> {
        match self {
            LockState::Free => {
                *self = LockState::Acquiring {
                    domain: requested.clone(),
                };
                Ok(())
            }
            LockState::Acquiring { domain } | LockState::Held { domain, .. } => {
                Err(LockError::NestedLock {
                    held: domain.clone(),
                    requested: requested.clone(),
                })
            }
        }
    }

    /// Acquiring -> Held. Returns false if the state moved on meanwhile.
    pub fn complete_acquire(&mut self, token: HolderToken) -> bool {
        match self {
            LockState::Acquiring { domain } => {
                *self = LockState::Held {
                    domain: domain.clone(),
                    token,
                };
                true
            }
            _ => false,
        }
    }

    /// Acquiring -> Free. Leaves other states untouched.
    pub fn abort_acquire(&mut self) {
        if matches!(self, LockState::Acquiring { .. }) {
            *self = LockState::Free;
        }
    }

    /// Held -> Free, handing back what was held
    pub fn release(&mut self) -> Option<(LockDomain, HolderToken)> {
        match std::mem::take(self) {
            LockState::Held { domain, token } => Some((domain, token)),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Held(domain) -> Free when `domain` is among `cleared`
    pub fn forget_if_cleared(&mut self, cleared: &[LockDomain]) -> bool {
        match self {
            LockState::Held { domain, .. } if cleared.contains(domain) => {
                *self = LockState::Free;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
