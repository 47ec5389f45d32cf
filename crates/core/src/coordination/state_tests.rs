// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn held(domain: LockDomain) -> LockState {
    LockState::Held {
        domain,
        token: HolderToken::new("token-1"),
    }
}

#[test]
fn new_state_is_free() {
    let state = LockState::default();
    assert!(state.is_free());
    assert!(state.held_domain().is_none());
}

#[test]
fn acquire_then_complete_holds_domain() {
    let mut state = LockState::default();
    state.begin_acquire(&LockDomain::DATABASE).unwrap();
    assert!(state.held_domain().is_none());

    assert!(state.complete_acquire(HolderToken::new("token-1")));
    assert_eq!(state, held(LockDomain::DATABASE));
    assert_eq!(state.held_domain(), Some(&LockDomain::DATABASE));
}

#[test]
fn begin_acquire_while_held_is_nested() {
    let mut state = held(LockDomain::DATABASE);

    let err = state.begin_acquire(&LockDomain::KEYCLOAK_BOOT).unwrap_err();

    assert!(matches!(
        &err,
        LockError::NestedLock { held, requested }
        if *held == LockDomain::DATABASE && *requested == LockDomain::KEYCLOAK_BOOT
    ));
    assert_eq!(state, held(LockDomain::DATABASE));
}

#[test]
fn begin_acquire_while_acquiring_is_nested() {
    let mut state = LockState::default();
    state.begin_acquire(&LockDomain::DATABASE).unwrap();

    assert!(matches!(
        state.begin_acquire(&LockDomain::DATABASE),
        Err(LockError::NestedLock { .. })
    ));
}

#[test]
fn abort_returns_to_free_only_from_acquiring() {
    let mut state = LockState::default();
    state.begin_acquire(&LockDomain::DATABASE).unwrap();
    state.abort_acquire();
    assert!(state.is_free());

    let mut state = held(LockDomain::DATABASE);
    state.abort_acquire();
    assert_eq!(state, held(LockDomain::DATABASE));
}

#[test]
fn complete_without_acquiring_is_rejected() {
    let mut state = LockState::default();
    assert!(!state.complete_acquire(HolderToken::new("late")));
    assert!(state.is_free());
}

#[test]
fn release_hands_back_domain_and_token() {
    let mut state = held(LockDomain::DATABASE);

    let released = state.release();

    assert_eq!(
        released,
        Some((LockDomain::DATABASE, HolderToken::new("token-1")))
    );
    assert!(state.is_free());
}

#[test]
fn release_when_free_is_noop() {
    let mut state = LockState::default();
    assert_eq!(state.release(), None);
    assert!(state.is_free());
}

#[test]
fn release_while_acquiring_keeps_acquiring() {
    let mut state = LockState::default();
    state.begin_acquire(&LockDomain::DATABASE).unwrap();

    assert_eq!(state.release(), None);
    assert_eq!(
        state,
        LockState::Acquiring {
            domain: LockDomain::DATABASE
        }
    );
}

#[test]
fn forget_if_cleared_matches_domain() {
    let mut state = held(LockDomain::DATABASE);
    assert!(!state.forget_if_cleared(&[LockDomain::KEYCLOAK_BOOT]));
    assert!(!state.is_free());

    assert!(state.forget_if_cleared(&LockDomain::builtin()));
    assert!(state.is_free());
}

proptest! {
    #[test]
    fn at_most_one_domain_is_ever_held(ops in proptest::collection::vec(0..4u8, 0..40)) {
        let domains = LockDomain::builtin();
        let mut state = LockState::default();
        for (i, op) in ops.iter().enumerate() {
            let domain = &domains[i % domains.len()];
            match op {
                0 => {
                    let was_free = state.is_free();
                    let result = state.begin_acquire(domain);
                    prop_assert_eq!(result.is_ok(), was_free);
                }
                1 => {
                    state.complete_acquire(HolderToken::new(format!("t-{}", i)));
                }
                2 => state.abort_acquire(),
                _ => {
                    state.release();
                }
            }
            // Held implies the domain that started the acquisition
            if let LockState::Held { domain, .. } = &state {
                prop_assert!(domains.contains(domain));
            }
        }
    }
}
