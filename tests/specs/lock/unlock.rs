//! `kl force-unlock` specs

use crate::prelude::*;

#[test]
fn force_unlock_removes_configured_leases() {
    let temp = Project::empty();
    temp.seed("keylock:database", "crashed");
    temp.seed("keylock:offline-sessions", "crashed");

    temp.kl()
        .args(["force-unlock"])
        .passes()
        .stdout_has("Removed 2 leases in namespace keylock");

    assert_eq!(temp.holder("keylock:database"), None);
    assert_eq!(temp.holder("keylock:offline-sessions"), None);
}

#[test]
fn force_unlock_on_empty_store_is_harmless() {
    let temp = Project::empty();

    temp.kl()
        .args(["force-unlock"])
        .passes()
        .stdout_has("Removed 0 leases");
}

#[test]
fn force_unlock_leaves_other_namespaces_alone() {
    let temp = Project::with_config("[lock]\nnamespace = \"mine\"\n");
    temp.seed("theirs:database", "other-cluster");

    temp.kl().args(["force-unlock"]).passes();

    assert_eq!(
        temp.holder("theirs:database").as_deref(),
        Some("other-cluster")
    );
}

#[test]
fn force_unlock_on_startup_clears_before_running() {
    let temp = Project::with_config(
        r#"
        [lock]
        force-unlock-on-startup = true
        lock-wait-timeout = "200ms"
        lock-recheck-time = "20ms"
        "#,
    );
    temp.seed("keylock:database", "crashed");

    temp.kl().args(["run", "database", "--", "true"]).passes();

    assert_eq!(temp.holder("keylock:database"), None);
}
