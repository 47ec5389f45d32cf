//! `kl run` specs

use crate::prelude::*;

#[test]
fn run_holds_lease_while_command_runs() {
    let temp = Project::empty();
    let lease = temp.store_dir().join("keylock%3Adatabase.lease");

    temp.kl()
        .args(["run", "database", "--", "cat"])
        .arg_path(&lease)
        .passes()
        .stdout_has("\"key\":\"keylock:database\"");
}

#[test]
fn run_releases_lease_afterwards() {
    let temp = Project::empty();

    temp.kl().args(["run", "database", "--", "true"]).passes();

    assert_eq!(temp.holder("keylock:database"), None);
}

#[test]
fn run_exits_with_command_status() {
    let temp = Project::empty();

    temp.kl()
        .args(["run", "keycloak-boot", "--", "sh", "-c", "exit 3"])
        .exits_with(3);

    assert_eq!(temp.holder("keylock:keycloak-boot"), None);
}

#[test]
fn run_times_out_when_lock_is_held() {
    let temp = Project::with_config(FAST_CONFIG);
    temp.seed("keylock:database", "other-node");

    temp.kl()
        .args(["run", "database", "--", "true"])
        .exits_with(2)
        .stderr_has("Failed to acquire DB lock for DATABASE within 300ms");

    assert_eq!(
        temp.holder("keylock:database").as_deref(),
        Some("other-node")
    );
}

#[test]
fn run_other_domain_is_not_blocked() {
    let temp = Project::with_config(FAST_CONFIG);
    temp.seed("keylock:database", "other-node");

    temp.kl()
        .args(["run", "offline-sessions", "--", "true"])
        .passes();
}

#[test]
fn run_missing_program_releases_lease() {
    let temp = Project::empty();

    temp.kl()
        .args(["run", "database", "--", "kl-no-such-program"])
        .fails()
        .stderr_has("failed to run kl-no-such-program");

    assert_eq!(temp.holder("keylock:database"), None);
}
