//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_domain_syntax_is_rejected() {
    let temp = Project::empty();

    temp.kl()
        .args(["status", "___"])
        .fails()
        .stderr_has("invalid lock domain");
}

#[test]
fn invalid_config_names_the_file() {
    let temp = Project::with_config("[lock]\nlock-wait-timeout = 0\n");

    temp.kl()
        .args(["status"])
        .fails()
        .stderr_has("kl.toml")
        .stderr_has("lock-wait-timeout must be greater than zero");
}

#[test]
fn unknown_config_key_is_rejected() {
    let temp = Project::with_config("[lock]\nlock-timeout = 5\n");

    temp.kl()
        .args(["status"])
        .fails()
        .stderr_has("lock-timeout");
}

#[test]
fn run_requires_a_command() {
    let temp = Project::empty();

    temp.kl().args(["run", "database"]).exits_with(2);
}
