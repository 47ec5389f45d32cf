//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    let temp = Project::empty();

    temp.kl()
        .args(["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("status")
        .stdout_has("force-unlock");
}

#[test]
fn run_help_describes_domain_argument() {
    let temp = Project::empty();

    temp.kl()
        .args(["run", "--help"])
        .passes()
        .stdout_has("Lock domain");
}

#[test]
fn version_is_reported() {
    let temp = Project::empty();

    temp.kl().args(["--version"]).passes().stdout_has("kl ");
}
