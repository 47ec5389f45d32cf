//! `kl status` specs

use crate::prelude::*;

#[test]
fn status_shows_every_configured_domain_free() {
    let temp = Project::empty();

    temp.kl().args(["status"]).passes().stdout_eq(
        "DATABASE keylock:database free\n\
         KEYCLOAK_BOOT keylock:keycloak-boot free\n\
         OFFLINE_SESSIONS keylock:offline-sessions free\n",
    );
}

#[test]
fn status_shows_holder_token() {
    let temp = Project::empty();
    temp.seed("keylock:database", "node-a-1234");

    temp.kl()
        .args(["status", "database"])
        .passes()
        .stdout_eq("DATABASE keylock:database held node-a-1234\n");
}

#[test]
fn status_accepts_any_domain_spelling() {
    let temp = Project::empty();

    temp.kl()
        .args(["status", "keycloakBoot", "offline_sessions"])
        .passes()
        .stdout_eq(
            "KEYCLOAK_BOOT keylock:keycloak-boot free\n\
             OFFLINE_SESSIONS keylock:offline-sessions free\n",
        );
}

#[test]
fn status_uses_configured_namespace() {
    let temp = Project::with_config("[lock]\nnamespace = \"cluster-a\"\ndomains = [\"REPORTS\"]\n");
    temp.seed("cluster-a:reports", "worker-7");

    temp.kl()
        .args(["status"])
        .passes()
        .stdout_eq("REPORTS cluster-a:reports held worker-7\n");
}

#[test]
fn status_json_output() {
    let temp = Project::empty();
    temp.seed("keylock:database", "node-a");

    temp.kl()
        .args(["status", "database", "--format", "json"])
        .passes()
        .stdout_has("\"key\": \"keylock:database\"")
        .stdout_has("\"holder\": \"node-a\"");
}
