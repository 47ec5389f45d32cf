//! Shared helpers for CLI specs

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use kl_adapters::FileLeaseStore;
use kl_core::LeaseStore;
use predicates::str::contains;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Config that gives up on a held lock quickly
pub const FAST_CONFIG: &str = r#"
[lock]
lock-recheck-time = "20ms"
lock-wait-timeout = "300ms"
"#;

/// A scratch directory holding the lease store and an optional config file
pub struct Project {
    dir: TempDir,
    config: Option<PathBuf>,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            config: None,
        }
    }

    pub fn with_config(toml: &str) -> Self {
        let mut project = Self::empty();
        let path = project.dir.path().join("kl.toml");
        std::fs::write(&path, toml).unwrap();
        project.config = Some(path);
        project
    }

    pub fn store_dir(&self) -> PathBuf {
        self.dir.path().join("leases")
    }

    /// Plant a lease as if another process held it
    pub fn seed(&self, key: &str, holder: &str) {
        let store = FileLeaseStore::open(self.store_dir()).unwrap();
        let created = block_on(store.try_set_with_expiry(key, holder, Duration::from_secs(600)));
        assert!(created.unwrap(), "lease {} already present", key);
    }

    /// Holder of `key` as the store sees it
    pub fn holder(&self, key: &str) -> Option<String> {
        let store = FileLeaseStore::open(self.store_dir()).unwrap();
        block_on(store.get(key)).unwrap()
    }

    /// `kl` invocation pointed at this project's store and config
    pub fn kl(&self) -> CliBuilder {
        let mut cmd = Command::cargo_bin("kl").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(self.store_dir());
        if let Some(config) = &self.config {
            cmd.arg("--config").arg(config);
        }
        CliBuilder { cmd }
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn arg_path(mut self, path: &Path) -> Self {
        self.cmd.arg(path);
        self
    }

    pub fn passes(mut self) -> RunAssert {
        RunAssert(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> RunAssert {
        RunAssert(self.cmd.assert().failure())
    }

    pub fn exits_with(mut self, code: i32) -> RunAssert {
        RunAssert(self.cmd.assert().code(code))
    }
}

pub struct RunAssert(Assert);

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).to_string()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        Self(self.0.stdout(contains(expected)))
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self(self.0.stderr(contains(expected)))
    }
}
