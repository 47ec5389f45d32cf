// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed lease store shared by processes on one host.
//!
//! Each key is one JSON file holding the holder token and a wall-clock
//! expiry. Every mutation runs under an exclusive lock on a guard file in
//! the same directory and publishes new leases with an atomic rename, so
//! readers never see a half-written lease. All participants must use this
//! store on the same directory.

use async_trait::async_trait;
use fs2::FileExt;
use kl_core::{Clock, LeaseStore, StoreError, SystemClock};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const GUARD_FILE: &str = ".guard";
const LEASE_EXT: &str = "lease";

#[derive(Debug, Serialize, Deserialize)]
struct LeaseRecord {
    key: String,
    holder: String,
    expires_at_ms: u64,
}

/// Lease store keeping one file per key under a directory
#[derive(Clone)]
pub struct FileLeaseStore<C: Clock = SystemClock> {
    dir: Arc<PathBuf>,
    clock: C,
}

impl FileLeaseStore<SystemClock> {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_clock(dir, SystemClock)
    }
}

impl<C: Clock + 'static> FileLeaseStore<C> {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open_with_clock(dir: impl Into<PathBuf>, clock: C) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: Arc::new(dir),
            clock,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn lease_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", encode_key(key), LEASE_EXT))
    }

    /// Exclusive lock on the guard file, released when the handle drops
    fn lock_guard(&self) -> Result<File, StoreError> {
        let guard = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(GUARD_FILE))?;
        guard.lock_exclusive()?;
        Ok(guard)
    }

    fn read_record(&self, key: &str) -> Result<Option<LeaseRecord>, StoreError> {
        let bytes = match fs::read(self.lease_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: LeaseRecord =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        if record.key != key {
            return Err(StoreError::Corrupt {
                key: key.to_string(),
                reason: format!("file holds lease for {}", record.key),
            });
        }
        Ok(Some(record))
    }

    fn is_live(&self, record: &LeaseRecord) -> bool {
        record.expires_at_ms > self.clock.epoch_millis()
    }

    fn remove_lease_file(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.lease_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_lease_file(&self, record: &LeaseRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Corrupt {
            key: record.key.clone(),
            reason: e.to_string(),
        })?;
        let tmp = self.dir.join(format!(
            ".{}.{}.tmp",
            encode_key(&record.key),
            std::process::id()
        ));
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, self.lease_path(&record.key)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn set_blocking(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let _guard = self.lock_guard()?;
        match self.read_record(key)? {
            Some(existing) if self.is_live(&existing) => return Ok(false),
            Some(_) => self.remove_lease_file(key)?,
            None => {}
        }

        let record = LeaseRecord {
            key: key.to_string(),
            holder: value.to_string(),
            expires_at_ms: self.clock.epoch_millis() + ttl.as_millis() as u64,
        };
        self.write_lease_file(&record)?;
        Ok(true)
    }

    fn get_blocking(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .read_record(key)?
            .filter(|record| self.is_live(record))
            .map(|record| record.holder))
    }

    fn delete_blocking(&self, key: &str) -> Result<bool, StoreError> {
        let _guard = self.lock_guard()?;
        let existed = match self.read_record(key) {
            Ok(Some(record)) => self.is_live(&record),
            Ok(None) => return Ok(false),
            // Unreadable leases are removed too; that is what forced unlock is for
            Err(StoreError::Corrupt { .. }) => true,
            Err(e) => return Err(e),
        };
        self.remove_lease_file(key)?;
        Ok(existed)
    }

    fn delete_if_matches_blocking(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let _guard = self.lock_guard()?;
        match self.read_record(key)? {
            Some(record) if !self.is_live(&record) => {
                self.remove_lease_file(key)?;
                Ok(false)
            }
            Some(record) if record.holder == expected => {
                self.remove_lease_file(key)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Run file I/O off the async executor
    async fn blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Self) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| StoreError::Unavailable(format!("file store task failed: {}", e)))?
    }
}

#[async_trait]
impl<C: Clock + 'static> LeaseStore for FileLeaseStore<C> {
    async fn try_set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.blocking(move |store| store.set_blocking(&key, &value, ttl))
            .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();
        self.blocking(move |store| store.get_blocking(&key)).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let key = key.to_string();
        self.blocking(move |store| store.delete_blocking(&key))
            .await
    }

    async fn delete_if_matches(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let (key, expected) = (key.to_string(), expected.to_string());
        self.blocking(move |store| store.delete_if_matches_blocking(&key, &expected))
            .await
    }

    fn supports_conditional_delete(&self) -> bool {
        true
    }
}

/// File-name-safe encoding of a key: `[A-Za-z0-9_-]` pass through, every
/// other byte becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
