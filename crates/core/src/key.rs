// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock key construction
//!
//! Keys must come out identical in every process and every release: crash
//! recovery and forced unlock both rely on a different process computing the
//! same key for the same domain.

use crate::domain::LockDomain;

/// Maps lock domains to store keys under a namespace prefix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockKeyBuilder {
    prefix: String,
}

impl LockKeyBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `<prefix>:<dash-cased domain>`
    pub fn build(&self, domain: &LockDomain) -> String {
        format!("{}:{}", self.prefix, dash_case(domain.name()))
    }
}

/// Lowercase `name`, separating words with single dashes.
///
/// Underscores, dots, dashes and whitespace are word separators, as is a
/// lower-case letter or digit followed by an upper-case letter. Leading and
/// trailing separators are dropped.
pub fn dash_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    let mut pending_sep = false;

    for c in name.chars() {
        if is_separator(c) {
            pending_sep = true;
        } else {
            if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                pending_sep = true;
            }
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        }
        prev = Some(c);
    }

    out
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.') || c.is_whitespace()
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
