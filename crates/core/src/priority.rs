// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run priorities and the catalog that enumerates them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A run priority value.
///
/// Priorities are opaque values owned by the remote store; the catalog
/// returned with each form model is the authority on which ones exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(String);

impl Priority {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn high() -> Self {
        Self::new("High")
    }

    pub fn normal() -> Self {
        Self::new("Normal")
    }

    pub fn low() -> Self {
        Self::new("Low")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<&str> for Priority {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Read-only enumeration of priority values and their display labels.
///
/// Fetched fresh for every form session since labels are locale-dependent.
/// Entries keep the order the remote store sent them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityCatalog {
    entries: IndexMap<Priority, String>,
}

impl PriorityCatalog {
    pub fn new(entries: impl IntoIterator<Item = (Priority, String)>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    /// Display label for a priority, if the catalog knows it.
    pub fn label(&self, priority: &Priority) -> Option<&str> {
        self.entries.get(priority).map(String::as_str)
    }

    pub fn contains(&self, priority: &Priority) -> bool {
        self.entries.contains_key(priority)
    }

    /// The option a fresh selection starts on: the first entry.
    pub fn default_selection(&self) -> Option<&Priority> {
        self.entries.keys().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Priority, &str)> {
        self.entries.iter().map(|(p, l)| (p, l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Priority, String)> for PriorityCatalog {
    fn from_iter<T: IntoIterator<Item = (Priority, String)>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
