// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Refresh coalescing.
//!
//! Each key has at most one fetch on the wire. Callers that arrive before
//! that fetch is issued share it. Callers that arrive while it is on the wire
//! share a single follow-up fetch, so every caller is answered by a fetch
//! issued no earlier than its own call.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::FetchError;

type Waiter<T> = oneshot::Sender<Result<T, FetchError>>;

struct Group<T> {
    /// The fetch for `current` has been issued
    on_wire: bool,
    /// Answered by the next fetch to complete
    current: Vec<Waiter<T>>,
    /// Arrived while `current`'s fetch was on the wire
    next: Vec<Waiter<T>>,
}

/// Coalesces concurrent refreshes per key into one in-flight fetch.
pub struct RefreshScheduler<K, T> {
    groups: Arc<Mutex<HashMap<K, Group<T>>>>,
}

impl<K, T> Clone for RefreshScheduler<K, T> {
    fn clone(&self) -> Self {
        Self { groups: Arc::clone(&self.groups) }
    }
}

impl<K, T> Default for RefreshScheduler<K, T> {
    fn default() -> Self {
        Self { groups: Arc::new(Mutex::new(HashMap::new())) }
    }
}

impl<K, T> RefreshScheduler<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a refresh of `key`, resolving once a fetch issued no earlier
    /// than this call has completed.
    ///
    /// `fetch` is only invoked when no fetch for `key` is pending; it runs on
    /// a spawned task so a dropped caller never strands the other waiters.
    pub async fn refresh<F, Fut>(&self, key: K, fetch: F) -> Result<T, FetchError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let spawn = {
            let mut groups = self.groups.lock();
            match groups.get_mut(&key) {
                Some(group) if group.on_wire => {
                    tracing::debug!(?key, "refresh queued behind in-flight fetch");
                    group.next.push(tx);
                    false
                }
                Some(group) => {
                    tracing::debug!(?key, "refresh joined pending fetch");
                    group.current.push(tx);
                    false
                }
                None => {
                    groups.insert(
                        key.clone(),
                        Group { on_wire: false, current: vec![tx], next: Vec::new() },
                    );
                    true
                }
            }
        };

        if spawn {
            let groups = Arc::clone(&self.groups);
            tokio::spawn(drive(groups, key, fetch));
        }

        rx.await.unwrap_or_else(|_| Err(FetchError::new("refresh was abandoned")))
    }

    /// Whether a fetch for `key` is pending or on the wire.
    pub fn is_pending(&self, key: &K) -> bool {
        self.groups.lock().contains_key(key)
    }
}

async fn drive<K, T, F, Fut>(groups: Arc<Mutex<HashMap<K, Group<T>>>>, key: K, fetch: F)
where
    K: Eq + Hash + Debug,
    T: Clone,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    loop {
        match groups.lock().get_mut(&key) {
            Some(group) => group.on_wire = true,
            None => return,
        }

        let result = fetch().await;

        let (waiters, more) = {
            let mut guard = groups.lock();
            let Some(group) = guard.get_mut(&key) else {
                return;
            };
            let waiters = mem::take(&mut group.current);
            let more = !group.next.is_empty();
            if more {
                group.current = mem::take(&mut group.next);
                group.on_wire = false;
            } else {
                guard.remove(&key);
            }
            (waiters, more)
        };

        tracing::debug!(?key, waiters = waiters.len(), ok = result.is_ok(), "refresh completed");
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
        if !more {
            return;
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
