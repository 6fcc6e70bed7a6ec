// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cached run lists, one snapshot per scope.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rb_adapters::RemoteStore;
use rb_core::{JobId, JobRun, RunId};
use tokio::sync::broadcast;

use crate::error::FetchError;
use crate::scheduler::RefreshScheduler;

const EVENT_CAPACITY: usize = 64;

/// Unit of caching and refresh coalescing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunScope {
    AllRuns,
    Job(JobId),
}

impl RunScope {
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            RunScope::AllRuns => None,
            RunScope::Job(id) => Some(id),
        }
    }
}

impl fmt::Display for RunScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunScope::AllRuns => f.write_str("all runs"),
            RunScope::Job(id) => write!(f, "job {}", id),
        }
    }
}

impl From<JobId> for RunScope {
    fn from(id: JobId) -> Self {
        RunScope::Job(id)
    }
}

impl From<Option<JobId>> for RunScope {
    fn from(id: Option<JobId>) -> Self {
        id.map_or(RunScope::AllRuns, RunScope::Job)
    }
}

/// Completion notification for a scope's refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Refreshed { scope: RunScope, runs: Arc<Vec<JobRun>> },
    /// The previous snapshot is still in place
    RefreshFailed { scope: RunScope, error: FetchError },
}

/// Read-only cache of the remote store's runs.
///
/// Snapshots are replaced wholesale when a fetch completes; a failed fetch
/// leaves the previous snapshot in place. A scope that was never fetched has
/// an empty snapshot.
pub struct JobRunRegistry<S> {
    store: S,
    limit: usize,
    snapshots: Arc<Mutex<HashMap<RunScope, Arc<Vec<JobRun>>>>>,
    events: broadcast::Sender<RegistryEvent>,
    refreshes: RefreshScheduler<RunScope, Arc<Vec<JobRun>>>,
}

impl<S: Clone> Clone for JobRunRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            limit: self.limit,
            snapshots: Arc::clone(&self.snapshots),
            events: self.events.clone(),
            refreshes: self.refreshes.clone(),
        }
    }
}

impl<S: RemoteStore> JobRunRegistry<S> {
    /// `limit` caps how many runs each list request asks for.
    pub fn new(store: S, limit: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            limit,
            snapshots: Arc::new(Mutex::new(HashMap::new())),
            events,
            refreshes: RefreshScheduler::new(),
        }
    }

    /// Current runs for `scope`, in the order the remote store listed them.
    pub fn snapshot(&self, scope: &RunScope) -> Arc<Vec<JobRun>> {
        self.snapshots.lock().get(scope).cloned().unwrap_or_default()
    }

    /// The job a run belongs to, according to any current snapshot.
    pub fn locate(&self, run_id: &RunId) -> Option<JobId> {
        self.snapshots
            .lock()
            .values()
            .flat_map(|runs| runs.iter())
            .find(|run| &run.id == run_id)
            .map(|run| run.job_id.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Refresh `scope`, sharing any fetch that has not been issued yet.
    ///
    /// Resolves with the snapshot from a fetch issued no earlier than this
    /// call. Subscribers are notified of the outcome as well.
    pub async fn refresh(&self, scope: RunScope) -> Result<Arc<Vec<JobRun>>, FetchError> {
        let registry = self.clone();
        let key = scope.clone();
        self.refreshes
            .refresh(scope, move || {
                let registry = registry.clone();
                let scope = key.clone();
                async move { registry.reload(&scope).await }
            })
            .await
    }

    /// Fetch `scope` right away, bypassing coalescing.
    async fn reload(&self, scope: &RunScope) -> Result<Arc<Vec<JobRun>>, FetchError> {
        tracing::debug!(%scope, limit = self.limit, "fetching runs");
        match self.store.list_runs(scope.job_id(), self.limit).await {
            Ok(runs) => {
                let runs = Arc::new(runs);
                self.snapshots.lock().insert(scope.clone(), Arc::clone(&runs));
                tracing::debug!(%scope, count = runs.len(), "runs refreshed");
                let _ = self.events.send(RegistryEvent::Refreshed {
                    scope: scope.clone(),
                    runs: Arc::clone(&runs),
                });
                Ok(runs)
            }
            Err(e) => {
                let error = FetchError::from(e);
                tracing::warn!(%scope, error = %error, "run refresh failed, keeping previous snapshot");
                let _ = self
                    .events
                    .send(RegistryEvent::RefreshFailed { scope: scope.clone(), error: error.clone() });
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
