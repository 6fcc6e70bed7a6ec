// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cached list of job definitions.

use std::sync::Arc;

use parking_lot::Mutex;
use rb_adapters::RemoteStore;
use rb_core::{Job, JobId};

use crate::error::FetchError;
use crate::scheduler::RefreshScheduler;

/// Read-only copy of the remote store's jobs. Same failure rule as the run
/// registry: a failed refresh keeps what was there.
pub struct JobDirectory<S> {
    store: S,
    jobs: Arc<Mutex<Option<Arc<Vec<Job>>>>>,
    refreshes: RefreshScheduler<(), Arc<Vec<Job>>>,
}

impl<S: Clone> Clone for JobDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            jobs: Arc::clone(&self.jobs),
            refreshes: self.refreshes.clone(),
        }
    }
}

impl<S: RemoteStore> JobDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store, jobs: Arc::new(Mutex::new(None)), refreshes: RefreshScheduler::new() }
    }

    pub fn snapshot(&self) -> Arc<Vec<Job>> {
        self.jobs.lock().clone().unwrap_or_default()
    }

    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.lock().as_ref()?.iter().find(|job| &job.id == id).cloned()
    }

    pub async fn refresh(&self) -> Result<Arc<Vec<Job>>, FetchError> {
        let directory = self.clone();
        self.refreshes
            .refresh((), move || {
                let directory = directory.clone();
                async move { directory.reload().await }
            })
            .await
    }

    async fn reload(&self) -> Result<Arc<Vec<Job>>, FetchError> {
        tracing::debug!("fetching jobs");
        match self.store.list_jobs().await {
            Ok(jobs) => {
                let jobs = Arc::new(jobs);
                *self.jobs.lock() = Some(Arc::clone(&jobs));
                Ok(jobs)
            }
            Err(e) => {
                let error = FetchError::from(e);
                tracing::warn!(error = %error, "job refresh failed, keeping previous list");
                Err(error)
            }
        }
    }
}
