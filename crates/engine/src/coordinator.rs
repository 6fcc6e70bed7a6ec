// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run and job mutations.
//!
//! Every mutation is followed by a registry refresh of the affected scope;
//! that refresh is the only way a mutation becomes visible. Requests that
//! fail locally never reach the network and refresh nothing.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rb_adapters::{CsrfSource, RemoteStore, StoreError};
use rb_core::{JobId, JobRun, Priority, RunArgument, RunId};
use rb_wire::{CsrfForm, MessageResponse, RunSubmission};

use crate::error::RunError;
use crate::jobs::JobDirectory;
use crate::registry::{JobRunRegistry, RunScope};

/// Create a run of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRun {
    pub job_id: JobId,
    pub priority: Priority,
    pub arguments: Vec<RunArgument>,
    /// Submission target from the form model
    pub action: Option<String>,
}

impl CreateRun {
    pub fn new(job_id: impl Into<JobId>, priority: impl Into<Priority>) -> Self {
        Self { job_id: job_id.into(), priority: priority.into(), arguments: Vec::new(), action: None }
    }

    rb_core::setters! {
        set { arguments: Vec<RunArgument> }
        option { action: String }
    }
}

/// Change the priority of an existing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRun {
    pub run_id: RunId,
    pub job_id: JobId,
    pub priority: Priority,
    /// Version the operator saw when the run was loaded
    pub loaded_version: u64,
    pub action: Option<String>,
}

impl EditRun {
    pub fn new(
        run_id: impl Into<RunId>,
        job_id: impl Into<JobId>,
        priority: impl Into<Priority>,
        loaded_version: u64,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            job_id: job_id.into(),
            priority: priority.into(),
            loaded_version,
            action: None,
        }
    }

    rb_core::setters! {
        option { action: String }
    }
}

/// Accepted create or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub message: String,
    /// The created or edited run, when the remote store echoed it
    pub run: Option<JobRun>,
}

impl From<MessageResponse> for RunOutcome {
    fn from(ack: MessageResponse) -> Self {
        Self { message: ack.message, run: ack.job_run.map(JobRun::from) }
    }
}

/// Accepted delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Target {
    Run(RunId),
    Job(JobId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Run(id) => write!(f, "run {}", id),
            Target::Job(id) => write!(f, "job {}", id),
        }
    }
}

/// Marks a target as having a mutation in flight until dropped.
struct InFlight {
    targets: Arc<Mutex<HashSet<Target>>>,
    target: Target,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.targets.lock().remove(&self.target);
    }
}

/// Issues mutations, one at a time per run or job.
pub struct RunRequestCoordinator<S> {
    store: S,
    registry: JobRunRegistry<S>,
    jobs: JobDirectory<S>,
    csrf: Arc<dyn CsrfSource>,
    in_flight: Arc<Mutex<HashSet<Target>>>,
}

impl<S: Clone> Clone for RunRequestCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            registry: self.registry.clone(),
            jobs: self.jobs.clone(),
            csrf: Arc::clone(&self.csrf),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S: RemoteStore> RunRequestCoordinator<S> {
    pub fn new(
        store: S,
        registry: JobRunRegistry<S>,
        jobs: JobDirectory<S>,
        csrf: Arc<dyn CsrfSource>,
    ) -> Self {
        Self { store, registry, jobs, csrf, in_flight: Arc::new(Mutex::new(HashSet::new())) }
    }

    pub fn registry(&self) -> &JobRunRegistry<S> {
        &self.registry
    }

    pub fn jobs(&self) -> &JobDirectory<S> {
        &self.jobs
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a mutation of `run_id` is pending.
    pub fn is_in_flight(&self, run_id: &RunId) -> bool {
        self.in_flight.lock().contains(&Target::Run(run_id.clone()))
    }

    pub async fn create_run(&self, request: CreateRun) -> Result<RunOutcome, RunError> {
        let token = self.token()?;
        let form = RunSubmission::create(
            request.job_id.clone(),
            request.priority,
            &request.arguments,
            token,
        );
        tracing::debug!(job_id = %request.job_id, priority = %form.priority, "submitting new run");

        let result = self.store.submit_run(request.action.as_deref(), &form).await;
        let result = settled("create run", result).map(RunOutcome::from);

        self.refresh(RunScope::Job(request.job_id)).await;
        result
    }

    /// Submit an edit carrying the version the operator loaded. A newer
    /// remote version fails with [`RunError::StaleVersion`].
    pub async fn edit_run(&self, request: EditRun) -> Result<RunOutcome, RunError> {
        let guard = self.claim(Target::Run(request.run_id.clone()))?;
        let token = self.token()?;
        let form = RunSubmission::edit(
            request.job_id.clone(),
            request.priority,
            request.loaded_version,
            token,
        );
        tracing::debug!(
            run_id = %request.run_id,
            version = request.loaded_version,
            priority = %form.priority,
            "submitting run edit"
        );

        let result = self.store.submit_run(request.action.as_deref(), &form).await;
        drop(guard);
        let result = settled("edit run", result).map(RunOutcome::from);

        self.refresh(RunScope::Job(request.job_id)).await;
        result
    }

    /// Delete a run. Deleting a run that is already gone succeeds.
    pub async fn delete_run(&self, run_id: &RunId) -> Result<Ack, RunError> {
        let guard = self.claim(Target::Run(run_id.clone()))?;
        let token = self.token()?;
        let scope = self.registry.locate(run_id).map_or(RunScope::AllRuns, RunScope::Job);
        tracing::debug!(%run_id, %scope, "deleting run");

        let result = self.store.delete_run(run_id, &CsrfForm::new(token)).await;
        drop(guard);
        let result = idempotent("delete run", result);

        self.refresh(scope).await;
        result
    }

    /// Delete a job definition. Deleting a job that is already gone succeeds.
    pub async fn delete_job(&self, job_id: &JobId) -> Result<Ack, RunError> {
        let guard = self.claim(Target::Job(job_id.clone()))?;
        let token = self.token()?;
        tracing::debug!(%job_id, "deleting job");

        let result = self.store.delete_job(job_id, &CsrfForm::new(token)).await;
        drop(guard);
        let result = idempotent("delete job", result);

        if let Err(e) = self.jobs.refresh().await {
            tracing::warn!(error = %e, "job refresh after delete failed");
        }
        self.refresh(RunScope::AllRuns).await;
        result
    }

    fn claim(&self, target: Target) -> Result<InFlight, RunError> {
        if !self.in_flight.lock().insert(target.clone()) {
            tracing::warn!(%target, "rejecting concurrent mutation");
            return Err(RunError::ConflictInProgress(target.to_string()));
        }
        Ok(InFlight { targets: Arc::clone(&self.in_flight), target })
    }

    fn token(&self) -> Result<String, RunError> {
        self.csrf.token().ok_or(RunError::MissingCsrfToken)
    }

    /// Refresh failures are already published on the registry's channel.
    async fn refresh(&self, scope: RunScope) {
        if let Err(e) = self.registry.refresh(scope.clone()).await {
            tracing::warn!(%scope, error = %e, "refresh after mutation failed");
        }
    }
}

fn settled(
    op: &'static str,
    result: Result<MessageResponse, StoreError>,
) -> Result<MessageResponse, RunError> {
    match result {
        Ok(ack) => {
            tracing::info!(op, message = %ack.message, "accepted");
            Ok(ack)
        }
        Err(e) => {
            tracing::warn!(op, error = %e, "rejected");
            Err(e.into())
        }
    }
}

fn idempotent(op: &'static str, result: Result<MessageResponse, StoreError>) -> Result<Ack, RunError> {
    match result {
        Err(e) if e.is_not_found() => {
            tracing::info!(op, "already gone");
            Ok(Ack { message: e.to_string() })
        }
        other => settled(op, other).map(|ack| Ack { message: ack.message }),
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
