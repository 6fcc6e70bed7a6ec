// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory console backend for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rb_core::test_support::standard_catalog;
use rb_core::{parse_arguments, Job, JobId, JobRun, PriorityCatalog, RunId, RunStatus};
use rb_wire::{
    CreateModelResponse, CsrfForm, MessageResponse, RejectKind, RunEditResponse,
    RunRecord, RunSubmission,
};
use tokio::sync::watch;

use crate::store::{RemoteStore, StoreError};

const CREATE_ACTION: &str = "/job/job-run/create";
const EDIT_ACTION_PREFIX: &str = "/job/job-run/update/";

/// Which endpoint a call hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListJobs,
    ListRuns,
    CreateModel,
    FetchRun,
    SubmitRun,
    DeleteRun,
    DeleteJob,
}

/// Recorded store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    ListJobs,
    ListRuns { job_id: Option<JobId>, limit: usize },
    CreateModel { job_id: JobId },
    FetchRun { run_id: RunId },
    SubmitRun { action: Option<String>, form: RunSubmission },
    DeleteRun { run_id: RunId, csrf_token: String },
    DeleteJob { job_id: JobId, csrf_token: String },
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::ListJobs => StoreOp::ListJobs,
            StoreCall::ListRuns { .. } => StoreOp::ListRuns,
            StoreCall::CreateModel { .. } => StoreOp::CreateModel,
            StoreCall::FetchRun { .. } => StoreOp::FetchRun,
            StoreCall::SubmitRun { .. } => StoreOp::SubmitRun,
            StoreCall::DeleteRun { .. } => StoreOp::DeleteRun,
            StoreCall::DeleteJob { .. } => StoreOp::DeleteJob,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Gate {
    paused: bool,
    issued: usize,
}

struct FakeState {
    jobs: Vec<Job>,
    /// Newest first, the order the backend lists them in
    runs: Vec<JobRun>,
    catalog: PriorityCatalog,
    can_edit: bool,
    echo_runs: bool,
    next_id: u64,
    calls: Vec<StoreCall>,
    failures: HashMap<StoreOp, VecDeque<StoreError>>,
}

/// Fake console backend for testing.
///
/// Calls are recorded the moment they are issued. While paused, every call
/// blocks after being recorded until [`resume`](Self::resume), which lets a
/// test hold requests "on the wire". Responses reflect the state at the time
/// the call is released.
#[derive(Clone)]
pub struct FakeRemoteStore {
    inner: Arc<Mutex<FakeState>>,
    gate: Arc<watch::Sender<Gate>>,
}

impl Default for FakeRemoteStore {
    fn default() -> Self {
        let (gate, _) = watch::channel(Gate::default());
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                jobs: Vec::new(),
                runs: Vec::new(),
                catalog: standard_catalog(),
                can_edit: true,
                echo_runs: false,
                next_id: 1,
                calls: Vec::new(),
                failures: HashMap::new(),
            })),
            gate: Arc::new(gate),
        }
    }
}

impl FakeRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ─────────────────────────────────────────────────────────────

    pub fn add_job(&self, job: Job) {
        self.inner.lock().jobs.push(job);
    }

    /// Add a run as the newest one. Later runs created through
    /// `submit_run` get ids above every seeded numeric id.
    pub fn add_run(&self, run: JobRun) {
        let mut state = self.inner.lock();
        if let Ok(n) = run.id.as_str().parse::<u64>() {
            state.next_id = state.next_id.max(n + 1);
        }
        state.runs.insert(0, run);
    }

    pub fn set_catalog(&self, catalog: PriorityCatalog) {
        self.inner.lock().catalog = catalog;
    }

    pub fn set_can_edit(&self, can_edit: bool) {
        self.inner.lock().can_edit = can_edit;
    }

    /// Echo the created or edited run in submission responses.
    pub fn set_echo_runs(&self, echo: bool) {
        self.inner.lock().echo_runs = echo;
    }

    /// Fail the next call to `op` with `error`. Queued failures are consumed
    /// in order.
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.inner.lock().failures.entry(op).or_default().push_back(error);
    }

    // ── Simulated backend activity ──────────────────────────────────────────

    /// Move a run to another status, as the job runner would.
    pub fn set_status(&self, run_id: &RunId, status: RunStatus) {
        if let Some(run) = self.inner.lock().runs.iter_mut().find(|r| &r.id == run_id) {
            run.status = status;
        }
    }

    /// Edit a run behind the console's back.
    pub fn bump_version(&self, run_id: &RunId) {
        if let Some(run) = self.inner.lock().runs.iter_mut().find(|r| &r.id == run_id) {
            run.version += 1;
        }
    }

    pub fn remove_run(&self, run_id: &RunId) {
        self.inner.lock().runs.retain(|r| &r.id != run_id);
    }

    // ── Inspection ──────────────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, op: StoreOp) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    pub fn runs(&self) -> Vec<JobRun> {
        self.inner.lock().runs.clone()
    }

    pub fn run(&self, run_id: &RunId) -> Option<JobRun> {
        self.inner.lock().runs.iter().find(|r| &r.id == run_id).cloned()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.inner.lock().jobs.clone()
    }

    // ── Gate ────────────────────────────────────────────────────────────────

    /// Hold every subsequent call after it is recorded.
    pub fn pause(&self) {
        self.gate.send_modify(|g| g.paused = true);
    }

    /// Release held calls.
    pub fn resume(&self) {
        self.gate.send_modify(|g| g.paused = false);
    }

    /// Wait until at least `n` calls have been issued in total.
    pub async fn issued(&self, n: usize) {
        let mut rx = self.gate.subscribe();
        let _ = rx.wait_for(|g| g.issued >= n).await;
    }

    async fn enter(&self, call: StoreCall) -> Result<(), StoreError> {
        let op = call.op();
        let failure = {
            let mut state = self.inner.lock();
            state.calls.push(call);
            state.failures.get_mut(&op).and_then(VecDeque::pop_front)
        };
        self.gate.send_modify(|g| g.issued += 1);
        let mut rx = self.gate.subscribe();
        let _ = rx.wait_for(|g| !g.paused).await;
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn record(run: &JobRun) -> RunRecord {
    RunRecord {
        id: run.id.clone(),
        job_id: run.job_id.clone(),
        status: run.status,
        priority: run.priority.clone(),
        version: run.version,
        error_message: run.error_message.clone(),
        created_at: run.created_at,
        last_run_at: run.last_run_at,
        arguments: run.arguments.clone(),
    }
}

fn invalid(message: &str) -> StoreError {
    StoreError::rejected(400, RejectKind::Validation, message)
}

impl FakeState {
    fn create(&mut self, form: &RunSubmission) -> Result<MessageResponse, StoreError> {
        if !self.jobs.iter().any(|j| j.id == form.job_id) {
            return Err(StoreError::not_found("Job not found"));
        }
        let arguments = match form.arguments.as_deref() {
            Some(text) => parse_arguments(text).map_err(|e| invalid(&e.to_string()))?,
            None => Vec::new(),
        };
        let id = RunId::from(self.next_id);
        self.next_id += 1;
        let run = JobRun {
            id,
            job_id: form.job_id.clone(),
            status: RunStatus::Pending,
            priority: form.priority.clone(),
            version: 0,
            error_message: None,
            created_at: Utc::now(),
            last_run_at: None,
            arguments,
        };
        let job_run = self.echo_runs.then(|| record(&run));
        self.runs.insert(0, run);
        Ok(MessageResponse { message: "Job run created".to_string(), job_run })
    }

    fn edit(&mut self, run_id: &str, form: &RunSubmission) -> Result<MessageResponse, StoreError> {
        let echo = self.echo_runs;
        let Some(run) = self.runs.iter_mut().find(|r| r.id == run_id) else {
            return Err(StoreError::not_found("Job run not found"));
        };
        if run.version != form.version {
            return Err(StoreError::rejected(
                409,
                RejectKind::StaleVersion,
                "The job run was changed since it was loaded",
            ));
        }
        run.priority = form.priority.clone();
        run.version += 1;
        let job_run = echo.then(|| record(run));
        Ok(MessageResponse { message: "Job run updated".to_string(), job_run })
    }
}

#[async_trait]
impl RemoteStore for FakeRemoteStore {
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.enter(StoreCall::ListJobs).await?;
        Ok(self.jobs())
    }

    async fn list_runs(
        &self,
        job_id: Option<&JobId>,
        limit: usize,
    ) -> Result<Vec<JobRun>, StoreError> {
        self.enter(StoreCall::ListRuns { job_id: job_id.cloned(), limit }).await?;
        let state = self.inner.lock();
        Ok(state
            .runs
            .iter()
            .filter(|r| job_id.map_or(true, |id| &r.job_id == id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create_model(&self, job_id: &JobId) -> Result<CreateModelResponse, StoreError> {
        self.enter(StoreCall::CreateModel { job_id: job_id.clone() }).await?;
        let state = self.inner.lock();
        if !state.jobs.iter().any(|j| &j.id == job_id) {
            return Err(StoreError::not_found("Job not found"));
        }
        Ok(CreateModelResponse {
            priorities: state.catalog.clone(),
            translations: HashMap::new(),
            form_action_url: CREATE_ACTION.to_string(),
        })
    }

    async fn fetch_run(&self, run_id: &RunId) -> Result<RunEditResponse, StoreError> {
        self.enter(StoreCall::FetchRun { run_id: run_id.clone() }).await?;
        let state = self.inner.lock();
        let run = state
            .runs
            .iter()
            .find(|r| &r.id == run_id)
            .ok_or_else(|| StoreError::not_found("Job run not found"))?;
        Ok(RunEditResponse {
            priority: run.priority.clone(),
            version: run.version,
            error_message: run.error_message.clone(),
            priorities: state.catalog.clone(),
            form_action_url: format!("{}{}", EDIT_ACTION_PREFIX, run.id),
            can_edit: state.can_edit,
            status: Some(run.status),
        })
    }

    async fn submit_run(
        &self,
        action: Option<&str>,
        form: &RunSubmission,
    ) -> Result<MessageResponse, StoreError> {
        let call = StoreCall::SubmitRun { action: action.map(str::to_string), form: form.clone() };
        self.enter(call).await?;
        let mut state = self.inner.lock();
        if form.csrf_token.is_empty() {
            return Err(invalid("Missing CSRF token"));
        }
        if !state.catalog.contains(&form.priority) {
            return Err(invalid("Invalid priority"));
        }
        match action.and_then(|a| a.strip_prefix(EDIT_ACTION_PREFIX)) {
            Some(run_id) => state.edit(run_id, form),
            None => state.create(form),
        }
    }

    async fn delete_run(
        &self,
        run_id: &RunId,
        form: &CsrfForm,
    ) -> Result<MessageResponse, StoreError> {
        let call = StoreCall::DeleteRun { run_id: run_id.clone(), csrf_token: form.csrf_token.clone() };
        self.enter(call).await?;
        let mut state = self.inner.lock();
        if form.csrf_token.is_empty() {
            return Err(invalid("Missing CSRF token"));
        }
        let before = state.runs.len();
        state.runs.retain(|r| &r.id != run_id);
        if state.runs.len() == before {
            return Err(StoreError::not_found("Job run not found"));
        }
        Ok(MessageResponse { message: "Job run deleted".to_string(), job_run: None })
    }

    async fn delete_job(
        &self,
        job_id: &JobId,
        form: &CsrfForm,
    ) -> Result<MessageResponse, StoreError> {
        let call = StoreCall::DeleteJob { job_id: job_id.clone(), csrf_token: form.csrf_token.clone() };
        self.enter(call).await?;
        let mut state = self.inner.lock();
        if form.csrf_token.is_empty() {
            return Err(invalid("Missing CSRF token"));
        }
        let before = state.jobs.len();
        state.jobs.retain(|j| &j.id != job_id);
        if state.jobs.len() == before {
            return Err(StoreError::not_found("Job not found"));
        }
        state.runs.retain(|r| &r.job_id != job_id);
        Ok(MessageResponse { message: "Job deleted".to_string(), job_run: None })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
