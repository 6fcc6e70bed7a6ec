// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use rb_core::{Job, JobId, JobRun, RunId};
use rb_wire::{CreateModelResponse, CsrfForm, MessageResponse, RejectKind, RunEditResponse, RunSubmission};
use thiserror::Error;

/// Errors from the remote store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 4xx: the backend refused the request and said why
    #[error("{message}")]
    Rejected { status: u16, kind: RejectKind, message: String },
    /// 5xx or any other non-success status
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn rejected(status: u16, kind: RejectKind, message: impl Into<String>) -> Self {
        StoreError::Rejected { status, kind, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::rejected(404, RejectKind::NotFound, message)
    }

    /// Rejection kind, for 4xx errors only.
    pub fn reject_kind(&self) -> Option<RejectKind> {
        match self {
            StoreError::Rejected { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reject_kind() == Some(RejectKind::NotFound)
    }
}

/// The console backend: the system of record for jobs and runs.
///
/// One method per endpoint. Reads return domain values; mutations return the
/// backend's acknowledgement envelope.
#[async_trait]
pub trait RemoteStore: Clone + Send + Sync + 'static {
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;

    /// Runs of one job, or of every job when `job_id` is `None`, in the
    /// order the backend returns them.
    async fn list_runs(&self, job_id: Option<&JobId>, limit: usize)
        -> Result<Vec<JobRun>, StoreError>;

    /// Form model for creating a run of `job_id`.
    async fn create_model(&self, job_id: &JobId) -> Result<CreateModelResponse, StoreError>;

    /// Form model for editing a run, carrying its current version.
    async fn fetch_run(&self, run_id: &RunId) -> Result<RunEditResponse, StoreError>;

    /// Post a create or edit submission to `action`, or to the default
    /// submission path when the form model supplied none.
    async fn submit_run(
        &self,
        action: Option<&str>,
        form: &RunSubmission,
    ) -> Result<MessageResponse, StoreError>;

    async fn delete_run(&self, run_id: &RunId, form: &CsrfForm)
        -> Result<MessageResponse, StoreError>;

    async fn delete_job(&self, job_id: &JobId, form: &CsrfForm)
        -> Result<MessageResponse, StoreError>;
}
