// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job runs: one execution record of a job.

use crate::arguments::RunArgument;
use crate::job::JobId;
use crate::priority::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of a job run, assigned by the remote store on creation.
    pub struct RunId;
}

/// Execution status of a run.
///
/// Only the remote system moves a run between statuses. The console observes
/// transitions by re-fetching and never sets a status itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    Running,
    #[serde(alias = "Completed")]
    Success,
    #[serde(alias = "Failed")]
    Error,
}

crate::simple_display! {
    RunStatus {
        Pending => "Pending",
        Running => "Running",
        Success => "Success",
        Error => "Error",
    }
}

impl RunStatus {
    /// Success and Error are final; the remote system never moves a run on.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Error)
    }

    pub fn tone(self) -> StatusTone {
        match self {
            RunStatus::Pending => StatusTone::Secondary,
            RunStatus::Running => StatusTone::Primary,
            RunStatus::Success => StatusTone::Success,
            RunStatus::Error => StatusTone::Danger,
        }
    }
}

/// Presentation tone a renderer uses for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Secondary,
    Primary,
    Success,
    Danger,
}

crate::simple_display! {
    StatusTone {
        Secondary => "secondary",
        Primary => "primary",
        Success => "success",
        Danger => "danger",
    }
}

/// One execution record of a job.
///
/// `id` is unique and `job_id` never changes after creation. `version` is the
/// optimistic-concurrency counter: the remote store starts it at 0 and bumps
/// it on every accepted edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub id: RunId,
    pub job_id: JobId,
    pub status: RunStatus,
    pub priority: Priority,
    pub version: u64,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<RunArgument>,
}

impl JobRun {
    /// The run's own failure text, only meaningful once it has errored.
    pub fn failure(&self) -> Option<&str> {
        match self.status {
            RunStatus::Error => self.error_message.as_deref(),
            _ => None,
        }
    }
}

crate::builder! {
    pub struct JobRunBuilder => JobRun {
        into {
            id: RunId = "1",
            job_id: JobId = "nightly-import",
            priority: Priority = "Normal",
        }
        set {
            status: RunStatus = RunStatus::Pending,
            version: u64 = 0,
            created_at: DateTime<Utc> = DateTime::<Utc>::default(),
            arguments: Vec<RunArgument> = Vec::new(),
        }
        option {
            error_message: String = None,
            last_run_at: DateTime<Utc> = None,
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
