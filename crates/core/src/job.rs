// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job definitions as listed by the remote store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of a job definition.
    ///
    /// Assigned by the remote store; a job's runs reference it through
    /// [`JobRun::job_id`](crate::JobRun::job_id).
    pub struct JobId;
}

/// Read-only copy of a job definition.
///
/// The console never mutates jobs locally. The only job mutation it can
/// request is deletion, and the result becomes visible through a re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            id: JobId = "nightly-import",
            name: String = "Nightly import",
        }
        set {
            is_active: bool = true,
        }
        option {
            description: String = None,
            last_run_at: DateTime<Utc> = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
