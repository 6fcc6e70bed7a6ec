// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response envelopes, one per endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rb_core::{
    Job, JobId, JobRun, Priority, PriorityCatalog, RunArgument, RunId, RunStatus,
};
use serde::{Deserialize, Deserializer};

use crate::timestamp;

/// `GET /job/job-list`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JobListResponse {
    #[serde(default)]
    pub columns: Vec<String>,
    pub jobs: Vec<JobRecord>,
    #[serde(default)]
    pub translations: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub name: String,
    #[serde(alias = "isActive")]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "lastRunAt", deserialize_with = "timestamp::optional")]
    pub last_run_at: Option<DateTime<Utc>>,
}

impl From<JobRecord> for Job {
    fn from(r: JobRecord) -> Self {
        Job {
            id: r.id,
            name: r.name,
            is_active: r.is_active,
            description: r.description.filter(|d| !d.is_empty()),
            last_run_at: r.last_run_at,
        }
    }
}

/// `GET /job/job-run-list`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunListResponse {
    #[serde(default)]
    pub columns: Vec<String>,
    pub job_runs: Vec<RunRecord>,
    #[serde(default)]
    pub translations: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunRecord {
    pub id: RunId,
    #[serde(alias = "jobId")]
    pub job_id: JobId,
    pub status: RunStatus,
    pub priority: Priority,
    #[serde(deserialize_with = "version")]
    pub version: u64,
    #[serde(default, alias = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(alias = "createdAt", alias = "created", deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        alias = "lastRunAt",
        alias = "updated",
        deserialize_with = "timestamp::optional"
    )]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub arguments: Vec<RunArgument>,
}

impl From<RunRecord> for JobRun {
    fn from(r: RunRecord) -> Self {
        JobRun {
            id: r.id,
            job_id: r.job_id,
            status: r.status,
            priority: r.priority,
            version: r.version,
            error_message: r.error_message.filter(|m| !m.is_empty()),
            created_at: r.created_at,
            last_run_at: r.last_run_at,
            arguments: r.arguments,
        }
    }
}

/// `GET /job/job-run/create-model?jobId=`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreateModelResponse {
    pub priorities: PriorityCatalog,
    #[serde(default)]
    pub translations: HashMap<String, String>,
    pub form_action_url: String,
}

/// `GET /job/job-run/{id}`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunEditResponse {
    pub priority: Priority,
    #[serde(deserialize_with = "version")]
    pub version: u64,
    #[serde(default)]
    pub error_message: Option<String>,
    pub priorities: PriorityCatalog,
    pub form_action_url: String,
    #[serde(default = "default_can_edit")]
    pub can_edit: bool,
    #[serde(default)]
    pub status: Option<RunStatus>,
}

fn default_can_edit() -> bool {
    true
}

/// Success envelope of every mutation.
///
/// Some backend revisions echo the created or edited run; most only send a
/// message.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub job_run: Option<RunRecord>,
}

/// Body of a 4xx/5xx response. Both fields are best-effort.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "error_code")]
    pub code: Option<String>,
}

/// Versions arrive as integers, or as digit strings from older form models.
fn version<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid version '{}'", s))),
    }
}
