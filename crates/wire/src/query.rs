// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoints of the console backend.
//!
//! An endpoint is a list of raw path segments plus query pairs. Escaping is
//! left to whoever assembles the URL.

use rb_core::{JobId, RunId};

/// A request target on the console backend, relative to its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListJobs,
    /// Runs for one job, or for every job when `job_id` is `None`
    ListRuns {
        job_id: Option<JobId>,
        limit: usize,
    },
    CreateModel {
        job_id: JobId,
    },
    FetchRun {
        id: RunId,
    },
    /// Fallback submission target when the form model carried no action URL
    SubmitRun,
    DeleteRun {
        id: RunId,
    },
    DeleteJob {
        id: JobId,
    },
}

impl Endpoint {
    pub const BASE: &'static str = "job";

    /// Unescaped path segments below the base URL.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = vec![Self::BASE];
        match self {
            Endpoint::ListJobs => segments.push("job-list"),
            Endpoint::ListRuns { .. } => segments.push("job-run-list"),
            Endpoint::CreateModel { .. } => segments.extend(["job-run", "create-model"]),
            Endpoint::FetchRun { id } => segments.extend(["job-run", id.as_str()]),
            Endpoint::SubmitRun => segments.extend(["job-run", "create"]),
            Endpoint::DeleteRun { id } => segments.extend(["job-run", "delete", id.as_str()]),
            Endpoint::DeleteJob { id } => segments.extend(["delete", id.as_str()]),
        }
        segments
    }

    /// Unescaped query pairs, in wire order.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::ListRuns { job_id: Some(job_id), limit } => {
                vec![("jobId", job_id.to_string()), ("limit", limit.to_string())]
            }
            Endpoint::ListRuns { job_id: None, limit } => vec![("limit", limit.to_string())],
            Endpoint::CreateModel { job_id } => vec![("jobId", job_id.to_string())],
            _ => Vec::new(),
        }
    }
}
