// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Form bodies posted to the console backend.

use rb_core::{format_arguments, JobId, Priority, RunArgument};
use serde::Serialize;

/// Create or edit submission, posted to the form model's action URL.
///
/// `version` is the version the operator loaded (0 on create); the backend
/// compares it against its own and rejects the edit on mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSubmission {
    pub priority: Priority,
    pub job_id: JobId,
    pub version: u64,
    pub csrf_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl RunSubmission {
    pub fn create(
        job_id: JobId,
        priority: Priority,
        arguments: &[RunArgument],
        csrf_token: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            job_id,
            version: 0,
            csrf_token: csrf_token.into(),
            arguments: (!arguments.is_empty()).then(|| format_arguments(arguments)),
        }
    }

    pub fn edit(
        job_id: JobId,
        priority: Priority,
        loaded_version: u64,
        csrf_token: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            job_id,
            version: loaded_version,
            csrf_token: csrf_token.into(),
            arguments: None,
        }
    }
}

/// Body of a delete request: the token and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsrfForm {
    pub csrf_token: String,
}

impl CsrfForm {
    pub fn new(token: impl Into<String>) -> Self {
        Self { csrf_token: token.into() }
    }
}
