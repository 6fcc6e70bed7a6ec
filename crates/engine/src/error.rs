// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy handed to rendering collaborators.
//!
//! Every error is resolved at the component that produced it and is returned
//! as a value; nothing here is fatal.

use rb_adapters::StoreError;
use rb_core::{ArgumentErrors, Priority};
use rb_wire::RejectKind;
use thiserror::Error;

/// A read failed; whatever was shown before stays shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<StoreError> for FetchError {
    fn from(e: StoreError) -> Self {
        Self::new(e.to_string())
    }
}

/// Errors from run and job mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Rejected for field-level reasons; the workflow stays open
    #[error("{0}")]
    Validation(String),
    /// The run changed since it was loaded; re-open before retrying
    #[error("{0}")]
    StaleVersion(String),
    /// Another mutation of the same run or job is still pending
    #[error("a request for {0} is already in progress")]
    ConflictInProgress(String),
    #[error("{0}")]
    NotFound(String),
    #[error("no CSRF token available")]
    MissingCsrfToken,
}

impl From<StoreError> for RunError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Rejected { kind: RejectKind::Validation, message, .. } => {
                RunError::Validation(message)
            }
            StoreError::Rejected { kind: RejectKind::StaleVersion, message, .. } => {
                RunError::StaleVersion(message)
            }
            StoreError::Rejected { kind: RejectKind::NotFound, message, .. } => {
                RunError::NotFound(message)
            }
            other => RunError::Fetch(other.into()),
        }
    }
}

/// Errors from the create/edit workflow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("no form is open for input")]
    NotReady,
    #[error("this run can no longer be edited")]
    ReadOnly,
    #[error("unknown priority '{0}'")]
    UnknownPriority(Priority),
    #[error("invalid arguments: {0}")]
    InvalidArguments(ArgumentErrors),
}

impl From<FetchError> for FormError {
    fn from(e: FetchError) -> Self {
        FormError::Run(RunError::Fetch(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        validation = { RejectKind::Validation,   RunError::Validation("nope".into()) },
        stale      = { RejectKind::StaleVersion, RunError::StaleVersion("nope".into()) },
        not_found  = { RejectKind::NotFound,     RunError::NotFound("nope".into()) },
    )]
    fn rejection_maps_to_run_error(kind: RejectKind, expected: RunError) {
        assert_eq!(RunError::from(StoreError::rejected(400, kind, "nope")), expected);
    }

    #[test]
    fn server_failure_is_fetch_error() {
        let err = RunError::from(StoreError::Server { status: 503, message: "down".into() });
        assert_eq!(err, RunError::Fetch(FetchError::new("server error (503): down")));
    }
}
