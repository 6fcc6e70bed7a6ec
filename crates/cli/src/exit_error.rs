// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use rb_engine::{FormError, RunError};

pub mod codes {
    pub const FAILURE: i32 = 1;
    /// The run changed remotely since it was loaded
    pub const STALE_VERSION: i32 = 2;
    /// Another request for the same run is still in flight
    pub const CONFLICT: i32 = 3;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<RunError> for ExitError {
    fn from(err: RunError) -> Self {
        let code = match &err {
            RunError::StaleVersion(_) => codes::STALE_VERSION,
            RunError::ConflictInProgress(_) => codes::CONFLICT,
            _ => codes::FAILURE,
        };
        Self::new(code, err.to_string())
    }
}

impl From<FormError> for ExitError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Run(e) => e.into(),
            other => Self::new(codes::FAILURE, other.to_string()),
        }
    }
}
