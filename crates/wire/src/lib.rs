// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record types for the console backend's HTTP endpoints.
//!
//! Every endpoint has a fixed request and response shape. Unknown response
//! fields are ignored; a missing required field fails deserialization, which
//! callers surface as a fetch error.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod query;
mod request;
mod response;
mod status;
mod timestamp;

pub use query::Endpoint;
pub use request::{CsrfForm, RunSubmission};
pub use response::{
    CreateModelResponse, ErrorBody, JobListResponse, JobRecord, MessageResponse,
    RunEditResponse, RunListResponse, RunRecord,
};
pub use status::{classify_rejection, StatusClass, RejectKind};

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
