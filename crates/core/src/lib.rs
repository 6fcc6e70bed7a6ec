// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rb-core: Domain types for the runboard job maintenance console

pub mod macros;

pub mod arguments;
pub mod id;
pub mod job;
pub mod priority;
pub mod run;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use arguments::{
    format_arguments, parse_arguments, ArgumentError, ArgumentErrors, ArgumentKind,
    ArgumentValue, RunArgument,
};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{Job, JobId};
pub use priority::{Priority, PriorityCatalog};
#[cfg(any(test, feature = "test-support"))]
pub use run::JobRunBuilder;
pub use run::{JobRun, RunId, RunStatus, StatusTone};
