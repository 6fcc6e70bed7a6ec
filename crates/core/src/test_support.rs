// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{JobId, JobRun, Priority, PriorityCatalog, RunStatus};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core domain types.
pub mod strategies {
    use crate::{Priority, RunStatus};
    use proptest::prelude::*;

    pub fn arb_run_status() -> impl Strategy<Value = RunStatus> {
        prop_oneof![
            Just(RunStatus::Pending),
            Just(RunStatus::Running),
            Just(RunStatus::Success),
            Just(RunStatus::Error),
        ]
    }

    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![Just(Priority::high()), Just(Priority::normal()), Just(Priority::low())]
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────────

/// The High/Normal/Low catalog the console backend ships with.
pub fn standard_catalog() -> PriorityCatalog {
    PriorityCatalog::new([
        (Priority::high(), "High".to_string()),
        (Priority::normal(), "Normal".to_string()),
        (Priority::low(), "Low".to_string()),
    ])
}

/// `count` pending runs for `job`, ids `1..=count`.
pub fn pending_runs(job: &str, count: u64) -> Vec<JobRun> {
    (1..=count)
        .map(|n| {
            JobRun::builder()
                .id(n)
                .job_id(JobId::new(job))
                .status(RunStatus::Pending)
                .build()
        })
        .collect()
}
