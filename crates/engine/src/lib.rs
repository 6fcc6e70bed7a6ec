// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run console engine.
//!
//! Caches job runs per scope, coalesces refreshes, serializes mutations per
//! run, and drives the create/edit workflow. Rendering is left to the
//! caller, which observes registry events and form state.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod coordinator;
mod error;
mod form;
mod jobs;
mod poller;
mod registry;
mod scheduler;

pub use coordinator::{Ack, CreateRun, EditRun, RunOutcome, RunRequestCoordinator};
pub use error::{FetchError, FormError, RunError};
pub use form::{FormMode, FormState, RunFormSession, RunFormStateMachine, Settled};
pub use jobs::JobDirectory;
pub use poller::{PollExit, PollerHandle, RunPoller};
pub use registry::{JobRunRegistry, RegistryEvent, RunScope};
pub use scheduler::RefreshScheduler;

use std::sync::Arc;

use rb_adapters::{CsrfSource, RemoteStore};

/// Every engine component wired to one remote store.
pub struct Console<S> {
    pub registry: JobRunRegistry<S>,
    pub jobs: JobDirectory<S>,
    pub coordinator: RunRequestCoordinator<S>,
    pub form: RunFormStateMachine<S>,
}

impl<S: RemoteStore> Console<S> {
    /// `run_limit` caps how many runs each list request asks for.
    pub fn new(store: S, csrf: Arc<dyn CsrfSource>, run_limit: usize) -> Self {
        let registry = JobRunRegistry::new(store.clone(), run_limit);
        let jobs = JobDirectory::new(store.clone());
        let coordinator =
            RunRequestCoordinator::new(store, registry.clone(), jobs.clone(), csrf);
        let form = RunFormStateMachine::new(coordinator.clone());
        Self { registry, jobs, coordinator, form }
    }
}
