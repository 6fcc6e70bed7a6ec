// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Create/edit workflow.
//!
//! `Closed → Loading → Ready → Submitting → Closed`. A failed load returns to
//! `Closed`; a failed submission returns to `Ready` with the error shown so
//! the operator can retry without re-fetching priorities.
//!
//! Every transition bumps or checks a generation counter. A response that
//! arrives after its session was closed or superseded is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use rb_adapters::RemoteStore;
use rb_core::{parse_arguments, JobId, Priority, PriorityCatalog, RunArgument, RunId, RunStatus};
use tokio::sync::watch;

use crate::coordinator::{CreateRun, EditRun, RunOutcome, RunRequestCoordinator};
use crate::error::{FetchError, FormError, RunError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Fields of one open workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFormSession {
    pub mode: FormMode,
    pub job_id: JobId,
    /// Set in edit mode only
    pub run_id: Option<RunId>,
    /// 0 in create mode
    pub loaded_version: u64,
    pub priorities: PriorityCatalog,
    pub selected_priority: Priority,
    /// Create mode only
    pub arguments: Vec<RunArgument>,
    /// Last submission or validation error
    pub error_message: Option<String>,
    pub form_action_url: Option<String>,
    pub can_edit: bool,
    /// Status of the run being edited
    pub run_status: Option<RunStatus>,
    /// The run's own failure text
    pub run_error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Loading { mode: FormMode, job_id: JobId, run_id: Option<RunId> },
    Ready(RunFormSession),
    Submitting(RunFormSession),
}

impl FormState {
    pub fn session(&self) -> Option<&RunFormSession> {
        match self {
            FormState::Ready(session) | FormState::Submitting(session) => Some(session),
            FormState::Closed | FormState::Loading { .. } => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, FormState::Closed)
    }
}

/// Result of an asynchronous transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    Applied(T),
    /// The session moved on while the request was in flight
    Superseded,
}

impl<T> Settled<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Settled::Applied(value) => Some(value),
            Settled::Superseded => None,
        }
    }
}

struct Inner {
    generation: u64,
    state: FormState,
}

/// Drives one create-or-edit workflow at a time.
pub struct RunFormStateMachine<S> {
    store: S,
    coordinator: RunRequestCoordinator<S>,
    inner: Arc<Mutex<Inner>>,
    published: Arc<watch::Sender<FormState>>,
}

impl<S: Clone> Clone for RunFormStateMachine<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            coordinator: self.coordinator.clone(),
            inner: Arc::clone(&self.inner),
            published: Arc::clone(&self.published),
        }
    }
}

impl<S: RemoteStore> RunFormStateMachine<S> {
    pub fn new(coordinator: RunRequestCoordinator<S>) -> Self {
        let (published, _) = watch::channel(FormState::Closed);
        Self {
            store: coordinator.store().clone(),
            coordinator,
            inner: Arc::new(Mutex::new(Inner { generation: 0, state: FormState::Closed })),
            published: Arc::new(published),
        }
    }

    pub fn state(&self) -> FormState {
        self.inner.lock().state.clone()
    }

    /// Observe state changes without polling.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.published.subscribe()
    }

    /// Open the create workflow for `job_id`, loading its priority catalog.
    pub async fn open_create(
        &self,
        job_id: JobId,
    ) -> Result<Settled<RunFormSession>, FormError> {
        let generation = self.begin(FormMode::Create, job_id.clone(), None);
        tracing::debug!(%job_id, generation, "opening create form");
        let loaded = self.store.create_model(&job_id).await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(%job_id, generation, "discarding superseded create model");
            return Ok(Settled::Superseded);
        }
        let session = loaded.map_err(RunError::from).and_then(|model| {
            let priorities = require_priorities(model.priorities)?;
            let selected_priority = first_priority(&priorities)?;
            Ok(RunFormSession {
                mode: FormMode::Create,
                job_id,
                run_id: None,
                loaded_version: 0,
                priorities,
                selected_priority,
                arguments: Vec::new(),
                error_message: None,
                form_action_url: non_empty(model.form_action_url),
                can_edit: true,
                run_status: None,
                run_error_message: None,
            })
        });
        self.settle_open(&mut inner, session)
    }

    /// Open the edit workflow for a run, capturing its current version.
    pub async fn open_edit(
        &self,
        job_id: JobId,
        run_id: RunId,
    ) -> Result<Settled<RunFormSession>, FormError> {
        let generation = self.begin(FormMode::Edit, job_id.clone(), Some(run_id.clone()));
        tracing::debug!(%run_id, generation, "opening edit form");
        let loaded = self.store.fetch_run(&run_id).await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(%run_id, generation, "discarding superseded run model");
            return Ok(Settled::Superseded);
        }
        let session = loaded.map_err(RunError::from).and_then(|model| {
            let priorities = require_priorities(model.priorities)?;
            // A priority the catalog no longer offers cannot be resubmitted
            let selected_priority = if priorities.contains(&model.priority) {
                model.priority
            } else {
                tracing::debug!(%run_id, priority = %model.priority, "run priority not in catalog");
                first_priority(&priorities)?
            };
            let run_error_message = match model.status {
                Some(RunStatus::Error) => model.error_message.filter(|m| !m.is_empty()),
                _ => None,
            };
            Ok(RunFormSession {
                mode: FormMode::Edit,
                job_id,
                run_id: Some(run_id),
                loaded_version: model.version,
                priorities,
                selected_priority,
                arguments: Vec::new(),
                error_message: None,
                form_action_url: non_empty(model.form_action_url),
                can_edit: model.can_edit,
                run_status: model.status,
                run_error_message,
            })
        });
        self.settle_open(&mut inner, session)
    }

    pub fn select_priority(&self, priority: impl Into<Priority>) -> Result<(), FormError> {
        let priority = priority.into();
        self.update_ready(|session| {
            if !session.priorities.contains(&priority) {
                return Err(FormError::UnknownPriority(priority));
            }
            session.selected_priority = priority;
            Ok(())
        })
    }

    /// Parse run arguments from their text form. Create mode only.
    pub fn set_arguments(&self, text: &str) -> Result<(), FormError> {
        self.update_ready(|session| {
            if session.mode != FormMode::Create {
                return Err(FormError::ReadOnly);
            }
            match parse_arguments(text) {
                Ok(arguments) => {
                    session.arguments = arguments;
                    session.error_message = None;
                    Ok(())
                }
                Err(errors) => {
                    session.error_message = Some(errors.to_string());
                    Err(FormError::InvalidArguments(errors))
                }
            }
        })
    }

    /// Submit the open session through the coordinator.
    ///
    /// Success closes the workflow. Failure returns it to `Ready` with the
    /// error message set.
    pub async fn submit(&self) -> Result<Settled<RunOutcome>, FormError> {
        let (generation, session) = {
            let mut inner = self.inner.lock();
            let session = match &inner.state {
                FormState::Ready(session) => session.clone(),
                _ => return Err(FormError::NotReady),
            };
            if session.mode == FormMode::Edit && !session.can_edit {
                return Err(FormError::ReadOnly);
            }
            if !session.priorities.contains(&session.selected_priority) {
                return Err(FormError::UnknownPriority(session.selected_priority));
            }
            inner.state = FormState::Submitting(session.clone());
            self.publish(&inner);
            (inner.generation, session)
        };

        let result = match (session.mode, &session.run_id) {
            (FormMode::Edit, Some(run_id)) => {
                let request = EditRun {
                    run_id: run_id.clone(),
                    job_id: session.job_id.clone(),
                    priority: session.selected_priority.clone(),
                    loaded_version: session.loaded_version,
                    action: session.form_action_url.clone(),
                };
                self.coordinator.edit_run(request).await
            }
            _ => {
                let request = CreateRun {
                    job_id: session.job_id.clone(),
                    priority: session.selected_priority.clone(),
                    arguments: session.arguments.clone(),
                    action: session.form_action_url.clone(),
                };
                self.coordinator.create_run(request).await
            }
        };

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(generation, "discarding outcome of closed form");
            return Ok(Settled::Superseded);
        }
        match result {
            Ok(outcome) => {
                inner.generation += 1;
                inner.state = FormState::Closed;
                self.publish(&inner);
                Ok(Settled::Applied(outcome))
            }
            Err(e) => {
                let mut session = session;
                session.error_message = Some(e.to_string());
                inner.state = FormState::Ready(session);
                self.publish(&inner);
                Err(FormError::Run(e))
            }
        }
    }

    /// Close the workflow. Anything still in flight is discarded on arrival.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = FormState::Closed;
        self.publish(&inner);
    }

    /// Supersede any open session and enter `Loading`.
    fn begin(&self, mode: FormMode, job_id: JobId, run_id: Option<RunId>) -> u64 {
        let mut inner = self.inner.lock();
        if !inner.state.is_closed() {
            tracing::debug!(generation = inner.generation, "superseding open form");
        }
        inner.generation += 1;
        inner.state = FormState::Loading { mode, job_id, run_id };
        self.publish(&inner);
        inner.generation
    }

    fn settle_open(
        &self,
        inner: &mut Inner,
        session: Result<RunFormSession, RunError>,
    ) -> Result<Settled<RunFormSession>, FormError> {
        match session {
            Ok(session) => {
                inner.state = FormState::Ready(session.clone());
                self.publish(inner);
                Ok(Settled::Applied(session))
            }
            Err(e) => {
                tracing::warn!(error = %e, "form failed to load");
                inner.state = FormState::Closed;
                self.publish(inner);
                Err(FormError::Run(e))
            }
        }
    }

    fn update_ready<F>(&self, f: F) -> Result<(), FormError>
    where
        F: FnOnce(&mut RunFormSession) -> Result<(), FormError>,
    {
        let mut inner = self.inner.lock();
        let FormState::Ready(session) = &mut inner.state else {
            return Err(FormError::NotReady);
        };
        let result = f(session);
        self.publish(&inner);
        result
    }

    fn publish(&self, inner: &Inner) {
        self.published.send_replace(inner.state.clone());
    }
}

fn require_priorities(priorities: PriorityCatalog) -> Result<PriorityCatalog, RunError> {
    if priorities.is_empty() {
        return Err(FetchError::new("the remote store returned no priorities").into());
    }
    Ok(priorities)
}

fn first_priority(priorities: &PriorityCatalog) -> Result<Priority, RunError> {
    priorities
        .default_selection()
        .cloned()
        .ok_or_else(|| FetchError::new("the remote store returned no priorities").into())
}

fn non_empty(url: String) -> Option<String> {
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
