// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rb runs` - Job run management commands

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use rb_adapters::RemoteStore;
use rb_core::{JobId, JobRun, Priority, PriorityCatalog, RunId};
use rb_engine::{Console, RegistryEvent, RunPoller, RunScope};
use tokio::sync::broadcast::error::RecvError;

use super::applied;
use crate::color;
use crate::exit_error::{codes, ExitError};
use crate::output::{format_or_json, format_run_detail, format_run_list, handle_list, OutputFormat, NO_RUNS};

#[derive(Args)]
pub struct RunsArgs {
    #[command(subcommand)]
    pub command: RunsCommand,
}

#[derive(Subcommand)]
pub enum RunsCommand {
    /// List runs, newest first
    List {
        /// Only runs of this job
        #[arg(long)]
        job: Option<String>,
    },
    /// Create a run of a job
    Create {
        #[arg(long)]
        job: String,

        /// Priority name (defaults to the first one offered)
        #[arg(long)]
        priority: Option<String>,

        /// Run argument as `name:type:values` (can be repeated)
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// Change the priority of a run
    Edit {
        #[arg(long)]
        job: String,

        /// Run ID
        id: String,

        #[arg(long)]
        priority: String,
    },
    /// Show details of a run
    Show {
        #[arg(long)]
        job: String,

        /// Run ID
        id: String,
    },
    /// Delete a run
    Delete {
        /// Run ID
        id: String,

        /// Job the run belongs to, so only that job's list is reloaded
        #[arg(long)]
        job: Option<String>,
    },
    /// Redraw the run list as statuses change
    Watch {
        #[arg(long)]
        job: Option<String>,

        /// Poll interval in milliseconds
        #[arg(long)]
        interval: Option<u64>,

        /// Exit once every run has finished
        #[arg(long)]
        until_settled: bool,
    },
}

pub async fn handle<S: RemoteStore>(
    command: RunsCommand,
    console: &Console<S>,
    format: OutputFormat,
    poll_interval: Duration,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        RunsCommand::List { job } => {
            let runs = console.registry.refresh(RunScope::from(job.map(JobId::new))).await?;
            handle_list(out, format, runs.as_slice(), NO_RUNS, |items, out| format_run_list(out, items))?;
        }
        RunsCommand::Create { job, priority, args } => {
            create(console, JobId::new(job), priority, &args, format, out).await?;
        }
        RunsCommand::Edit { job, id, priority } => {
            edit(console, JobId::new(job), RunId::new(id), priority, format, out).await?;
        }
        RunsCommand::Show { job, id } => {
            let run = find_run(console, JobId::new(job), &RunId::new(id)).await?;
            format_or_json(out, format, &run, |out| format_run_detail(out, &run))?;
        }
        RunsCommand::Delete { id, job } => {
            let run_id = RunId::new(id);
            if let Some(job) = job {
                // Loads the job's runs so the delete reloads only that scope
                console.registry.refresh(RunScope::Job(JobId::new(job))).await?;
            }
            let ack = console.coordinator.delete_run(&run_id).await.map_err(ExitError::from)?;
            let data = serde_json::json!({ "run_id": run_id, "message": ack.message });
            format_or_json(out, format, &data, |out| writeln!(out, "{}", ack.message))?;
        }
        RunsCommand::Watch { job, interval, until_settled } => {
            let scope = RunScope::from(job.map(JobId::new));
            let interval = interval.map(Duration::from_millis).unwrap_or(poll_interval);
            watch(console, scope, interval, until_settled, format, out).await?;
        }
    }
    Ok(())
}

/// Open the create workflow, fill it in, and submit.
async fn create<S: RemoteStore>(
    console: &Console<S>,
    job_id: JobId,
    priority: Option<String>,
    args: &[String],
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let form = &console.form;
    let session = applied(form.open_create(job_id.clone()).await.map_err(ExitError::from)?)?;
    let chosen = priority.map(Priority::from).unwrap_or_else(|| session.selected_priority.clone());
    let filled = form
        .select_priority(chosen.clone())
        .and_then(|()| if args.is_empty() { Ok(()) } else { form.set_arguments(&args.join("\n")) });
    let submitted = match filled {
        Ok(()) => form.submit().await,
        Err(e) => Err(e),
    };
    if submitted.is_err() {
        form.close();
    }
    let outcome = applied(submitted.map_err(ExitError::from)?)?;

    let run = outcome.run.clone().or_else(|| newest_run(console, &job_id));
    let data = serde_json::json!({ "message": outcome.message, "run": run });
    format_or_json(out, format, &data, |out| {
        writeln!(out, "{}", outcome.message)?;
        if let Some(run) = &run {
            writeln!(out, "Run {} is {}", color::literal(run.id.as_str()), color::status(&run.status.to_string()))?;
        }
        writeln!(out, "Priority: {}", priority_label(&session.priorities, &chosen))
    })
}

/// Open the edit workflow at the run's current version and submit a new
/// priority against it.
async fn edit<S: RemoteStore>(
    console: &Console<S>,
    job_id: JobId,
    run_id: RunId,
    priority: String,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let form = &console.form;
    let session =
        applied(form.open_edit(job_id, run_id.clone()).await.map_err(ExitError::from)?)?;
    tracing::debug!(%run_id, version = session.loaded_version, "editing run");

    let priority = Priority::from(priority);
    let submitted = match form.select_priority(priority.clone()) {
        Ok(()) => form.submit().await,
        Err(e) => Err(e),
    };
    if submitted.is_err() {
        form.close();
    }
    let outcome = applied(submitted.map_err(ExitError::from)?)?;

    let data = serde_json::json!({ "run_id": run_id, "message": outcome.message, "run": outcome.run });
    format_or_json(out, format, &data, |out| {
        writeln!(out, "{}", outcome.message)?;
        writeln!(out, "Priority: {}", priority_label(&session.priorities, &priority))
    })
}

/// Display label the backend gave `priority`, falling back to its name.
fn priority_label<'a>(catalog: &'a PriorityCatalog, priority: &'a Priority) -> &'a str {
    catalog.label(priority).unwrap_or(priority.as_str())
}

async fn find_run<S: RemoteStore>(
    console: &Console<S>,
    job_id: JobId,
    run_id: &RunId,
) -> Result<JobRun> {
    let runs = console.registry.refresh(RunScope::Job(job_id.clone())).await?;
    match runs.iter().find(|run| &run.id == run_id) {
        Some(run) => Ok(run.clone()),
        None => Err(ExitError::new(
            codes::FAILURE,
            format!("run {} not found for job {}", run_id, job_id),
        )
        .into()),
    }
}

/// The registry keeps runs newest first.
fn newest_run<S: RemoteStore>(console: &Console<S>, job_id: &JobId) -> Option<JobRun> {
    console.registry.snapshot(&RunScope::Job(job_id.clone())).first().cloned()
}

/// Redraw on every refresh of `scope` until interrupted, or until every run
/// has finished when `until_settled` is set.
async fn watch<S: RemoteStore>(
    console: &Console<S>,
    scope: RunScope,
    interval: Duration,
    until_settled: bool,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let mut events = console.registry.subscribe();
    let poller = RunPoller::new(console.registry.clone(), scope.clone(), interval)
        .until_settled(until_settled)
        .spawn();

    loop {
        let event = tokio::select! {
            event = events.recv() => event,
            _ = tokio::signal::ctrl_c() => break,
        };
        match event {
            Ok(RegistryEvent::Refreshed { scope: refreshed, runs }) if refreshed == scope => {
                if format == OutputFormat::Text {
                    writeln!(out, "{}", color::muted(&format!("── {} ──", scope)))?;
                }
                handle_list(out, format, runs.as_slice(), NO_RUNS, |items, out| {
                    format_run_list(out, items)
                })?;
                out.flush()?;
                if until_settled && runs.iter().all(|run| run.status.is_terminal()) {
                    break;
                }
            }
            Ok(RegistryEvent::RefreshFailed { scope: failed, error }) if failed == scope => {
                tracing::warn!(%scope, %error, "refresh failed; showing last list");
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "watch fell behind registry events");
            }
            Err(RecvError::Closed) => break,
        }
    }

    poller.stop().await;
    Ok(())
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
