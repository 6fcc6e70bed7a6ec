// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rb jobs` - Job definitions

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use rb_adapters::RemoteStore;
use rb_core::JobId;
use rb_engine::Console;

use crate::exit_error::ExitError;
use crate::output::{format_job_list, format_or_json, handle_list, OutputFormat, NO_JOBS};

#[derive(Args)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List jobs
    List,
    /// Delete a job together with all of its runs
    Delete {
        /// Job ID
        id: String,
    },
}

pub async fn handle<S: RemoteStore>(
    command: JobsCommand,
    console: &Console<S>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        JobsCommand::List => {
            let jobs = console.jobs.refresh().await?;
            handle_list(out, format, jobs.as_slice(), NO_JOBS, |items, out| format_job_list(out, items))?;
        }
        JobsCommand::Delete { id } => {
            let job_id = JobId::new(id);
            let ack = console.coordinator.delete_job(&job_id).await.map_err(ExitError::from)?;
            let data = serde_json::json!({ "job_id": job_id, "message": ack.message });
            format_or_json(out, format, &data, |out| writeln!(out, "{}", ack.message))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
