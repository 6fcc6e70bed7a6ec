// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rb_core::{format_arguments, Job, JobRun};
use serde::Serialize;

use crate::color;
use crate::table::{Column, Table};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

pub const NO_RUNS: &str = "No runs have been created for this job.";
pub const NO_JOBS: &str = "No jobs are defined.";

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format a timestamp for a table cell, `-` when absent.
pub fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Render a list as text table or JSON. Handles empty check + format branch.
pub fn handle_list<T: Serialize>(
    out: &mut dyn Write,
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    render_text: impl FnOnce(&[T], &mut dyn Write),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
        }
        OutputFormat::Text => {
            if items.is_empty() {
                writeln!(out, "{}", empty_msg)?;
            } else {
                render_text(items, out);
            }
        }
    }
    Ok(())
}

/// Format-branch helper for non-list commands (show, create, etc.).
///
/// Renders as JSON when `format` is `Json`, otherwise calls `text_fn`.
pub fn format_or_json<T: Serialize>(
    out: &mut dyn Write,
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(&mut dyn Write) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(data)?)?;
        }
        OutputFormat::Text => text_fn(out)?,
    }
    Ok(())
}

pub fn format_run_list(out: &mut (impl Write + ?Sized), runs: &[JobRun]) {
    let mut table = Table::new(vec![
        Column::muted("ID"),
        Column::left("JOB").with_max(24),
        Column::status("STATUS"),
        Column::left("PRIORITY"),
        Column::left("VERSION"),
        Column::left("CREATED"),
        Column::left("LAST RUN"),
        Column::left("ERROR").with_max(60),
    ]);
    for run in runs {
        table.row(vec![
            run.id.to_string(),
            run.job_id.to_string(),
            run.status.to_string(),
            run.priority.to_string(),
            run.version.to_string(),
            format_time(Some(run.created_at)),
            format_time(run.last_run_at),
            run.failure().map(|m| m.replace('\n', " ")).unwrap_or_default(),
        ]);
    }
    table.render(out);
}

pub fn format_job_list(out: &mut (impl Write + ?Sized), jobs: &[Job]) {
    let mut table = Table::new(vec![
        Column::muted("ID"),
        Column::left("NAME").with_max(32),
        Column::left("ACTIVE"),
        Column::left("LAST RUN"),
        Column::left("DESCRIPTION").with_max(50),
    ]);
    for job in jobs {
        table.row(vec![
            job.id.to_string(),
            job.name.clone(),
            if job.is_active { "yes" } else { "no" }.to_string(),
            format_time(job.last_run_at),
            job.description.clone().unwrap_or_default(),
        ]);
    }
    table.render(out);
}

/// Labelled detail lines for one run.
pub fn format_run_detail(out: &mut (impl Write + ?Sized), run: &JobRun) -> std::io::Result<()> {
    writeln!(out, "{} {}", color::header("Run"), color::literal(run.id.as_str()))?;
    writeln!(out, "  {} {}", color::context("Job:     "), run.job_id)?;
    writeln!(out, "  {} {}", color::context("Status:  "), color::status(&run.status.to_string()))?;
    writeln!(out, "  {} {}", color::context("Priority:"), run.priority)?;
    writeln!(out, "  {} {}", color::context("Version: "), run.version)?;
    writeln!(out, "  {} {}", color::context("Created: "), format_time(Some(run.created_at)))?;
    writeln!(out, "  {} {}", color::context("Last run:"), format_time(run.last_run_at))?;
    if let Some(error) = run.failure() {
        writeln!(out, "  {} {}", color::context("Error:   "), error)?;
    }
    if !run.arguments.is_empty() {
        writeln!(out, "  {}", color::context("Arguments:"))?;
        for line in format_arguments(&run.arguments).lines() {
            writeln!(out, "    {}", line)?;
        }
    }
    Ok(())
}
