// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rb: operator console for background job runs

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod env;
mod exit_error;
mod output;
mod table;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rb_adapters::{HttpConfig, HttpRemoteStore, StaticCsrf};
use rb_engine::Console;
use tracing_subscriber::EnvFilter;

use crate::commands::{jobs, runs};
use crate::env::Settings;
use crate::exit_error::{codes, ExitError};
use crate::output::OutputFormat;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("RB_BUILD_GIT_HASH"));

#[derive(Parser)]
#[command(name = "rb", version = VERSION, about = "Inspect and manage background job runs", styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t, global = true)]
    format: OutputFormat,

    /// Console backend URL (overrides RB_BASE_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/rb/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Maximum number of runs to fetch per list
    #[arg(long, global = true)]
    run_limit: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Job definitions
    Jobs(jobs::JobsArgs),
    /// Job runs
    Runs(runs::RunsArgs),
}

impl Cli {
    /// Flags win over the environment and the config file.
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(url) = &self.base_url {
            settings.base_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            settings.timeout = Duration::from_millis(ms);
        }
        if let Some(limit) = self.run_limit.filter(|n| *n > 0) {
            settings.run_limit = limit;
        }
        Ok(settings)
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;
    tracing::debug!(base_url = %settings.base_url, run_limit = settings.run_limit, "starting");

    let store = HttpRemoteStore::new(HttpConfig {
        timeout: settings.timeout,
        session_cookie: settings.session_cookie.clone(),
        ..HttpConfig::new(settings.base_url.clone())
    })?;
    let csrf = match &settings.csrf_token {
        Some(token) => StaticCsrf::new(token.clone()),
        None => StaticCsrf::none(),
    };
    let console = Console::new(store, Arc::new(csrf), settings.run_limit);

    let mut stdout = std::io::stdout();
    match cli.command {
        Command::Jobs(args) => jobs::handle(args.command, &console, cli.format, &mut stdout).await,
        Command::Runs(args) => {
            runs::handle(args.command, &console, cli.format, settings.poll_interval, &mut stdout)
                .await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(cli).await {
        let (code, message) = match err.downcast_ref::<ExitError>() {
            Some(exit) => (exit.code, exit.message.clone()),
            None => (codes::FAILURE, format!("{:#}", err)),
        };
        if !message.is_empty() {
            eprintln!("error: {}", message);
        }
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "rb", "runs", "list", "--job", "nightly-import", "--format", "json", "--run-limit", "5",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.run_limit, Some(5));
        assert!(matches!(
            cli.command,
            Command::Runs(runs::RunsArgs { command: runs::RunsCommand::List { job: Some(_) } })
        ));
    }

    #[test]
    fn create_accepts_repeated_arguments() {
        let cli = Cli::try_parse_from([
            "rb", "runs", "create", "--job", "nightly-import", "--priority", "High", "--arg",
            "limit:int:5", "--arg", "dry:bool:true",
        ])
        .unwrap();
        let Command::Runs(runs::RunsArgs { command: runs::RunsCommand::Create { args, priority, .. } }) =
            cli.command
        else {
            panic!("expected runs create");
        };
        assert_eq!(args, vec!["limit:int:5", "dry:bool:true"]);
        assert_eq!(priority.as_deref(), Some("High"));
    }

    #[test]
    fn edit_requires_priority() {
        assert!(Cli::try_parse_from(["rb", "runs", "edit", "--job", "nightly-import", "42"]).is_err());
    }
}
