// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.
//!
//! Settings come from an optional TOML file, then `RB_*` environment
//! variables, then command-line flags, each layer overriding the last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RUN_LIMIT: usize = 50;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub base_url: Option<String>,
    pub csrf_token: Option<String>,
    pub session_cookie: Option<String>,
    pub timeout_ms: Option<u64>,
    pub run_limit: Option<usize>,
    pub poll_interval_ms: Option<u64>,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub csrf_token: Option<String>,
    pub session_cookie: Option<String>,
    pub timeout: Duration,
    pub run_limit: usize,
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            session_cookie: None,
            timeout: DEFAULT_TIMEOUT,
            run_limit: DEFAULT_RUN_LIMIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Settings {
    /// Load the config file (when present) and apply the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit.map(Path::to_path_buf).or_else(config_path_override) {
            Some(path) => Some(read_file(&path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(read_file(&path)?),
                _ => None,
            },
        };
        let mut settings = Settings::default();
        if let Some(file) = file {
            settings.apply_file(file);
        }
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn apply_file(&mut self, file: FileSettings) {
        if let Some(url) = non_empty(file.base_url) {
            self.base_url = url;
        }
        if let Some(token) = non_empty(file.csrf_token) {
            self.csrf_token = Some(token);
        }
        if let Some(cookie) = non_empty(file.session_cookie) {
            self.session_cookie = Some(cookie);
        }
        if let Some(ms) = file.timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(limit) = file.run_limit.filter(|n| *n > 0) {
            self.run_limit = limit;
        }
        if let Some(ms) = file.poll_interval_ms.filter(|ms| *ms > 0) {
            self.poll_interval = Duration::from_millis(ms);
        }
    }

    /// Apply `RB_*` variables. Unparseable numbers are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = non_empty(var("RB_BASE_URL")) {
            self.base_url = url;
        }
        if let Some(token) = non_empty(var("RB_CSRF_TOKEN")) {
            self.csrf_token = Some(token);
        }
        if let Some(cookie) = non_empty(var("RB_SESSION_COOKIE")) {
            self.session_cookie = Some(cookie);
        }
        if let Some(ms) = var("RB_TIMEOUT_MS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(limit) = var("RB_RUN_LIMIT").and_then(|s| s.parse::<usize>().ok()).filter(|n| *n > 0) {
            self.run_limit = limit;
        }
        if let Some(ms) = var("RB_POLL_MS").and_then(|s| s.parse::<u64>().ok()).filter(|ms| *ms > 0) {
            self.poll_interval = Duration::from_millis(ms);
        }
    }
}

/// Log filter directive: `RB_LOG`, default `warn`.
pub fn log_filter() -> String {
    std::env::var("RB_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "warn".to_string())
}

fn config_path_override() -> Option<PathBuf> {
    std::env::var("RB_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Resolve config file: XDG_CONFIG_HOME/rb/config.toml > ~/.config/rb/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|s| !s.is_empty()) {
        return Some(PathBuf::from(xdg).join("rb/config.toml"));
    }
    dirs::home_dir().map(|home| home.join(".config/rb/config.toml"))
}

fn read_file(path: &Path) -> Result<FileSettings, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
