// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use serial_test::serial;
use tempfile::TempDir;
use yare::parameterized;

use super::*;

const VARS: [&str; 8] = [
    "RB_BASE_URL",
    "RB_CSRF_TOKEN",
    "RB_SESSION_COOKIE",
    "RB_TIMEOUT_MS",
    "RB_RUN_LIMIT",
    "RB_POLL_MS",
    "RB_CONFIG",
    "XDG_CONFIG_HOME",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> =
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
}

fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn defaults_match_console_backend() {
    let settings = Settings::default();
    assert_eq!(settings.base_url, "http://localhost:5000");
    assert_eq!(settings.timeout, Duration::from_secs(10));
    assert_eq!(settings.run_limit, 50);
    assert_eq!(settings.poll_interval, Duration::from_secs(5));
    assert_eq!(settings.csrf_token, None);
}

#[test]
fn env_overrides_file() {
    let mut settings = Settings::default();
    settings.apply_file(FileSettings {
        base_url: Some("http://file:1".into()),
        run_limit: Some(20),
        csrf_token: Some("from-file".into()),
        ..FileSettings::default()
    });
    settings.apply_env(lookup(&[("RB_BASE_URL", "http://env:2"), ("RB_POLL_MS", "250")]));

    assert_eq!(settings.base_url, "http://env:2");
    assert_eq!(settings.run_limit, 20);
    assert_eq!(settings.csrf_token.as_deref(), Some("from-file"));
    assert_eq!(settings.poll_interval, Duration::from_millis(250));
}

#[parameterized(
    not_a_number = { "RB_TIMEOUT_MS", "soon" },
    zero_limit = { "RB_RUN_LIMIT", "0" },
    negative_limit = { "RB_RUN_LIMIT", "-5" },
    zero_poll = { "RB_POLL_MS", "0" },
    blank_url = { "RB_BASE_URL", "  " },
    blank_token = { "RB_CSRF_TOKEN", "" },
)]
fn unusable_env_values_are_ignored(var: &str, value: &str) {
    let mut settings = Settings::default();
    settings.apply_env(lookup(&[(var, value)]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn unknown_file_keys_are_rejected() {
    let err = toml::from_str::<FileSettings>("base_url = \"x\"\nretries = 3\n").unwrap_err();
    assert!(err.to_string().contains("retries"), "got {err}");
}

#[test]
#[serial]
fn load_reads_explicit_path_then_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "rb.toml",
        "base_url = \"http://console.internal\"\ntimeout_ms = 2500\nsession_cookie = \"sid=abc\"\n",
    );
    std::env::set_var("RB_SESSION_COOKIE", "sid=override");

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.base_url, "http://console.internal");
    assert_eq!(settings.timeout, Duration::from_millis(2500));
    assert_eq!(settings.session_cookie.as_deref(), Some("sid=override"));
    clear_env();
}

#[test]
#[serial]
fn load_finds_file_under_xdg_config_home() {
    clear_env();
    let dir = TempDir::new().unwrap();
    write_config(&dir, "rb/config.toml", "run_limit = 10\n");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    assert_eq!(default_config_path(), Some(dir.path().join("rb/config.toml")));
    assert_eq!(Settings::load(None).unwrap().run_limit, 10);
    clear_env();
}

#[test]
#[serial]
fn missing_default_file_means_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    assert_eq!(Settings::load(None).unwrap(), Settings::default());
    clear_env();
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    std::env::set_var("RB_CONFIG", dir.path().join("absent.toml"));

    assert!(matches!(Settings::load(None), Err(ConfigError::Read { .. })));
    clear_env();
}

#[test]
#[serial]
fn malformed_file_reports_its_path() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "run_limit = \"many\"\n");

    let err = Settings::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}
