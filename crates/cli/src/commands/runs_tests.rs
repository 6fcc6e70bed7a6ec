// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use rb_adapters::{FakeRemoteStore, StaticCsrf, StoreCall, StoreOp};
use rb_core::{ArgumentValue, Job, Priority, PriorityCatalog, RunStatus};
use serial_test::serial;

use super::*;

const POLL: Duration = Duration::from_secs(5);

fn console() -> (FakeRemoteStore, Console<FakeRemoteStore>) {
    let store = FakeRemoteStore::new();
    store.add_job(Job::builder().id("nightly-import").build());
    store.add_run(
        JobRun::builder()
            .id(42u64)
            .job_id("nightly-import")
            .priority(Priority::normal())
            .version(3)
            .build(),
    );
    let console = Console::new(store.clone(), Arc::new(StaticCsrf::new("tok")), 50);
    (store, console)
}

async fn run(console: &Console<FakeRemoteStore>, command: RunsCommand) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    handle(command, console, OutputFormat::Json, POLL, &mut buf).await?;
    Ok(String::from_utf8(buf)?)
}

fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<ExitError>().map(|e| e.code)
}

#[tokio::test]
async fn create_submits_through_the_form() {
    let (store, console) = console();
    let out = run(
        &console,
        RunsCommand::Create {
            job: "nightly-import".into(),
            priority: Some("High".into()),
            args: vec!["limit:int:5".into()],
        },
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["message"], "Job run created");
    assert_eq!(value["run"]["id"], "43");
    assert_eq!(value["run"]["status"], "Pending");

    let created = store.run(&RunId::from(43u64)).unwrap();
    assert_eq!(created.priority, Priority::high());
    assert_eq!(created.arguments[0].values, vec![ArgumentValue::Int(5)]);
    assert!(console.form.state().is_closed());
}

#[tokio::test]
async fn create_with_unknown_priority_never_submits() {
    let (store, console) = console();
    let err = run(
        &console,
        RunsCommand::Create { job: "nightly-import".into(), priority: Some("Urgent".into()), args: vec![] },
    )
    .await
    .unwrap_err();

    assert_eq!(exit_code(&err), Some(1));
    assert_eq!(store.count(StoreOp::SubmitRun), 0);
    assert!(console.form.state().is_closed());
}

#[tokio::test]
async fn create_with_bad_arguments_reports_every_line() {
    let (store, console) = console();
    let err = run(
        &console,
        RunsCommand::Create {
            job: "nightly-import".into(),
            priority: None,
            args: vec!["limit:int:five".into(), "bad line".into()],
        },
    )
    .await
    .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("line 1") && message.contains("line 2"), "got {message}");
    assert_eq!(store.count(StoreOp::SubmitRun), 0);
}

#[tokio::test]
async fn edit_changes_priority_at_loaded_version() {
    let (store, console) = console();
    run(
        &console,
        RunsCommand::Edit { job: "nightly-import".into(), id: "42".into(), priority: "Low".into() },
    )
    .await
    .unwrap();

    let edited = store.run(&RunId::from(42u64)).unwrap();
    assert_eq!((edited.priority, edited.version), (Priority::low(), 4));
    let submitted = store.calls().into_iter().find_map(|call| match call {
        StoreCall::SubmitRun { form, .. } => Some(form),
        _ => None,
    });
    assert_eq!(submitted.map(|s| s.version), Some(3));
}

#[tokio::test]
#[serial]
async fn create_and_edit_show_catalog_labels() {
    std::env::set_var("NO_COLOR", "1");
    let (store, console) = console();
    store.set_catalog(PriorityCatalog::new([
        (Priority::high(), "Høj".to_string()),
        (Priority::low(), "Lav".to_string()),
    ]));

    let mut buf: Vec<u8> = Vec::new();
    let create = RunsCommand::Create { job: "nightly-import".into(), priority: None, args: vec![] };
    handle(create, &console, OutputFormat::Text, POLL, &mut buf).await.unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert!(out.starts_with("Job run created\n"), "got {out:?}");
    assert!(out.ends_with("Priority: Høj\n"), "got {out:?}");

    let mut buf: Vec<u8> = Vec::new();
    let edit = RunsCommand::Edit { job: "nightly-import".into(), id: "42".into(), priority: "Low".into() };
    handle(edit, &console, OutputFormat::Text, POLL, &mut buf).await.unwrap();
    assert!(String::from_utf8(buf).unwrap().ends_with("Priority: Lav\n"));
}

#[tokio::test]
async fn edit_of_read_only_run_fails_and_closes_form() {
    let (store, console) = console();
    store.set_can_edit(false);
    let err = run(
        &console,
        RunsCommand::Edit { job: "nightly-import".into(), id: "42".into(), priority: "Low".into() },
    )
    .await
    .unwrap_err();

    assert_eq!(exit_code(&err), Some(1));
    assert_eq!(store.count(StoreOp::SubmitRun), 0);
    assert!(console.form.state().is_closed());
}

#[tokio::test]
async fn show_reports_missing_run() {
    let (_, console) = console();
    let err = run(&console, RunsCommand::Show { job: "nightly-import".into(), id: "99".into() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "run 99 not found for job nightly-import");
}

#[tokio::test]
async fn show_as_json() {
    let (_, console) = console();
    let out = run(&console, RunsCommand::Show { job: "nightly-import".into(), id: "42".into() })
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["version"], 3);
    assert_eq!(value["priority"], "Normal");
}

#[tokio::test]
async fn delete_twice_succeeds_both_times() {
    let (store, console) = console();
    for _ in 0..2 {
        run(&console, RunsCommand::Delete { id: "42".into(), job: Some("nightly-import".into()) })
            .await
            .unwrap();
    }
    assert!(store.run(&RunId::from(42u64)).is_none());
    assert!(console.registry.snapshot(&RunScope::Job(JobId::new("nightly-import"))).is_empty());
    assert_eq!(store.count(StoreOp::DeleteRun), 2);
}

#[tokio::test]
#[serial]
async fn list_for_job_without_runs_prints_empty_message() {
    std::env::set_var("NO_COLOR", "1");
    let (store, console) = console();
    store.add_job(Job::builder().id("purge").build());

    let mut buf: Vec<u8> = Vec::new();
    handle(
        RunsCommand::List { job: Some("purge".into()) },
        &console,
        OutputFormat::Text,
        POLL,
        &mut buf,
    )
    .await
    .unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "No runs have been created for this job.\n");
}

#[tokio::test(start_paused = true)]
#[serial]
async fn watch_redraws_until_runs_settle() {
    std::env::set_var("NO_COLOR", "1");
    let (store, console) = console();

    let watcher = {
        let registry = console.registry.clone();
        let store = store.clone();
        async move {
            let mut events = registry.subscribe();
            let _ = events.recv().await;
            store.set_status(&RunId::from(42u64), RunStatus::Success);
        }
    };
    let mut buf: Vec<u8> = Vec::new();
    let (result, ()) = tokio::join!(
        handle(
            RunsCommand::Watch { job: Some("nightly-import".into()), interval: Some(1000), until_settled: true },
            &console,
            OutputFormat::Text,
            POLL,
            &mut buf,
        ),
        watcher,
    );
    result.unwrap();

    let out = String::from_utf8(buf).unwrap();
    assert_eq!(out.matches("── job nightly-import ──").count(), 2);
    assert!(out.contains("Pending"));
    assert!(out.contains("Success"));
    assert_eq!(store.count(StoreOp::ListRuns), 2);
}
