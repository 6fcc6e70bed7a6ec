// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rb_adapters::{FakeRemoteStore, StaticCsrf, StoreCall, StoreOp};
use rb_core::{Job, RunStatus};

fn coordinator_with(csrf: StaticCsrf) -> (FakeRemoteStore, RunRequestCoordinator<FakeRemoteStore>) {
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
    let registry = JobRunRegistry::new(store.clone(), 50);
    let jobs = JobDirectory::new(store.clone());
    let coordinator = RunRequestCoordinator::new(store.clone(), registry, jobs, Arc::new(csrf));
    (store, coordinator)
}

fn coordinator() -> (FakeRemoteStore, RunRequestCoordinator<FakeRemoteStore>) {
    coordinator_with(StaticCsrf::new("tok"))
}

fn nightly() -> RunScope {
    RunScope::Job(JobId::new("nightly-import"))
}

// ── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_submits_and_new_run_appears_pending() {
    let (store, coordinator) = coordinator();

    let outcome = coordinator
        .create_run(CreateRun::new("nightly-import", Priority::high()))
        .await
        .unwrap();
    assert_eq!(outcome.message, "Job run created");

    let submitted = store.calls().into_iter().find_map(|call| match call {
        StoreCall::SubmitRun { form, .. } => Some(form),
        _ => None,
    });
    let form = submitted.unwrap();
    assert_eq!(form.job_id, JobId::new("nightly-import"));
    assert_eq!(form.priority, Priority::high());
    assert_eq!(form.version, 0);
    assert_eq!(form.csrf_token, "tok");

    let runs = coordinator.registry().snapshot(&nightly());
    let created = runs.iter().find(|r| r.id == RunId::from(43u64)).unwrap();
    assert_eq!(created.status, RunStatus::Pending);
    assert_eq!(created.priority, Priority::high());
}

#[tokio::test]
async fn create_refresh_happens_after_submission() {
    let (store, coordinator) = coordinator();
    coordinator.create_run(CreateRun::new("nightly-import", Priority::low())).await.unwrap();

    let ops: Vec<StoreOp> = store.calls().iter().map(StoreCall::op).collect();
    assert_eq!(ops, [StoreOp::SubmitRun, StoreOp::ListRuns]);
}

#[tokio::test]
async fn create_forwards_action_and_arguments() {
    let (store, coordinator) = coordinator();
    let arguments = rb_core::parse_arguments("limit:int:5").unwrap();
    let request = CreateRun::new("nightly-import", Priority::high())
        .arguments(arguments)
        .action("/job/job-run/create");
    coordinator.create_run(request).await.unwrap();

    match &store.calls()[0] {
        StoreCall::SubmitRun { action, form } => {
            assert_eq!(action.as_deref(), Some("/job/job-run/create"));
            assert_eq!(form.arguments.as_deref(), Some("limit:int:5"));
        }
        other => panic!("unexpected call {:?}", other),
    }
    assert_eq!(store.runs()[0].arguments.len(), 1);
}

#[tokio::test]
async fn echoed_run_is_returned() {
    let (store, coordinator) = coordinator();
    store.set_echo_runs(true);
    let outcome = coordinator
        .create_run(CreateRun::new("nightly-import", Priority::high()))
        .await
        .unwrap();
    assert_eq!(outcome.run.map(|r| r.id), Some(RunId::from(43u64)));
}

#[tokio::test]
async fn remote_validation_failure_still_refreshes() {
    let (store, coordinator) = coordinator();
    let err = coordinator
        .create_run(CreateRun::new("nightly-import", "Urgent"))
        .await
        .unwrap_err();

    assert_eq!(err, RunError::Validation("Invalid priority".into()));
    assert_eq!(store.count(StoreOp::ListRuns), 1);
}

#[tokio::test]
async fn failed_refresh_does_not_change_result() {
    let (store, coordinator) = coordinator();
    let mut events = coordinator.registry().subscribe();
    store.fail_next(StoreOp::ListRuns, rb_adapters::StoreError::Transport("reset".into()));

    let result = coordinator.create_run(CreateRun::new("nightly-import", Priority::high())).await;
    assert!(result.is_ok());
    assert!(matches!(
        events.recv().await.unwrap(),
        crate::registry::RegistryEvent::RefreshFailed { .. }
    ));
}

// ── Edit ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stale_version_is_rejected_and_run_untouched() {
    let (store, coordinator) = coordinator();
    let model = store.fetch_run(&RunId::from(42u64)).await.unwrap();
    store.bump_version(&RunId::from(42u64));

    let request = EditRun::new(42u64, "nightly-import", Priority::high(), 3)
        .action(model.form_action_url);
    let err = coordinator.edit_run(request).await.unwrap_err();

    assert!(matches!(err, RunError::StaleVersion(_)), "got {:?}", err);
    let run = store.run(&RunId::from(42u64)).unwrap();
    assert_eq!(run.version, 4);
    assert_eq!(run.priority, Priority::normal());
}

#[tokio::test]
async fn accepted_edit_is_visible_after_refresh() {
    let (store, coordinator) = coordinator();
    let model = store.fetch_run(&RunId::from(42u64)).await.unwrap();

    let request = EditRun::new(42u64, "nightly-import", Priority::low(), model.version)
        .action(model.form_action_url);
    coordinator.edit_run(request).await.unwrap();

    let runs = coordinator.registry().snapshot(&nightly());
    assert_eq!(runs[0].priority, Priority::low());
    assert_eq!(runs[0].version, 4);
    assert!(!coordinator.is_in_flight(&RunId::from(42u64)));
}

#[tokio::test]
async fn edit_of_vanished_run_is_not_found() {
    let (store, coordinator) = coordinator();
    let model = store.fetch_run(&RunId::from(42u64)).await.unwrap();
    store.remove_run(&RunId::from(42u64));

    let request = EditRun::new(42u64, "nightly-import", Priority::low(), 3)
        .action(model.form_action_url);
    let err = coordinator.edit_run(request).await.unwrap_err();
    assert!(matches!(err, RunError::NotFound(_)));
}

// ── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_twice_succeeds_both_times() {
    let (store, coordinator) = coordinator();
    coordinator.registry().refresh(nightly()).await.unwrap();

    coordinator.delete_run(&RunId::from(42u64)).await.unwrap();
    assert!(coordinator.registry().snapshot(&nightly()).is_empty());

    coordinator.delete_run(&RunId::from(42u64)).await.unwrap();
    assert!(coordinator.registry().snapshot(&nightly()).is_empty());
    assert_eq!(store.count(StoreOp::DeleteRun), 2);
}

#[tokio::test]
async fn delete_refreshes_owning_job() {
    let (store, coordinator) = coordinator();
    coordinator.registry().refresh(RunScope::AllRuns).await.unwrap();

    coordinator.delete_run(&RunId::from(42u64)).await.unwrap();
    assert_eq!(
        store.calls().last(),
        Some(&StoreCall::ListRuns { job_id: Some(JobId::new("nightly-import")), limit: 50 })
    );
}

#[tokio::test]
async fn delete_of_unknown_run_refreshes_all_runs() {
    let (store, coordinator) = coordinator();
    coordinator.delete_run(&RunId::from(42u64)).await.unwrap();
    assert_eq!(store.calls().last(), Some(&StoreCall::ListRuns { job_id: None, limit: 50 }));
}

#[tokio::test]
async fn concurrent_delete_is_rejected_locally() {
    let (store, coordinator) = coordinator();
    store.pause();

    let id = RunId::from(42u64);
    let (first, second, ()) = tokio::join!(
        coordinator.delete_run(&id),
        coordinator.delete_run(&id),
        async {
            store.issued(1).await;
            store.resume();
        },
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.contains(&Err(RunError::ConflictInProgress("run 42".into()))));
    assert_eq!(store.count(StoreOp::DeleteRun), 1);
    assert_eq!(store.count(StoreOp::ListRuns), 1);
}

#[tokio::test]
async fn cancelled_mutation_releases_its_run() {
    let (store, coordinator) = coordinator();
    store.pause();

    let task = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.delete_run(&RunId::from(42u64)).await }
    });
    store.issued(1).await;
    assert!(coordinator.is_in_flight(&RunId::from(42u64)));

    task.abort();
    let _ = task.await;
    assert!(!coordinator.is_in_flight(&RunId::from(42u64)));
    store.resume();
}

#[tokio::test]
async fn missing_token_never_reaches_network() {
    let (store, coordinator) = coordinator_with(StaticCsrf::none());

    let err = coordinator.delete_run(&RunId::from(42u64)).await.unwrap_err();
    assert_eq!(err, RunError::MissingCsrfToken);
    let err = coordinator
        .create_run(CreateRun::new("nightly-import", Priority::high()))
        .await
        .unwrap_err();
    assert_eq!(err, RunError::MissingCsrfToken);

    assert!(store.calls().is_empty());
    assert!(!coordinator.is_in_flight(&RunId::from(42u64)));
}

#[tokio::test]
async fn delete_job_refreshes_directory_and_all_runs() {
    let (store, coordinator) = coordinator();

    coordinator.delete_job(&JobId::new("nightly-import")).await.unwrap();
    assert!(coordinator.jobs().snapshot().is_empty());
    assert!(store.runs().is_empty());
    assert_eq!(store.calls().last(), Some(&StoreCall::ListRuns { job_id: None, limit: 50 }));

    // Already gone
    coordinator.delete_job(&JobId::new("nightly-import")).await.unwrap();
    assert_eq!(store.count(StoreOp::DeleteJob), 2);
}
