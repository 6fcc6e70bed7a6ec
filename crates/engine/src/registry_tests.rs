// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rb_adapters::{FakeRemoteStore, StoreError, StoreOp};
use rb_core::test_support::pending_runs;

fn nightly() -> RunScope {
    RunScope::Job(JobId::new("nightly-import"))
}

fn seeded(count: u64) -> (FakeRemoteStore, JobRunRegistry<FakeRemoteStore>) {
    let store = FakeRemoteStore::new();
    for run in pending_runs("nightly-import", count) {
        store.add_run(run);
    }
    let registry = JobRunRegistry::new(store.clone(), 50);
    (store, registry)
}

#[tokio::test]
async fn unfetched_scope_is_empty() {
    let (_, registry) = seeded(2);
    assert!(registry.snapshot(&nightly()).is_empty());
}

#[tokio::test]
async fn job_without_runs_has_empty_loaded_snapshot() {
    let (_, registry) = seeded(0);
    let runs = registry.refresh(nightly()).await.unwrap();
    assert!(runs.is_empty());
    assert!(registry.snapshot(&nightly()).is_empty());
}

#[tokio::test]
async fn snapshot_keeps_remote_order() {
    let (store, registry) = seeded(3);
    registry.refresh(nightly()).await.unwrap();

    let ids: Vec<String> = registry.snapshot(&nightly()).iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, ["3", "2", "1"]);
    assert_eq!(
        store.calls(),
        vec![rb_adapters::StoreCall::ListRuns {
            job_id: Some(JobId::new("nightly-import")),
            limit: 50
        }]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let (store, registry) = seeded(2);
    registry.refresh(nightly()).await.unwrap();
    let mut events = registry.subscribe();

    store.fail_next(StoreOp::ListRuns, StoreError::Transport("connection reset".into()));
    let err = registry.refresh(nightly()).await.unwrap_err();

    assert_eq!(err.message, "transport error: connection reset");
    assert_eq!(registry.snapshot(&nightly()).len(), 2);
    assert_eq!(
        events.recv().await.unwrap(),
        RegistryEvent::RefreshFailed { scope: nightly(), error: err }
    );
}

#[tokio::test]
async fn subscribers_see_new_snapshot() {
    let (_, registry) = seeded(1);
    let mut events = registry.subscribe();
    registry.refresh(nightly()).await.unwrap();

    match events.recv().await.unwrap() {
        RegistryEvent::Refreshed { scope, runs } => {
            assert_eq!(scope, nightly());
            assert_eq!(runs.len(), 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn three_refreshes_one_fetch_three_answers() {
    let (store, registry) = seeded(2);

    let (a, b, c) = tokio::join!(
        registry.refresh(nightly()),
        registry.refresh(nightly()),
        registry.refresh(nightly()),
    );

    assert_eq!(store.count(StoreOp::ListRuns), 1);
    for result in [a, b, c] {
        assert_eq!(result.unwrap().len(), 2);
    }
}

#[tokio::test]
async fn all_runs_scope_omits_job_filter() {
    let (store, registry) = seeded(2);
    store.add_run(JobRun::builder().id(9u64).job_id("weekly-report").build());

    let runs = registry.refresh(RunScope::AllRuns).await.unwrap();
    assert_eq!(runs.len(), 3);
    assert!(registry.snapshot(&nightly()).is_empty());
}

#[tokio::test]
async fn locate_searches_loaded_snapshots() {
    let (store, registry) = seeded(1);
    store.add_run(JobRun::builder().id(9u64).job_id("weekly-report").build());
    registry.refresh(RunScope::AllRuns).await.unwrap();

    assert_eq!(registry.locate(&RunId::from(9u64)), Some(JobId::new("weekly-report")));
    assert_eq!(registry.locate(&RunId::from(77u64)), None);
}

#[yare::parameterized(
    all  = { None,                             RunScope::AllRuns },
    job  = { Some(JobId::new("nightly-import")), RunScope::Job(JobId::new("nightly-import")) },
)]
fn scope_from_optional_job(job: Option<JobId>, expected: RunScope) {
    assert_eq!(RunScope::from(job), expected);
}
