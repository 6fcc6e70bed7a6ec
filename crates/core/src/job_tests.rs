// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_id_display() {
    let id = JobId::new("nightly-import");
    assert_eq!(id.to_string(), "nightly-import");
}

#[test]
fn job_id_equality() {
    assert_eq!(JobId::new("job-1"), JobId::new("job-1"));
    assert_ne!(JobId::new("job-1"), JobId::new("job-2"));
}

#[test]
fn job_serde_omits_absent_optionals() {
    let job = Job::builder().build();
    let json = serde_json::to_value(&job).unwrap();
    assert_eq!(json["id"], "nightly-import");
    assert_eq!(json["is_active"], true);
    assert!(json.get("description").is_none());
    assert!(json.get("last_run_at").is_none());
}

#[test]
fn job_builder_overrides_defaults() {
    let job = Job::builder().id("cleanup").name("Cleanup").is_active(false).description("x").build();
    assert_eq!(job.id, "cleanup");
    assert_eq!(job.name, "Cleanup");
    assert!(!job.is_active);
    assert_eq!(job.description.as_deref(), Some("x"));
}
