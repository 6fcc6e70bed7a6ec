// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP status conventions of the console backend.

/// Coarse class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx: the success envelope follows
    Success,
    /// 4xx: a recoverable rejection with a message
    Rejected,
    /// Everything else, 5xx included
    ServerError,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            400..=499 => StatusClass::Rejected,
            _ => StatusClass::ServerError,
        }
    }
}

/// Why the backend rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    Validation,
    StaleVersion,
    NotFound,
}

/// Classify a 4xx rejection.
///
/// An explicit error code from the body wins; otherwise the status decides:
/// 409/412 are version conflicts, 404/410 mean the record is gone, and any
/// other 4xx is a validation failure.
pub fn classify_rejection(status: u16, code: Option<&str>) -> RejectKind {
    let by_code = code.map(|c| c.trim().to_ascii_lowercase()).and_then(|c| match c.as_str() {
        "stale_version" | "version_conflict" | "stale" => Some(RejectKind::StaleVersion),
        "not_found" | "notfound" => Some(RejectKind::NotFound),
        "validation" | "invalid" | "validation_error" => Some(RejectKind::Validation),
        _ => None,
    });
    if let Some(kind) = by_code {
        return kind;
    }
    match status {
        409 | 412 => RejectKind::StaleVersion,
        404 | 410 => RejectKind::NotFound,
        _ => RejectKind::Validation,
    }
}
