// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod jobs;
pub mod runs;

use rb_engine::Settled;

use crate::exit_error::{codes, ExitError};

/// The CLI drives one workflow at a time, so a superseded outcome means the
/// form was closed underneath it.
pub(crate) fn applied<T>(settled: Settled<T>) -> Result<T, ExitError> {
    settled
        .applied()
        .ok_or_else(|| ExitError::new(codes::FAILURE, "the form was closed before the request finished"))
}
