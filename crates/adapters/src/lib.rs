// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters between the run console and the outside world.
//!
//! [`RemoteStore`] is the seam to the console backend that owns jobs and
//! runs; [`CsrfSource`] supplies the token every mutating request carries.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod csrf;
mod http;
mod store;

pub use csrf::{CsrfSource, StaticCsrf};
pub use http::{HttpConfig, HttpRemoteStore};
pub use store::{RemoteStore, StoreError};

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRemoteStore, StoreCall, StoreOp};
