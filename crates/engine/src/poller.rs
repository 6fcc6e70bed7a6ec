// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background polling so remote status transitions become visible.

use std::time::Duration;

use rb_adapters::RemoteStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::FetchError;
use crate::registry::{JobRunRegistry, RunScope};

/// Why a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    Stopped,
    /// Every run in scope reached a terminal status
    Settled,
}

/// Refreshes one scope on a fixed interval through the registry, so polls
/// coalesce with any other refresh of the same scope.
pub struct RunPoller<S> {
    registry: JobRunRegistry<S>,
    scope: RunScope,
    interval: Duration,
    until_settled: bool,
}

impl<S: RemoteStore> RunPoller<S> {
    pub fn new(registry: JobRunRegistry<S>, scope: RunScope, interval: Duration) -> Self {
        Self { registry, scope, interval, until_settled: false }
    }

    /// Stop by itself once no run in scope can change status any more.
    pub fn until_settled(mut self, until_settled: bool) -> Self {
        self.until_settled = until_settled;
        self
    }

    /// Refresh once. Returns whether every run in scope is terminal.
    pub async fn poll_once(&self) -> Result<bool, FetchError> {
        let runs = self.registry.refresh(self.scope.clone()).await?;
        Ok(runs.iter().all(|run| run.status.is_terminal()))
    }

    /// Poll until `shutdown` changes (or its sender is dropped). Fetch
    /// failures are logged and polling carries on.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> PollExit {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(scope = %self.scope, interval_ms = self.interval.as_millis() as u64, "polling");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => return PollExit::Stopped,
            }
            match self.poll_once().await {
                Ok(true) if self.until_settled => {
                    tracing::debug!(scope = %self.scope, "all runs settled");
                    return PollExit::Settled;
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(scope = %self.scope, error = %e, "poll failed"),
            }
        }
    }

    pub fn spawn(self) -> PollerHandle {
        let (stop, shutdown) = watch::channel(false);
        PollerHandle { stop, task: tokio::spawn(self.run(shutdown)) }
    }
}

/// A running poll loop.
pub struct PollerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<PollExit>,
}

impl PollerHandle {
    /// Stop polling and wait for the loop to end.
    pub async fn stop(self) -> PollExit {
        let _ = self.stop.send(true);
        self.task.await.unwrap_or(PollExit::Stopped)
    }

    /// Wait for the loop to end by itself.
    pub async fn join(self) -> PollExit {
        // Dropping the sender would stop the loop
        let Self { stop: _stop, task } = self;
        task.await.unwrap_or(PollExit::Stopped)
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
