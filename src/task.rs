// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cancellable periodic jobs.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

/// When the first run of a [`PeriodicTask`] happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstRun {
    /// Right away, then every period.
    Immediately,
    /// One period after spawning.
    AfterPeriod,
}

/// A job run every `period` on the tokio runtime until stopped.
///
/// Stopping prevents any further run; a run already in progress is left to
/// finish. Runs never overlap: a run that outlasts the period delays the
/// next one. Dropping the handle stops the task.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use klereo_lib::task::{FirstRun, PeriodicTask};
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = PeriodicTask::spawn("example", Duration::from_secs(30), FirstRun::Immediately, || async {
///     println!("tick");
/// });
/// task.stop();
/// assert!(task.is_stopped());
/// # }
/// ```
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
}

impl PeriodicTask {
    /// Spawns `job` to run every `period`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, first_run: FirstRun, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let start = match first_run {
            FirstRun::Immediately => Instant::now(),
            FirstRun::AfterPeriod => Instant::now() + period,
        };

        tracing::debug!(task = name, ?period, "Starting periodic task");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    // Also fires when the handle is dropped
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => {}
                }
                if *stop_rx.borrow() {
                    break;
                }
                job().await;
            }

            tracing::debug!(task = name, "Periodic task stopped");
        });

        Self { name, stop_tx }
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stops the task. Idempotent.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Returns `true` once [`stop`](Self::stop) was called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}
