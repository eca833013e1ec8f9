//! Timed polling of an active solve job.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::{Inner, SessionController};
use crate::api::SolverApi;

/// Handle to a running synchronization loop.
///
/// Dropping the handle stops the loop. A refresh already in flight is allowed
/// to finish; its result is still subject to the staleness checks.
#[derive(Debug)]
pub(crate) struct PollHandle {
    job_id: String,
    stop_signal: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Starts polling `job_id`. The first tick fires one `interval` from now.
    pub(crate) fn spawn<A: SolverApi>(
        inner: Weak<Inner<A>>,
        job_id: String,
        interval: Duration,
    ) -> Self {
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(run_loop(inner, job_id.clone(), interval, rx));
        debug!(job_id = %job_id, interval_ms = interval.as_millis() as u64, "Synchronization loop started");
        Self {
            job_id,
            stop_signal: Some(tx),
            task,
        }
    }

    /// Stops the loop. Calling this more than once has no further effect.
    pub(crate) fn stop(&mut self) {
        if let Some(tx) = self.stop_signal.take() {
            let _ = tx.send(());
            debug!(job_id = %self.job_id, "Synchronization loop stopped");
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.stop_signal.is_some() && !self.task.is_finished()
    }

    #[cfg(test)]
    pub(crate) fn job_id(&self) -> &str {
        &self.job_id
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop<A: SolverApi>(
    inner: Weak<Inner<A>>,
    job_id: String,
    interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {}
        }

        // The controller is gone; nothing left to update.
        let Some(inner) = inner.upgrade() else {
            break;
        };
        trace!(job_id = %job_id, "Synchronization tick");

        // Ticks are awaited one at a time, so the loop never has two
        // requests in flight. Failures are already reported by `refresh`;
        // the next tick is the retry.
        let _ = SessionController::from_inner(inner).refresh().await;
    }

    trace!(job_id = %job_id, "Synchronization loop exited");
}
