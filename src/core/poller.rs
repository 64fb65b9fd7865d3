//! Submit-then-poll handling for long-running remote jobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::core::dispatch::{Dispatcher, RemoteJob};
use crate::core::error::StudioError;

/// How often and for how long a job is polled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Sleep between status fetches.
    pub interval: Duration,
    /// Maximum number of status fetches. `None` means unbounded.
    pub max_attempts: Option<u32>,
    /// Overall budget measured from the first sleep. `None` means unbounded.
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(8),
            max_attempts: Some(75),
            deadline: Some(Duration::from_secs(600)),
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Polls forever, like a plain `while !done` loop.
    pub fn unbounded(mut self) -> Self {
        self.max_attempts = None;
        self.deadline = None;
        self
    }
}

/// Caller side of a cancellation pair.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observed by the poll loop; cancelling the paired [`CancelHandle`] aborts it.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancelled. Never resolves if the handle was dropped uncancelled.
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.rx {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::never()
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx: Some(rx) })
}

/// A job that reached `done` with a result locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedJob {
    pub locator: String,
    /// Number of status fetches performed.
    pub polls: u32,
}

/// Polls `job` until it reports `done`, then returns its locator.
///
/// Each iteration sleeps for the policy interval and re-fetches status through
/// the job handle. A job already `done` is not polled again.
pub async fn wait_for_job<D: Dispatcher + ?Sized>(
    dispatcher: &D,
    mut job: RemoteJob,
    policy: &PollPolicy,
    cancel: &CancelToken,
) -> Result<FinishedJob, StudioError> {
    let started = Instant::now();
    let mut polls = 0u32;

    while !job.done {
        if policy.max_attempts.is_some_and(|max| polls >= max)
            || policy.deadline.is_some_and(|limit| started.elapsed() >= limit)
        {
            log::warn!("Job {} still pending after {} polls", job.handle, polls);
            return Err(StudioError::Timeout {
                attempts: polls,
                elapsed: started.elapsed(),
            });
        }

        tokio::select! {
            _ = tokio::time::sleep(policy.interval) => {}
            _ = cancel.cancelled() => {
                log::debug!("Job {} cancelled after {} polls", job.handle, polls);
                return Err(StudioError::Cancelled);
            }
        }

        job = dispatcher.poll(&job).await?;
        polls += 1;
        log::debug!("Job {} poll #{}: done={}", job.handle, polls, job.done);
    }

    if let Some(error) = job.error {
        return Err(StudioError::Remote(error));
    }

    let locator = job.locator.filter(|l| !l.is_empty()).ok_or_else(|| {
        StudioError::EmptyResult("The generation finished without a downloadable result.".to_string())
    })?;

    Ok(FinishedJob { locator, polls })
}
