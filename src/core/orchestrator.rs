//! The orchestrator facade: validate, encode, build, dispatch, normalize.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::Instant;

use crate::core::blob::BlobStore;
use crate::core::builder::RequestBuilder;
use crate::core::config::StudioConfig;
use crate::core::dispatch::Dispatcher;
use crate::core::error::StudioError;
use crate::core::normalize::{self, ResultModel};
use crate::core::poller::{self, CancelToken, PollPolicy};
use crate::core::telemetry::{RunTrace, Telemetry};
use crate::core::tool::{StagedInput, ToolKind};
use crate::core::validation;

/// A failed run: the underlying error plus the message to show the user.
#[derive(Debug)]
pub struct RunFailure {
    pub message: String,
    pub error: StudioError,
}

impl RunFailure {
    /// True when the run was rejected because another one was in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.error, StudioError::Busy)
    }
}

impl From<StudioError> for RunFailure {
    fn from(error: StudioError) -> Self {
        Self {
            message: error.user_message(),
            error,
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Clears the busy flag when dropped, whichever way the run exits.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs tools against a [`Dispatcher`], one run at a time.
pub struct Studio<D> {
    dispatcher: D,
    builder: RequestBuilder,
    poll: PollPolicy,
    blobs: BlobStore,
    busy: AtomicBool,
    telemetry: Option<Arc<dyn Telemetry>>,
}

impl<D: Dispatcher> Studio<D> {
    pub fn new(dispatcher: D, config: &StudioConfig) -> Self {
        Self {
            dispatcher,
            builder: config.request_builder(),
            poll: config.poll.clone(),
            blobs: BlobStore::new(),
            busy: AtomicBool::new(false),
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Store holding downloaded video results, keyed by their `blob:` handle.
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Runs `kind` on the staged input.
    ///
    /// Rejected with [`StudioError::Busy`] while another run is in flight;
    /// the in-flight run is not affected.
    pub async fn run(&self, kind: ToolKind, staged: &StagedInput) -> Result<ResultModel, RunFailure> {
        self.run_with_cancel(kind, staged, &CancelToken::never()).await
    }

    /// Like [`run`](Self::run), but a long-running job stops polling once `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        kind: ToolKind,
        staged: &StagedInput,
        cancel: &CancelToken,
    ) -> Result<ResultModel, RunFailure> {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            log::warn!("Rejected {} run: another run is in progress", kind);
            return Err(StudioError::Busy.into());
        };

        let started = Instant::now();
        let mut trace = RunTrace::start(kind);
        let outcome = self.execute(kind, staged, cancel, &mut trace).await;

        trace.duration_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(result) => {
                log::info!("{} run finished with {} result in {}ms", kind, result.label(), trace.duration_ms);
                trace.outcome = result.label().to_string();
                trace.succeeded = true;
            }
            Err(error) => {
                log::warn!("{} run failed: {}", kind, error);
                trace.outcome = error.label().to_string();
            }
        }
        if let Some(telemetry) = &self.telemetry {
            telemetry.record(trace);
        }

        outcome.map_err(RunFailure::from)
    }

    async fn execute(
        &self,
        kind: ToolKind,
        staged: &StagedInput,
        cancel: &CancelToken,
        trace: &mut RunTrace,
    ) -> Result<ResultModel, StudioError> {
        let job = validation::validate(kind, staged)?.encode().await?;
        let request = self.builder.build(&job);
        trace.model = Some(request.model.clone());
        log::debug!(
            "Built {} request for {} ({} parts)",
            kind,
            request.model,
            request.parts.len()
        );

        if !request.is_long_running() {
            let response = self.dispatcher.generate(&request).await?;
            return normalize::normalize(kind, &response);
        }

        let job = self.dispatcher.submit(&request).await?;
        trace.metadata.insert("job".to_string(), job.handle.clone());
        let finished = poller::wait_for_job(&self.dispatcher, job, &self.poll, cancel).await?;
        trace.polls = finished.polls;

        let blob = self.dispatcher.fetch(&finished.locator).await?;
        Ok(normalize::video_result(self.blobs.insert(blob)))
    }
}
