use crate::core::blob::BlobStore;
use crate::core::dispatch::Dispatcher;
use crate::core::normalize::ResultModel;
use crate::core::orchestrator::Studio;
use crate::core::tool::{StagedInput, ToolKind};

/// Per-user state the rendering surface reads from: active tool, staged
/// input, and the outcome of the last run.
///
/// A video result's `blob:` handle is revoked as soon as the session drops
/// that result.
#[derive(Debug, Clone, Default)]
pub struct Session {
    active: ToolKind,
    pub staged: StagedInput,
    result: Option<ResultModel>,
    error: Option<String>,
    /// Store that issued the handle in `result`, if any.
    blobs: BlobStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active
    }

    pub fn result(&self) -> Option<&ResultModel> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switches tool, discarding staged input and the previous outcome.
    pub fn select_tool(&mut self, kind: ToolKind) {
        self.active = kind;
        self.staged.clear();
        self.discard_result();
        self.error = None;
    }

    /// Clears the displayed result, keeping the tool and staged input.
    pub fn new_project(&mut self) {
        self.discard_result();
    }

    /// Runs the active tool. A run rejected as busy leaves the session untouched.
    pub async fn generate<D: Dispatcher>(&mut self, studio: &Studio<D>) -> Option<&ResultModel> {
        let outcome = studio.run(self.active, &self.staged).await;
        match outcome {
            Err(failure) if failure.is_busy() => {}
            Ok(result) => {
                self.discard_result();
                self.error = None;
                self.blobs = studio.blobs().clone();
                self.result = Some(result);
            }
            Err(failure) => {
                self.discard_result();
                self.error = Some(failure.message);
            }
        }
        self.result.as_ref()
    }

    fn discard_result(&mut self) {
        if let Some(ResultModel::Video { url }) = self.result.take() {
            self.blobs.revoke(&url);
        }
    }
}
