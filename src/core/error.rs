use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Shown when an error carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum StudioError {
    /// Staged inputs do not satisfy the selected tool. Message is user-facing.
    #[error("{0}")]
    Validation(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid image data: {0}")]
    InvalidAsset(String),

    #[error("{0}")]
    Remote(String),

    /// The remote call succeeded but returned nothing usable. Message is user-facing.
    #[error("{0}")]
    EmptyResult(String),

    #[error("The generation job did not finish after {attempts} status checks ({elapsed:?}).")]
    Timeout { attempts: u32, elapsed: Duration },

    #[error("The generation was cancelled.")]
    Cancelled,

    #[error("A generation is already in progress.")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StudioError {
    /// The message to show the user for this error.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Short machine-readable label, used in run traces.
    pub fn label(&self) -> &'static str {
        match self {
            StudioError::Validation(_) => "validation",
            StudioError::Io { .. } => "io",
            StudioError::InvalidAsset(_) => "invalid_asset",
            StudioError::Remote(_) => "remote",
            StudioError::EmptyResult(_) => "empty_result",
            StudioError::Timeout { .. } => "timeout",
            StudioError::Cancelled => "cancelled",
            StudioError::Busy => "busy",
            StudioError::Config(_) => "config",
        }
    }
}
