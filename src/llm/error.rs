use thiserror::Error;

use crate::core::error::StudioError;

#[derive(Debug, Error)]
pub enum LLMError {
    /// Transport failure. The request URL is stripped before the error is stored.
    #[error("HTTP request error: {0}")]
    HttpError(reqwest::Error),

    #[error("Gemini error: {0}")]
    GeminiError(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::HttpError(err.without_url())
    }
}

impl From<LLMError> for StudioError {
    fn from(err: LLMError) -> Self {
        StudioError::Remote(err.to_string())
    }
}
