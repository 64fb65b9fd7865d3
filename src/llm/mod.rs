//! Gemini transport for nanostudio
//!
//! This module provides the HTTP client for the Gemini API and a
//! [`GeminiDispatcher`] that plugs it into the orchestration core.

pub mod dispatch;
pub mod error;
pub mod gemini;

pub use dispatch::GeminiDispatcher;
pub use error::LLMError;
pub use gemini::{
    GeminiConfig, GeminiContent, GeminiGenerationConfig, GeminiOperation, GeminiPart, GeminiResponse,
};

use crate::core::config::StudioConfig;

/// Gemini client wrapper around reqwest::Client
///
/// The credential is injected at construction and never read from the
/// environment afterwards.
#[derive(Clone)]
pub struct Client {
    /// The underlying HTTP client
    pub(crate) client: reqwest::Client,
    /// Gemini configuration
    pub(crate) gemini_config: GeminiConfig,
}

impl Client {
    /// Create a client for the default Gemini endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_gemini_at(api_key, GeminiConfig::default().base_url)
    }

    /// Create a client with API key and custom base URL
    pub fn with_gemini_at(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Client {
            client: reqwest::Client::new(),
            gemini_config: GeminiConfig {
                api_key: api_key.into(),
                base_url: base_url.into(),
            },
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::with_gemini_at(config.api_key.clone(), config.base_url.clone())
    }

    pub fn gemini_config(&self) -> &GeminiConfig {
        &self.gemini_config
    }
}
