use crate::core::builder::RequestBuilder;
use crate::core::catalog::{ModelCatalog, StickerMode};
use crate::core::error::StudioError;
use crate::core::poller::PollPolicy;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables searched for the API credential, in order.
pub const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

/// Deployment-wide settings, resolved once at startup.
#[derive(Clone, Debug)]
pub struct StudioConfig {
    /// API credential. Handed to the transport, never read from the environment afterwards.
    pub api_key: String,
    pub base_url: String,
    pub models: ModelCatalog,
    pub sticker_mode: StickerMode,
    pub poll: PollPolicy,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            models: ModelCatalog::default(),
            sticker_mode: StickerMode::default(),
            poll: PollPolicy::default(),
        }
    }
}

impl StudioConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Reads the credential from the first non-blank variable in [`API_KEY_VARS`].
    pub fn from_env() -> Result<Self, StudioError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StudioError> {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|&name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| {
                StudioError::Config(format!("no API key set (tried {})", API_KEY_VARS.join(", ")))
            })?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models(mut self, models: ModelCatalog) -> Self {
        self.models = models;
        self
    }

    pub fn with_sticker_mode(mut self, sticker_mode: StickerMode) -> Self {
        self.sticker_mode = sticker_mode;
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn request_builder(&self) -> RequestBuilder {
        RequestBuilder::new(self.models.clone(), self.sticker_mode)
    }
}
