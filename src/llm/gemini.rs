//! Google Gemini client
//!
//! Supports `generateContent` for image and text output, and the
//! long-running `predictLongRunning` flow used for video generation.

use serde::{Deserialize, Serialize};

use crate::core::config::DEFAULT_BASE_URL;
use crate::llm::{Client, error::LLMError};

/// Header carrying the credential, so it never appears in request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for Gemini client
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL (default: https://generativelanguage.googleapis.com)
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Request structure for Gemini generate content
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

/// Content structure for Gemini
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A part of content: text or inline binary data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "inline_data")]
    pub inline_data: Option<GeminiBlob>,
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(GeminiBlob {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload with its mime type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiBlob {
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

impl GeminiContent {
    pub fn user_parts(parts: Vec<GeminiPart>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

/// Generation configuration for Gemini
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<GeminiImageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

/// Response from Gemini generate content
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: GeminiContent,
}

/// Body of a `predictLongRunning` video request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerationRequest {
    pub instances: Vec<VideoInstance>,
    pub parameters: VideoParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    pub aspect_ratio: String,
    pub resolution: String,
}

/// A long-running operation as reported by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiOperation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<GeminiOperationError>,
    #[serde(default)]
    pub response: Option<VideoOperationResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiOperationError {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<GeneratedVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedVideo {
    #[serde(default)]
    pub uri: Option<String>,
}

impl GeminiOperation {
    /// Download URI of the first generated video, once the operation is done.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .iter()
            .find_map(|sample| sample.video.as_ref()?.uri.as_deref())
    }
}

/// Downloaded media bytes.
#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl Client {
    /// Call Gemini's generate content API
    ///
    /// # Arguments
    /// * `model` - Model to use (e.g., "gemini-2.5-flash-image")
    /// * `contents` - Conversation contents
    /// * `generation_config` - Optional generation configuration
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::new("your-api-key");
    /// let contents = vec![GeminiContent::user_parts(vec![GeminiPart::text("Hello!")])];
    /// let response = client.call_gemini("gemini-3-flash-preview", contents, None).await?;
    /// ```
    pub async fn call_gemini(
        &self,
        model: impl Into<String>,
        contents: Vec<GeminiContent>,
        generation_config: Option<GeminiGenerationConfig>,
    ) -> Result<GeminiResponse, LLMError> {
        let config = &self.gemini_config;
        let model_name = model.into();
        let url = format!("{}/v1beta/models/{}:generateContent", config.base_url, model_name);

        let request = GeminiRequest {
            contents,
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let gemini_response: GeminiResponse = response.json().await?;
        Ok(gemini_response)
    }

    /// Starts a long-running video generation and returns the pending operation.
    pub async fn start_video_generation(
        &self,
        model: &str,
        request: &VideoGenerationRequest,
    ) -> Result<GeminiOperation, LLMError> {
        let config = &self.gemini_config;
        let url = format!("{}/v1beta/models/{}:predictLongRunning", config.base_url, model);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &config.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetches the current state of an operation by its name.
    pub async fn get_operation(&self, name: &str) -> Result<GeminiOperation, LLMError> {
        let config = &self.gemini_config;
        let url = format!("{}/v1beta/{}", config.base_url, name);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &config.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Downloads generated media from a URI returned by an operation.
    ///
    /// The file endpoint takes the credential as a `key` query parameter;
    /// transport errors drop the URL on conversion into [`LLMError`].
    pub async fn download(&self, uri: &str) -> Result<DownloadedMedia, LLMError> {
        let response = self
            .client
            .get(uri)
            .query(&[("key", self.gemini_config.api_key.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(DownloadedMedia {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LLMError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(LLMError::GeminiError(format!("HTTP {}: {}", status, error_text)))
}
