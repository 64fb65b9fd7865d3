use async_trait::async_trait;

use crate::core::builder::{OutputSpec, Part, Request};
use crate::core::config::StudioConfig;
use crate::core::dispatch::{Blob, Dispatcher, RawResponse, RemoteJob, ResponsePart};
use crate::core::encoder::EncodedPayload;
use crate::core::error::StudioError;
use crate::core::orchestrator::Studio;
use crate::llm::Client;
use crate::llm::gemini::{
    GeminiContent, GeminiGenerationConfig, GeminiImageConfig, GeminiOperation, GeminiPart,
    GeminiResponse, VideoGenerationRequest, VideoInstance, VideoParameters,
};

const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// [`Dispatcher`] backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiDispatcher {
    client: Client,
}

impl GeminiDispatcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Studio<GeminiDispatcher> {
    /// A studio talking to Gemini with the credential from `config`.
    pub fn gemini(config: &StudioConfig) -> Self {
        Studio::new(GeminiDispatcher::new(Client::from_config(config)), config)
    }
}

#[async_trait]
impl Dispatcher for GeminiDispatcher {
    async fn generate(&self, request: &Request) -> Result<RawResponse, StudioError> {
        let (contents, generation_config) = to_gemini_request(request);
        let response = self
            .client
            .call_gemini(&request.model, contents, generation_config)
            .await?;
        Ok(to_raw_response(response))
    }

    async fn submit(&self, request: &Request) -> Result<RemoteJob, StudioError> {
        let body = to_video_request(request)?;
        let operation = self
            .client
            .start_video_generation(&request.model, &body)
            .await?;
        log::debug!("Submitted video job {}", operation.name);
        Ok(to_remote_job(operation))
    }

    async fn poll(&self, job: &RemoteJob) -> Result<RemoteJob, StudioError> {
        let operation = self.client.get_operation(&job.handle).await?;
        Ok(to_remote_job(operation))
    }

    async fn fetch(&self, locator: &str) -> Result<Blob, StudioError> {
        let media = self.client.download(locator).await?;
        Ok(Blob {
            bytes: media.bytes,
            mime_type: media
                .content_type
                .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string()),
        })
    }
}

pub(crate) fn to_gemini_request(
    request: &Request,
) -> (Vec<GeminiContent>, Option<GeminiGenerationConfig>) {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            Part::Binary(payload) => GeminiPart::inline(&payload.mime_type, &payload.data),
            Part::Text(text) => GeminiPart::text(text),
        })
        .collect();

    let generation_config = match &request.output {
        OutputSpec::Image {
            image_size,
            aspect_ratio,
        } => Some(GeminiGenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            image_config: (image_size.is_some() || aspect_ratio.is_some()).then(|| {
                GeminiImageConfig {
                    aspect_ratio: aspect_ratio.clone(),
                    image_size: image_size.clone(),
                }
            }),
            ..Default::default()
        }),
        OutputSpec::Text | OutputSpec::Video { .. } => None,
    };

    (vec![GeminiContent::user_parts(parts)], generation_config)
}

pub(crate) fn to_video_request(request: &Request) -> Result<VideoGenerationRequest, StudioError> {
    let OutputSpec::Video {
        resolution,
        aspect_ratio,
    } = &request.output
    else {
        return Err(StudioError::Remote(format!(
            "model {} does not produce video",
            request.model
        )));
    };

    Ok(VideoGenerationRequest {
        instances: vec![VideoInstance {
            prompt: request.prompt_text(),
        }],
        parameters: VideoParameters {
            aspect_ratio: aspect_ratio.clone(),
            resolution: resolution.clone(),
        },
    })
}

pub(crate) fn to_raw_response(response: GeminiResponse) -> RawResponse {
    let parts = response
        .candidates
        .into_iter()
        .flat_map(|candidate| candidate.content.parts)
        .map(|part| ResponsePart {
            inline_data: part.inline_data.map(|blob| EncodedPayload {
                data: blob.data,
                mime_type: blob.mime_type,
            }),
            text: part.text,
        })
        .collect();
    RawResponse::from_parts(parts)
}

pub(crate) fn to_remote_job(operation: GeminiOperation) -> RemoteJob {
    RemoteJob {
        locator: operation.video_uri().map(str::to_string),
        error: operation
            .error
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty()),
        done: operation.done,
        handle: operation.name,
    }
}
