//! The seam between orchestration and the remote generation API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::builder::Request;
use crate::core::encoder::EncodedPayload;
use crate::core::error::StudioError;

/// One returned content part. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePart {
    pub inline_data: Option<EncodedPayload>,
    pub text: Option<String>,
}

impl ResponsePart {
    pub fn inline(payload: EncodedPayload) -> Self {
        Self {
            inline_data: Some(payload),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            inline_data: None,
            text: Some(text.into()),
        }
    }
}

/// Provider-neutral view of a synchronous response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    /// Content parts in the order the provider returned them.
    pub parts: Vec<ResponsePart>,
}

impl RawResponse {
    pub fn from_parts(parts: Vec<ResponsePart>) -> Self {
        Self { parts }
    }

    /// First part carrying non-empty inline binary data.
    pub fn first_inline(&self) -> Option<&EncodedPayload> {
        self.parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|payload| !payload.data.is_empty())
    }

    /// All text parts joined together, if any.
    pub fn text(&self) -> Option<String> {
        let text: String = self.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Handle to a long-running remote generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteJob {
    /// Opaque provider handle, re-used for every status fetch.
    pub handle: String,
    pub done: bool,
    /// Where the result can be fetched once `done` is set.
    pub locator: Option<String>,
    /// Provider-reported failure once `done` is set.
    pub error: Option<String>,
}

impl RemoteJob {
    pub fn pending(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            done: false,
            locator: None,
            error: None,
        }
    }

    pub fn finished(handle: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            done: true,
            locator: Some(locator.into()),
            error: None,
        }
    }
}

/// Bytes fetched from a remote locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Transport for generation requests.
///
/// Implementations own the credential; callers never pass it.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// One synchronous request/response round trip.
    async fn generate(&self, request: &Request) -> Result<RawResponse, StudioError>;

    /// Starts a long-running job.
    async fn submit(&self, request: &Request) -> Result<RemoteJob, StudioError>;

    /// Re-fetches the status of a job through its handle.
    async fn poll(&self, job: &RemoteJob) -> Result<RemoteJob, StudioError>;

    /// Downloads the terminal output of a job.
    async fn fetch(&self, locator: &str) -> Result<Blob, StudioError>;
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for std::sync::Arc<D> {
    async fn generate(&self, request: &Request) -> Result<RawResponse, StudioError> {
        (**self).generate(request).await
    }

    async fn submit(&self, request: &Request) -> Result<RemoteJob, StudioError> {
        (**self).submit(request).await
    }

    async fn poll(&self, job: &RemoteJob) -> Result<RemoteJob, StudioError> {
        (**self).poll(job).await
    }

    async fn fetch(&self, locator: &str) -> Result<Blob, StudioError> {
        (**self).fetch(locator).await
    }
}
