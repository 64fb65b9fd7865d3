//! Result normalizer: maps heterogeneous responses onto one [`ResultModel`].

use serde::{Deserialize, Serialize};

use crate::core::dispatch::RawResponse;
use crate::core::error::StudioError;
use crate::core::tool::ToolKind;

pub const IMAGE_DATA_URL_PREFIX: &str = "data:image/png;base64,";

pub const NO_PROMPT_FALLBACK: &str = "No prompt could be extracted from this image.";

/// Normalized outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultModel {
    Image { url: String },
    Video { url: String },
    Text { text: String },
}

impl ResultModel {
    /// Renderable locator for image and video results.
    pub fn url(&self) -> Option<&str> {
        match self {
            ResultModel::Image { url } | ResultModel::Video { url } => Some(url),
            ResultModel::Text { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResultModel::Image { .. } => "image",
            ResultModel::Video { .. } => "video",
            ResultModel::Text { .. } => "text",
        }
    }
}

/// Corrective message for an image tool that returned no image.
pub fn empty_result_message(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Enhance => "Could not enhance the image. Try again with a different photo.",
        ToolKind::Edit => "Could not edit the image. Try rephrasing the instruction.",
        ToolKind::StyleApply => "Could not apply the style. Try another style or image.",
        ToolKind::Fusion => "Could not fuse the images. Try inputs with more contrasting content.",
        ToolKind::StickerCreate => "Could not create the sticker. Try a simpler concept.",
        ToolKind::PromptAnalyze => NO_PROMPT_FALLBACK,
    }
}

/// Normalizes a synchronous response for `kind`.
///
/// Image tools take the first part with inline data and fail with
/// [`StudioError::EmptyResult`] if there is none. Prompt analysis takes the
/// response text and substitutes a fixed message when it is empty.
pub fn normalize(kind: ToolKind, response: &RawResponse) -> Result<ResultModel, StudioError> {
    match kind {
        ToolKind::PromptAnalyze => Ok(ResultModel::Text {
            text: response
                .text()
                .map(|t| t.trim().to_string())
                .unwrap_or_else(|| NO_PROMPT_FALLBACK.to_string()),
        }),
        _ => {
            let payload = response
                .first_inline()
                .ok_or_else(|| StudioError::EmptyResult(empty_result_message(kind).to_string()))?;
            Ok(ResultModel::Image {
                url: format!("{}{}", IMAGE_DATA_URL_PREFIX, payload.data),
            })
        }
    }
}

/// Wraps a locally registered video handle.
pub fn video_result(url: impl Into<String>) -> ResultModel {
    ResultModel::Video { url: url.into() }
}
