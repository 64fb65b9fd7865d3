//! Binary encoder: turns a locally selected image into a base64 payload.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::core::error::StudioError;

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// An image staged by the user. The encoder treats it as an opaque byte source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAsset {
    /// A file on disk. `mime_type` overrides the extension-based guess.
    File {
        path: PathBuf,
        mime_type: Option<String>,
    },
    /// Bytes already held in memory, e.g. from an upload.
    Bytes {
        name: String,
        bytes: Vec<u8>,
        mime_type: String,
    },
    /// A `data:<mime>;base64,<body>` URL handed over by a web front-end.
    DataUrl(String),
}

impl ImageAsset {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ImageAsset::File {
            path: path.into(),
            mime_type: None,
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
    ) -> Self {
        ImageAsset::Bytes {
            name: name.into(),
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_data_url(url: impl Into<String>) -> Self {
        ImageAsset::DataUrl(url.into())
    }

    /// Human-readable name for logs.
    pub fn name(&self) -> String {
        match self {
            ImageAsset::File { path, .. } => path.display().to_string(),
            ImageAsset::Bytes { name, .. } => name.clone(),
            ImageAsset::DataUrl(_) => "data-url".to_string(),
        }
    }
}

/// Transport-safe image payload: raw base64 body plus its mime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPayload {
    pub data: String,
    pub mime_type: String,
}

impl EncodedPayload {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: BASE64.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, StudioError> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| StudioError::InvalidAsset(e.to_string()))
    }
}

/// Reads the asset fully into memory and base64-encodes it.
///
/// Read failures propagate as [`StudioError::Io`]. No size limit is applied here;
/// oversized payloads are left for the remote call to reject.
pub async fn encode(asset: &ImageAsset) -> Result<EncodedPayload, StudioError> {
    match asset {
        ImageAsset::File { path, mime_type } => {
            let bytes = tokio::fs::read(path).await.map_err(|source| StudioError::Io {
                path: path.clone(),
                source,
            })?;
            let mime = mime_type
                .clone()
                .unwrap_or_else(|| mime_for_path(path).unwrap_or(DEFAULT_IMAGE_MIME).to_string());
            log::debug!("Encoded {} ({} bytes, {})", path.display(), bytes.len(), mime);
            Ok(EncodedPayload::from_bytes(&bytes, mime))
        }
        ImageAsset::Bytes {
            bytes, mime_type, ..
        } => Ok(EncodedPayload::from_bytes(bytes, mime_type.clone())),
        ImageAsset::DataUrl(url) => parse_data_url(url),
    }
}

/// Returns the base64 body of a data URL, or the input unchanged if it has no prefix.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    if encoded.starts_with("data:") {
        encoded
            .split_once(',')
            .map(|(_, body)| body)
            .unwrap_or(encoded)
    } else {
        encoded
    }
}

fn parse_data_url(url: &str) -> Result<EncodedPayload, StudioError> {
    let (header, _) = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| StudioError::InvalidAsset("expected a data: URL".to_string()))?;

    let Some(mime) = header.strip_suffix(";base64") else {
        return Err(StudioError::InvalidAsset(
            "data URL is not base64-encoded".to_string(),
        ));
    };

    let mime = if mime.is_empty() { DEFAULT_IMAGE_MIME } else { mime };
    Ok(EncodedPayload {
        data: strip_data_url_prefix(url).to_string(),
        mime_type: mime.to_string(),
    })
}

pub(crate) fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
