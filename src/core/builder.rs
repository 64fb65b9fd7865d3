//! Request builder: per-tool instruction text and ordered payload parts.
//!
//! Building is pure. The same job always yields the same [`Request`], so the
//! output can be asserted directly in tests without any transport.

use serde::{Deserialize, Serialize};

use crate::core::catalog::{ModelCatalog, StickerMode};
use crate::core::encoder::EncodedPayload;
use crate::core::tool::ToolJob;

pub const ENHANCE_INSTRUCTION: &str = "Restore and enhance this image to ultra-high resolution. \
Reconstruct fine detail and texture with maximum clarity, sharpen edges, and remove noise, blur \
and compression artifacts without altering the content. Output only the final high-quality image.";

pub const FUSION_PREAMBLE: &str = "Fuse these two images into one new image. \
Image #1 is the structural anchor: keep its layout, composition and geometry. \
Image #2 is the aesthetic source: take its textures, lighting, color palette and subject character.";

pub const FUSION_FALLBACK: &str =
    "Blend them into a seamless, coherent synthesis that reads as a single original image.";

pub const CUSTOM_DIRECTION_PREFIX: &str = "Custom direction:";

const IMAGE_ONLY_SUFFIX: &str = "Return only the final image.";

const ANALYZE_TASK: &str = "Analyze the attached image and reverse-engineer the prompt that would \
reproduce it as closely as possible. Respond with the prompt text only, without commentary or markdown.";

/// One unit of a multi-modal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Binary(EncodedPayload),
    Text(String),
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::Binary(_) => None,
        }
    }
}

/// What the remote model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSpec {
    Image {
        image_size: Option<String>,
        aspect_ratio: Option<String>,
    },
    /// Long-running video job; must be submitted and polled.
    Video {
        resolution: String,
        aspect_ratio: String,
    },
    Text,
}

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub model: String,
    pub parts: Vec<Part>,
    pub output: OutputSpec,
}

impl Request {
    pub fn is_long_running(&self) -> bool {
        matches!(self.output, OutputSpec::Video { .. })
    }

    /// Concatenated text parts, used as the prompt for video jobs.
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn binary_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, Part::Binary(_)))
            .count()
    }
}

#[derive(Clone, Debug, Default)]
pub struct RequestBuilder {
    models: ModelCatalog,
    sticker_mode: StickerMode,
}

impl RequestBuilder {
    pub fn new(models: ModelCatalog, sticker_mode: StickerMode) -> Self {
        Self {
            models,
            sticker_mode,
        }
    }

    pub fn sticker_mode(&self) -> StickerMode {
        self.sticker_mode
    }

    pub fn build(&self, job: &ToolJob<EncodedPayload>) -> Request {
        match job {
            ToolJob::Enhance { image } => Request {
                model: self.models.enhance.clone(),
                parts: vec![
                    Part::Binary(image.clone()),
                    Part::Text(ENHANCE_INSTRUCTION.to_string()),
                ],
                output: OutputSpec::Image {
                    image_size: Some("4K".to_string()),
                    aspect_ratio: Some("1:1".to_string()),
                },
            },
            ToolJob::Edit { image, instruction } => Request {
                model: self.models.edit.clone(),
                parts: vec![Part::Binary(image.clone()), Part::Text(instruction.clone())],
                output: image_output(),
            },
            ToolJob::StyleApply { image, style } => Request {
                model: self.models.edit.clone(),
                parts: vec![Part::Binary(image.clone()), Part::Text(style.instruction())],
                output: image_output(),
            },
            ToolJob::Fusion {
                anchor,
                source,
                direction,
            } => Request {
                model: self.models.edit.clone(),
                parts: vec![
                    Part::Binary(anchor.clone()),
                    Part::Binary(source.clone()),
                    Part::Text(fusion_instruction(direction.as_deref())),
                ],
                output: image_output(),
            },
            ToolJob::StickerCreate { concept } => self.sticker_request(concept),
            ToolJob::PromptAnalyze { image, engine } => Request {
                model: self.models.analyze.clone(),
                parts: vec![
                    Part::Binary(image.clone()),
                    Part::Text(format!("{}\n\n{}", engine.system_instruction(), ANALYZE_TASK)),
                ],
                output: OutputSpec::Text,
            },
        }
    }

    fn sticker_request(&self, concept: &str) -> Request {
        match self.sticker_mode {
            StickerMode::Animated => Request {
                model: self.models.sticker_video.clone(),
                parts: vec![Part::Text(format!(
                    "3D animated sticker of {}, thick white die-cut border, isolated on a plain \
                     neutral background, short seamless loop, cute, bold and vibrant colors.",
                    concept
                ))],
                output: OutputSpec::Video {
                    resolution: "720p".to_string(),
                    aspect_ratio: "1:1".to_string(),
                },
            },
            StickerMode::Static => Request {
                model: self.models.sticker_image.clone(),
                parts: vec![Part::Text(format!(
                    "Create a die-cut 3D sticker of {}. Bold saturated colors, glossy finish, a thick \
                     white border around the silhouette, isolated on a plain neutral background. {}",
                    concept, IMAGE_ONLY_SUFFIX
                ))],
                output: image_output(),
            },
        }
    }
}

fn image_output() -> OutputSpec {
    OutputSpec::Image {
        image_size: None,
        aspect_ratio: None,
    }
}

fn fusion_instruction(direction: Option<&str>) -> String {
    match direction {
        Some(direction) => format!(
            "{} {} {} {}",
            FUSION_PREAMBLE, CUSTOM_DIRECTION_PREFIX, direction, IMAGE_ONLY_SUFFIX
        ),
        None => format!("{} {} {}", FUSION_PREAMBLE, FUSION_FALLBACK, IMAGE_ONLY_SUFFIX),
    }
}
