//! Static catalogues: visual styles, reverse-prompt engine profiles and the
//! model assigned to each tool.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::StudioError;

/// A named visual style for [`ToolKind::StyleApply`](crate::core::tool::ToolKind::StyleApply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleOption {
    #[default]
    Cinematic,
    Vintage,
    Cyberpunk,
    Anime,
    BlackAndWhite,
}

impl StyleOption {
    pub const ALL: [StyleOption; 5] = [
        StyleOption::Cinematic,
        StyleOption::Vintage,
        StyleOption::Cyberpunk,
        StyleOption::Anime,
        StyleOption::BlackAndWhite,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            StyleOption::Cinematic => "cinematic",
            StyleOption::Vintage => "vintage",
            StyleOption::Cyberpunk => "cyber",
            StyleOption::Anime => "anime",
            StyleOption::BlackAndWhite => "bw",
        }
    }

    /// Display name, also the style name embedded in the instruction.
    pub fn label(&self) -> &'static str {
        match self {
            StyleOption::Cinematic => "Cinematic",
            StyleOption::Vintage => "Vintage 90s",
            StyleOption::Cyberpunk => "Cyberpunk",
            StyleOption::Anime => "Ghibli-style anime",
            StyleOption::BlackAndWhite => "Black & White Pro",
        }
    }

    /// Colour token for the rendering surface's style swatch.
    pub fn preview_color(&self) -> &'static str {
        match self {
            StyleOption::Cinematic => "blue-500",
            StyleOption::Vintage => "amber-600",
            StyleOption::Cyberpunk => "fuchsia-500",
            StyleOption::Anime => "emerald-400",
            StyleOption::BlackAndWhite => "slate-400",
        }
    }

    /// Instruction text for re-rendering an image in this style.
    pub fn instruction(&self) -> String {
        format!(
            "Re-render this image completely in a {} professional aesthetic. \
             Preserve the original composition, structure and subject identity exactly, \
             but transform the mood, color grading, lighting and texture to match the style. \
             Return only the final image.",
            self.label()
        )
    }
}

impl fmt::Display for StyleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StyleOption {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleOption::ALL
            .into_iter()
            .find(|style| style.id() == s)
            .ok_or_else(|| StudioError::Validation(format!("Unknown style '{}'.", s)))
    }
}

/// Target prompt dialect for [`ToolKind::PromptAnalyze`](crate::core::tool::ToolKind::PromptAnalyze).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineProfile {
    /// Natural-language prompts for Gemini / Imagen.
    #[default]
    Native,
    /// Comma-separated weighted tags, Stable Diffusion style.
    Tags,
    /// Long descriptive prose, DALL-E style.
    Narrative,
    /// Dense phrases followed by Midjourney parameters.
    Midjourney,
}

const NATIVE_INSTRUCTION: &str = "You are a prompt engineer for Google's Gemini and Imagen image models. \
Describe the image as one cohesive natural-language prompt: subject, setting, composition, camera angle, \
lens, lighting, color palette and mood, in that order. Use complete sentences and concrete visual detail.";

const TAGS_INSTRUCTION: &str = "You are a prompt engineer for Stable Diffusion. \
Describe the image as a comma-separated list of tags ordered by importance: quality tags first \
(masterpiece, best quality), then subject, clothing, pose, background, lighting, style and medium. \
Use (tag:1.2) weighting for dominant features and finish with a line starting with 'Negative prompt:'.";

const NARRATIVE_INSTRUCTION: &str = "You are a prompt engineer for DALL-E. \
Describe the image as a vivid narrative paragraph, as if briefing an illustrator: who or what is shown, \
what is happening, where it takes place, and the artistic style, lighting and atmosphere.";

const MIDJOURNEY_INSTRUCTION: &str = "You are a prompt engineer for Midjourney. \
Describe the image as short, dense descriptive phrases separated by commas: subject, environment, \
art style, lighting, camera and rendering terms. End with suitable parameters such as --ar, --style and --v.";

impl EngineProfile {
    pub const ALL: [EngineProfile; 4] = [
        EngineProfile::Native,
        EngineProfile::Tags,
        EngineProfile::Narrative,
        EngineProfile::Midjourney,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            EngineProfile::Native => "native",
            EngineProfile::Tags => "tags",
            EngineProfile::Narrative => "narrative",
            EngineProfile::Midjourney => "midjourney",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EngineProfile::Native => "Gemini / Imagen",
            EngineProfile::Tags => "Stable Diffusion",
            EngineProfile::Narrative => "DALL-E",
            EngineProfile::Midjourney => "Midjourney",
        }
    }

    /// Fixed system instruction steering the reverse prompt toward this dialect.
    pub fn system_instruction(&self) -> &'static str {
        match self {
            EngineProfile::Native => NATIVE_INSTRUCTION,
            EngineProfile::Tags => TAGS_INSTRUCTION,
            EngineProfile::Narrative => NARRATIVE_INSTRUCTION,
            EngineProfile::Midjourney => MIDJOURNEY_INSTRUCTION,
        }
    }
}

impl fmt::Display for EngineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EngineProfile {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineProfile::ALL
            .into_iter()
            .find(|engine| engine.id() == s)
            .ok_or_else(|| StudioError::Validation(format!("Unknown engine profile '{}'.", s)))
    }
}

/// Which sticker flow this deployment offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerMode {
    /// Short looping video, generated as a long-running remote job.
    #[default]
    Animated,
    /// Single die-cut sticker image, generated synchronously.
    Static,
}

/// Model identifier per tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub enhance: String,
    pub edit: String,
    pub sticker_image: String,
    pub sticker_video: String,
    pub analyze: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            enhance: "gemini-3-pro-image-preview".to_string(),
            edit: "gemini-2.5-flash-image".to_string(),
            sticker_image: "gemini-2.5-flash-image".to_string(),
            sticker_video: "veo-3.1-fast-generate-preview".to_string(),
            analyze: "gemini-3-flash-preview".to_string(),
        }
    }
}
