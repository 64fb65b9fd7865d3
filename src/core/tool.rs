use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::catalog::{EngineProfile, StyleOption};
use crate::core::encoder::{self, EncodedPayload, ImageAsset};
use crate::core::error::StudioError;

/// The operations a user can request. Exactly one is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Enhance,
    Edit,
    StyleApply,
    Fusion,
    StickerCreate,
    PromptAnalyze,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Enhance,
        ToolKind::Edit,
        ToolKind::StyleApply,
        ToolKind::Fusion,
        ToolKind::StickerCreate,
        ToolKind::PromptAnalyze,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Enhance => "Enhance",
            ToolKind::Edit => "Edit",
            ToolKind::StyleApply => "Styles",
            ToolKind::Fusion => "Fusion",
            ToolKind::StickerCreate => "Stickers",
            ToolKind::PromptAnalyze => "Reverse prompt",
        }
    }

    /// Number of image assets the tool consumes.
    pub fn required_assets(&self) -> usize {
        match self {
            ToolKind::Fusion => 2,
            ToolKind::StickerCreate => 0,
            _ => 1,
        }
    }

    /// Whether the tool needs free-text instruction from the user.
    pub fn requires_instruction(&self) -> bool {
        matches!(self, ToolKind::Edit | ToolKind::StickerCreate)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated tool invocation. Each variant carries exactly the inputs its tool needs.
///
/// `A` is the asset representation: [`ImageAsset`] before encoding,
/// [`EncodedPayload`] after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolJob<A> {
    Enhance {
        image: A,
    },
    Edit {
        image: A,
        instruction: String,
    },
    StyleApply {
        image: A,
        style: StyleOption,
    },
    Fusion {
        /// Image #1: layout and geometry source.
        anchor: A,
        /// Image #2: texture, lighting and subject source.
        source: A,
        direction: Option<String>,
    },
    StickerCreate {
        concept: String,
    },
    PromptAnalyze {
        image: A,
        engine: EngineProfile,
    },
}

impl<A> ToolJob<A> {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolJob::Enhance { .. } => ToolKind::Enhance,
            ToolJob::Edit { .. } => ToolKind::Edit,
            ToolJob::StyleApply { .. } => ToolKind::StyleApply,
            ToolJob::Fusion { .. } => ToolKind::Fusion,
            ToolJob::StickerCreate { .. } => ToolKind::StickerCreate,
            ToolJob::PromptAnalyze { .. } => ToolKind::PromptAnalyze,
        }
    }
}

impl ToolJob<ImageAsset> {
    /// Encodes every asset, in order, leaving the rest of the job untouched.
    pub async fn encode(self) -> Result<ToolJob<EncodedPayload>, StudioError> {
        Ok(match self {
            ToolJob::Enhance { image } => ToolJob::Enhance {
                image: encoder::encode(&image).await?,
            },
            ToolJob::Edit { image, instruction } => ToolJob::Edit {
                image: encoder::encode(&image).await?,
                instruction,
            },
            ToolJob::StyleApply { image, style } => ToolJob::StyleApply {
                image: encoder::encode(&image).await?,
                style,
            },
            ToolJob::Fusion {
                anchor,
                source,
                direction,
            } => {
                let anchor = encoder::encode(&anchor).await?;
                let source = encoder::encode(&source).await?;
                ToolJob::Fusion {
                    anchor,
                    source,
                    direction,
                }
            }
            ToolJob::StickerCreate { concept } => ToolJob::StickerCreate { concept },
            ToolJob::PromptAnalyze { image, engine } => ToolJob::PromptAnalyze {
                image: encoder::encode(&image).await?,
                engine,
            },
        })
    }
}

/// Loose, UI-owned input state before validation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedInput {
    pub assets: Vec<ImageAsset>,
    pub instruction: String,
    pub style: StyleOption,
    pub engine: EngineProfile,
}

impl StagedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, asset: ImageAsset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_style(mut self, style: StyleOption) -> Self {
        self.style = style;
        self
    }

    pub fn with_engine(mut self, engine: EngineProfile) -> Self {
        self.engine = engine;
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
