use crate::core::encoder::ImageAsset;
use crate::core::error::StudioError;
use crate::core::tool::{StagedInput, ToolJob, ToolKind};

pub const MISSING_IMAGE: &str = "Please select an image first.";
pub const SINGLE_IMAGE_ONLY: &str = "This tool works on a single image. Remove the extra one.";
pub const FUSION_NEEDS_TWO: &str =
    "Fusion needs exactly two images: a structural anchor and an aesthetic source.";
pub const MISSING_EDIT_INSTRUCTION: &str = "Describe what you want to change.";
pub const MISSING_STICKER_CONCEPT: &str = "Describe the sticker you want to create.";
pub const STICKER_TEXT_ONLY: &str =
    "Stickers are created from a description only. Remove the selected image.";

/// Checks staged input against the selected tool and turns it into a [`ToolJob`].
///
/// Runs before any I/O. The returned error is a [`StudioError::Validation`]
/// whose message is shown to the user as-is. Asset count is checked before
/// the instruction.
pub fn validate(kind: ToolKind, staged: &StagedInput) -> Result<ToolJob<ImageAsset>, StudioError> {
    check_asset_count(kind, staged.assets.len())?;

    let instruction = staged.instruction.trim();
    if kind.requires_instruction() && instruction.is_empty() {
        return Err(invalid(match kind {
            ToolKind::StickerCreate => MISSING_STICKER_CONCEPT,
            _ => MISSING_EDIT_INSTRUCTION,
        }));
    }

    let first = || staged.assets.first().cloned().ok_or_else(|| invalid(MISSING_IMAGE));

    Ok(match kind {
        ToolKind::Enhance => ToolJob::Enhance { image: first()? },
        ToolKind::Edit => ToolJob::Edit {
            image: first()?,
            instruction: instruction.to_string(),
        },
        ToolKind::StyleApply => ToolJob::StyleApply {
            image: first()?,
            style: staged.style,
        },
        ToolKind::Fusion => {
            let [anchor, source] = staged.assets.as_slice() else {
                return Err(invalid(FUSION_NEEDS_TWO));
            };
            ToolJob::Fusion {
                anchor: anchor.clone(),
                source: source.clone(),
                direction: (!instruction.is_empty()).then(|| instruction.to_string()),
            }
        }
        ToolKind::StickerCreate => ToolJob::StickerCreate {
            concept: instruction.to_string(),
        },
        ToolKind::PromptAnalyze => ToolJob::PromptAnalyze {
            image: first()?,
            engine: staged.engine,
        },
    })
}

fn check_asset_count(kind: ToolKind, count: usize) -> Result<(), StudioError> {
    if count == kind.required_assets() {
        return Ok(());
    }
    Err(invalid(match (kind, count) {
        (ToolKind::Fusion, _) => FUSION_NEEDS_TWO,
        (ToolKind::StickerCreate, _) => STICKER_TEXT_ONLY,
        (_, 0) => MISSING_IMAGE,
        _ => SINGLE_IMAGE_ONLY,
    }))
}

fn invalid(message: &str) -> StudioError {
    StudioError::Validation(message.to_string())
}
