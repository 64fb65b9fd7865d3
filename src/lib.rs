//! # nanostudio
//!
//! Request orchestration for AI image tools: enhancement, free-text edits,
//! style transfer, two-image fusion, sticker generation and reverse-prompt
//! extraction, backed by a remote generative-model API.
//!
//! ## Features
//!
//! - **Typed Tool Jobs**: Each tool carries exactly the inputs it needs; invalid combinations don't validate
//! - **Pure Request Building**: Instruction text and payload parts are built without I/O
//! - **Bounded Polling**: Long-running video jobs are polled with a deadline and can be cancelled
//! - **One Result Model**: Images, videos and text all come back as a single [`ResultModel`]
//! - **Optional Gemini Transport**: The `llm` feature (on by default) provides the Gemini REST client
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nanostudio::prelude::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StudioConfig::from_env()?;
//! let studio = Studio::gemini(&config);
//!
//! let staged = StagedInput::new().with_asset(ImageAsset::from_path("photo.jpg"));
//! match studio.run(ToolKind::Enhance, &staged).await {
//!     Ok(ResultModel::Image { url }) => println!("enhanced: {} chars", url.len()),
//!     Ok(other) => println!("unexpected result: {:?}", other),
//!     Err(failure) => eprintln!("{}", failure.message),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`core`]: validation, encoding, request building, dispatch seam, polling, normalization
//! - [`llm`]: Gemini client and [`llm::GeminiDispatcher`] (feature `llm`)
//! - [`prelude`]: Commonly used types (import with `use nanostudio::prelude::*`)

// ============================================================================
// Core Module
// ============================================================================

pub mod core;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use crate::core::blob::BlobStore;
pub use crate::core::builder::{OutputSpec, Part, Request, RequestBuilder};
pub use crate::core::catalog::{EngineProfile, ModelCatalog, StickerMode, StyleOption};
pub use crate::core::config::StudioConfig;
pub use crate::core::dispatch::{Blob, Dispatcher, RawResponse, RemoteJob, ResponsePart};
pub use crate::core::encoder::{EncodedPayload, ImageAsset};
pub use crate::core::error::StudioError;
pub use crate::core::normalize::ResultModel;
pub use crate::core::orchestrator::{RunFailure, Studio};
pub use crate::core::poller::{CancelHandle, CancelToken, PollPolicy, cancel_pair};
pub use crate::core::session::Session;
pub use crate::core::telemetry::{MemoryTelemetry, RunTrace, Telemetry};
pub use crate::core::tool::{StagedInput, ToolJob, ToolKind};

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// The main prelude: imports everything needed to stage inputs and run tools.
///
/// # Example
/// ```rust
/// use nanostudio::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        cancel_pair, CancelToken, Dispatcher, EngineProfile, ImageAsset, PollPolicy, ResultModel,
        RunFailure, Session, StagedInput, StickerMode, Studio, StudioConfig, StudioError,
        StyleOption, ToolKind,
    };

    #[cfg(feature = "llm")]
    pub use super::llm::GeminiDispatcher;
}

// ============================================================================
// LLM Feature
// ============================================================================

#[cfg(feature = "llm")]
pub mod llm;

#[cfg(feature = "llm")]
pub use llm::{Client, GeminiDispatcher, LLMError};

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
