//! iconloom Gen - Localized iOS app icon generation
//!
//! Composes a prompt per locale, asks an image backend (OpenAI, Mock) for a
//! 1024x1024 master image, then resamples it into the canonical iOS icon
//! sizes and publishes an `.appiconset` bundle with its `Contents.json`.

pub mod config;
pub mod manifest;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod render;
pub mod sizes;
pub mod spec;

pub use config::IconloomConfig;
pub use manifest::{build_manifest, write_manifest, AssetManifest};
pub use pipeline::{
    preview_prompts, BatchReport, GenerationResult, IconPipeline, LocaleState, Outcome,
    PipelineOptions,
};
pub use prompt::build_prompt;
pub use provider::{CancelToken, ImageBackend, ImageRequest};
pub use render::{render_bundle, BundleTarget, RenderedBundle};
pub use sizes::{IconSlot, CANONICAL_SIZES};
pub use spec::{ColorPair, HexColor, IconStyle, ImageModel, PromptSpec};
