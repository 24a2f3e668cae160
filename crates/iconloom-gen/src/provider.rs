//! Image backend trait and request types

use crate::spec::ImageModel;
use iconloom_core::Result;
use image::DynamicImage;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Every icon is generated at this size and resampled afterwards
pub const GENERATION_SIZE: &str = "1024x1024";

/// A request to the image backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    pub model: ImageModel,
    pub prompt: String,
    /// Requested output size, always `GENERATION_SIZE`
    pub size: String,
    /// Number of images, always 1
    pub count: u32,
    pub response_format: String,
}

impl ImageRequest {
    pub fn new(model: ImageModel, prompt: &str) -> Self {
        Self {
            model,
            prompt: prompt.to_string(),
            size: GENERATION_SIZE.to_string(),
            count: 1,
            response_format: "b64_json".to_string(),
        }
    }

    /// Request body for the images API, including model-specific extras
    pub fn to_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "model": self.model.as_str(),
            "prompt": self.prompt,
            "size": self.size,
            "n": self.count,
            "response_format": self.response_format,
        });
        for (key, value) in self.model.extra_params() {
            payload[key] = serde_json::json!(value);
        }
        payload
    }
}

/// Status returned by a backend health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Available,
    Unavailable(String),
    NoApiKey,
}

/// Shared cancellation flag.
///
/// Cloned into every worker; once cancelled, no new locale starts and
/// backends stop between attempts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Trait implemented by each image generation backend (OpenAI, Mock)
pub trait ImageBackend: Send + Sync {
    /// Backend name (e.g. "openai", "mock")
    fn name(&self) -> &str;

    /// Check whether the backend can be used
    fn health_check(&self) -> Result<BackendStatus>;

    /// Generate one image. Blocks until the image is decoded or all
    /// attempts have failed.
    fn generate(&self, request: &ImageRequest, cancel: &CancelToken) -> Result<DynamicImage>;
}
