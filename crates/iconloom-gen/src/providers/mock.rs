//! Mock backend for testing
//!
//! Produces a solid-color square without any network calls. The color is
//! derived from the prompt, so different locales get visibly different
//! placeholder icons and the same prompt always gives the same image.

use crate::provider::{BackendStatus, CancelToken, ImageBackend, ImageRequest, GENERATION_SIZE};
use iconloom_core::{IconloomError, Result};
use image::{DynamicImage, ImageBuffer, Rgba};

/// A backend that generates placeholder icons locally
#[derive(Debug, Clone)]
pub struct MockBackend {
    size: u32,
    fail_markers: Vec<String>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        let size = GENERATION_SIZE
            .split('x')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1024);
        Self {
            size,
            fail_markers: Vec::new(),
        }
    }

    /// Generate images of `size` x `size` instead of the full generation size
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Fail every request whose prompt contains `marker`
    pub fn failing_when_prompt_contains(mut self, marker: &str) -> Self {
        self.fail_markers.push(marker.to_string());
        self
    }
}

impl ImageBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn health_check(&self) -> Result<BackendStatus> {
        Ok(BackendStatus::Available)
    }

    fn generate(&self, request: &ImageRequest, cancel: &CancelToken) -> Result<DynamicImage> {
        if cancel.is_cancelled() {
            return Err(IconloomError::Cancelled);
        }
        if let Some(marker) = self
            .fail_markers
            .iter()
            .find(|m| request.prompt.contains(m.as_str()))
        {
            return Err(IconloomError::BackendFailure(format!(
                "mock backend refused prompt containing '{}'",
                marker
            )));
        }

        let hash_val = request
            .prompt
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        let color = Rgba([
            ((hash_val >> 16) & 0xFF) as u8,
            ((hash_val >> 8) & 0xFF) as u8,
            (hash_val & 0xFF) as u8,
            255,
        ]);
        Ok(DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
            self.size, self.size, color,
        )))
    }
}
