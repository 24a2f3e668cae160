//! OpenAI images backend
//!
//! Sends one generation request per icon and decodes the base64 PNG in the
//! response. Network errors, timeouts, 429 and 5xx responses are retried
//! with exponential backoff.

use crate::config::{IconloomConfig, RetryConfig};
use crate::provider::{BackendStatus, CancelToken, ImageBackend, ImageRequest};
use base64::Engine;
use iconloom_core::{IconloomError, Result};
use image::DynamicImage;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/images/generations";
const CANCEL_POLL_MS: u64 = 100;

/// OpenAI backend for icon generation
pub struct OpenAiBackend {
    api_key: String,
    api_url: String,
    retry: RetryConfig,
}

impl OpenAiBackend {
    /// Create a new OpenAiBackend from config
    pub fn from_config(config: &IconloomConfig) -> Result<Self> {
        let api_key = config
            .api_key("openai")
            .ok_or_else(|| {
                IconloomError::ConfigurationError(
                    "OpenAI API key not configured. Set ICONLOOM_OPENAI_API_KEY or OPENAI_API_KEY, or add it to .iconloom/config.toml".to_string(),
                )
            })?
            .to_string();

        let api_url = config
            .api_url("openai")
            .unwrap_or(DEFAULT_OPENAI_URL)
            .to_string();

        Ok(Self {
            api_key,
            api_url,
            retry: config.retry,
        })
    }

    fn post_json_with_retry(
        &self,
        payload: &serde_json::Value,
        cancel: &CancelToken,
    ) -> Result<serde_json::Value> {
        let attempts = self.retry.max_retries + 1;
        let agent = build_agent(self.retry.timeout_secs);
        for attempt in 0..attempts {
            if cancel.is_cancelled() {
                return Err(IconloomError::Cancelled);
            }
            let can_retry = attempt + 1 < attempts;

            let response = agent
                .post(&self.api_url)
                .header("Authorization", &format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .send_json(payload);

            match response {
                Ok(mut resp) => {
                    let status = resp.status().as_u16();
                    let body = resp.body_mut().read_to_string().map_err(|e| {
                        IconloomError::BackendFailure(format!(
                            "Failed to read OpenAI response: {}",
                            e
                        ))
                    })?;

                    if (200..300).contains(&status) {
                        return serde_json::from_str(&body).map_err(|e| {
                            IconloomError::BackendFailure(format!(
                                "Failed to parse OpenAI response: {}",
                                e
                            ))
                        });
                    }
                    if can_retry && is_retryable_status(status) {
                        warn!("OpenAI returned {} (attempt {})", status, attempt + 1);
                        sleep_backoff(self.retry.base_delay_ms, attempt, cancel);
                        continue;
                    }
                    return Err(IconloomError::BackendFailure(format!(
                        "OpenAI API returned {}: {}",
                        status,
                        api_error_message(&body)
                    )));
                }
                Err(e) => {
                    if can_retry && is_retryable_error(&e) {
                        warn!("OpenAI request failed (attempt {}): {}", attempt + 1, e);
                        sleep_backoff(self.retry.base_delay_ms, attempt, cancel);
                        continue;
                    }
                    return Err(IconloomError::BackendFailure(format!(
                        "OpenAI API request failed: {}",
                        e
                    )));
                }
            }
        }

        Err(IconloomError::BackendFailure(
            "OpenAI API request failed after retries".to_string(),
        ))
    }
}

/// Non-2xx responses are returned as responses so their error body can be read
fn build_agent(timeout_secs: u64) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build();
    config.into()
}

fn is_retryable_error(e: &ureq::Error) -> bool {
    matches!(
        e,
        ureq::Error::Timeout(_)
            | ureq::Error::Io(_)
            | ureq::Error::ConnectionFailed
            | ureq::Error::HostNotFound
    )
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// `error.message` from an error body, or the raw body when it is not JSON
fn api_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    if let Some(message) = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error details".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

/// Backoff delay before retry number `attempt + 1`
fn backoff_delay(base_delay_ms: u64, attempt: usize) -> Duration {
    let shift = attempt.min(16) as u32;
    Duration::from_millis(base_delay_ms.saturating_mul(1u64 << shift))
}

/// Sleep for the backoff delay, waking early if cancelled
fn sleep_backoff(base_delay_ms: u64, attempt: usize, cancel: &CancelToken) {
    let mut remaining = backoff_delay(base_delay_ms, attempt);
    let slice = Duration::from_millis(CANCEL_POLL_MS);
    while !remaining.is_zero() && !cancel.is_cancelled() {
        let step = remaining.min(slice);
        std::thread::sleep(step);
        remaining -= step;
    }
}

/// Decode the first image of an images API response
pub fn decode_image_response(response: &serde_json::Value) -> Result<DynamicImage> {
    let encoded = response
        .get("data")
        .and_then(|data| data.as_array())
        .and_then(|arr| arr.first())
        .and_then(|img| img.get("b64_json"))
        .and_then(|b| b.as_str())
        .ok_or_else(|| {
            let detail = response
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("no b64_json image in response");
            IconloomError::BackendFailure(format!("Unexpected OpenAI response: {}", detail))
        })?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| IconloomError::BackendFailure(format!("Invalid base64 image: {}", e)))?;

    image::load_from_memory(&bytes)
        .map_err(|e| IconloomError::BackendFailure(format!("Undecodable image payload: {}", e)))
}

impl ImageBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn health_check(&self) -> Result<BackendStatus> {
        if self.api_key.is_empty() {
            return Ok(BackendStatus::NoApiKey);
        }
        Ok(BackendStatus::Available)
    }

    fn generate(&self, request: &ImageRequest, cancel: &CancelToken) -> Result<DynamicImage> {
        let start = std::time::Instant::now();
        let response = self.post_json_with_retry(&request.to_payload(), cancel)?;
        let image = decode_image_response(&response)?;
        debug!(
            "OpenAI returned {}x{} image in {:.1}s",
            image.width(),
            image.height(),
            start.elapsed().as_secs_f64()
        );
        Ok(image)
    }
}
