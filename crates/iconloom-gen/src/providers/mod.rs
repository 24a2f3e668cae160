//! Backend registry
//!
//! Maps backend names to concrete implementations.

pub mod mock;
pub mod openai;

use crate::config::IconloomConfig;
use crate::provider::ImageBackend;
use iconloom_core::{IconloomError, Result};

/// Create a backend by name with configuration.
///
/// Fails with `ConfigurationError` before any work starts when the backend
/// is unknown, disabled, or missing its credentials.
pub fn create_backend(name: &str, config: &IconloomConfig) -> Result<Box<dyn ImageBackend>> {
    if !config.is_enabled(name) {
        return Err(IconloomError::ConfigurationError(format!(
            "Backend '{}' is disabled in config",
            name
        )));
    }
    match name {
        "mock" => Ok(Box::new(mock::MockBackend::new())),
        "openai" => Ok(Box::new(openai::OpenAiBackend::from_config(config)?)),
        _ => Err(IconloomError::ConfigurationError(format!(
            "Unknown backend '{}'. Available: {}",
            name,
            available_backends().join(", ")
        ))),
    }
}

/// List all available backend names
pub fn available_backends() -> Vec<&'static str> {
    vec!["openai", "mock"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_mock_needs_no_key() {
        let backend = create_backend("mock", &IconloomConfig::default()).unwrap();
        assert_eq!(backend.name(), "mock");
    }

    #[test]
    fn test_unknown_backend_is_configuration_error() {
        let err = create_backend("stable-diffusion", &IconloomConfig::default()).err().unwrap();
        assert!(matches!(err, IconloomError::ConfigurationError(_)));
    }

    #[test]
    fn test_disabled_backend_is_rejected() {
        let mut config = IconloomConfig::default();
        config.providers.insert(
            "mock".to_string(),
            ProviderConfig {
                api_key: None,
                api_url: None,
                enabled: false,
            },
        );
        let err = create_backend("mock", &config).err().unwrap();
        assert!(matches!(err, IconloomError::ConfigurationError(_)));
    }
}
