//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `ICONLOOM_OPENAI_API_KEY`, then `OPENAI_API_KEY`
//! 2. Project-local: `.iconloom/config.toml`
//! 3. Global: `~/.iconloom/config.toml`

use crate::spec::{ColorPair, IconStyle, ImageModel};
use iconloom_core::{IconloomError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const API_KEY_ENV_VARS: &[(&str, &[&str])] =
    &[("openai", &["ICONLOOM_OPENAI_API_KEY", "OPENAI_API_KEY"])];

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Generation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: ImageModel,
    #[serde(default)]
    pub style: IconStyle,
    #[serde(default = "default_colors")]
    pub colors: [String; 2],
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: ImageModel::default(),
            style: IconStyle::default(),
            colors: default_colors(),
            prefix: default_prefix(),
            default_locale: default_locale(),
            concurrency: default_concurrency(),
        }
    }
}

impl GenerationConfig {
    /// Configured colors, validated
    pub fn color_pair(&self) -> Result<ColorPair> {
        ColorPair::parse(&self.colors[0], &self.colors[1])
    }
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_colors() -> [String; 2] {
    ["#1E3A8A".to_string(), "#60A5FA".to_string()]
}
fn default_prefix() -> String {
    "AppIcon".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_concurrency() -> usize {
    1
}

/// Timeout and retry policy for backend calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}
fn default_max_retries() -> usize {
    3
}
fn default_base_delay_ms() -> u64 {
    500
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IconloomConfigFile {
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct IconloomConfig {
    pub providers: HashMap<String, ProviderConfig>,
    pub generation: GenerationConfig,
    pub retry: RetryConfig,
}

impl IconloomConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = IconloomConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".iconloom/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config);
        Ok(config.into())
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(config.into())
    }

    /// Get API key for a provider
    pub fn api_key(&self, provider_name: &str) -> Option<&str> {
        self.providers
            .get(provider_name)
            .and_then(|p| p.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    /// Get API URL override for a provider
    pub fn api_url(&self, provider_name: &str) -> Option<&str> {
        self.providers
            .get(provider_name)
            .and_then(|p| p.api_url.as_deref())
    }

    /// Check if a provider is enabled
    pub fn is_enabled(&self, provider_name: &str) -> bool {
        self.providers
            .get(provider_name)
            .map(|p| p.enabled)
            .unwrap_or(true)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".iconloom").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<IconloomConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            IconloomError::TomlParseError(format!("{}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut IconloomConfigFile, overlay: IconloomConfigFile) {
        for (name, provider) in overlay.providers {
            let entry = base.providers.entry(name).or_default();
            if provider.api_key.is_some() {
                entry.api_key = provider.api_key;
            }
            if provider.api_url.is_some() {
                entry.api_url = provider.api_url;
            }
            entry.enabled = provider.enabled;
        }

        let defaults = GenerationConfig::default();
        let generation = overlay.generation;
        if generation.provider != defaults.provider {
            base.generation.provider = generation.provider;
        }
        if generation.model != defaults.model {
            base.generation.model = generation.model;
        }
        if generation.style != defaults.style {
            base.generation.style = generation.style;
        }
        if generation.colors != defaults.colors {
            base.generation.colors = generation.colors;
        }
        if generation.prefix != defaults.prefix {
            base.generation.prefix = generation.prefix;
        }
        if generation.default_locale != defaults.default_locale {
            base.generation.default_locale = generation.default_locale;
        }
        if generation.concurrency != defaults.concurrency {
            base.generation.concurrency = generation.concurrency;
        }

        if overlay.retry != RetryConfig::default() {
            base.retry = overlay.retry;
        }
    }

    fn apply_env_overrides(config: &mut IconloomConfigFile) {
        for (provider, vars) in API_KEY_ENV_VARS {
            let key = vars
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
            if let Some(key) = key {
                let entry = config.providers.entry(provider.to_string()).or_default();
                entry.api_key = Some(key);
            }
        }
    }
}

impl From<IconloomConfigFile> for IconloomConfig {
    fn from(file: IconloomConfigFile) -> Self {
        Self {
            providers: file.providers,
            generation: file.generation,
            retry: file.retry,
        }
    }
}
