//! CLI command implementations

pub mod generate;
pub mod locales;
pub mod project;
pub mod prompt;

use anyhow::{Context, Result};
use clap::Args;
use iconloom_gen::config::GenerationConfig;
use iconloom_gen::{ColorPair, IconStyle, IconloomConfig, ImageModel, PromptSpec};

/// Prompt options shared by every generating command
#[derive(Args, Debug, Clone, Default)]
pub struct SpecArgs {
    /// App name (localized names from the project take precedence)
    #[arg(long)]
    pub name: Option<String>,

    /// Gradient colors, top then bottom (e.g. "#1E3A8A" "#60A5FA")
    #[arg(long, num_args = 2, value_names = ["TOP", "BOTTOM"])]
    pub colors: Option<Vec<String>>,

    /// Icon style: minimalist, modern, elegant, professional, playful, bold
    #[arg(long)]
    pub style: Option<IconStyle>,

    /// Image model: dall-e-3, dall-e-2, gpt-image-1
    #[arg(long)]
    pub model: Option<ImageModel>,

    /// Visual elements to include
    #[arg(long, num_args = 1..)]
    pub elements: Vec<String>,

    /// Target audience
    #[arg(long)]
    pub audience: Option<String>,

    /// App purpose (overrides the localized description)
    #[arg(long)]
    pub description: Option<String>,

    /// Cultural style hint (overrides the built-in table)
    #[arg(long)]
    pub cultural_style: Option<String>,

    /// Additional free-form requirements
    #[arg(long)]
    pub prompt: Option<String>,
}

impl SpecArgs {
    /// Merge flags over configured generation defaults
    pub fn to_spec(&self, generation: &GenerationConfig) -> Result<PromptSpec> {
        let colors = match self.colors.as_deref() {
            Some([top, bottom]) => ColorPair::parse(top, bottom)?,
            _ => generation.color_pair()?,
        };

        let mut spec = PromptSpec::new(self.name.as_deref().unwrap_or_default());
        spec.colors = colors;
        spec.style = self.style.unwrap_or(generation.style);
        spec.model = self.model.unwrap_or(generation.model);
        spec.icon_elements = self.elements.clone();
        spec.target_audience = self.audience.clone();
        spec.app_description = self.description.clone();
        spec.cultural_style = self.cultural_style.clone();
        spec.additional_prompt = self.prompt.clone();
        spec.locale = generation.default_locale.clone();
        Ok(spec)
    }
}

pub fn load_config() -> Result<IconloomConfig> {
    IconloomConfig::load().context("Failed to load iconloom config")
}
