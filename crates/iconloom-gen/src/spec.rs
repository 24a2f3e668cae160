//! Generation request parameters and the closed selector types they use
//!
//! Style, model and colors are validated once, when parsed from user input,
//! so nothing deeper in the pipeline has to guess at a fallback.

use iconloom_core::{IconloomError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual style of the icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Minimalist,
    Modern,
    Elegant,
    Professional,
    Playful,
    Bold,
}

impl IconStyle {
    pub const ALL: [IconStyle; 6] = [
        IconStyle::Minimalist,
        IconStyle::Modern,
        IconStyle::Elegant,
        IconStyle::Professional,
        IconStyle::Playful,
        IconStyle::Bold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IconStyle::Minimalist => "minimalist",
            IconStyle::Modern => "modern",
            IconStyle::Elegant => "elegant",
            IconStyle::Professional => "professional",
            IconStyle::Playful => "playful",
            IconStyle::Bold => "bold",
        }
    }
}

impl fmt::Display for IconStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconStyle {
    type Err = IconloomError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        IconStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = IconStyle::ALL.iter().map(|s| s.as_str()).collect();
                IconloomError::invalid("style", s, format!("expected one of {}", allowed.join(", ")))
            })
    }
}

/// Image model offered by the generation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImageModel {
    #[default]
    #[serde(rename = "dall-e-3")]
    DallE3,
    #[serde(rename = "dall-e-2")]
    DallE2,
    #[serde(rename = "gpt-image-1")]
    GptImage1,
}

impl ImageModel {
    pub const ALL: [ImageModel; 3] = [ImageModel::DallE3, ImageModel::DallE2, ImageModel::GptImage1];

    /// Identifier sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::DallE3 => "dall-e-3",
            ImageModel::DallE2 => "dall-e-2",
            ImageModel::GptImage1 => "gpt-image-1",
        }
    }

    /// Model-specific optional request parameters
    pub fn extra_params(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            ImageModel::DallE3 => vec![("quality", "standard"), ("style", "natural")],
            ImageModel::GptImage1 => vec![("quality", "high")],
            ImageModel::DallE2 => vec![],
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageModel {
    type Err = IconloomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dall-e-3" | "dalle-3" => Ok(ImageModel::DallE3),
            "dall-e-2" | "dalle-2" => Ok(ImageModel::DallE2),
            "gpt-image-1" => Ok(ImageModel::GptImage1),
            _ => Err(IconloomError::invalid(
                "model",
                s,
                "expected one of dall-e-3, dall-e-2, gpt-image-1",
            )),
        }
    }
}

/// A `#RRGGBB` color, normalised to upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = IconloomError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IconloomError::invalid("color", s, "expected #RGB or #RRGGBB"));
        }
        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(IconloomError::invalid("color", s, "expected #RGB or #RRGGBB")),
        };
        Ok(HexColor(format!("#{}", expanded.to_ascii_uppercase())))
    }
}

impl TryFrom<String> for HexColor {
    type Error = IconloomError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top and bottom colors of the background gradient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub top: HexColor,
    pub bottom: HexColor,
}

impl ColorPair {
    pub fn parse(top: &str, bottom: &str) -> Result<Self> {
        Ok(Self {
            top: top.parse()?,
            bottom: bottom.parse()?,
        })
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            top: HexColor("#1E3A8A".to_string()),
            bottom: HexColor("#60A5FA".to_string()),
        }
    }
}

/// Everything the prompt composer needs for one icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub app_name: String,
    #[serde(default)]
    pub colors: ColorPair,
    #[serde(default)]
    pub style: IconStyle,
    #[serde(default)]
    pub model: ImageModel,
    #[serde(default)]
    pub app_description: Option<String>,
    #[serde(default)]
    pub icon_elements: Vec<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub cultural_style: Option<String>,
    #[serde(default)]
    pub additional_prompt: Option<String>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl PromptSpec {
    /// A spec with default colors, style, model and the `en` locale
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            colors: ColorPair::default(),
            style: IconStyle::default(),
            model: ImageModel::default(),
            app_description: None,
            icon_elements: Vec::new(),
            target_audience: None,
            locale: default_locale(),
            cultural_style: None,
            additional_prompt: None,
        }
    }

    /// Copy of this spec retargeted at another locale and app name
    pub fn for_locale(&self, locale: &str, app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            locale: locale.to_string(),
            ..self.clone()
        }
    }
}
