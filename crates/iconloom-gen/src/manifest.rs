//! `Contents.json` for an `.appiconset`
//!
//! The manifest is a projection of the canonical size table and is never
//! edited by hand.

use crate::sizes::{scale_from_filename, IconSlot, Idiom, CANONICAL_SIZES};
use iconloom_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MANIFEST_FILENAME: &str = "Contents.json";
pub const MANIFEST_AUTHOR: &str = "xcode";
pub const MANIFEST_VERSION: u32 = 1;

/// One image entry of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestImage {
    pub filename: String,
    pub idiom: Idiom,
    pub scale: String,
    pub size: String,
}

/// Authoring metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    pub author: String,
    pub version: u32,
}

/// The full manifest of an icon bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub images: Vec<ManifestImage>,
    pub info: ManifestInfo,
}

impl AssetManifest {
    /// Manifest for the canonical table
    pub fn canonical() -> Self {
        build_manifest(&CANONICAL_SIZES)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `Contents.json` into `bundle_dir`
    pub fn save(&self, bundle_dir: &Path) -> Result<()> {
        std::fs::write(bundle_dir.join(MANIFEST_FILENAME), self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Project a size table onto manifest entries
pub fn build_manifest(slots: &[IconSlot]) -> AssetManifest {
    let images = slots
        .iter()
        .map(|slot| ManifestImage {
            filename: slot.filename.to_string(),
            idiom: slot.idiom,
            scale: format!("{}x", scale_from_filename(slot.filename)),
            size: slot.nominal_size(),
        })
        .collect();

    AssetManifest {
        images,
        info: ManifestInfo {
            author: MANIFEST_AUTHOR.to_string(),
            version: MANIFEST_VERSION,
        },
    }
}

/// Build the manifest for `slots` and write it into `bundle_dir`
pub fn write_manifest(slots: &[IconSlot], bundle_dir: &Path) -> Result<AssetManifest> {
    let manifest = build_manifest(slots);
    manifest.save(bundle_dir)?;
    Ok(manifest)
}
