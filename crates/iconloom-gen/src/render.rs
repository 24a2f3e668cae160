//! Icon bundle rendering
//!
//! `render_icons` resamples a source image into every canonical size and
//! encodes each as PNG in memory. `publish_bundle` writes the result next to
//! its manifest and preview in a staging directory and moves it into place
//! only once every file has been written, so a failed render never leaves a
//! half-populated `.appiconset` behind.

use crate::manifest::{build_manifest, AssetManifest, MANIFEST_FILENAME};
use crate::sizes::IconSlot;
use iconloom_core::{ContentHash, IconloomError, Result};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where a bundle for one locale is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleTarget {
    pub output_dir: PathBuf,
    /// File stem shared by the bundle directory and the preview, e.g. `AppIcon-fr`
    pub name: String,
}

impl BundleTarget {
    /// `<prefix>` for the default locale, `<prefix>-<locale>` otherwise
    pub fn for_locale(output_dir: &Path, prefix: &str, locale: &str, default_locale: &str) -> Self {
        let name = if locale == default_locale {
            prefix.to_string()
        } else {
            format!("{}-{}", prefix, locale)
        };
        Self {
            output_dir: output_dir.to_path_buf(),
            name,
        }
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.output_dir.join(format!("{}.appiconset", self.name))
    }

    pub fn preview_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_preview.png", self.name))
    }
}

/// One resized icon, PNG-encoded
#[derive(Debug, Clone)]
pub struct EncodedIcon {
    pub slot: IconSlot,
    pub png: Vec<u8>,
}

/// In-memory output of a render
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub icons: Vec<EncodedIcon>,
    /// The source at its own resolution
    pub preview: Vec<u8>,
    pub source_size: (u32, u32),
}

/// A file written into a published bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFile {
    pub filename: String,
    pub pixels: u32,
    pub content_hash: String,
}

/// A published bundle on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBundle {
    pub bundle_dir: PathBuf,
    pub preview_path: PathBuf,
    pub files: Vec<RenderedFile>,
    #[serde(skip)]
    pub manifest: AssetManifest,
}

/// Resample `image` to every slot with Lanczos3 and encode as PNG
pub fn render_icons(image: &DynamicImage, slots: &[IconSlot]) -> Result<RenderOutput> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(IconloomError::RenderFailure(
            "source image has no pixels".to_string(),
        ));
    }
    if width != height {
        warn!("Source image is {}x{}, icons will be stretched to square", width, height);
    }

    let rgba = image.to_rgba8();
    let mut icons = Vec::with_capacity(slots.len());
    for slot in slots {
        let px = slot.pixels();
        let resized = image::imageops::resize(&rgba, px, px, FilterType::Lanczos3);
        let png = encode_png(&resized).map_err(|e| {
            IconloomError::RenderFailure(format!("{}: {}", slot.filename, e))
        })?;
        debug!("Rendered {} ({}x{})", slot.filename, px, px);
        icons.push(EncodedIcon { slot: *slot, png });
    }

    Ok(RenderOutput {
        icons,
        preview: encode_png(&rgba)?,
        source_size: (width, height),
    })
}

/// Write a rendered bundle and its preview, replacing any previous ones.
///
/// Files go to a hidden staging directory inside `target.output_dir` first.
/// Nothing is visible at the final paths unless all of them were written.
pub fn publish_bundle(
    output: &RenderOutput,
    slots: &[IconSlot],
    target: &BundleTarget,
) -> Result<RenderedBundle> {
    std::fs::create_dir_all(&target.output_dir)?;
    let staging = target.output_dir.join(format!(
        ".{}.staging-{}",
        target.name,
        uuid::Uuid::new_v4()
    ));

    let result = stage_and_swap(output, slots, target, &staging);
    if staging.exists() {
        if let Err(e) = std::fs::remove_dir_all(&staging) {
            warn!("Could not remove staging directory {}: {}", staging.display(), e);
        }
    }
    let bundle = result.map_err(|e| match e {
        IconloomError::RenderFailure(_) => e,
        other => IconloomError::RenderFailure(format!("{}: {}", target.name, other)),
    })?;

    info!(
        "Published {} ({} icons)",
        bundle.bundle_dir.display(),
        bundle.files.len()
    );
    Ok(bundle)
}

/// Render and publish in one step
pub fn render_bundle(
    image: &DynamicImage,
    slots: &[IconSlot],
    target: &BundleTarget,
) -> Result<RenderedBundle> {
    let output = render_icons(image, slots)?;
    publish_bundle(&output, slots, target)
}

fn stage_and_swap(
    output: &RenderOutput,
    slots: &[IconSlot],
    target: &BundleTarget,
    staging: &Path,
) -> Result<RenderedBundle> {
    let staged_bundle = staging.join("bundle.appiconset");
    let staged_preview = staging.join("preview.png");
    std::fs::create_dir_all(&staged_bundle)?;

    let mut files = Vec::with_capacity(output.icons.len());
    for icon in &output.icons {
        std::fs::write(staged_bundle.join(icon.slot.filename), &icon.png)?;
        files.push(RenderedFile {
            filename: icon.slot.filename.to_string(),
            pixels: icon.slot.pixels(),
            content_hash: ContentHash::from_bytes(&icon.png).to_prefixed_hex(),
        });
    }
    let manifest = build_manifest(slots);
    std::fs::write(staged_bundle.join(MANIFEST_FILENAME), manifest.to_json()?)?;
    std::fs::write(&staged_preview, &output.preview)?;

    let bundle_dir = target.bundle_dir();
    let preview_path = target.preview_path();
    if preview_path.is_dir() {
        return Err(IconloomError::RenderFailure(format!(
            "{}: preview path {} is a directory",
            target.name,
            preview_path.display()
        )));
    }

    // preview first; rolled back if the bundle swap fails
    let previous_preview = staging.join("previous_preview.png");
    let had_preview = swap_into_place(&staged_preview, &preview_path, &previous_preview)?;
    let previous_bundle = staging.join("previous.appiconset");
    if let Err(e) = swap_into_place(&staged_bundle, &bundle_dir, &previous_bundle) {
        std::fs::remove_file(&preview_path).ok();
        if had_preview {
            std::fs::rename(&previous_preview, &preview_path).ok();
        }
        return Err(e);
    }

    Ok(RenderedBundle {
        bundle_dir,
        preview_path,
        files,
        manifest,
    })
}

/// Move `staged` to `dest`, parking any old `dest` at `backup`.
///
/// The old `dest` is restored if the move fails. Returns whether there was
/// an old `dest`.
fn swap_into_place(staged: &Path, dest: &Path, backup: &Path) -> Result<bool> {
    if !dest.exists() {
        std::fs::rename(staged, dest)?;
        return Ok(false);
    }

    std::fs::rename(dest, backup)?;
    if let Err(e) = std::fs::rename(staged, dest) {
        std::fs::rename(backup, dest).ok();
        return Err(e.into());
    }
    Ok(true)
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Default, PngFilter::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}
