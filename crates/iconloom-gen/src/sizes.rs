//! The canonical iOS app icon size table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Device class an icon variant targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Idiom {
    #[serde(rename = "iphone")]
    Phone,
    #[serde(rename = "ipad")]
    Tablet,
    #[serde(rename = "ios-marketing")]
    Marketing,
}

impl Idiom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Idiom::Phone => "iphone",
            Idiom::Tablet => "ipad",
            Idiom::Marketing => "ios-marketing",
        }
    }
}

impl fmt::Display for Idiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One required file of an icon bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSlot {
    pub filename: &'static str,
    pub idiom: Idiom,
    /// Logical size in thousandths of a point (83.5pt is 83_500)
    pub points_milli: u32,
    pub scale: u32,
}

impl IconSlot {
    const fn new(filename: &'static str, idiom: Idiom, points_milli: u32, scale: u32) -> Self {
        Self {
            filename,
            idiom,
            points_milli,
            scale,
        }
    }

    /// Edge length in pixels
    pub fn pixels(&self) -> u32 {
        self.points_milli * self.scale / 1000
    }

    /// Logical size as written in the manifest, e.g. `20x20` or `83.5x83.5`
    pub fn nominal_size(&self) -> String {
        let whole = self.points_milli / 1000;
        let frac = self.points_milli % 1000;
        let points = if frac == 0 {
            whole.to_string()
        } else {
            let digits = format!("{:03}", frac);
            format!("{}.{}", whole, digits.trim_end_matches('0'))
        };
        format!("{}x{}", points, points)
    }

    /// Scale label, e.g. `2x`
    pub fn scale_label(&self) -> String {
        format!("{}x", self.scale)
    }
}

/// The twelve files every bundle must contain
pub const CANONICAL_SIZES: [IconSlot; 12] = [
    IconSlot::new("AppIcon-20@2x.png", Idiom::Phone, 20_000, 2),
    IconSlot::new("AppIcon-20@3x.png", Idiom::Phone, 20_000, 3),
    IconSlot::new("AppIcon-29@2x.png", Idiom::Phone, 29_000, 2),
    IconSlot::new("AppIcon-29@3x.png", Idiom::Phone, 29_000, 3),
    IconSlot::new("AppIcon-40@2x.png", Idiom::Phone, 40_000, 2),
    IconSlot::new("AppIcon-40@3x.png", Idiom::Phone, 40_000, 3),
    IconSlot::new("AppIcon-60@2x.png", Idiom::Phone, 60_000, 2),
    IconSlot::new("AppIcon-60@3x.png", Idiom::Phone, 60_000, 3),
    IconSlot::new("AppIcon-76.png", Idiom::Tablet, 76_000, 1),
    IconSlot::new("AppIcon-76@2x.png", Idiom::Tablet, 76_000, 2),
    IconSlot::new("AppIcon-83.5@2x.png", Idiom::Tablet, 83_500, 2),
    IconSlot::new("AppIcon-1024.png", Idiom::Marketing, 1_024_000, 1),
];

/// Scale factor encoded in an icon filename: `@2x`, `@3x`, or implicitly 1
pub fn scale_from_filename(filename: &str) -> u32 {
    let stem = filename.strip_suffix(".png").unwrap_or(filename);
    stem.rsplit_once('@')
        .and_then(|(_, suffix)| suffix.strip_suffix('x'))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(1)
}
