//! Per-image label styling.
//!
//! Every visual parameter of a placeholder's label is a pure function of its
//! dimensions and output filename, so re-running the generator reproduces the
//! same images byte for byte (given the same renderer).
//!
//! ## Label color
//!
//! The hue comes from the filename, not the numbers: the code points of the
//! filename are summed and mapped onto the color wheel.
//!
//! ```text
//! sum = Σ code points of "images/10x10.jpg"    = 1358
//! hue = ((sum / 255) mod 1) × 360               ≈ 117.18
//! color = hsl(117.18…,100%,35%)
//! ```
//!
//! Anagram filenames (`10x20` / `20x10`) therefore share a color.
//! [`ColorHash::FirstChar`] reproduces the older single-character variant of
//! this hash, which paints every `images/…` file the same hue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Saturation of every label color, in percent.
pub const SATURATION: f64 = 100.0;
/// Lightness of every label color, in percent.
pub const LIGHTNESS: f64 = 35.0;
/// Font size is the image width divided by this.
pub const FONT_SIZE_DIVISOR: f64 = 5.0;
/// Stroke width and shadow offset are the font size divided by this.
pub const STROKE_DIVISOR: f64 = 6.0;
/// Wrap width large enough that single-line labels never wrap.
pub const WRAP_WIDTH: f64 = 100_000.0;
/// Line spacing for multi-line labels. Single-line labels ignore it.
pub const VERTICAL_SPACING: f64 = 100.0;

/// How the filename is reduced to a number before mapping it to a hue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorHash {
    /// Sum of every character's code point.
    #[default]
    CharSum,
    /// Code point of the first character only.
    FirstChar,
}

impl ColorHash {
    pub fn sum(self, filename: &str) -> u64 {
        match self {
            ColorHash::CharSum => filename.chars().map(|c| u64::from(u32::from(c))).sum(),
            ColorHash::FirstChar => filename
                .chars()
                .next()
                .map(|c| u64::from(u32::from(c)))
                .unwrap_or(0),
        }
    }
}

/// A CSS-style HSL color. Saturation and lightness are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HslColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslColor {
    /// Convert to 8-bit sRGB channels.
    pub fn to_rgb(self) -> [u8; 3] {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b)]
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({},{}%,{}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Label color for a filename.
pub fn label_color(filename: &str, hash: ColorHash) -> HslColor {
    let sum = hash.sum(filename) as f64;
    HslColor {
        hue: (sum / 255.0) % 1.0 * 360.0,
        saturation: SATURATION,
        lightness: LIGHTNESS,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Everything the renderer needs to draw one label.
///
/// Lengths are in pixels and kept fractional: a 1px-wide image gets a 0.2px
/// font, exactly as the formula says.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleParams {
    /// Label text, `"{width}x{height}"`.
    pub text: String,
    /// Font descriptor, `"bold {size}px sans-serif"`.
    pub font: String,
    pub font_size: f64,
    pub color: HslColor,
    pub stroke_width: f64,
    pub shadow_offset: (f64, f64),
    pub text_align: TextAlign,
    pub wrap_width: f64,
    /// Anchor point: horizontal center, baseline.
    pub offset: (f64, f64),
    pub vertical_spacing: f64,
}

/// Derives [`StyleParams`] from dimensions and filename.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleDeriver {
    color_hash: ColorHash,
}

impl StyleDeriver {
    pub fn new(color_hash: ColorHash) -> Self {
        Self { color_hash }
    }

    pub fn derive(&self, width: u32, height: u32, filename: &str) -> StyleParams {
        let (w, h) = (f64::from(width), f64::from(height));
        let font_size = w / FONT_SIZE_DIVISOR;
        let stroke = font_size / STROKE_DIVISOR;

        StyleParams {
            text: format!("{width}x{height}"),
            font: format!("bold {font_size}px sans-serif"),
            font_size,
            color: label_color(filename, self.color_hash),
            stroke_width: stroke,
            shadow_offset: (stroke, stroke),
            text_align: TextAlign::Center,
            wrap_width: WRAP_WIDTH,
            offset: (w / 2.0, h / 2.0 + font_size / 2.0),
            vertical_spacing: VERTICAL_SPACING,
        }
    }
}
