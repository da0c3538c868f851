//! Output encodings.
//!
//! A format's encoder arguments follow the canvas `toBuffer` convention: an
//! optional MIME type, then an optional 0–1 quality factor.
//!
//! | Arguments | Encoding |
//! |---|---|
//! | `[]` or `["image/png"]` | PNG |
//! | `["image/jpeg", q]` | JPEG, quality `q` (default 0.92) |
//! | `["image/webp"]` | lossless WebP |
//! | `["image/avif", q]` | AVIF via rav1e, speed 6 |
//!
//! Arguments are only parsed when a job is rendered, so a typo in the config
//! surfaces on the first job that uses the format.

use super::backend::RenderError;
use crate::jobs::EncoderArg;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// From a 0–1 factor, as canvas encoders take it.
    pub fn from_factor(factor: f64) -> Self {
        Self::new((factor.clamp(0.0, 1.0) * 100.0).round() as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Png,
    Jpeg(Quality),
    WebP,
    Avif(Quality),
}

impl Encoding {
    /// Interpret a format's encoder arguments.
    pub fn from_args(args: &[EncoderArg]) -> Result<Self, RenderError> {
        let (mime, rest) = match args {
            [] => return Ok(Encoding::Png),
            [EncoderArg::Text(mime), rest @ ..] => (mime.as_str(), rest),
            [EncoderArg::Number(n), ..] => {
                return Err(RenderError::UnsupportedFormat(format!(
                    "expected a MIME type first, got {n}"
                )));
            }
        };

        let quality = match rest {
            [] => Quality::default(),
            [EncoderArg::Number(q)] => Quality::from_factor(*q),
            _ => {
                return Err(RenderError::UnsupportedFormat(format!(
                    "{mime} takes at most one numeric quality argument"
                )));
            }
        };

        match mime {
            "image/png" => Ok(Encoding::Png),
            "image/jpeg" => Ok(Encoding::Jpeg(quality)),
            "image/webp" => Ok(Encoding::WebP),
            "image/avif" => Ok(Encoding::Avif(quality)),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Encode a finished canvas.
    pub fn encode(self, canvas: RgbaImage) -> Result<Vec<u8>, RenderError> {
        let (width, height) = canvas.dimensions();
        let mut out = Vec::new();

        let result = match self {
            Encoding::Png => PngEncoder::new(&mut out).write_image(
                canvas.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            Encoding::Jpeg(quality) => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(canvas).into_rgb8();
                JpegEncoder::new_with_quality(&mut out, quality.value() as u8).write_image(
                    rgb.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )
            }
            Encoding::WebP => WebPEncoder::new_lossless(&mut out).write_image(
                canvas.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            Encoding::Avif(quality) => {
                AvifEncoder::new_with_speed_quality(&mut out, 6, quality.value() as u8)
                    .write_image(canvas.as_raw(), width, height, ExtendedColorType::Rgba8)
            }
        };

        result.map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(out)
    }
}
