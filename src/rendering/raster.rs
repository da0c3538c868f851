//! Pure Rust raster renderer.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode background | `image::open` (once per path, cached) |
//! | Stretch to size | `image::imageops::resize` with `Triangle` filter |
//! | Label glyphs | `ab_glyph` outlines, see [`text`](super::text) |
//! | Encode | `image` codecs, see [`encode`](super::encode) |
//!
//! ## Fonts
//!
//! The first entry of `fonts` is used. With no fonts configured, a short list
//! of common system sans-serif bold fonts is probed; when none exists the
//! label is skipped and only the background is encoded.

use super::backend::{RenderError, RenderSettings, Renderer};
use super::encode::Encoding;
use super::text::{draw_label, load_font};
use ab_glyph::FontVec;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Probed in order when no font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// The font file a render with `fonts` would draw with, if any.
pub fn find_font_path(fonts: &[PathBuf]) -> Option<PathBuf> {
    if let Some(first) = fonts.first() {
        return Some(first.clone());
    }
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

#[derive(Default)]
struct Cache {
    closed: bool,
    backgrounds: HashMap<PathBuf, Arc<RgbaImage>>,
    fonts: HashMap<Option<PathBuf>, Option<Arc<FontVec>>>,
}

/// Renderer backed by the `image` crate and `ab_glyph`.
///
/// Decoded backgrounds and parsed fonts are cached until [`Renderer::close`].
/// The cache lock is only held while looking things up, so parallel batches
/// draw and encode concurrently.
#[derive(Default)]
pub struct RasterRenderer {
    cache: Mutex<Cache>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Cache>, RenderError> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| RenderError::InvalidSettings("renderer state poisoned".into()))?;
        if cache.closed {
            return Err(RenderError::Closed);
        }
        Ok(cache)
    }

    fn background(&self, path: &Path) -> Result<Arc<RgbaImage>, RenderError> {
        if let Some(image) = self.lock()?.backgrounds.get(path) {
            return Ok(Arc::clone(image));
        }
        let decoded = image::open(path).map_err(|e| RenderError::Background {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let image = Arc::new(decoded.to_rgba8());
        self.lock()?
            .backgrounds
            .insert(path.to_path_buf(), Arc::clone(&image));
        Ok(image)
    }

    fn font(&self, fonts: &[PathBuf]) -> Result<Option<Arc<FontVec>>, RenderError> {
        let key = fonts.first().cloned();
        if let Some(font) = self.lock()?.fonts.get(&key) {
            return Ok(font.clone());
        }
        let font = match find_font_path(fonts) {
            Some(path) => Some(Arc::new(load_font(&path)?)),
            None => None,
        };
        self.lock()?.fonts.insert(key, font.clone());
        Ok(font)
    }
}

impl Renderer for RasterRenderer {
    fn render(&self, settings: &RenderSettings<'_>) -> Result<Vec<u8>, RenderError> {
        if settings.width == 0 || settings.height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "zero-sized canvas {}x{}",
                settings.width, settings.height
            )));
        }
        let encoding = Encoding::from_args(&settings.format.encoder)?;

        let background = self.background(settings.background)?;
        let mut canvas = imageops::resize(
            &*background,
            settings.width,
            settings.height,
            FilterType::Triangle,
        );

        if let Some(font) = self.font(settings.fonts)? {
            for label in settings.text {
                draw_label(&mut canvas, &font, label);
            }
        }

        encoding.encode(canvas)
    }

    fn close(&self) -> Result<(), RenderError> {
        let mut cache = self.lock()?;
        cache.backgrounds.clear();
        cache.fonts.clear();
        cache.closed = true;
        Ok(())
    }
}
