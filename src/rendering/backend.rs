//! Renderer trait and shared types.
//!
//! The [`Renderer`] trait is the seam between job orchestration and pixels:
//! it takes a [`RenderSettings`] record and returns the encoded image bytes.
//! Nothing upstream knows how drawing or encoding happens.
//!
//! The production implementation is
//! [`RasterRenderer`](super::raster::RasterRenderer). Tests use the recording
//! `MockRenderer` in this module.

use crate::jobs::{FormatSpec, RenderJob};
use crate::style::StyleParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load background {}: {message}", .path.display())]
    Background { path: PathBuf, message: String },
    #[error("Failed to load font {}: {message}", .path.display())]
    Font { path: PathBuf, message: String },
    #[error("Unsupported encoder arguments: {0}")]
    UnsupportedFormat(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),
    #[error("Renderer is closed")]
    Closed,
}

/// Everything a renderer needs to produce one image.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings<'a> {
    /// Image stretched over the whole canvas.
    pub background: &'a Path,
    /// Font files to draw with. May be empty.
    pub fonts: &'a [PathBuf],
    /// Labels drawn in order, later ones on top.
    pub text: &'a [StyleParams],
    pub width: u32,
    pub height: u32,
    pub format: &'a FormatSpec,
}

impl<'a> RenderSettings<'a> {
    /// Settings for a job: its background, format, size, and single label.
    pub fn for_job(job: &'a RenderJob, fonts: &'a [PathBuf]) -> Self {
        Self {
            background: &job.background,
            fonts,
            text: std::slice::from_ref(&job.style),
            width: job.width,
            height: job.height,
            format: &job.format,
        }
    }
}

/// Trait for image renderers.
///
/// `render` may block for as long as drawing and encoding take; the batch
/// waits on each call. `close` releases whatever the renderer holds (decoded
/// backgrounds, parsed fonts) and is called exactly once, after the last job.
/// Renderers must be `Sync` so a batch can fan jobs out across threads.
pub trait Renderer: Sync {
    /// Draw and encode one image.
    fn render(&self, settings: &RenderSettings<'_>) -> Result<Vec<u8>, RenderError>;

    /// Release resources. Rendering after close fails with [`RenderError::Closed`].
    fn close(&self) -> Result<(), RenderError>;
}
