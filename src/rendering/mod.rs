//! Image rendering in pure Rust, no native libraries.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Background** | `image::open` + `imageops::resize` |
//! | **Label** | `ab_glyph` glyph outlines, shadow + stroke + fill |
//! | **Encode** | `image` codecs: PNG, JPEG, lossless WebP, AVIF |
//!
//! The module is split into:
//! - **Backend**: [`Renderer`] trait, [`RenderSettings`], [`RenderError`]
//! - **Encode**: encoder-argument parsing and output encoding
//! - **Text**: label layout and glyph painting
//! - **Raster**: [`RasterRenderer`], the production implementation

pub mod backend;
pub mod encode;
pub mod raster;
mod text;

pub use backend::{RenderError, RenderSettings, Renderer};
pub use encode::{Encoding, Quality};
pub use raster::{RasterRenderer, find_font_path};
