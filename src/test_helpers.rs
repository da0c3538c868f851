//! Shared test utilities.
//!
//! Output roots are temp directories laid out the way a real checkout is: an
//! empty `images/` next to where the index and background live. Backgrounds
//! are small generated gradients so raster tests never need fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let root = setup_output_root();
//! write_background(&root.path().join("background.png"), 16, 16);
//! ```

use image::{Rgba, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

/// Temp output root with an `images/` directory.
pub fn setup_output_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("images")).unwrap();
    tmp
}

/// Write a `width`x`height` PNG gradient to `path`.
pub fn write_background(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            255,
        ])
    });
    img.save(path).unwrap();
}
