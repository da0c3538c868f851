//! # Placeholder Gen
//!
//! Generates a fixed catalogue of placeholder images: one background picture
//! stretched to every size in a configurable size space, each labelled with its
//! own dimensions, plus an HTML index linking them all.
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! SizeSpace  →  JobBuilder  →  BatchRunner  →  IndexWriter
//! (w, h)        RenderJob      Renderer +       index.html
//!                              images/*.ext
//! ```
//!
//! Each stage is a plain value handed to the next:
//!
//! - **Sizes** are enumerated lazily. Each strategy crosses an axis with itself,
//!   strategies are concatenated, duplicates are kept.
//! - **Jobs** are immutable and independent: size, format, filename, label style
//!   and a shared read-only background.
//! - **Batches** render in generation order by default and stop at the first
//!   failure. Nothing is retried.
//! - **The index** is written only after every job succeeded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sizes`] | Lazy size enumeration: step ranges, axes, per-strategy cross products |
//! | [`style`] | Label style derivation: text, font size, geometry, filename-hashed HSL color |
//! | [`jobs`] | `RenderJob` construction, one per (size, format) |
//! | [`rendering`] | `Renderer` trait and the pure-Rust raster implementation |
//! | [`batch`] | Sequential and parallel job execution, artifact persistence |
//! | [`index`] | HTML index page rendered with Maud |
//! | [`pipeline`] | End-to-end orchestration with the close-once guarantee |
//! | [`config`] | `placeholders.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting for progress, plan and summary |
//!
//! # Design Decisions
//!
//! ## Deterministic Output
//!
//! The same configuration always yields the same jobs in the same order, the
//! same filenames and the same label colors. The color is a pure function of
//! the filename, so a `WxH.jpg` and a `WxH.png` get different hues but a given
//! file never changes color between runs.
//!
//! ## Renderer as a Trait
//!
//! The batch only sees [`rendering::Renderer`]. The production
//! [`rendering::RasterRenderer`] draws with `image` and `ab_glyph`; tests use a
//! recording mock. Either way the renderer is closed exactly once per run.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resizing, glyph rasterization and encoding (JPEG, PNG, WebP, AVIF)
//! are all pure Rust. No browser, canvas or system image library is involved.

pub mod batch;
pub mod config;
pub mod index;
pub mod jobs;
pub mod output;
pub mod pipeline;
pub mod rendering;
pub mod sizes;
pub mod style;

#[cfg(test)]
pub(crate) mod test_helpers;
