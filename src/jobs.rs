//! Render job construction.
//!
//! A [`RenderJob`] is the complete, immutable description of one image to
//! produce: size, output format, destination filename, label style, and the
//! shared background. The [`JobBuilder`] crosses the size space with the
//! configured format list (sizes outer, formats inner), so adding a format
//! multiplies the job count and changes nothing else.
//!
//! Jobs never depend on each other. Their `index` records generation order,
//! which is the order the index page lists them in.

use crate::sizes::{Dimensions, SizeSpace};
use crate::style::{StyleDeriver, StyleParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory (relative to the output root) that receives every image.
pub const IMAGE_DIR: &str = "images";

/// Output path of an image, relative to the output root.
///
/// ```
/// assert_eq!(placeholder_gen::jobs::build_filename(10, 20, "jpg"), "images/10x20.jpg");
/// ```
pub fn build_filename(width: u32, height: u32, extension: &str) -> String {
    format!("{IMAGE_DIR}/{width}x{height}.{extension}")
}

/// `|sizes| × formats`, or `None` when the product overflows `usize`.
pub fn job_count(space: &SizeSpace, formats: usize) -> Option<usize> {
    space.checked_len()?.checked_mul(formats)
}

/// One encoder parameter: a MIME type, a quality factor, etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncoderArg {
    Text(String),
    Number(f64),
}

/// An output encoding applied uniformly across all sizes.
///
/// `encoder` is interpreted by the renderer, not here: a bad MIME type fails
/// when the first job using it is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSpec {
    pub extension: String,
    #[serde(default)]
    pub encoder: Vec<EncoderArg>,
}

impl FormatSpec {
    /// JPEG with a 0–1 quality factor.
    pub fn jpeg(quality: f64) -> Self {
        Self {
            extension: "jpg".to_string(),
            encoder: vec![
                EncoderArg::Text("image/jpeg".to_string()),
                EncoderArg::Number(quality),
            ],
        }
    }

    /// PNG; empty encoder args select the renderer's default encoding.
    pub fn png() -> Self {
        Self {
            extension: "png".to_string(),
            encoder: Vec::new(),
        }
    }
}

/// A fully specified request to produce one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderJob {
    /// Position in generation order, starting at 0.
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub format: FormatSpec,
    /// Output path relative to the output root (`images/{w}x{h}.{ext}`).
    pub filename: String,
    pub style: StyleParams,
    /// Shared, read-only background image.
    #[serde(skip)]
    pub background: Arc<Path>,
}

impl RenderJob {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Turns sizes into render jobs, one per (size, format).
#[derive(Debug, Clone)]
pub struct JobBuilder {
    formats: Vec<FormatSpec>,
    background: Arc<Path>,
    deriver: StyleDeriver,
}

impl JobBuilder {
    pub fn new(formats: Vec<FormatSpec>, background: PathBuf, deriver: StyleDeriver) -> Self {
        Self {
            formats,
            background: Arc::from(background),
            deriver,
        }
    }

    pub fn background(&self) -> &Path {
        &self.background
    }

    /// Build the job for one size and format.
    pub fn build(&self, index: usize, size: Dimensions, format: &FormatSpec) -> RenderJob {
        let filename = build_filename(size.width, size.height, &format.extension);
        let style = self.deriver.derive(size.width, size.height, &filename);

        RenderJob {
            index,
            width: size.width,
            height: size.height,
            format: format.clone(),
            filename,
            style,
            background: Arc::clone(&self.background),
        }
    }

    /// Lazily build every job for `space`, in generation order.
    pub fn jobs<'a>(&'a self, space: &'a SizeSpace) -> impl Iterator<Item = RenderJob> + 'a {
        space
            .iter()
            .flat_map(move |size| self.formats.iter().map(move |format| (size, format)))
            .enumerate()
            .map(move |(index, (size, format))| self.build(index, size, format))
    }

    /// `|sizes| × |formats|`, without building anything.
    pub fn job_count(&self, space: &SizeSpace) -> Option<usize> {
        job_count(space, self.formats.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizes::{Axis, AxisSegment, SizeStrategy};
    use crate::style::ColorHash;

    fn space(values: Vec<u32>) -> SizeSpace {
        SizeSpace::new(vec![SizeStrategy::new(
            "test",
            Axis::new(vec![AxisSegment::Values(values)]),
        )])
    }

    fn builder(formats: Vec<FormatSpec>) -> JobBuilder {
        JobBuilder::new(
            formats,
            PathBuf::from("background.png"),
            StyleDeriver::default(),
        )
    }

    #[test]
    fn filename_format() {
        assert_eq!(build_filename(10, 20, "jpg"), "images/10x20.jpg");
        assert_eq!(build_filename(2048, 1, "png"), "images/2048x1.png");
    }

    #[test]
    fn jpeg_format_spec() {
        let spec = FormatSpec::jpeg(0.9);
        assert_eq!(spec.extension, "jpg");
        assert_eq!(
            spec.encoder,
            vec![
                EncoderArg::Text("image/jpeg".into()),
                EncoderArg::Number(0.9)
            ]
        );
    }

    #[test]
    fn job_count_is_sizes_times_formats() {
        let space = space(vec![1, 2, 4]);
        let single = builder(vec![FormatSpec::jpeg(0.9)]);
        assert_eq!(single.jobs(&space).count(), 9);
        assert_eq!(single.job_count(&space), Some(9));

        let double = builder(vec![FormatSpec::jpeg(0.9), FormatSpec::png()]);
        assert_eq!(double.jobs(&space).count(), 18);
        assert_eq!(double.job_count(&space), Some(18));
    }

    #[test]
    fn job_count_overflow_is_none() {
        let full = AxisSegment::Range {
            start: 1,
            end: u32::MAX,
            step: 1,
        };
        // (2^32 - 1)^2 still fits in 64 bits; doubling it does not.
        let space = SizeSpace::new(vec![SizeStrategy::new("full", Axis::new(vec![full]))]);
        assert_eq!(job_count(&space, 0), Some(0));
        assert_eq!(job_count(&space, 2), None);
        assert_eq!(
            builder(vec![FormatSpec::jpeg(0.9), FormatSpec::png()]).job_count(&space),
            None
        );
    }

    #[test]
    fn no_formats_means_no_jobs() {
        let space = space(vec![1, 2]);
        assert_eq!(builder(Vec::new()).jobs(&space).count(), 0);
    }

    #[test]
    fn sizes_outer_formats_inner() {
        let space = space(vec![1, 2]);
        let builder = builder(vec![FormatSpec::jpeg(0.9), FormatSpec::png()]);
        let names: Vec<String> = builder.jobs(&space).map(|j| j.filename).collect();
        assert_eq!(
            names,
            vec![
                "images/1x1.jpg",
                "images/1x1.png",
                "images/1x2.jpg",
                "images/1x2.png",
                "images/2x1.jpg",
                "images/2x1.png",
                "images/2x2.jpg",
                "images/2x2.png",
            ]
        );
    }

    #[test]
    fn indices_follow_generation_order() {
        let space = space(vec![10, 20]);
        let builder = builder(vec![FormatSpec::jpeg(0.9)]);
        let indices: Vec<usize> = builder.jobs(&space).map(|j| j.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn job_carries_derived_style() {
        let builder = builder(vec![FormatSpec::jpeg(0.9)]);
        let job = builder.build(0, Dimensions::new(100, 50), &FormatSpec::jpeg(0.9));
        let expected = StyleDeriver::new(ColorHash::CharSum).derive(100, 50, "images/100x50.jpg");
        assert_eq!(job.style, expected);
        assert_eq!(job.dimensions(), Dimensions::new(100, 50));
    }

    #[test]
    fn jobs_share_one_background() {
        let space = space(vec![1, 2]);
        let builder = builder(vec![FormatSpec::jpeg(0.9)]);
        let jobs: Vec<RenderJob> = builder.jobs(&space).collect();
        assert!(jobs.iter().all(|j| Arc::ptr_eq(&j.background, &jobs[0].background)));
        assert_eq!(&*jobs[0].background, Path::new("background.png"));
    }

    #[test]
    fn building_twice_is_identical() {
        let space = space(vec![8, 16]);
        let builder = builder(vec![FormatSpec::jpeg(0.9)]);
        let first: Vec<RenderJob> = builder.jobs(&space).collect();
        let second: Vec<RenderJob> = builder.jobs(&space).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn format_spec_parses_from_toml() {
        let spec: FormatSpec = toml::from_str(
            r#"
extension = "jpg"
encoder = ["image/jpeg", 0.75]
"#,
        )
        .unwrap();
        assert_eq!(spec, FormatSpec::jpeg(0.75));

        let bare: FormatSpec = toml::from_str(r#"extension = "png""#).unwrap();
        assert_eq!(bare, FormatSpec::png());
    }
}
