//! End-to-end runs of the public pipeline against a temp output root.
//!
//! Most tests use a counting renderer so they are fast and font-independent;
//! `raster_end_to_end` drives the real renderer once with a tiny size space.

use placeholder_gen::batch::artifact_filenames;
use placeholder_gen::config::{GeneratorConfig, SizeStrategyConfig};
use placeholder_gen::jobs::FormatSpec;
use placeholder_gen::pipeline::{GenerateError, generate};
use placeholder_gen::rendering::{RasterRenderer, RenderError, RenderSettings, Renderer};
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

#[derive(Default)]
struct CountingRenderer {
    rendered: Mutex<Vec<String>>,
    closes: Mutex<usize>,
    fail_on: Option<usize>,
}

impl Renderer for CountingRenderer {
    fn render(&self, settings: &RenderSettings<'_>) -> Result<Vec<u8>, RenderError> {
        let mut rendered = self.rendered.lock().unwrap();
        rendered.push(format!("{}x{}", settings.width, settings.height));
        if self.fail_on == Some(rendered.len()) {
            return Err(RenderError::Encode("boom".into()));
        }
        Ok(vec![0u8; 4])
    }

    fn close(&self) -> Result<(), RenderError> {
        *self.closes.lock().unwrap() += 1;
        Ok(())
    }
}

fn output_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("images")).unwrap();
    tmp
}

fn config_with_values(values: Vec<u32>) -> GeneratorConfig {
    GeneratorConfig {
        sizes: vec![SizeStrategyConfig {
            name: "test".into(),
            values,
            ranges: Vec::new(),
        }],
        ..GeneratorConfig::default()
    }
}

#[test]
fn single_size_produces_one_image_and_one_entry() {
    let root = output_root();
    let renderer = CountingRenderer::default();

    let result = generate(&config_with_values(vec![100]), root.path(), &renderer, None).unwrap();

    assert_eq!(artifact_filenames(&result.artifacts), vec!["images/100x100.jpg"]);
    assert!(root.path().join("images/100x100.jpg").is_file());

    let html = fs::read_to_string(root.path().join("index.html")).unwrap();
    assert_eq!(html.matches("<li>").count(), 1);
    assert!(html.contains(r#"href="images/100x100.jpg""#));
    assert!(html.contains("https://greggman.github.io/placeholder-generator/images/100x100.jpg"));
    assert_eq!(*renderer.closes.lock().unwrap(), 1);
}

#[test]
fn failure_on_second_job_stops_the_run() {
    let root = output_root();
    let renderer = CountingRenderer {
        fail_on: Some(2),
        ..CountingRenderer::default()
    };
    // 1x1, 1x2, 2x1, 2x2
    let result = generate(&config_with_values(vec![1, 2]), root.path(), &renderer, None);

    match result {
        Err(GenerateError::Batch(e)) => assert_eq!(e.completed(), ["images/1x1.jpg"]),
        other => panic!("expected a batch error, got {other:?}"),
    }
    assert_eq!(*renderer.rendered.lock().unwrap(), vec!["1x1", "1x2"]);
    assert!(root.path().join("images/1x1.jpg").exists());
    assert!(!root.path().join("images/2x1.jpg").exists());
    assert!(!root.path().join("index.html").exists());
    assert_eq!(*renderer.closes.lock().unwrap(), 1);
}

#[test]
fn stale_index_is_left_alone_on_failure() {
    let root = output_root();
    fs::write(root.path().join("index.html"), "previous run").unwrap();
    let renderer = CountingRenderer {
        fail_on: Some(1),
        ..CountingRenderer::default()
    };

    let result = generate(&config_with_values(vec![1]), root.path(), &renderer, None);

    assert!(result.is_err());
    assert_eq!(
        fs::read_to_string(root.path().join("index.html")).unwrap(),
        "previous run"
    );
}

#[test]
fn default_config_renders_full_catalogue_in_order() {
    let root = output_root();
    let renderer = CountingRenderer::default();

    let result = generate(&GeneratorConfig::default(), root.path(), &renderer, None).unwrap();

    assert_eq!(result.artifacts.len(), 1233);
    let rendered = renderer.rendered.lock().unwrap();
    assert_eq!(rendered[0], "1x1");
    assert_eq!(rendered[143], "2048x2048");
    assert_eq!(rendered[144], "10x10");
    assert_eq!(rendered[1232], "1000x1000");

    let html = fs::read_to_string(&result.index_path).unwrap();
    assert_eq!(html.matches("<li>").count(), 1233);
}

#[test]
fn raster_end_to_end() {
    let root = output_root();
    let background = image::RgbaImage::from_pixel(8, 8, image::Rgba([40, 90, 160, 255]));
    background.save(root.path().join("background.png")).unwrap();

    let mut config = config_with_values(vec![24, 48]);
    config.formats = vec![FormatSpec::jpeg(0.9), FormatSpec::png()];
    let renderer = RasterRenderer::new();

    let result = generate(&config, root.path(), &renderer, None).unwrap();

    assert_eq!(result.artifacts.len(), 8);
    for artifact in &result.artifacts {
        let decoded = image::open(root.path().join(&artifact.filename)).unwrap();
        let name = artifact.filename.trim_start_matches("images/");
        let dims = name.split('.').next().unwrap();
        assert_eq!(format!("{}x{}", decoded.width(), decoded.height()), dims);
    }
    assert!(root.path().join("index.html").is_file());
}
