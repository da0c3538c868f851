//! End-to-end generation.
//!
//! ```text
//! config ──► SizeSpace ──► JobBuilder ──► BatchRunner ──► index.html
//!                                             │
//!                                         Renderer
//! ```
//!
//! The renderer is closed exactly once after the batch, whether it succeeded
//! or not. The index is written only when every job succeeded, so a failed
//! run never publishes a page that links to missing images.

use crate::batch::{Artifact, BatchError, BatchEvent, BatchRunner, artifact_filenames};
use crate::config::{GeneratorConfig, effective_threads};
use crate::index::{IndexError, write_index};
use crate::jobs::RenderJob;
use crate::rendering::{RenderError, Renderer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("Failed to close renderer: {0}")]
    Close(#[from] RenderError),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

#[derive(Debug)]
pub struct GenerateResult {
    /// Written images, in generation order.
    pub artifacts: Vec<Artifact>,
    pub index_path: PathBuf,
}

/// Render every job described by `config` into `root`, then write the index.
pub fn generate<R: Renderer>(
    config: &GeneratorConfig,
    root: &Path,
    renderer: &R,
    events: Option<Sender<BatchEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let space = config.size_space();
    let builder = config.job_builder(root);
    let runner = BatchRunner::new(renderer, root)
        .with_fonts(config.font_paths(root))
        .with_events(events.clone());

    let batch = if config.processing.parallel {
        run_parallel(config, &runner, builder.jobs(&space).collect())
    } else {
        runner
            .run(
                builder.jobs(&space),
                builder.job_count(&space).unwrap_or(usize::MAX),
            )
            .map_err(GenerateError::from)
    };
    let closed = renderer.close();

    // A batch failure outranks a close failure.
    let artifacts = batch?;
    closed?;

    let index_path = root.join(&config.index_file);
    let filenames = artifact_filenames(&artifacts);
    write_index(&index_path, &config.title, &config.base_url, &filenames)?;

    if let Some(tx) = &events {
        tx.send(BatchEvent::IndexWritten {
            path: index_path.clone(),
            entries: filenames.len(),
        })
        .ok();
    }

    Ok(GenerateResult {
        artifacts,
        index_path,
    })
}

fn run_parallel<R: Renderer>(
    config: &GeneratorConfig,
    runner: &BatchRunner<'_, R>,
    jobs: Vec<RenderJob>,
) -> Result<Vec<Artifact>, GenerateError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_threads(&config.processing))
        .build()
        .map_err(|e| GenerateError::ThreadPool(e.to_string()))?;
    Ok(pool.install(|| runner.run_parallel(jobs))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SizeStrategyConfig, resolve_config};
    use crate::jobs::FormatSpec;
    use crate::rendering::backend::tests::{MockRenderer, RecordedOp};
    use crate::test_helpers::setup_output_root;
    use std::fs;

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
    fn single_job_end_to_end() {
        let root = setup_output_root();
        let renderer = MockRenderer::new();
        let config = config_with_values(vec![100]);

        let result = generate(&config, root.path(), &renderer, None).unwrap();

        assert_eq!(result.artifacts.len(), 1);
        assert!(root.path().join("images/100x100.jpg").exists());
        assert_eq!(result.index_path, root.path().join("index.html"));

        let html = fs::read_to_string(&result.index_path).unwrap();
        assert_eq!(html.matches("<li>").count(), 1);
        assert!(html.contains(
            r#"<a href="images/100x100.jpg">https://greggman.github.io/placeholder-generator/images/100x100.jpg</a>"#
        ));
    }

    #[test]
    fn renderer_closed_once_after_success() {
        let root = setup_output_root();
        let renderer = MockRenderer::new();
        generate(&config_with_values(vec![1, 2]), root.path(), &renderer, None).unwrap();

        let ops = renderer.get_operations();
        assert_eq!(renderer.close_count(), 1);
        assert_eq!(ops.last(), Some(&RecordedOp::Close));
    }

    #[test]
    fn failure_skips_index_and_still_closes() {
        let root = setup_output_root();
        let renderer = MockRenderer::failing_on(2);

        let result = generate(&config_with_values(vec![1, 2]), root.path(), &renderer, None);

        assert!(matches!(result, Err(GenerateError::Batch(_))));
        assert!(!root.path().join("index.html").exists());
        assert_eq!(renderer.render_count(), 2);
        assert_eq!(renderer.close_count(), 1);
    }

    #[test]
    fn index_lists_sizes_then_formats() {
        let root = setup_output_root();
        let renderer = MockRenderer::new();
        let mut config = config_with_values(vec![1, 2]);
        config.formats = vec![FormatSpec::jpeg(0.9), FormatSpec::png()];

        let result = generate(&config, root.path(), &renderer, None).unwrap();

        assert_eq!(
            artifact_filenames(&result.artifacts),
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
        let html = fs::read_to_string(&result.index_path).unwrap();
        let first = html.find("images/1x1.png").unwrap();
        let second = html.find("images/1x2.jpg").unwrap();
        assert!(first < second);
    }

    #[test]
    fn parallel_mode_matches_sequential_order() {
        let root = setup_output_root();
        let renderer = MockRenderer::new();
        let mut config = config_with_values(vec![1, 2, 4]);
        config.processing.parallel = true;
        config.processing.max_processes = Some(2);

        let result = generate(&config, root.path(), &renderer, None).unwrap();

        let sequential: Vec<String> = config
            .job_builder(root.path())
            .jobs(&config.size_space())
            .map(|j| j.filename)
            .collect();
        assert_eq!(artifact_filenames(&result.artifacts), sequential);
        assert_eq!(renderer.close_count(), 1);
    }

    #[test]
    fn custom_index_file_and_title() {
        let root = setup_output_root();
        let renderer = MockRenderer::new();
        let config = resolve_config(Some(
            toml::from_str(
                r#"
title = "thumbs"
index_file = "list.html"

[[sizes]]
name = "one"
values = [3]
"#,
            )
            .unwrap(),
        ))
        .unwrap();

        let result = generate(&config, root.path(), &renderer, None).unwrap();

        assert_eq!(result.index_path, root.path().join("list.html"));
        let html = fs::read_to_string(&result.index_path).unwrap();
        assert!(html.contains("<title>thumbs</title>"));
    }

    #[test]
    fn events_end_with_index_written() {
        let root = setup_output_root();
        let renderer = MockRenderer::new();
        let (tx, rx) = std::sync::mpsc::channel();

        generate(&config_with_values(vec![5]), root.path(), &renderer, Some(tx)).unwrap();

        let events: Vec<BatchEvent> = rx.try_iter().collect();
        assert_eq!(events.first(), Some(&BatchEvent::Started { total: 1 }));
        assert_eq!(
            events.last(),
            Some(&BatchEvent::IndexWritten {
                path: root.path().join("index.html"),
                entries: 1
            })
        );
    }

    #[test]
    fn background_resolved_against_root() {
        let root = setup_output_root();
        let renderer = MockRenderer::new();
        generate(&config_with_values(vec![1]), root.path(), &renderer, None).unwrap();

        assert!(matches!(
            &renderer.get_operations()[0],
            RecordedOp::Render { background, .. } if *background == root.path().join("background.png")
        ));
    }
}
