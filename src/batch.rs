//! Batch execution.
//!
//! The [`BatchRunner`] takes jobs in generation order and, for each one:
//!
//! 1. emits [`BatchEvent::JobStarted`] (the per-job progress line),
//! 2. calls the [`Renderer`] and waits for the encoded bytes,
//! 3. writes them to `{root}/{job.filename}`, replacing any existing file,
//! 4. appends an [`Artifact`] to the result list.
//!
//! The first renderer or write error aborts the batch. Nothing is retried and
//! later jobs are never started; files written before the failure stay on
//! disk and their filenames travel with the error
//! ([`BatchError::completed`]). The `images/` directory is expected to exist
//! already.
//!
//! ## Parallel mode
//!
//! [`BatchRunner::run_parallel`] renders on the rayon pool. Jobs are
//! independent, so only the artifact order needs care: results are collected
//! back into generation order before they are returned. A failure still
//! aborts the batch, though jobs already in flight on other threads may finish
//! writing their files. Completion order is not generation order there, so a
//! parallel failure reports no completed filenames.

use crate::jobs::RenderJob;
use crate::rendering::{RenderError, RenderSettings, Renderer};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Rendering {filename} failed: {source}")]
    Render {
        filename: String,
        /// Filenames written before the failure, in generation order.
        completed: Vec<String>,
        #[source]
        source: RenderError,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        completed: Vec<String>,
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    /// Filenames successfully written before the batch stopped.
    pub fn completed(&self) -> &[String] {
        match self {
            BatchError::Render { completed, .. } | BatchError::Write { completed, .. } => completed,
        }
    }

    fn with_completed(mut self, artifacts: &[Artifact]) -> Self {
        let filenames = artifact_filenames(artifacts);
        match &mut self {
            BatchError::Render { completed, .. } | BatchError::Write { completed, .. } => {
                *completed = filenames;
            }
        }
        self
    }
}

/// One image written to disk.
///
/// The payload itself is flushed to disk as soon as it is rendered; only its
/// size is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Generation index of the job that produced it.
    pub index: usize,
    /// Path relative to the output root, as listed in the index page.
    pub filename: String,
    pub bytes: usize,
}

/// Progress reported while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    JobStarted {
        index: usize,
        total: usize,
        filename: String,
    },
    JobWritten {
        index: usize,
        filename: String,
        bytes: usize,
    },
    IndexWritten {
        path: PathBuf,
        entries: usize,
    },
}

/// Runs render jobs against a renderer and persists the results.
pub struct BatchRunner<'a, R: Renderer> {
    renderer: &'a R,
    root: PathBuf,
    fonts: Vec<PathBuf>,
    events: Option<Sender<BatchEvent>>,
}

impl<'a, R: Renderer> BatchRunner<'a, R> {
    /// Runner writing under `root` (the directory that contains `images/`).
    pub fn new(renderer: &'a R, root: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            root: root.into(),
            fonts: Vec::new(),
            events: None,
        }
    }

    /// Font files passed to the renderer with every job.
    pub fn with_fonts(mut self, fonts: Vec<PathBuf>) -> Self {
        self.fonts = fonts;
        self
    }

    /// Report progress on this channel.
    pub fn with_events(mut self, events: Option<Sender<BatchEvent>>) -> Self {
        self.events = events;
        self
    }

    /// Run jobs one at a time, in the order given.
    ///
    /// `total` is only used for progress reporting.
    pub fn run(
        &self,
        jobs: impl IntoIterator<Item = RenderJob>,
        total: usize,
    ) -> Result<Vec<Artifact>, BatchError> {
        self.emit(BatchEvent::Started { total });
        // `total` comes from the config and may be huge; grow as jobs finish.
        let mut artifacts = Vec::new();
        for job in jobs {
            match self.execute(&job, total) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => return Err(e.with_completed(&artifacts)),
            }
        }
        Ok(artifacts)
    }

    /// Run jobs on the rayon pool; artifacts come back in generation order.
    pub fn run_parallel(&self, jobs: Vec<RenderJob>) -> Result<Vec<Artifact>, BatchError> {
        let total = jobs.len();
        self.emit(BatchEvent::Started { total });
        let mut artifacts = jobs
            .par_iter()
            .map(|job| self.execute(job, total))
            .collect::<Result<Vec<_>, _>>()?;
        artifacts.sort_by_key(|a| a.index);
        Ok(artifacts)
    }

    fn execute(&self, job: &RenderJob, total: usize) -> Result<Artifact, BatchError> {
        self.emit(BatchEvent::JobStarted {
            index: job.index,
            total,
            filename: job.filename.clone(),
        });

        let data = self
            .renderer
            .render(&RenderSettings::for_job(job, &self.fonts))
            .map_err(|source| BatchError::Render {
                filename: job.filename.clone(),
                completed: Vec::new(),
                source,
            })?;

        let path = self.root.join(&job.filename);
        std::fs::write(&path, &data).map_err(|source| BatchError::Write {
            path,
            completed: Vec::new(),
            source,
        })?;

        self.emit(BatchEvent::JobWritten {
            index: job.index,
            filename: job.filename.clone(),
            bytes: data.len(),
        });

        Ok(Artifact {
            index: job.index,
            filename: job.filename.clone(),
            bytes: data.len(),
        })
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(tx) = &self.events {
            tx.send(event).ok();
        }
    }
}

/// Filenames of `artifacts`, in the order given.
pub fn artifact_filenames(artifacts: &[Artifact]) -> Vec<String> {
    artifacts.iter().map(|a| a.filename.clone()).collect()
}
