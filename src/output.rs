//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Generating 1233 images
//! [   1/1233] generating images/1x1.jpg
//! [   2/1233] generating images/1x2.jpg
//! ...
//! Index: index.html (1233 entries)
//! Wrote 1233 images (48.2 MB) → ./index.html
//! ```
//!
//! ## Plan
//!
//! ```text
//! power-of-two: 12 values → 144 sizes
//! round-numbers: 33 values → 1089 sizes
//! Formats: jpg
//! 1233 sizes × 1 format = 1233 jobs
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::batch::BatchEvent;
use crate::jobs::{FormatSpec, IMAGE_DIR, job_count};
use crate::pipeline::GenerateResult;
use crate::sizes::SizeSpace;
use std::path::Path;

/// Human-readable byte count, binary units.
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format a 1-based position, right-aligned to the width of `total`.
fn progress_prefix(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("[{:>width$}/{total}]", index + 1)
}

// ============================================================================
// Generate
// ============================================================================

/// Format a single batch event as display lines.
///
/// With `verbose` off, per-job lines are dropped and only the batch header
/// and index line remain.
pub fn format_event(event: &BatchEvent, verbose: bool) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => {
            vec![format!("Generating {total} images")]
        }
        BatchEvent::JobStarted {
            index,
            total,
            filename,
        } if verbose => {
            vec![format!(
                "{} generating {filename}",
                progress_prefix(*index, *total)
            )]
        }
        BatchEvent::JobStarted { .. } | BatchEvent::JobWritten { .. } => Vec::new(),
        BatchEvent::IndexWritten { path, entries } => {
            vec![format!("Index: {} ({entries} entries)", path.display())]
        }
    }
}

/// Summary shown after a successful run.
pub fn format_summary(result: &GenerateResult) -> Vec<String> {
    let bytes: usize = result.artifacts.iter().map(|a| a.bytes).sum();
    let noun = if result.artifacts.len() == 1 {
        "image"
    } else {
        "images"
    };
    vec![format!(
        "Wrote {} {noun} ({}) \u{2192} {}",
        result.artifacts.len(),
        format_bytes(bytes),
        result.index_path.display()
    )]
}

pub fn print_summary(result: &GenerateResult) {
    for line in format_summary(result) {
        println!("{}", line);
    }
}

/// Warning printed when no font could be found for the labels.
pub fn format_missing_font_warning() -> Vec<String> {
    vec![
        "warning: no label font found; images will have no dimension text".to_string(),
        "    Set [render] fonts = [\"path/to/Font-Bold.ttf\"] in placeholders.toml".to_string(),
    ]
}

pub fn print_missing_font_warning() {
    for line in format_missing_font_warning() {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Format the job plan: per-strategy size counts, formats, and the total.
pub fn format_plan(space: &SizeSpace, formats: &[FormatSpec], root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for strategy in space.strategies() {
        lines.push(format!(
            "{}: {} values \u{2192} {} sizes",
            strategy.name,
            strategy.axis.len(),
            strategy.len()
        ));
    }

    let extensions: Vec<&str> = formats.iter().map(|f| f.extension.as_str()).collect();
    lines.push(format!("Formats: {}", extensions.join(", ")));

    let format_noun = if formats.len() == 1 { "format" } else { "formats" };
    let sizes = match space.checked_len() {
        Some(n) => n.to_string(),
        None => "too many".to_string(),
    };
    let jobs = match job_count(space, formats.len()) {
        Some(n) => n.to_string(),
        None => "too many".to_string(),
    };
    lines.push(format!(
        "{sizes} sizes \u{00d7} {} {format_noun} = {jobs} jobs",
        formats.len(),
    ));
    lines.push(format!("Output: {}", root.join(IMAGE_DIR).display()));
    lines
}

pub fn print_plan(space: &SizeSpace, formats: &[FormatSpec], root: &Path) {
    for line in format_plan(space, formats, root) {
        println!("{}", line);
    }
}
