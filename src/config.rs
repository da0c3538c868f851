//! Generator configuration.
//!
//! Every setting has a default that reproduces the stock placeholder set:
//! power-of-two and round-number sizes, one JPEG format, the shared
//! `background.png`. A `placeholders.toml` in the output root (or a file
//! passed with `--config`) overrides any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "placeholders"
//! base_url = "https://greggman.github.io/placeholder-generator"
//! index_file = "index.html"
//!
//! [[sizes]]                 # each axis is crossed with itself
//! name = "power-of-two"
//! values = [1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048]
//!
//! [[sizes]]
//! name = "round-numbers"
//! ranges = [
//!     { start = 10, end = 250, step = 10 },
//!     { start = 300, end = 1000, step = 100 },
//! ]
//!
//! [[formats]]
//! extension = "jpg"
//! encoder = ["image/jpeg", 0.9]
//!
//! [render]
//! background = "background.png"
//! fonts = []
//! color_hash = "char-sum"
//!
//! [processing]
//! parallel = false
//! max_processes = 4         # omit for auto = CPU cores
//! ```
//!
//! ## Merging
//!
//! User values are merged over the stock defaults table by table. Arrays
//! (`sizes`, `formats`, `fonts`) are replaced whole, not appended to.
//! Unknown keys are rejected to catch typos early.

use crate::index::{DEFAULT_BASE_URL, DEFAULT_INDEX_FILE, DEFAULT_TITLE};
use crate::jobs::{FormatSpec, JobBuilder, job_count};
use crate::sizes::{Axis, AxisSegment, SizeSpace, SizeStrategy};
use crate::style::{ColorHash, StyleDeriver};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the output root.
pub const CONFIG_FILENAME: &str = "placeholders.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `placeholders.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Page title and heading of the index.
    pub title: String,
    /// Mirror URL prefixed to every image path in the index.
    pub base_url: String,
    /// Index page path, relative to the output root.
    pub index_file: String,
    /// Size strategies, enumerated in order.
    pub sizes: Vec<SizeStrategyConfig>,
    /// Output formats; every size is rendered once per format.
    pub formats: Vec<FormatSpec>,
    pub render: RenderConfig,
    pub processing: ProcessingConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            sizes: vec![
                SizeStrategyConfig {
                    name: "power-of-two".to_string(),
                    values: (0..=11).map(|e| 1u32 << e).collect(),
                    ranges: Vec::new(),
                },
                SizeStrategyConfig {
                    name: "round-numbers".to_string(),
                    values: Vec::new(),
                    ranges: vec![
                        RangeConfig {
                            start: 10,
                            end: 250,
                            step: 10,
                        },
                        RangeConfig {
                            start: 300,
                            end: 1000,
                            step: 100,
                        },
                    ],
                },
            ],
            formats: vec![FormatSpec::jpeg(0.9)],
            render: RenderConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::Validation("sizes must not be empty".into()));
        }
        for strategy in &self.sizes {
            strategy.validate()?;
        }
        if self.formats.is_empty() {
            return Err(ConfigError::Validation("formats must not be empty".into()));
        }
        for format in &self.formats {
            let ext = &format.extension;
            if ext.is_empty() || ext.contains(['/', '\\', '.']) {
                return Err(ConfigError::Validation(format!(
                    "formats.extension {ext:?} must be a bare extension like \"jpg\""
                )));
            }
        }
        if job_count(&self.size_space(), self.formats.len()).is_none() {
            return Err(ConfigError::Validation(
                "sizes x formats yields more jobs than can be counted".into(),
            ));
        }
        if self.index_file.is_empty() {
            return Err(ConfigError::Validation(
                "index_file must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The size space described by `sizes`.
    pub fn size_space(&self) -> SizeSpace {
        SizeSpace::new(self.sizes.iter().map(SizeStrategyConfig::to_strategy).collect())
    }

    /// A job builder for this config. Relative background paths resolve
    /// against `root`.
    pub fn job_builder(&self, root: &Path) -> JobBuilder {
        JobBuilder::new(
            self.formats.clone(),
            root.join(&self.render.background),
            StyleDeriver::new(self.render.color_hash),
        )
    }

    /// Configured font files, relative paths resolved against `root`.
    pub fn font_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.render.fonts.iter().map(|f| root.join(f)).collect()
    }
}

/// One size strategy: an axis crossed with itself.
///
/// The axis is `values` followed by each of `ranges`, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeStrategyConfig {
    pub name: String,
    #[serde(default)]
    pub values: Vec<u32>,
    #[serde(default)]
    pub ranges: Vec<RangeConfig>,
}

impl SizeStrategyConfig {
    pub fn to_strategy(&self) -> SizeStrategy {
        let mut segments = Vec::new();
        if !self.values.is_empty() {
            segments.push(AxisSegment::Values(self.values.clone()));
        }
        segments.extend(self.ranges.iter().map(|r| AxisSegment::Range {
            start: r.start,
            end: r.end,
            step: r.step,
        }));
        SizeStrategy::new(self.name.clone(), Axis::new(segments))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.name;
        if self.values.is_empty() && self.ranges.is_empty() {
            return Err(ConfigError::Validation(format!(
                "sizes.{name}: needs values or ranges"
            )));
        }
        if self.values.contains(&0) {
            return Err(ConfigError::Validation(format!(
                "sizes.{name}: values must be positive"
            )));
        }
        for r in &self.ranges {
            if r.step == 0 {
                return Err(ConfigError::Validation(format!(
                    "sizes.{name}: range step must be positive"
                )));
            }
            if r.start == 0 {
                return Err(ConfigError::Validation(format!(
                    "sizes.{name}: range start must be positive"
                )));
            }
            if r.start > r.end {
                return Err(ConfigError::Validation(format!(
                    "sizes.{name}: range start {} is after end {}",
                    r.start, r.end
                )));
            }
        }
        Ok(())
    }
}

/// Inclusive `start..=end` by `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeConfig {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

/// Renderer inputs shared by every job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Background image stretched over every placeholder.
    pub background: PathBuf,
    /// Font files for the label. Empty means probe common system fonts.
    pub fonts: Vec<PathBuf>,
    /// How filenames are hashed into label hues.
    pub color_hash: ColorHash,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("background.png"),
            fonts: Vec::new(),
            color_hash: ColorHash::default(),
        }
    }
}

/// Batch scheduling settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Render jobs on a thread pool instead of one at a time.
    pub parallel: bool,
    /// Maximum number of parallel workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(GeneratorConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GeneratorConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GeneratorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `placeholders.toml` from `root`, falling back to defaults when absent.
pub fn load_config(root: &Path) -> Result<GeneratorConfig, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    let overlay = if path.exists() {
        Some(load_raw_config(&path)?)
    } else {
        None
    };
    resolve_config(overlay)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    resolve_config(Some(load_raw_config(path)?))
}

/// Returns a fully-commented stock `placeholders.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Placeholder Generator Configuration
# ===================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Arrays (sizes, formats, fonts) replace the defaults entirely.
# Unknown keys will cause an error.

# Heading and <title> of the index page.
title = "placeholders"

# Mirror URL shown next to every image in the index page.
base_url = "https://greggman.github.io/placeholder-generator"

# Index page path, relative to the output root.
index_file = "index.html"

# ---------------------------------------------------------------------------
# Sizes
# ---------------------------------------------------------------------------
# Each strategy builds one axis (values first, then each range) and renders
# every width x height combination from it. Strategies run in order and are
# not deduplicated against each other.

[[sizes]]
name = "power-of-two"
values = [1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048]

[[sizes]]
name = "round-numbers"
ranges = [
    { start = 10, end = 250, step = 10 },
    { start = 300, end = 1000, step = 100 },
]

# ---------------------------------------------------------------------------
# Formats
# ---------------------------------------------------------------------------
# Every size is rendered once per format into images/{w}x{h}.{extension}.
# encoder = [MIME type, quality 0-1]. Supported MIME types:
#   image/png (also the default when encoder is empty), image/jpeg,
#   image/webp (lossless), image/avif

[[formats]]
extension = "jpg"
encoder = ["image/jpeg", 0.9]

# [[formats]]
# extension = "png"
# encoder = []

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Background image stretched over every placeholder (relative to output root).
background = "background.png"

# Font files for the dimension label. The first one is used.
# Empty = probe common system fonts; without one the label is skipped.
fonts = []

# Label hue source: "char-sum" (sum of all filename characters) or
# "first-char" (first character only, every image the same hue).
color_hash = "char-sum"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Render on a thread pool. Index order is unaffected.
parallel = false

# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
