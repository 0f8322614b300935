//! Filter job configuration loading and validation.

use anyhow::{Context, Result};
use lib_types::units::Seconds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level filter job configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Job name/description.
    pub name: String,

    /// Column file with one channel per column.
    pub input: PathBuf,

    /// Sample interval of the input, in seconds.
    #[serde(default = "default_sample_interval")]
    pub sample_interval: f64,

    /// FIR kernel.
    pub kernel: KernelConfig,

    /// Processing parameters.
    #[serde(default)]
    pub processing: ProcessingParams,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_sample_interval() -> f64 { 1.0 }

impl FilterConfig {
    pub fn dt(&self) -> Seconds {
        Seconds(self.sample_interval)
    }
}

/// Kernel coefficients, given inline or as a column file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Inline coefficients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coefficients: Vec<f64>,

    /// Column file; the first column is the kernel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Sample precision used for filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Single,
    #[default]
    Double,
}

/// Block processing parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessingParams {
    /// Samples per block.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    #[serde(default)]
    pub precision: Precision,

    /// Let all channels share one transform (master/slave engines).
    #[serde(default = "default_true")]
    pub share_transform: bool,

    /// Filter channels on a thread pool with independent engines.
    #[serde(default)]
    pub parallel: bool,

    /// Drain the kernel tail after the last block.
    #[serde(default = "default_true")]
    pub flush: bool,
}

fn default_block_size() -> usize { 1024 }

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            precision: Precision::default(),
            share_transform: true,
            parallel: false,
            flush: true,
        }
    }
}

/// Output configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write filtered waveforms.
    #[serde(default = "default_true")]
    pub waveforms: bool,

    /// Write the run summary.
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            waveforms: true,
            summary: true,
        }
    }
}

fn default_true() -> bool { true }

/// Load configuration from a file.
pub fn load_config(path: &Path) -> Result<FilterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let is_json = path.extension().map_or(false, |e| e == "json");
    let config = parse_config(&content, is_json)?;

    validate_config(&config)?;
    validate_paths(&config)?;

    Ok(config)
}

/// Parse configuration text as JSON or TOML.
pub fn parse_config(content: &str, is_json: bool) -> Result<FilterConfig> {
    let config = if is_json {
        serde_json::from_str(content).with_context(|| "Failed to parse config as JSON")?
    } else {
        toml::from_str(content).with_context(|| "Failed to parse config as TOML")?
    };
    Ok(config)
}

/// Validate configuration values.
pub fn validate_config(config: &FilterConfig) -> Result<()> {
    let params = &config.processing;

    if params.block_size == 0 {
        anyhow::bail!("block_size must be positive");
    }

    // Engines sharing a transform are bound to one thread
    if params.parallel && params.share_transform {
        anyhow::bail!(
            "parallel = true requires share_transform = false \
             (shared transforms cannot cross threads)"
        );
    }

    if !(config.sample_interval > 0.0 && config.sample_interval.is_finite()) {
        anyhow::bail!("sample_interval must be positive, got {}", config.sample_interval);
    }

    match (&config.kernel.file, config.kernel.coefficients.is_empty()) {
        (Some(_), false) => anyhow::bail!("kernel: give either coefficients or file, not both"),
        (None, true) => anyhow::bail!("kernel is empty"),
        _ => {}
    }

    Ok(())
}

/// Check that referenced files exist.
fn validate_paths(config: &FilterConfig) -> Result<()> {
    if !config.input.exists() {
        anyhow::bail!("Input file not found: {:?}", config.input);
    }

    if let Some(ref file) = config.kernel.file {
        if !file.exists() {
            anyhow::bail!("Kernel file not found: {:?}", file);
        }
    }

    Ok(())
}
