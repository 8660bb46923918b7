//! TOML configuration file support.
//!
//! Instead of passing the same flags for every scan, lab defaults can live in
//! a config file:
//!
//! ```toml
//! # txrm-params.toml
//! [report]
//! alignment_time = 20
//! processing_time = 30
//! start_sample = 1000
//! count = 3
//! ```
//!
//! Command-line flags always take precedence over file values.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use txrm_params::report::{ReportParams, DEFAULT_OPERATOR_TIME};

/// Sample number the table starts from when nothing else is given.
pub const DEFAULT_START_SAMPLE: u64 = 1000;

/// Largest sample range a single table may cover.
pub const MAX_SAMPLE_COUNT: u64 = 10_000;

/// Root configuration structure for txrm-params.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Configuration for the table and inspect commands.
#[derive(Debug, Default, Deserialize)]
pub struct ReportConfig {
    /// Alignment time row value.
    pub alignment_time: Option<i64>,

    /// Processing time row value.
    pub processing_time: Option<i64>,

    /// Explicit sample IDs, in output order.
    pub samples: Option<Vec<String>>,

    /// First sample number of a consecutive range.
    pub start_sample: Option<u64>,

    /// Number of samples in the range.
    pub count: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

/// Settings given on the command line; `None`/empty means "not given".
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub samples: Vec<String>,
    pub start_sample: Option<u64>,
    pub count: Option<u64>,
    pub alignment_time: Option<i64>,
    pub processing_time: Option<i64>,
}

/// Fully resolved settings for one report.
#[derive(Debug, PartialEq)]
pub struct ReportSettings {
    pub samples: Vec<String>,
    pub params: ReportParams,
}

impl ReportSettings {
    /// Merge command-line values over file values over defaults.
    ///
    /// Explicit sample lists beat ranges; a command-line range beats a file
    /// sample list.
    ///
    /// # Errors
    /// Fails if the range is longer than [`MAX_SAMPLE_COUNT`] or runs past
    /// the largest sample number.
    pub fn resolve(cli: CliOverrides, file: Option<&Config>) -> Result<Self> {
        let file = file.map(|c| &c.report);

        let alignment_time = cli
            .alignment_time
            .or(file.and_then(|f| f.alignment_time))
            .unwrap_or(DEFAULT_OPERATOR_TIME);
        let processing_time = cli
            .processing_time
            .or(file.and_then(|f| f.processing_time))
            .unwrap_or(DEFAULT_OPERATOR_TIME);

        let cli_range = cli.start_sample.is_some() || cli.count.is_some();
        let samples = if !cli.samples.is_empty() {
            cli.samples
        } else if !cli_range && file.and_then(|f| f.samples.as_ref()).is_some() {
            file.and_then(|f| f.samples.clone()).unwrap_or_default()
        } else {
            let start = cli
                .start_sample
                .or(file.and_then(|f| f.start_sample))
                .unwrap_or(DEFAULT_START_SAMPLE);
            let count = cli.count.or(file.and_then(|f| f.count)).unwrap_or(1);
            if count > MAX_SAMPLE_COUNT {
                bail!(
                    "Sample count {} exceeds the maximum of {}",
                    count,
                    MAX_SAMPLE_COUNT
                );
            }
            if count > 0 && start.checked_add(count - 1).is_none() {
                bail!("Sample range starting at {} overflows", start);
            }
            sample_range(start, count)
        };

        Ok(Self {
            samples,
            params: ReportParams::new(alignment_time, processing_time),
        })
    }
}

/// `count` consecutive sample numbers starting at `start`.
pub fn sample_range(start: u64, count: u64) -> Vec<String> {
    (0..count)
        .filter_map(|offset| start.checked_add(offset))
        .map(|n| n.to_string())
        .collect()
}
