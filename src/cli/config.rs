//! TOML configuration files for the `scan` and `analyze` commands.
//!
//! A scan is described by an ordered list of samples plus reduction and output
//! settings:
//!
//! ```toml
//! # scan.toml
//! [[sample]]
//! name = "IDEA_2T"
//! path = "IDEA_2T.hist.parquet"
//! scan_parameter = 2.0
//! detector = "IDEA"
//!
//! [reduce]
//! histogram = "muons_res_pt"
//! rebin = 10
//! fit_window = "quantile"
//! estimators = ["gauss_sigma", "quantile_resolution"]
//!
//! [output]
//! directory = "scan_output"
//! format = "csv"
//! ```
//!
//! Relative sample paths and the output directory are resolved against the
//! directory of the config file.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use resoscan::analysis::{resolution_key, AnalysisConfig};
use resoscan::fit::FitOptions;
use resoscan::reducer::{FitWindow, ReduceConfig};
use resoscan::resolution::Quantity;
use resoscan::scan::{Estimator, SampleSpec};

/// Root configuration structure for scan.toml files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Samples in scan order.
    #[serde(default, rename = "sample")]
    pub samples: Vec<SampleSpec>,

    /// Reduction settings.
    #[serde(default)]
    pub reduce: ReduceSection,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[reduce]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceSection {
    /// Histogram key reduced for every sample.
    pub histogram: String,

    /// Rebin factor applied before reduction.
    pub rebin: usize,

    /// Gaussian fit range.
    pub fit_window: FitWindow,

    /// Curves written to the output directory.
    pub estimators: Vec<Estimator>,

    /// Fit iteration controls.
    pub fit: FitOptions,
}

impl Default for ReduceSection {
    fn default() -> Self {
        Self {
            histogram: resolution_key(Quantity::Pt),
            rebin: 1,
            fit_window: FitWindow::Quantile,
            estimators: vec![Estimator::GaussSigma, Estimator::QuantileResolution],
            fit: FitOptions::default(),
        }
    }
}

impl ReduceSection {
    /// Settings handed to the reducer.
    pub fn reduce_config(&self) -> ReduceConfig {
        ReduceConfig {
            rebin: self.rebin,
            fit_window: self.fit_window,
            fit: self.fit,
        }
    }
}

/// Curve file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `detector,scan_parameter,value` rows
    #[default]
    Csv,
    /// Detector to points mapping
    Json,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// `[output]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory receiving the report and curve files.
    pub directory: PathBuf,

    /// Curve file format.
    pub format: OutputFormat,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("scan_output"),
            format: OutputFormat::Csv,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file, resolving sample paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize TOML configuration")
    }

    /// Make relative sample paths and the output directory relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for sample in &mut self.samples {
            if sample.path.is_relative() {
                sample.path = base.join(&sample.path);
            }
        }
        if self.output.directory.is_relative() {
            self.output.directory = base.join(&self.output.directory);
        }
    }

    /// Reject configurations that cannot produce a scan.
    pub fn validate(&self) -> Result<()> {
        if self.samples.is_empty() {
            anyhow::bail!("Scan configuration lists no [[sample]] entries");
        }
        if self.reduce.rebin == 0 {
            anyhow::bail!("reduce.rebin must be at least 1");
        }
        if self.reduce.estimators.is_empty() {
            anyhow::bail!("reduce.estimators must name at least one estimator");
        }
        for (i, sample) in self.samples.iter().enumerate() {
            if self.samples[..i].iter().any(|s| s.name == sample.name) {
                anyhow::bail!("Duplicate sample name: {}", sample.name);
            }
        }
        Ok(())
    }
}

/// Load an analysis configuration from a TOML file.
///
/// Every field is optional; see [`AnalysisConfig`] for the defaults.
pub fn load_analysis_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: AnalysisConfig =
        toml::from_str(&content).context("Failed to parse TOML configuration")?;

    for (key, binning) in &config.binning {
        binning
            .histogram(key)
            .with_context(|| format!("Invalid binning for {}", key))?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_config() {
        let toml = r#"
            [[sample]]
            name = "IDEA_2T"
            path = "IDEA_2T.hist.parquet"
            scan_parameter = 2.0
            detector = "IDEA"

            [[sample]]
            name = "CLD_2T"
            path = "/data/CLD_2T.hist.parquet"
            scan_parameter = 2.0
            detector = "CLD"

            [reduce]
            histogram = "muons_res_invpt"
            rebin = 10
            fit_window = "full_range"
            estimators = ["rms"]

            [output]
            directory = "out"
            format = "json"
        "#;

        let mut config = ScanConfig::from_str(toml).unwrap();
        assert_eq!(config.samples.len(), 2);
        assert_eq!(config.samples[0].name, "IDEA_2T");
        assert_eq!(config.samples[1].detector, "CLD");
        assert_eq!(config.reduce.histogram, "muons_res_invpt");
        assert_eq!(config.reduce.reduce_config().rebin, 10);
        assert_eq!(config.reduce.fit_window, FitWindow::FullRange);
        assert_eq!(config.reduce.estimators, vec![Estimator::Rms]);
        assert_eq!(config.output.format, OutputFormat::Json);
        config.validate().unwrap();

        config.resolve_paths(Path::new("/scans"));
        assert_eq!(config.samples[0].path, PathBuf::from("/scans/IDEA_2T.hist.parquet"));
        assert_eq!(config.samples[1].path, PathBuf::from("/data/CLD_2T.hist.parquet"));
        assert_eq!(config.output.directory, PathBuf::from("/scans/out"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            [[sample]]
            name = "a"
            path = "a.hist.parquet"
            scan_parameter = 1.0
            detector = "IDEA"
        "#;

        let config = ScanConfig::from_str(toml).unwrap();
        assert_eq!(config.reduce, ReduceSection::default());
        assert_eq!(config.reduce.histogram, "muons_res_pt");
        assert_eq!(config.output, OutputSection::default());
    }

    #[test]
    fn test_validation() {
        assert!(ScanConfig::from_str("").unwrap().validate().is_err());

        let mut config = ScanConfig {
            samples: vec![
                SampleSpec::new("a", "a.parquet", 1.0, "IDEA"),
                SampleSpec::new("a", "b.parquet", 2.0, "IDEA"),
            ],
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());

        config.samples.pop();
        config.reduce.rebin = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ScanConfig {
            samples: vec![SampleSpec::new("CLD_3T", "CLD_3T.hist.parquet", 3.0, "CLD")],
            ..ScanConfig::default()
        };
        let parsed = ScanConfig::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.samples, config.samples);
        assert_eq!(parsed.reduce, config.reduce);
    }

    #[test]
    fn test_load_analysis_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        std::fs::write(&path, "quantities = [\"inv_pt\"]\nhadronic = false\n").unwrap();

        let config = load_analysis_config(&path).unwrap();
        assert_eq!(config.quantities, vec![Quantity::InvPt]);
        assert!(!config.hadronic);

        std::fs::write(&path, "[binning.qq_res]\nn_bins = 0\nlo = 0.0\nhi = 1.0\n").unwrap();
        assert!(load_analysis_config(&path).is_err());
    }
}
