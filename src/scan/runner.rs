use std::path::PathBuf;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::reducer::{reduce_with, ReduceConfig, ReduceError};

use super::report::{SampleWarning, ScanReport, WarningKind};
use super::source::{HistogramSource, LoadFailure};
use super::ScanSample;

/// One entry of the scan configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    /// Sample identifier
    pub name: String,
    /// Histogram artifact of the sample
    pub path: PathBuf,
    /// Scanned parameter value
    pub scan_parameter: f64,
    /// Detector label
    pub detector: String,
}

impl SampleSpec {
    /// Describe one scan sample
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        scan_parameter: f64,
        detector: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            scan_parameter,
            detector: detector.into(),
        }
    }
}

enum Outcome {
    Reduced(ScanSample, Option<SampleWarning>),
    Skipped(SampleWarning),
}

/// Loads and reduces one histogram per sample, tolerating per-sample failures.
#[derive(Debug, Clone)]
pub struct ScanRunner {
    histogram: String,
    config: ReduceConfig,
}

impl ScanRunner {
    /// Runner reducing histogram `histogram` of every sample
    pub fn new(histogram: impl Into<String>, config: ReduceConfig) -> Self {
        Self {
            histogram: histogram.into(),
            config,
        }
    }

    /// Histogram key read from every sample
    pub fn histogram(&self) -> &str {
        &self.histogram
    }

    /// Reduce every sample.
    ///
    /// Samples are independent and are reduced on the rayon pool when the `parallel`
    /// feature is on. The report lists reduced samples and warnings in input order.
    pub fn run<S: HistogramSource>(&self, source: &S, samples: &[SampleSpec]) -> ScanReport {
        info!(
            "Reducing '{}' for {} samples (rebin {})",
            self.histogram,
            samples.len(),
            self.config.rebin
        );

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Outcome> = samples
            .par_iter()
            .map(|sample| self.process(source, sample))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Outcome> = samples
            .iter()
            .map(|sample| self.process(source, sample))
            .collect();

        let mut report = ScanReport::new(self.histogram.clone());
        for outcome in outcomes {
            match outcome {
                Outcome::Reduced(sample, warning) => {
                    if let Some(warning) = warning {
                        report.add_warning(warning);
                    }
                    report.add_sample(sample);
                }
                Outcome::Skipped(warning) => report.add_warning(warning),
            }
        }

        info!(
            "Reduced {} of {} samples ({} warnings)",
            report.samples.len(),
            samples.len(),
            report.warnings.len()
        );
        report
    }

    fn process<S: HistogramSource>(&self, source: &S, sample: &SampleSpec) -> Outcome {
        let hist = match source.load(sample, &self.histogram) {
            Ok(hist) => hist,
            Err(LoadFailure::Artifact(message)) => {
                return Outcome::Skipped(self.warn(sample, WarningKind::MissingArtifact, message));
            }
            Err(LoadFailure::Histogram) => {
                let message = format!("{} not found in {}", self.histogram, sample.path.display());
                return Outcome::Skipped(self.warn(sample, WarningKind::MissingHistogram, message));
            }
        };

        let statistic = match reduce_with(&hist, &self.config) {
            Ok(statistic) => statistic,
            Err(e @ ReduceError::EmptyDistribution { .. }) => {
                return Outcome::Skipped(self.warn(sample, WarningKind::EmptyDistribution, e.to_string()));
            }
            Err(e) => {
                return Outcome::Skipped(self.warn(sample, WarningKind::InvalidHistogram, e.to_string()));
            }
        };

        let warning = statistic.fit_failure.as_ref().map(|reason| {
            self.warn(sample, WarningKind::FitFailed, format!("Fit failed: {}", reason))
        });

        Outcome::Reduced(
            ScanSample::new(
                sample.name.clone(),
                sample.scan_parameter,
                sample.detector.clone(),
                statistic,
            ),
            warning,
        )
    }

    fn warn(&self, sample: &SampleSpec, kind: WarningKind, message: String) -> SampleWarning {
        let warning = SampleWarning {
            sample: sample.name.clone(),
            histogram: self.histogram.clone(),
            kind,
            message,
        };
        warn!("{}", warning);
        warning
    }
}
