use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::{Deserialize, Serialize};

use super::{aggregate, Estimator, ScanCurves, ScanSample};

/// Why a sample produced a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Artifact missing or unreadable; sample skipped
    MissingArtifact,
    /// Artifact lacks the requested histogram; sample skipped
    MissingHistogram,
    /// Histogram has no content; sample skipped
    EmptyDistribution,
    /// Histogram could not be rebinned; sample skipped
    InvalidHistogram,
    /// Gaussian fit failed; sample kept without Gaussian estimators
    FitFailed,
}

impl WarningKind {
    /// Whether the sample was dropped from the scan
    pub fn skips_sample(self) -> bool {
        !matches!(self, WarningKind::FitFailed)
    }

    fn label(self) -> &'static str {
        match self {
            WarningKind::MissingArtifact => "missing artifact",
            WarningKind::MissingHistogram => "missing histogram",
            WarningKind::EmptyDistribution => "empty distribution",
            WarningKind::InvalidHistogram => "invalid histogram",
            WarningKind::FitFailed => "fit failed",
        }
    }
}

/// Non-fatal problem with one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleWarning {
    /// Sample identifier
    pub sample: String,
    /// Histogram key being reduced
    pub histogram: String,
    /// Category
    pub kind: WarningKind,
    /// Human readable detail
    pub message: String,
}

impl fmt::Display for SampleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} ({})",
            self.sample,
            self.histogram,
            self.kind.label(),
            self.message
        )
    }
}

/// Result of a scan run: the reduced samples plus everything that went wrong
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Histogram key that was reduced
    pub histogram: String,
    /// Reduced samples in input order
    pub samples: Vec<ScanSample>,
    /// Warnings in input order
    pub warnings: Vec<SampleWarning>,
}

impl ScanReport {
    /// Empty report for `histogram`
    pub fn new(histogram: impl Into<String>) -> Self {
        Self {
            histogram: histogram.into(),
            samples: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a reduced sample
    pub fn add_sample(&mut self, sample: ScanSample) {
        self.samples.push(sample);
    }

    /// Record a warning
    pub fn add_warning(&mut self, warning: SampleWarning) {
        self.warnings.push(warning);
    }

    /// Whether any warning was recorded
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of samples dropped from the scan
    pub fn skipped_count(&self) -> usize {
        self.warnings.iter().filter(|w| w.kind.skips_sample()).count()
    }

    /// Number of samples whose Gaussian fit failed
    pub fn fit_failure_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.kind == WarningKind::FitFailed)
            .count()
    }

    /// Curves of the reduced samples for `estimator`
    pub fn curves(&self, estimator: Estimator) -> ScanCurves {
        aggregate(&self.samples, estimator)
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static SKIP: Emoji<'_, '_> = Emoji("✗", "[SKIP]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Resolution Scan Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("======================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Histogram").bold(), self.histogram));

            for sample in &self.samples {
                let summary = sample.statistic.percent();
                let symbol = if sample.statistic.fit_converged() { OK } else { WARN };
                output.push_str(&format!(
                    "[{}] {} {} @ {:.2}: {}\n",
                    symbol,
                    style(&sample.sample).green(),
                    sample.detector,
                    sample.scan_parameter,
                    summary
                ));
            }

            for warning in self.warnings.iter().filter(|w| w.kind.skips_sample()) {
                output.push_str(&format!(
                    "[{}] {} - {}: {}\n",
                    SKIP,
                    style(&warning.sample).red(),
                    style("SKIPPED").red().bold(),
                    warning.message
                ));
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} reduced, {} fit failures, {} skipped\n",
                style("Summary").bold(),
                style(self.samples.len()).green(),
                style(self.fit_failure_count()).yellow(),
                style(self.skipped_count()).red()
            ));

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution Scan Report")?;
        writeln!(f, "======================")?;
        writeln!(f, "Histogram: {}", self.histogram)?;
        writeln!(f)?;

        for sample in &self.samples {
            let symbol = if sample.statistic.fit_converged() { "✓" } else { "⚠" };
            writeln!(
                f,
                "[{}] {} {} @ {:.2}: {}",
                symbol,
                sample.sample,
                sample.detector,
                sample.scan_parameter,
                sample.statistic.percent()
            )?;
        }

        for warning in self.warnings.iter().filter(|w| w.kind.skips_sample()) {
            writeln!(f, "[✗] {} - SKIPPED: {}", warning.sample, warning.message)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} reduced, {} fit failures, {} skipped",
            self.samples.len(),
            self.fit_failure_count(),
            self.skipped_count()
        )
    }
}
