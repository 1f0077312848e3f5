//! # Scan aggregation
//!
//! A scan is a list of samples that differ in one configuration parameter (the
//! solenoid field) and carry a detector label. After every sample has been reduced
//! to a [`SampleStatistic`], [`aggregate`] groups the samples by detector, picks one
//! number per sample with an [`Estimator`], and sorts each group by scan parameter.
//!
//! Samples without a value for the chosen estimator (a failed Gaussian fit when the
//! estimator is [`Estimator::GaussSigma`]) are left out of that curve only.
//!
//! ```
//! use resoscan::reducer::SampleStatistic;
//! use resoscan::scan::{aggregate_with, ScanSample};
//! # fn stat(rms: f64) -> SampleStatistic {
//! #     SampleStatistic { entries: 1, integral: 1.0, mean: 0.0, rms, rms_error: 0.0,
//! #         quantile_resolution: 0.0, quantiles: [0.0; 4], gauss: None, fit_failure: None }
//! # }
//! let samples = vec![
//!     ScanSample::new("b", 3.0, "IDEA", stat(0.05)),
//!     ScanSample::new("a", 1.0, "IDEA", stat(0.02)),
//! ];
//! let curves = aggregate_with(&samples, |s| Some(s.rms));
//! assert_eq!(curves["IDEA"].scan_parameters(), vec![1.0, 3.0]);
//! ```

mod report;
mod runner;
mod source;


use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reducer::SampleStatistic;

pub use report::{SampleWarning, ScanReport, WarningKind};
pub use runner::{SampleSpec, ScanRunner};
pub use source::{ArtifactSource, HistogramSource, LoadFailure};

/// Scalar pulled out of a [`SampleStatistic`] for plotting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    /// Distribution mean
    Mean,
    /// Distribution RMS
    Rms,
    /// Central 68% half-width in percent
    QuantileResolution,
    /// Fitted Gaussian center
    GaussMean,
    /// Fitted Gaussian width
    GaussSigma,
}

impl Estimator {
    /// Value for one sample, `None` when the estimator is unavailable for it.
    pub fn value(self, stat: &SampleStatistic) -> Option<f64> {
        match self {
            Estimator::Mean => Some(stat.mean),
            Estimator::Rms => Some(stat.rms),
            Estimator::QuantileResolution => Some(stat.quantile_resolution),
            Estimator::GaussMean => stat.gauss_mean(),
            Estimator::GaussSigma => stat.gauss_sigma(),
        }
    }

    /// Column-friendly name
    pub fn name(self) -> &'static str {
        match self {
            Estimator::Mean => "mean",
            Estimator::Rms => "rms",
            Estimator::QuantileResolution => "quantile_resolution",
            Estimator::GaussMean => "gauss_mean",
            Estimator::GaussSigma => "gauss_sigma",
        }
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One reduced sample of a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSample {
    /// Sample identifier
    pub sample: String,
    /// Scanned parameter value (field in tesla)
    pub scan_parameter: f64,
    /// Detector label the sample belongs to
    pub detector: String,
    /// Reduced statistic
    pub statistic: SampleStatistic,
}

impl ScanSample {
    /// Create a scan sample
    pub fn new(
        sample: impl Into<String>,
        scan_parameter: f64,
        detector: impl Into<String>,
        statistic: SampleStatistic,
    ) -> Self {
        Self {
            sample: sample.into(),
            scan_parameter,
            detector: detector.into(),
            statistic,
        }
    }
}

/// One point of a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPoint {
    /// Scanned parameter value
    pub scan_parameter: f64,
    /// Estimator value
    pub value: f64,
    /// Detector label
    pub detector: String,
}

/// Points of one detector, ascending in scan parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCurve {
    /// Detector label
    pub detector: String,
    /// Sorted points
    pub points: Vec<ScanPoint>,
}

impl ScanCurve {
    /// Build a curve, sorting the points by scan parameter.
    ///
    /// The sort is stable, so points sharing a parameter keep their input order.
    pub fn new(detector: impl Into<String>, mut points: Vec<ScanPoint>) -> Self {
        points.sort_by(|a, b| a.scan_parameter.total_cmp(&b.scan_parameter));
        Self {
            detector: detector.into(),
            points,
        }
    }

    /// Scan parameters in curve order
    pub fn scan_parameters(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.scan_parameter).collect()
    }

    /// Values in curve order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// `(scan_parameter, value)` pairs
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.scan_parameter, p.value)).collect()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Curves keyed by detector label
pub type ScanCurves = BTreeMap<String, ScanCurve>;

/// Group samples by detector and build one sorted curve per detector.
pub fn aggregate(samples: &[ScanSample], estimator: Estimator) -> ScanCurves {
    aggregate_with(samples, |stat| estimator.value(stat))
}

/// [`aggregate`] with an arbitrary estimator; `None` drops the sample from the curve.
pub fn aggregate_with<F>(samples: &[ScanSample], estimator: F) -> ScanCurves
where
    F: Fn(&SampleStatistic) -> Option<f64>,
{
    let mut grouped: BTreeMap<String, Vec<ScanPoint>> = BTreeMap::new();
    for sample in samples {
        let Some(value) = estimator(&sample.statistic) else {
            continue;
        };
        grouped
            .entry(sample.detector.clone())
            .or_default()
            .push(ScanPoint {
                scan_parameter: sample.scan_parameter,
                value,
                detector: sample.detector.clone(),
            });
    }

    grouped
        .into_iter()
        .map(|(detector, points)| {
            let curve = ScanCurve::new(detector.clone(), points);
            (detector, curve)
        })
        .collect()
}
