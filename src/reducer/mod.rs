//! # Distribution reduction
//!
//! Reduces one resolution histogram to a [`SampleStatistic`]:
//!
//! 1. rebin by the configured factor,
//! 2. mean, RMS and RMS error from the rebinned contents,
//! 3. quantiles at 0.1%, 99.9%, 84% and 16%; the central 68% half-width is the
//!    quantile resolution (in percent), the outer pair bounds a window symmetric
//!    around zero,
//! 4. a Gaussian fit inside that window, seeded with `(integral, mean, rms)`.
//!
//! A failed fit never fails the reduction: the statistic keeps its RMS and quantile
//! estimators and reports the Gaussian ones as unavailable. Only an empty
//! distribution or an invalid rebin factor is an error.

#[cfg(test)]
mod tests;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::fit::{fit_gaussian, FitOptions, GaussianFit, GaussianSeed};
use crate::histogram::{Histogram1D, HistogramError};

/// Cumulative probabilities evaluated on every distribution, in this order.
pub const QUANTILE_PROBABILITIES: [f64; 4] = [0.001, 0.999, 0.84, 0.16];

/// Errors that prevent any statistic from being produced
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReduceError {
    /// The histogram has no content
    #[error("Empty distribution: {name}")]
    EmptyDistribution {
        /// Histogram name
        name: String,
    },

    /// Rebinning failed
    #[error("Histogram error: {0}")]
    Histogram(#[from] HistogramError),
}

/// Range the Gaussian fit is restricted to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitWindow {
    /// `[min(q0.001, -q0.999), max(-q0.001, q0.999)]`
    #[default]
    Quantile,
    /// Whole histogram domain
    FullRange,
}

/// Reduction settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Number of adjacent bins merged before anything else
    pub rebin: usize,
    /// Fit range policy
    pub fit_window: FitWindow,
    /// Fit iteration controls
    pub fit: FitOptions,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            rebin: 1,
            fit_window: FitWindow::Quantile,
            fit: FitOptions::default(),
        }
    }
}

/// Summary of one sample's resolution distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistic {
    /// Number of fills
    pub entries: u64,
    /// Sum of bin contents
    pub integral: f64,
    /// Content-weighted mean
    pub mean: f64,
    /// Content-weighted standard deviation
    pub rms: f64,
    /// `rms / sqrt(2 * entries)`
    pub rms_error: f64,
    /// `50 * (q0.84 - q0.16)`
    pub quantile_resolution: f64,
    /// Quantiles at [`QUANTILE_PROBABILITIES`]
    pub quantiles: [f64; 4],
    /// Gaussian fit, when it converged to a positive width
    pub gauss: Option<GaussianFit>,
    /// Why the fit is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_failure: Option<String>,
}

impl SampleStatistic {
    /// Fitted Gaussian center
    pub fn gauss_mean(&self) -> Option<f64> {
        self.gauss.map(|g| g.mean)
    }

    /// Fitted Gaussian width
    pub fn gauss_sigma(&self) -> Option<f64> {
        self.gauss.map(|g| g.sigma)
    }

    /// Error on the fitted width
    pub fn gauss_sigma_error(&self) -> Option<f64> {
        self.gauss.map(|g| g.sigma_error)
    }

    /// Whether the Gaussian estimators are available
    pub fn fit_converged(&self) -> bool {
        self.gauss.is_some()
    }

    /// RMS and fit width scaled by 100, next to the quantile resolution.
    pub fn percent(&self) -> PercentSummary {
        PercentSummary {
            mean: self.mean,
            rms: self.rms * 100.0,
            rms_error: self.rms_error * 100.0,
            gauss_mean: self.gauss_mean(),
            sigma: self.gauss_sigma().map(|s| s * 100.0),
            sigma_error: self.gauss_sigma_error().map(|s| s * 100.0),
            resolution: self.quantile_resolution,
        }
    }
}

/// Resolution figures in percent for fractional distributions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentSummary {
    /// Distribution mean (unscaled)
    pub mean: f64,
    /// RMS × 100
    pub rms: f64,
    /// RMS error × 100
    pub rms_error: f64,
    /// Fitted center (unscaled)
    pub gauss_mean: Option<f64>,
    /// Fitted width × 100
    pub sigma: Option<f64>,
    /// Fitted width error × 100
    pub sigma_error: Option<f64>,
    /// Quantile resolution (already in percent)
    pub resolution: f64,
}

impl std::fmt::Display for PercentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mean/RMS(x100) = {:.4}/{:.4}, Resolution = {:.4} %",
            self.mean, self.rms, self.resolution
        )?;
        match (self.gauss_mean, self.sigma) {
            (Some(mu), Some(sigma)) => write!(f, ", Gauss mu/sigma(x100) = {:.4}/{:.4}", mu, sigma),
            _ => write!(f, ", Gauss fit unavailable"),
        }
    }
}

/// Reduce `hist` with the given rebin factor and fit window.
pub fn reduce(
    hist: &Histogram1D,
    rebin_factor: usize,
    fit_window: FitWindow,
) -> Result<SampleStatistic, ReduceError> {
    reduce_with(
        hist,
        &ReduceConfig {
            rebin: rebin_factor,
            fit_window,
            ..ReduceConfig::default()
        },
    )
}

/// Reduce `hist` with a full configuration.
pub fn reduce_with(hist: &Histogram1D, config: &ReduceConfig) -> Result<SampleStatistic, ReduceError> {
    let hist = hist.rebin(config.rebin)?;
    let empty = || ReduceError::EmptyDistribution {
        name: hist.name().to_string(),
    };

    let integral = hist.integral();
    let mean = hist.mean().ok_or_else(empty)?;
    let rms = hist.rms().ok_or_else(empty)?;
    let rms_error = hist.rms_error().unwrap_or(0.0);
    let q = hist.quantiles(&QUANTILE_PROBABILITIES).ok_or_else(empty)?;
    let quantiles = [q[0], q[1], q[2], q[3]];

    let quantile_resolution = 50.0 * (quantiles[2] - quantiles[3]);
    let window = match config.fit_window {
        FitWindow::Quantile => (
            quantiles[0].min(-quantiles[1]),
            (-quantiles[0]).max(quantiles[1]),
        ),
        FitWindow::FullRange => (hist.lo(), hist.hi()),
    };

    let seed = GaussianSeed {
        amplitude: integral,
        mean,
        sigma: rms,
    };
    let (gauss, fit_failure) = match fit_gaussian(&hist, window, seed, &config.fit) {
        Ok(fit) => (Some(fit), None),
        Err(e) => {
            debug!("{}: Gaussian fit unavailable: {}", hist.name(), e);
            (None, Some(e.to_string()))
        }
    };

    debug!(
        "{}: entries={} mean={:.6} rms={:.6} res={:.4} window=[{:.6}, {:.6}]",
        hist.name(),
        hist.entries(),
        mean,
        rms,
        quantile_resolution,
        window.0,
        window.1
    );

    Ok(SampleStatistic {
        entries: hist.entries(),
        integral,
        mean,
        rms,
        rms_error,
        quantile_resolution,
        quantiles,
        gauss,
        fit_failure,
    })
}
