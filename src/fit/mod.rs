//! # Gaussian fit
//!
//! Least-squares fit of a Gaussian density to histogram bins, solved with
//! Levenberg–Marquardt on the three parameters `(amplitude, mean, sigma)`.
//!
//! The model for a bin of width `w` centered at `x` is
//!
//! ```text
//! f(x) = amplitude * w / (sigma * sqrt(2π)) * exp(-(x - mean)² / (2 sigma²))
//! ```
//!
//! so `amplitude` is the number of entries under the curve and the histogram
//! integral is a natural seed for it. Bin errors are `sqrt(content)`; empty bins are
//! left out of the chi-square. Parameter errors come from the inverse of `JᵀJ` at
//! the minimum, without rescaling by chi-square per degree of freedom.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::histogram::Histogram1D;

const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Reasons a fit does not produce a usable width
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Fewer non-empty bins in the window than free parameters
    #[error("Only {points} usable bins in fit window [{lo}, {hi}]")]
    TooFewPoints {
        /// Non-empty bins inside the window
        points: usize,
        /// Window lower edge
        lo: f64,
        /// Window upper edge
        hi: f64,
    },

    /// Seed width is zero or not finite
    #[error("Invalid seed sigma {sigma}")]
    InvalidSeed {
        /// Seed width
        sigma: f64,
    },

    /// Iteration budget exhausted
    #[error("Fit did not converge after {iterations} iterations")]
    NotConverged {
        /// Iterations performed
        iterations: usize,
    },

    /// Fitted width is negative, zero or NaN
    #[error("Non-physical fitted sigma {sigma}")]
    NonPhysical {
        /// Fitted width
        sigma: f64,
    },

    /// `JᵀJ` cannot be inverted at the minimum
    #[error("Singular covariance matrix at the minimum")]
    SingularCovariance,
}

/// Starting point of the fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianSeed {
    /// Entries under the curve
    pub amplitude: f64,
    /// Center
    pub mean: f64,
    /// Width
    pub sigma: f64,
}

/// Iteration controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Maximum number of accepted or rejected steps
    pub max_iterations: usize,
    /// Relative chi-square decrease below which the fit is converged
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
        }
    }
}

/// Converged Gaussian fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianFit {
    /// Entries under the curve
    pub amplitude: f64,
    /// Fitted center
    pub mean: f64,
    /// Fitted width (always positive)
    pub sigma: f64,
    /// Error on the amplitude
    pub amplitude_error: f64,
    /// Error on the center
    pub mean_error: f64,
    /// Error on the width
    pub sigma_error: f64,
    /// Chi-square at the minimum
    pub chi2: f64,
    /// Degrees of freedom (points minus 3)
    pub ndf: usize,
    /// Iterations used
    pub iterations: usize,
}

struct FitPoint {
    x: f64,
    y: f64,
    inv_err: f64,
}

/// Fit a Gaussian to the bins of `hist` whose centers lie in `[lo, hi]`.
pub fn fit_gaussian(
    hist: &Histogram1D,
    window: (f64, f64),
    seed: GaussianSeed,
    options: &FitOptions,
) -> Result<GaussianFit, FitError> {
    let (lo, hi) = window;
    let points: Vec<FitPoint> = (0..hist.n_bins())
        .filter_map(|bin| {
            let x = hist.bin_center(bin);
            let y = hist.contents()[bin];
            (x >= lo && x <= hi && y > 0.0).then(|| FitPoint {
                x,
                y,
                inv_err: 1.0 / y.sqrt(),
            })
        })
        .collect();

    if points.len() < 3 {
        return Err(FitError::TooFewPoints {
            points: points.len(),
            lo,
            hi,
        });
    }
    if !(seed.sigma > 0.0) || !seed.sigma.is_finite() {
        return Err(FitError::InvalidSeed { sigma: seed.sigma });
    }

    let width = hist.bin_width();
    let mut theta = Vector3::new(seed.amplitude, seed.mean, seed.sigma);
    let (mut jtj, mut jtr, mut chi2) = normal_equations(&points, width, &theta);
    let mut lambda = 1e-3;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < options.max_iterations {
        iterations += 1;

        let mut damped = jtj;
        for i in 0..3 {
            damped[(i, i)] += lambda * jtj[(i, i)].max(f64::MIN_POSITIVE);
        }
        let Some(step) = damped.cholesky().map(|c| c.solve(&jtr)) else {
            lambda *= 10.0;
            continue;
        };

        let trial = theta + step;
        if !(trial[2] > 0.0) || !trial.iter().all(|v| v.is_finite()) {
            lambda *= 10.0;
            if lambda > 1e16 {
                break;
            }
            continue;
        }

        let (trial_jtj, trial_jtr, trial_chi2) = normal_equations(&points, width, &trial);
        if trial_chi2 <= chi2 {
            let decrease = chi2 - trial_chi2;
            let small_step = step
                .iter()
                .zip(trial.iter())
                .all(|(d, t)| d.abs() <= 1e-12 * (t.abs() + 1e-12));
            theta = trial;
            jtj = trial_jtj;
            jtr = trial_jtr;
            chi2 = trial_chi2;
            lambda = (lambda / 10.0).max(1e-12);
            if decrease <= options.tolerance * (chi2 + options.tolerance) || small_step {
                converged = true;
                break;
            }
        } else {
            lambda *= 10.0;
            // No direction reduces chi-square any further: we sit at the minimum.
            if lambda > 1e16 {
                converged = true;
                break;
            }
        }
    }

    if !converged {
        return Err(FitError::NotConverged { iterations });
    }

    let sigma = theta[2];
    if !(sigma > 0.0) || !sigma.is_finite() {
        return Err(FitError::NonPhysical { sigma });
    }

    let covariance = jtj.try_inverse().ok_or(FitError::SingularCovariance)?;
    let error = |i: usize| covariance[(i, i)].max(0.0).sqrt();

    Ok(GaussianFit {
        amplitude: theta[0],
        mean: theta[1],
        sigma,
        amplitude_error: error(0),
        mean_error: error(1),
        sigma_error: error(2),
        chi2,
        ndf: points.len() - 3,
        iterations,
    })
}

/// `JᵀJ`, `Jᵀr` and chi-square for the weighted residuals at `theta`.
fn normal_equations(
    points: &[FitPoint],
    width: f64,
    theta: &Vector3<f64>,
) -> (Matrix3<f64>, Vector3<f64>, f64) {
    let (amplitude, mean, sigma) = (theta[0], theta[1], theta[2]);
    let norm = width / (sigma * SQRT_2PI);

    let mut jtj = Matrix3::zeros();
    let mut jtr = Vector3::zeros();
    let mut chi2 = 0.0;

    for point in points {
        let z = (point.x - mean) / sigma;
        let shape = norm * (-0.5 * z * z).exp();
        let model = amplitude * shape;

        let grad = Vector3::new(
            shape,
            model * z / sigma,
            model * (z * z - 1.0) / sigma,
        ) * point.inv_err;
        let residual = (point.y - model) * point.inv_err;

        jtj += grad * grad.transpose();
        jtr += grad * residual;
        chi2 += residual * residual;
    }

    (jtj, jtr, chi2)
}
