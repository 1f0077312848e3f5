use super::*;
use approx::assert_relative_eq;
use rand::prelude::*;
use rand_distr::Normal as NormalSampler;
use statrs::distribution::{ContinuousCDF, Normal};

fn sampled_gaussian(sigma: f64, count: usize, seed: u64) -> Histogram1D {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = NormalSampler::new(0.0, sigma).unwrap();
    let mut hist = Histogram1D::new("res", 10_000, -0.1, 0.1).unwrap();
    for _ in 0..count {
        hist.fill(rng.sample(normal));
    }
    hist
}

#[test]
fn test_gaussian_round_trip() {
    let sigma = 0.01;
    let hist = sampled_gaussian(sigma, 200_000, 7);

    let stat = reduce(&hist, 50, FitWindow::Quantile).unwrap();

    let fit = stat.gauss.expect("fit should converge");
    assert_relative_eq!(fit.sigma, sigma, max_relative = 0.02);
    assert_relative_eq!(stat.rms, sigma, max_relative = 0.02);

    let unit = Normal::new(0.0, 1.0).unwrap();
    let expected = 100.0 * sigma * (unit.inverse_cdf(0.84) - unit.inverse_cdf(0.16)) / 2.0;
    assert_relative_eq!(stat.quantile_resolution, expected, max_relative = 0.03);
    assert!(stat.fit_failure.is_none());
}

#[test]
fn test_full_range_window_also_fits() {
    let hist = sampled_gaussian(0.02, 100_000, 11);
    let stat = reduce(&hist, 100, FitWindow::FullRange).unwrap();
    assert_relative_eq!(stat.gauss_sigma().unwrap(), 0.02, max_relative = 0.03);
}

#[test]
fn test_empty_distribution_is_an_error() {
    let hist = Histogram1D::new("qq_res", 100, -0.1, 0.1).unwrap();
    assert_eq!(
        reduce(&hist, 1, FitWindow::Quantile),
        Err(ReduceError::EmptyDistribution {
            name: "qq_res".to_string()
        })
    );
}

#[test]
fn test_bad_rebin_factor_is_an_error() {
    let hist = sampled_gaussian(0.01, 100, 3);
    assert!(matches!(
        reduce(&hist, 3, FitWindow::Quantile),
        Err(ReduceError::Histogram(HistogramError::InvalidRebinFactor { .. }))
    ));
}

#[test]
fn test_single_bin_keeps_rms_and_quantiles() {
    let mut contents = vec![0.0; 10];
    contents[4] = 25.0;
    let hist = Histogram1D::from_contents("spike", -1.0, 1.0, contents, 25).unwrap();

    let stat = reduce(&hist, 1, FitWindow::Quantile).unwrap();
    assert_relative_eq!(stat.mean, -0.1);
    assert!(stat.rms < 1e-6);
    assert!(stat.quantile_resolution > 0.0);
    assert!(stat.gauss.is_none());
    assert!(stat.fit_failure.is_some());
    assert!(stat.percent().sigma.is_none());
}

#[test]
fn test_sentinel_spike_does_not_break_reduction() {
    let mut hist = sampled_gaussian(0.01, 50_000, 5);
    for _ in 0..100 {
        hist.fill(-998.0);
    }
    let stat = reduce(&hist, 50, FitWindow::Quantile).unwrap();
    assert_eq!(stat.entries, 50_100);
    // the clipped spike sits in the first bin, far outside the fit peak
    assert!(stat.gauss_sigma().is_some());
}

#[test]
fn test_rebin_then_identity_matches_combined_factor() {
    let hist = sampled_gaussian(0.01, 20_000, 13);

    let once = reduce(&hist, 50, FitWindow::Quantile).unwrap();
    let rebinned = hist.rebin(10).unwrap();
    let twice = reduce(&rebinned.rebin(5).unwrap(), 1, FitWindow::Quantile).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_percent_scaling() {
    let hist = sampled_gaussian(0.01, 50_000, 17);
    let stat = reduce(&hist, 50, FitWindow::Quantile).unwrap();
    let pct = stat.percent();

    assert_relative_eq!(pct.rms, stat.rms * 100.0);
    assert_relative_eq!(pct.rms_error, stat.rms_error * 100.0);
    assert_relative_eq!(pct.sigma.unwrap(), stat.gauss_sigma().unwrap() * 100.0);
    assert_eq!(pct.resolution, stat.quantile_resolution);
    assert!(pct.to_string().contains("Resolution"));
}
