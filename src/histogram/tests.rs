use super::*;
use approx::assert_relative_eq;
use proptest::prelude::*;

#[test]
fn test_invalid_binning() {
    assert!(matches!(
        Histogram1D::new("h", 0, 0.0, 1.0),
        Err(HistogramError::InvalidBinning { .. })
    ));
    assert!(Histogram1D::new("h", 10, 1.0, 1.0).is_err());
    assert!(Histogram1D::new("h", 10, 0.0, f64::INFINITY).is_err());
}

#[test]
fn test_fill_clips_into_outer_bins() {
    let mut hist = Histogram1D::new("h", 4, -1.0, 1.0).unwrap();
    hist.fill(-998.0);
    hist.fill(-1.0);
    hist.fill(0.1);
    hist.fill(1.0);
    hist.fill(25.0);

    assert_eq!(hist.contents(), &[2.0, 0.0, 1.0, 2.0]);
    assert_eq!(hist.entries(), 5);
}

#[test]
fn test_nan_is_not_counted() {
    let mut hist = Histogram1D::new("h", 4, -1.0, 1.0).unwrap();
    assert!(!hist.fill(f64::NAN));
    assert_eq!(hist.fill_all([0.0f32, f32::NAN, 0.5]), 2);
    assert_eq!(hist.entries(), 2);
}

#[test]
fn test_mean_and_rms_use_bin_centers() {
    let hist = Histogram1D::from_contents("h", 0.0, 4.0, vec![1.0, 0.0, 0.0, 1.0], 2).unwrap();
    // centers 0.5 and 3.5
    assert_relative_eq!(hist.mean().unwrap(), 2.0);
    assert_relative_eq!(hist.rms().unwrap(), 1.5);
    assert_relative_eq!(hist.rms_error().unwrap(), 1.5 / 2.0);
}

#[test]
fn test_empty_histogram_has_no_moments() {
    let hist = Histogram1D::new("h", 10, 0.0, 1.0).unwrap();
    assert!(hist.is_empty());
    assert!(hist.mean().is_none());
    assert!(hist.rms().is_none());
    assert!(hist.quantiles(&[0.5]).is_none());
}

#[test]
fn test_rebin_merges_adjacent_bins() {
    let hist =
        Histogram1D::from_contents("h", 0.0, 6.0, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 21).unwrap();
    let merged = hist.rebin(3).unwrap();
    assert_eq!(merged.contents(), &[6.0, 15.0]);
    assert_eq!(merged.entries(), 21);
    assert_eq!(merged.bin_width(), 3.0);
    assert_eq!(hist.rebin(1).unwrap(), hist);
}

#[test]
fn test_rebin_rejects_bad_factor() {
    let hist = Histogram1D::new("h", 10, 0.0, 1.0).unwrap();
    assert_eq!(
        hist.rebin(3),
        Err(HistogramError::InvalidRebinFactor {
            factor: 3,
            n_bins: 10
        })
    );
    assert!(hist.rebin(0).is_err());
}

#[test]
fn test_quantile_interpolates_inside_bin() {
    let hist = Histogram1D::from_contents("h", 0.0, 4.0, vec![1.0, 1.0, 1.0, 1.0], 4).unwrap();
    let q = hist.quantiles(&[0.5, 0.125, 0.0, 1.0]).unwrap();
    assert_relative_eq!(q[0], 2.0);
    assert_relative_eq!(q[1], 0.5);
    assert_relative_eq!(q[2], 0.0);
    assert_relative_eq!(q[3], 4.0);
}

#[test]
fn test_quantile_skips_leading_empty_bins() {
    let hist = Histogram1D::from_contents("h", 0.0, 4.0, vec![0.0, 0.0, 2.0, 0.0], 2).unwrap();
    assert_relative_eq!(hist.quantile(0.5).unwrap(), 2.5);
    assert_relative_eq!(hist.quantile(0.0).unwrap(), 2.0);
}

#[test]
fn test_quantile_single_bin_is_deterministic() {
    let hist = Histogram1D::from_contents("h", -1.0, 1.0, vec![0.0, 7.0, 0.0, 0.0], 7).unwrap();
    let q = hist.quantiles(&[0.16, 0.84]).unwrap();
    assert_relative_eq!(q[0], -0.5 + 0.5 * 0.16);
    assert_relative_eq!(q[1], -0.5 + 0.5 * 0.84);
}

proptest! {
    #[test]
    fn prop_rebin_composes(
        counts in prop::collection::vec(0u32..50, 24),
        a in prop::sample::select(vec![1usize, 2, 3]),
        b in prop::sample::select(vec![1usize, 2, 4]),
    ) {
        let contents: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let entries = counts.iter().map(|&c| c as u64).sum();
        let hist = Histogram1D::from_contents("h", -1.0, 1.0, contents, entries).unwrap();

        let twice = hist.rebin(a).unwrap().rebin(b).unwrap();
        let once = hist.rebin(a * b).unwrap();
        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(twice.mean(), once.mean());
        prop_assert_eq!(twice.rms(), once.rms());
    }

    #[test]
    fn prop_quantiles_are_monotonic_and_in_range(
        counts in prop::collection::vec(0u32..20, 1..40),
    ) {
        let total: u32 = counts.iter().sum();
        prop_assume!(total > 0);
        let contents: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let hist = Histogram1D::from_contents("h", -2.0, 2.0, contents, total as u64).unwrap();

        let probs = [0.001, 0.16, 0.5, 0.84, 0.999];
        let q = hist.quantiles(&probs).unwrap();
        for pair in q.windows(2) {
            prop_assert!(pair[0] <= pair[1] + 1e-12);
        }
        for x in q {
            prop_assert!(x >= -2.0 - 1e-9 && x <= 2.0 + 1e-9);
        }
    }
}
