/// Errors raised by histogram construction and rebinning
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistogramError {
    /// Bin count or domain is unusable
    #[error("Invalid binning: {n_bins} bins over [{lo}, {hi}]")]
    InvalidBinning {
        /// Requested number of bins
        n_bins: usize,
        /// Lower domain edge
        lo: f64,
        /// Upper domain edge
        hi: f64,
    },

    /// Rebin factor is zero or does not divide the bin count
    #[error("Invalid rebin factor {factor} for {n_bins} bins")]
    InvalidRebinFactor {
        /// Requested merge factor
        factor: usize,
        /// Current number of bins
        n_bins: usize,
    },
}
