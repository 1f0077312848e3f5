//! # Fixed-width 1-D histograms
//!
//! [`Histogram1D`] is the binned form of a resolution distribution. It has no
//! separate underflow/overflow cells: values below `lo` land in the first bin and
//! values at or above `hi` land in the last, so every finite fill is counted.
//!
//! Moments are computed from bin centers weighted by bin contents, which keeps
//! them a pure function of the stored bins. Rebinning therefore composes:
//! rebinning by `a` then by `b` yields exactly the same statistics as rebinning
//! by `a * b`.

mod error;
mod quantile;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use error::HistogramError;

/// One-dimensional histogram with unit-weight fills and clipping at the edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    name: String,
    lo: f64,
    hi: f64,
    contents: Vec<f64>,
    entries: u64,
}

impl Histogram1D {
    /// Create an empty histogram with `n_bins` bins over `[lo, hi)`.
    pub fn new(name: impl Into<String>, n_bins: usize, lo: f64, hi: f64) -> Result<Self, HistogramError> {
        validate_binning(n_bins, lo, hi)?;
        Ok(Self {
            name: name.into(),
            lo,
            hi,
            contents: vec![0.0; n_bins],
            entries: 0,
        })
    }

    /// Rebuild a histogram from stored bin contents.
    pub fn from_contents(
        name: impl Into<String>,
        lo: f64,
        hi: f64,
        contents: Vec<f64>,
        entries: u64,
    ) -> Result<Self, HistogramError> {
        validate_binning(contents.len(), lo, hi)?;
        Ok(Self {
            name: name.into(),
            lo,
            hi,
            contents,
            entries,
        })
    }

    /// Histogram name (the key it is persisted under)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower domain edge
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Upper domain edge
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Number of bins
    pub fn n_bins(&self) -> usize {
        self.contents.len()
    }

    /// Bin contents, first to last
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// Number of fills
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Width of every bin
    #[inline]
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.contents.len() as f64
    }

    /// Lower edge of bin `bin` (0-based). `bin == n_bins` gives `hi`.
    #[inline]
    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        if bin >= self.contents.len() {
            return self.hi;
        }
        self.lo + bin as f64 * self.bin_width()
    }

    /// Center of bin `bin` (0-based)
    #[inline]
    pub fn bin_center(&self, bin: usize) -> f64 {
        self.lo + (bin as f64 + 0.5) * self.bin_width()
    }

    /// Bin that `value` is counted in, after clipping. `None` for NaN.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let last = self.contents.len() - 1;
        if value < self.lo {
            return Some(0);
        }
        if value >= self.hi {
            return Some(last);
        }
        let bin = ((value - self.lo) / self.bin_width()).floor() as usize;
        Some(bin.min(last))
    }

    /// Count one value. NaN is ignored and returns `false`.
    pub fn fill(&mut self, value: f64) -> bool {
        match self.find_bin(value) {
            Some(bin) => {
                self.contents[bin] += 1.0;
                self.entries += 1;
                true
            }
            None => false,
        }
    }

    /// Count every value of an iterator, returning how many were accepted.
    pub fn fill_all<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        let mut accepted = 0;
        for value in values {
            if self.fill(value.into()) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Sum of bin contents
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Whether the histogram holds no content
    pub fn is_empty(&self) -> bool {
        !(self.integral() > 0.0)
    }

    /// Largest bin content
    pub fn maximum(&self) -> f64 {
        self.contents.iter().copied().fold(0.0, f64::max)
    }

    /// Merge `factor` adjacent bins into one.
    ///
    /// `factor` must be at least 1 and divide the bin count; entries are preserved.
    pub fn rebin(&self, factor: usize) -> Result<Self, HistogramError> {
        let n_bins = self.contents.len();
        if factor == 0 || n_bins % factor != 0 {
            return Err(HistogramError::InvalidRebinFactor { factor, n_bins });
        }
        if factor == 1 {
            return Ok(self.clone());
        }
        let contents = self
            .contents
            .chunks(factor)
            .map(|chunk| chunk.iter().sum())
            .collect();
        Ok(Self {
            name: self.name.clone(),
            lo: self.lo,
            hi: self.hi,
            contents,
            entries: self.entries,
        })
    }

    /// Content-weighted mean of bin centers, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        let (sw, swx, _) = self.moment_sums();
        (sw > 0.0).then(|| swx / sw)
    }

    /// Content-weighted standard deviation of bin centers, `None` when empty.
    pub fn rms(&self) -> Option<f64> {
        let (sw, swx, swx2) = self.moment_sums();
        if !(sw > 0.0) {
            return None;
        }
        let mean = swx / sw;
        Some((swx2 / sw - mean * mean).max(0.0).sqrt())
    }

    /// Large-sample error on the RMS, `rms / sqrt(2N)` with `N` the entry count.
    pub fn rms_error(&self) -> Option<f64> {
        let rms = self.rms()?;
        if self.entries == 0 {
            return None;
        }
        Some(rms / (2.0 * self.entries as f64).sqrt())
    }

    fn moment_sums(&self) -> (f64, f64, f64) {
        self.contents
            .iter()
            .enumerate()
            .fold((0.0, 0.0, 0.0), |(sw, swx, swx2), (bin, &w)| {
                let x = self.bin_center(bin);
                (sw + w, swx + w * x, swx2 + w * x * x)
            })
    }
}

fn validate_binning(n_bins: usize, lo: f64, hi: f64) -> Result<(), HistogramError> {
    if n_bins == 0 || !lo.is_finite() || !hi.is_finite() || !(lo < hi) {
        return Err(HistogramError::InvalidBinning { n_bins, lo, hi });
    }
    Ok(())
}
