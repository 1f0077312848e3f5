use super::Histogram1D;

impl Histogram1D {
    /// Normalized cumulative content at every bin edge (`n_bins + 1` values, from 0 to 1).
    ///
    /// `None` when the histogram is empty.
    pub fn cumulative(&self) -> Option<Vec<f64>> {
        let total = self.integral();
        if !(total > 0.0) {
            return None;
        }
        let mut cumulative = Vec::with_capacity(self.n_bins() + 1);
        let mut running = 0.0;
        cumulative.push(0.0);
        for &content in self.contents() {
            running += content;
            cumulative.push(running / total);
        }
        Some(cumulative)
    }

    /// Quantiles at the given cumulative probabilities.
    ///
    /// For each probability the bin is the last one whose cumulative lower bound does
    /// not exceed it; the result interpolates linearly inside that bin. Inside a flat
    /// stretch of the cumulative (empty bins) this picks the bin after the stretch,
    /// so degenerate inputs still give a single well-defined answer. Probabilities are
    /// clamped to `[0, 1]`. Returns `None` when the histogram is empty.
    pub fn quantiles(&self, probabilities: &[f64]) -> Option<Vec<f64>> {
        let cumulative = self.cumulative()?;
        let n_bins = self.n_bins();
        let width = self.bin_width();

        let quantiles = probabilities
            .iter()
            .map(|&p| {
                let p = p.clamp(0.0, 1.0);
                // c[0] = 0 <= p, so at least one lower bound qualifies
                let bin = cumulative[..n_bins]
                    .partition_point(|&c| c <= p)
                    .saturating_sub(1);
                let low = cumulative[bin];
                let step = cumulative[bin + 1] - low;
                let mut x = self.bin_low_edge(bin);
                if step > 0.0 {
                    x += width * (p - low) / step;
                }
                x
            })
            .collect();
        Some(quantiles)
    }

    /// Single quantile, see [`quantiles`](Self::quantiles).
    pub fn quantile(&self, probability: f64) -> Option<f64> {
        self.quantiles(&[probability]).map(|q| q[0])
    }
}
