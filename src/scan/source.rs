use std::collections::HashMap;

use crate::artifact::{ArtifactError, HistogramFile};
use crate::histogram::Histogram1D;

use super::SampleSpec;

/// Why a sample's histogram could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// The sample's artifact could not be opened or decoded
    Artifact(String),
    /// The artifact exists but has no histogram under the key
    Histogram,
}

/// Where the scan runner gets a sample's histogram from.
///
/// Implementations are shared across worker threads.
pub trait HistogramSource: Sync {
    /// Load histogram `key` for `sample`
    fn load(&self, sample: &SampleSpec, key: &str) -> Result<Histogram1D, LoadFailure>;
}

/// Reads histograms from the Parquet artifact at each sample's path
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactSource;

impl HistogramSource for ArtifactSource {
    fn load(&self, sample: &SampleSpec, key: &str) -> Result<Histogram1D, LoadFailure> {
        let file = HistogramFile::open(&sample.path)
            .map_err(|e: ArtifactError| LoadFailure::Artifact(e.to_string()))?;
        file.get(key).cloned().ok_or(LoadFailure::Histogram)
    }
}

/// In-memory histograms keyed by `(sample name, histogram key)`
impl HistogramSource for HashMap<(String, String), Histogram1D> {
    fn load(&self, sample: &SampleSpec, key: &str) -> Result<Histogram1D, LoadFailure> {
        self.get(&(sample.name.clone(), key.to_string()))
            .cloned()
            .ok_or(LoadFailure::Histogram)
    }
}
