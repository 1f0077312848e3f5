use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::histogram::{Histogram1D, HistogramError};
use crate::resolution::{PositionLookup, Quantity, SentinelPolicy};

/// Histogram keys filled by the analysis
pub mod names {
    /// Total momentum of muon candidates
    pub const MUONS_P: &str = "muons_p";
    /// Transverse momentum of muon candidates
    pub const MUONS_PT: &str = "muons_pt";
    /// Prefix of per-quantity muon resolution histograms
    pub const MUONS_RES_PREFIX: &str = "muons_res_";
    /// Event-level inverse energy resolution
    pub const QQ_RES: &str = "qq_res";
    /// Reconstructed energy sum
    pub const RECO_E_TOT: &str = "reco_e_tot";
    /// Inverse pT of charged reconstructed particles
    pub const INV_PT: &str = "inv_pt";
    /// Positional 1/pT difference of charged particles
    pub const INV_PT_RES: &str = "inv_pt_res";
}

/// Key of the muon resolution histogram for `quantity`
pub fn resolution_key(quantity: Quantity) -> String {
    format!("{}{}", names::MUONS_RES_PREFIX, quantity.suffix())
}

/// Fixed-width axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Number of bins
    pub n_bins: usize,
    /// Lower edge
    pub lo: f64,
    /// Upper edge
    pub hi: f64,
}

impl Binning {
    /// Create a binning
    pub const fn new(n_bins: usize, lo: f64, hi: f64) -> Self {
        Self { n_bins, lo, hi }
    }

    /// Empty histogram with this axis
    pub fn histogram(&self, name: &str) -> Result<Histogram1D, HistogramError> {
        Histogram1D::new(name, self.n_bins, self.lo, self.hi)
    }
}

/// Built-in axis for a histogram key
pub fn default_binning(name: &str) -> Option<Binning> {
    let binning = match name {
        names::MUONS_P | names::MUONS_PT => Binning::new(250, 0.0, 250.0),
        "muons_res_p" | "muons_res_pt" => Binning::new(10_000, -0.05, 0.05),
        "muons_res_invp" | "muons_res_invpt" => Binning::new(10_000, -0.01, 0.01),
        names::QQ_RES => Binning::new(10_000, -0.1, 0.1),
        names::RECO_E_TOT => Binning::new(125, 0.0, 125.0),
        names::INV_PT => Binning::new(500, 0.02, 0.06),
        names::INV_PT_RES => Binning::new(1_000, -0.01, 0.01),
        _ => return None,
    };
    Some(binning)
}

/// Settings of the per-event pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Muon resolution quantities to histogram
    pub quantities: Vec<Quantity>,
    /// Also fill the hadronic histograms (`qq_res`, `reco_e_tot`, `inv_pt`, `inv_pt_res`)
    pub hadronic: bool,
    /// Filter applied to resolution values before filling
    pub policy: SentinelPolicy,
    /// How selected muons are located in the full collection
    pub lookup: PositionLookup,
    /// Axis overrides by histogram key
    pub binning: BTreeMap<String, Binning>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            quantities: vec![Quantity::P, Quantity::Pt, Quantity::InvP],
            hadronic: true,
            policy: SentinelPolicy::default(),
            lookup: PositionLookup::default(),
            binning: BTreeMap::new(),
        }
    }
}

impl AnalysisConfig {
    /// Axis for `name`, override first
    pub fn binning_for(&self, name: &str) -> Option<Binning> {
        self.binning.get(name).copied().or_else(|| default_binning(name))
    }
}
