//! # Resolution extraction
//!
//! Turns matched reconstructed/truth particle pairs into scalar resolution values.
//!
//! Every failure on the per-particle path (no position in the full collection, no
//! association entry, truth index out of range, near-zero momentum) degrades to
//! [`SENTINEL`] rather than an error. Whether sentinels reach the histogram is a
//! per-pipeline decision made with a [`SentinelPolicy`].
//!
//! Two conventions coexist and are kept as separately tagged modes:
//!
//! | Quantity | Mode | Value |
//! |----------|------|-------|
//! | `P`, `Pt` | [`ResolutionMode::Relative`] | `(reco - truth) / truth` |
//! | `InvPt`, `InvP` | [`ResolutionMode::InverseDifference`] | `1/reco - 1/truth` |
//!
//! The inverse difference is linear in track curvature for a solenoidal field,
//! which is why it is not normalized by the truth value.

mod event;
mod extractor;
mod policy;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::particle::ParticleRecord;

pub use event::{
    energy_sum, final_state, gather, inverse_energy_difference, inverse_pt_values,
    pairwise_difference, select_charged,
};
pub use extractor::{extract, extract_with, PositionLookup};
pub use policy::{FilterScope, SentinelPolicy};

/// Reserved out-of-domain value marking an unresolved or invalid resolution.
pub const SENTINEL: f32 = -998.0;

/// Momenta below this value (GeV) are treated as degenerate denominators.
pub const DEGENERACY_THRESHOLD: f32 = 1e-3;

/// Whether a value is the sentinel.
#[inline]
pub fn is_sentinel(value: f32) -> bool {
    value == SENTINEL
}

/// Formula used to turn a reco/truth pair into a resolution value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// `(reco - truth) / truth`
    Relative,
    /// `1/reco - 1/truth`
    InverseDifference,
}

/// Kinematic quantity whose resolution is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Total momentum
    P,
    /// Transverse momentum
    Pt,
    /// Inverse transverse momentum
    InvPt,
    /// Inverse total momentum
    InvP,
}

impl Quantity {
    /// All supported quantities.
    pub const ALL: [Quantity; 4] = [Quantity::P, Quantity::Pt, Quantity::InvPt, Quantity::InvP];

    /// Resolution convention for this quantity.
    pub fn mode(self) -> ResolutionMode {
        match self {
            Quantity::P | Quantity::Pt => ResolutionMode::Relative,
            Quantity::InvPt | Quantity::InvP => ResolutionMode::InverseDifference,
        }
    }

    /// Momentum the degeneracy guard is applied to (p or pt).
    #[inline]
    pub fn base(self, particle: &ParticleRecord) -> f32 {
        match self {
            Quantity::P | Quantity::InvP => particle.p(),
            Quantity::Pt | Quantity::InvPt => particle.pt(),
        }
    }

    /// Value of the quantity itself.
    #[inline]
    pub fn value(self, particle: &ParticleRecord) -> f32 {
        match self {
            Quantity::P => particle.p(),
            Quantity::Pt => particle.pt(),
            Quantity::InvPt => particle.inv_pt(),
            Quantity::InvP => particle.inv_p(),
        }
    }

    /// Whether the reconstructed momentum is also guarded against degeneracy.
    ///
    /// Transverse-momentum resolution only guards the truth denominator.
    pub fn guards_reco(self) -> bool {
        !matches!(self, Quantity::Pt)
    }

    /// Short name used in histogram keys (`muons_res_<suffix>`).
    pub fn suffix(self) -> &'static str {
        match self {
            Quantity::P => "p",
            Quantity::Pt => "pt",
            Quantity::InvPt => "invpt",
            Quantity::InvP => "invp",
        }
    }

    /// Resolution for an already-matched pair, with the degeneracy guard applied.
    pub fn resolution(self, reco: &ParticleRecord, truth: &ParticleRecord) -> f32 {
        let truth_base = self.base(truth);
        let reco_base = self.base(reco);

        // NaN fails the comparison and is treated as degenerate
        if !(truth_base >= DEGENERACY_THRESHOLD) {
            return SENTINEL;
        }
        if self.guards_reco() && !(reco_base >= DEGENERACY_THRESHOLD) {
            return SENTINEL;
        }

        match self.mode() {
            ResolutionMode::Relative => (reco_base - truth_base) / truth_base,
            ResolutionMode::InverseDifference => self.value(reco) - self.value(truth),
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}
