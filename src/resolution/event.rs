//! Event-level derivations feeding the resolution histograms.

use crate::particle::ParticleRecord;

use super::{DEGENERACY_THRESHOLD, SENTINEL};

/// Particles with non-zero charge.
pub fn select_charged(collection: &[ParticleRecord]) -> Vec<ParticleRecord> {
    collection.iter().filter(|p| p.is_charged()).copied().collect()
}

/// Truth particles with final-state generator status.
pub fn final_state(truth: &[ParticleRecord]) -> Vec<ParticleRecord> {
    truth.iter().filter(|p| p.is_final_state()).copied().collect()
}

/// Sub-collection picked by index, in index order.
///
/// Negative or out-of-range indices are skipped.
pub fn gather(indices: &[i32], collection: &[ParticleRecord]) -> Vec<ParticleRecord> {
    indices
        .iter()
        .filter_map(|&idx| usize::try_from(idx).ok().and_then(|i| collection.get(i)))
        .copied()
        .collect()
}

/// Sum of particle energies.
pub fn energy_sum(collection: &[ParticleRecord]) -> f32 {
    collection.iter().map(|p| p.energy).sum()
}

/// Hadronic energy resolution of one event: `1/ΣE_reco - 1/ΣE_truth`.
///
/// Returns [`SENTINEL`] when either energy sum is below the degeneracy threshold.
pub fn inverse_energy_difference(reco: &[ParticleRecord], truth_final: &[ParticleRecord]) -> f32 {
    let reco_total = energy_sum(reco);
    let truth_total = energy_sum(truth_final);
    if !(reco_total >= DEGENERACY_THRESHOLD) || !(truth_total >= DEGENERACY_THRESHOLD) {
        return SENTINEL;
    }
    1.0 / reco_total - 1.0 / truth_total
}

/// `1/pt` for each particle, 0 where `pt` is not positive.
pub fn inverse_pt_values(collection: &[ParticleRecord]) -> Vec<f32> {
    collection.iter().map(ParticleRecord::inv_pt).collect()
}

/// Element-wise `a[i] - b[i]` over the shorter of the two inputs.
pub fn pairwise_difference(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}
