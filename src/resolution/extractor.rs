use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::association::AssociationIndex;
use crate::particle::ParticleRecord;

use super::{Quantity, SENTINEL};

/// Strategy for locating a selected particle inside the full reconstructed collection.
///
/// Matching is by exact equality of the three momentum components, first position
/// wins. Both strategies give identical results; `Hashed` trades a per-event map
/// build for O(1) lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionLookup {
    /// Scan the collection front to back for every selected particle
    #[default]
    LinearScan,
    /// Index the collection once by momentum bit pattern
    Hashed,
}

enum Positions<'a> {
    Linear(&'a [ParticleRecord]),
    Hashed(HashMap<[u32; 3], usize>),
}

impl<'a> Positions<'a> {
    fn new(lookup: PositionLookup, full_reco: &'a [ParticleRecord]) -> Self {
        match lookup {
            PositionLookup::LinearScan => Positions::Linear(full_reco),
            PositionLookup::Hashed => {
                let mut map = HashMap::with_capacity(full_reco.len());
                for (position, particle) in full_reco.iter().enumerate() {
                    if let Some(key) = particle.momentum_key() {
                        map.entry(key).or_insert(position);
                    }
                }
                Positions::Hashed(map)
            }
        }
    }

    fn find(&self, particle: &ParticleRecord) -> Option<usize> {
        match self {
            Positions::Linear(full_reco) => {
                full_reco.iter().position(|candidate| candidate.same_momentum(particle))
            }
            Positions::Hashed(map) => map.get(&particle.momentum_key()?).copied(),
        }
    }
}

/// Resolution value for every selected reconstructed particle, in input order.
///
/// The output always has the same length as `selected`; unresolvable entries hold
/// [`SENTINEL`].
pub fn extract(
    selected: &[ParticleRecord],
    full_reco: &[ParticleRecord],
    assoc: &AssociationIndex,
    full_truth: &[ParticleRecord],
    quantity: Quantity,
) -> Vec<f32> {
    extract_with(
        PositionLookup::LinearScan,
        selected,
        full_reco,
        assoc,
        full_truth,
        quantity,
    )
}

/// [`extract`] with an explicit position lookup strategy.
pub fn extract_with(
    lookup: PositionLookup,
    selected: &[ParticleRecord],
    full_reco: &[ParticleRecord],
    assoc: &AssociationIndex,
    full_truth: &[ParticleRecord],
    quantity: Quantity,
) -> Vec<f32> {
    let positions = Positions::new(lookup, full_reco);

    selected
        .iter()
        .map(|reco| {
            let Some(position) = positions.find(reco) else {
                return SENTINEL;
            };
            let Some(truth_position) = i32::try_from(position).ok().and_then(|p| assoc.get(p))
            else {
                return SENTINEL;
            };
            let Some(truth) = usize::try_from(truth_position)
                .ok()
                .and_then(|idx| full_truth.get(idx))
            else {
                return SENTINEL;
            };
            quantity.resolution(reco, truth)
        })
        .collect()
}
