//! Per-particle kinematic records shared by the reconstructed and truth collections.

use serde::{Deserialize, Serialize};

/// Generator status of a stable final-state truth particle.
pub const FINAL_STATE_STATUS: i32 = 1;

/// A reconstructed or simulated particle as delivered by the upstream event source.
///
/// Reconstructed and truth particles share this shape; which collection a record
/// belongs to is determined by where it is stored, not by the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// Momentum x component (GeV)
    pub px: f32,
    /// Momentum y component (GeV)
    pub py: f32,
    /// Momentum z component (GeV)
    pub pz: f32,
    /// Energy (GeV)
    pub energy: f32,
    /// Electric charge in units of e
    pub charge: f32,
    /// Generator status; only meaningful for truth particles (0 for reconstructed)
    pub generator_status: i32,
}

impl ParticleRecord {
    /// Create a record from momentum components only.
    pub fn from_momentum(px: f32, py: f32, pz: f32) -> Self {
        Self {
            px,
            py,
            pz,
            energy: 0.0,
            charge: 0.0,
            generator_status: 0,
        }
    }

    /// Builder-style energy setter.
    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = energy;
        self
    }

    /// Builder-style charge setter.
    pub fn with_charge(mut self, charge: f32) -> Self {
        self.charge = charge;
        self
    }

    /// Builder-style generator status setter.
    pub fn with_generator_status(mut self, status: i32) -> Self {
        self.generator_status = status;
        self
    }

    /// Total momentum (Euclidean norm of the three components).
    ///
    /// Computed in `f32` to stay bit-compatible with single-precision inputs.
    #[inline]
    pub fn p(&self) -> f32 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Transverse momentum (norm of the x/y components).
    #[inline]
    pub fn pt(&self) -> f32 {
        (self.px * self.px + self.py * self.py).sqrt()
    }

    /// Reciprocal transverse momentum, or 0 when `pt` is not positive.
    #[inline]
    pub fn inv_pt(&self) -> f32 {
        inverse_or_zero(self.pt())
    }

    /// Reciprocal total momentum, or 0 when `p` is not positive.
    #[inline]
    pub fn inv_p(&self) -> f32 {
        inverse_or_zero(self.p())
    }

    /// Whether the particle carries non-zero charge.
    #[inline]
    pub fn is_charged(&self) -> bool {
        self.charge != 0.0
    }

    /// Whether this is a stable final-state truth particle.
    #[inline]
    pub fn is_final_state(&self) -> bool {
        self.generator_status == FINAL_STATE_STATUS
    }

    /// Hash key with the same equivalence classes as [`same_momentum`](Self::same_momentum).
    ///
    /// `-0.0` and `+0.0` share a key; a NaN component has no key since it never
    /// compares equal.
    #[inline]
    pub(crate) fn momentum_key(&self) -> Option<[u32; 3]> {
        fn canonical(x: f32) -> Option<u32> {
            if x.is_nan() {
                None
            } else if x == 0.0 {
                Some(0)
            } else {
                Some(x.to_bits())
            }
        }
        Some([canonical(self.px)?, canonical(self.py)?, canonical(self.pz)?])
    }

    /// Exact floating-point equality of the three momentum components.
    #[inline]
    pub fn same_momentum(&self, other: &ParticleRecord) -> bool {
        self.px == other.px && self.py == other.py && self.pz == other.pz
    }
}

/// `1/x` for positive `x`, else 0.
#[inline]
pub fn inverse_or_zero(x: f32) -> f32 {
    if x > 0.0 {
        1.0 / x
    } else {
        0.0
    }
}
