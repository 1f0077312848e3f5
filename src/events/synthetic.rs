//! Seeded generator of Z → μμ events with a soft hadronic and photon component.
//!
//! Charged tracks are smeared with a transverse-momentum resolution that scales
//! inversely with the solenoid field, so a set of samples generated at different
//! fields reproduces the shape of a real field scan:
//!
//! ```text
//! σ(pT)/pT = sqrt((a · pT / B)² + (b / B)²)
//! ```
//!
//! with `a` the curvature term and `b` the multiple-scattering term at 1 T.
//! Photons get a calorimeter energy smearing `c / sqrt(E)` independent of the field.

use std::f64::consts::PI;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Poisson, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::association::AssociationTable;
use crate::particle::{ParticleRecord, FINAL_STATE_STATUS};

use super::{Event, EventError};

/// Muon mass (GeV)
pub const MUON_MASS: f64 = 0.105_658;
/// Charged pion mass (GeV)
pub const PION_MASS: f64 = 0.139_570;
/// Z boson mass (GeV)
pub const Z_MASS: f64 = 91.1876;
/// Generator status of the decaying Z
pub const INTERMEDIATE_STATUS: i32 = 2;

const MAX_COS_THETA: f64 = 0.95;

/// Detector response parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmearingModel {
    /// Curvature term at 1 T (per GeV)
    pub curvature_term: f64,
    /// Multiple-scattering term at 1 T
    pub scattering_term: f64,
    /// Calorimeter stochastic term (GeV^1/2)
    pub calorimeter_stochastic: f64,
    /// Probability to reconstruct a final-state particle
    pub efficiency: f64,
}

impl SmearingModel {
    /// Drift-chamber tracker with low material
    pub fn idea() -> Self {
        Self {
            curvature_term: 2.0e-5,
            scattering_term: 1.5e-3,
            calorimeter_stochastic: 0.11,
            efficiency: 0.99,
        }
    }

    /// All-silicon tracker
    pub fn cld() -> Self {
        Self {
            curvature_term: 1.5e-5,
            scattering_term: 3.0e-3,
            calorimeter_stochastic: 0.15,
            efficiency: 0.98,
        }
    }

    /// Preset by detector label, case-insensitive
    pub fn for_detector(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "IDEA" => Some(Self::idea()),
            "CLD" => Some(Self::cld()),
            _ => None,
        }
    }

    /// Relative pT resolution at `pt` GeV in a `field` T solenoid
    pub fn relative_pt_resolution(&self, pt: f64, field: f64) -> f64 {
        let curvature = self.curvature_term * pt / field;
        let scattering = self.scattering_term / field;
        curvature.hypot(scattering)
    }
}

/// Generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Number of events
    pub events: usize,
    /// Solenoid field (T)
    pub field: f64,
    /// RNG seed
    pub seed: u64,
    /// Detector response
    pub model: SmearingModel,
    /// Mean number of charged hadrons per event
    pub hadrons_mean: f64,
    /// Mean number of photons per event
    pub photons_mean: f64,
    /// Mean momentum of hadrons and photons (GeV)
    pub soft_momentum_mean: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            events: 1000,
            field: 2.0,
            seed: 42,
            model: SmearingModel::idea(),
            hadrons_mean: 8.0,
            photons_mean: 4.0,
            soft_momentum_mean: 2.0,
        }
    }
}

impl SyntheticConfig {
    fn validate(&self) -> Result<(), EventError> {
        if !(self.field.is_finite() && self.field > 0.0) {
            return Err(EventError::InvalidConfig(format!(
                "field must be positive, got {}",
                self.field
            )));
        }
        if !(0.0..=1.0).contains(&self.model.efficiency) {
            return Err(EventError::InvalidConfig(format!(
                "efficiency must be in [0, 1], got {}",
                self.model.efficiency
            )));
        }
        if !(self.soft_momentum_mean.is_finite() && self.soft_momentum_mean > 0.0) {
            return Err(EventError::InvalidConfig(format!(
                "soft momentum mean must be positive, got {}",
                self.soft_momentum_mean
            )));
        }
        if self.hadrons_mean < 0.0 || self.photons_mean < 0.0 {
            return Err(EventError::InvalidConfig(
                "multiplicities must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct Species {
    mass: f64,
    charge: f32,
    muon: bool,
}

struct Generator<'a> {
    config: &'a SyntheticConfig,
    rng: StdRng,
    soft_momentum: Exp<f64>,
    hadrons: Option<Poisson<f64>>,
    photons: Option<Poisson<f64>>,
}

impl<'a> Generator<'a> {
    fn new(config: &'a SyntheticConfig) -> Result<Self, EventError> {
        config.validate()?;
        let soft_momentum = Exp::new(1.0 / config.soft_momentum_mean)
            .map_err(|e| EventError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
            soft_momentum,
            hadrons: multiplicity(config.hadrons_mean)?,
            photons: multiplicity(config.photons_mean)?,
        })
    }

    fn direction(&mut self) -> [f64; 3] {
        let cos_theta = self.rng.gen_range(-MAX_COS_THETA..MAX_COS_THETA);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        let phi = self.rng.gen_range(0.0..2.0 * PI);
        [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]
    }

    fn count(&mut self, distribution: Option<Poisson<f64>>) -> usize {
        distribution.map_or(0, |d| d.sample(&mut self.rng) as usize)
    }

    fn truth_particle(momentum: f64, direction: [f64; 3], species: Species) -> ParticleRecord {
        let [x, y, z] = direction.map(|c| c * momentum);
        let energy = momentum.hypot(species.mass);
        ParticleRecord::from_momentum(x as f32, y as f32, z as f32)
            .with_energy(energy as f32)
            .with_charge(species.charge)
            .with_generator_status(FINAL_STATE_STATUS)
    }

    fn smear(&mut self, truth: &ParticleRecord, species: Species) -> ParticleRecord {
        let gauss: f64 = self.rng.sample(StandardNormal);
        let scale = if species.charge != 0.0 {
            let pt = f64::from(truth.pt());
            1.0 + gauss * self.config.model.relative_pt_resolution(pt, self.config.field)
        } else {
            let energy = f64::from(truth.energy).max(1e-3);
            1.0 + gauss * self.config.model.calorimeter_stochastic / energy.sqrt()
        };
        let scale = scale.max(0.05);

        let px = f64::from(truth.px) * scale;
        let py = f64::from(truth.py) * scale;
        let pz = f64::from(truth.pz) * scale;
        let momentum = (px * px + py * py + pz * pz).sqrt();
        ParticleRecord::from_momentum(px as f32, py as f32, pz as f32)
            .with_energy(momentum.hypot(species.mass) as f32)
            .with_charge(truth.charge)
    }

    fn event(&mut self, number: i64) -> Result<Event, EventError> {
        let mut truth = vec![ParticleRecord::from_momentum(0.0, 0.0, 0.0)
            .with_energy(Z_MASS as f32)
            .with_generator_status(INTERMEDIATE_STATUS)];
        let mut species = vec![Species {
            mass: Z_MASS,
            charge: 0.0,
            muon: false,
        }];

        // back-to-back muon pair from a Z at rest
        let muon_momentum = ((Z_MASS / 2.0).powi(2) - MUON_MASS * MUON_MASS).sqrt();
        let axis = self.direction();
        for (sign, charge) in [(1.0, -1.0_f32), (-1.0, 1.0)] {
            let s = Species {
                mass: MUON_MASS,
                charge,
                muon: true,
            };
            truth.push(Self::truth_particle(muon_momentum, axis.map(|c| c * sign), s));
            species.push(s);
        }

        let hadrons = self.count(self.hadrons);
        for _ in 0..hadrons {
            let momentum = self.soft_momentum.sample(&mut self.rng);
            let charge = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            let s = Species {
                mass: PION_MASS,
                charge,
                muon: false,
            };
            let direction = self.direction();
            truth.push(Self::truth_particle(momentum, direction, s));
            species.push(s);
        }

        let photons = self.count(self.photons);
        for _ in 0..photons {
            let momentum = self.soft_momentum.sample(&mut self.rng);
            let s = Species {
                mass: 0.0,
                charge: 0.0,
                muon: false,
            };
            let direction = self.direction();
            truth.push(Self::truth_particle(momentum, direction, s));
            species.push(s);
        }

        let mut reco = Vec::new();
        let mut reco_index = Vec::new();
        let mut truth_index = Vec::new();
        let mut muons = Vec::new();
        for (position, (particle, s)) in truth.iter().zip(&species).enumerate() {
            if !particle.is_final_state() || !self.rng.gen_bool(self.config.model.efficiency) {
                continue;
            }
            let reco_position = to_index(reco.len())?;
            if s.muon {
                muons.push(reco_position);
            }
            reco.push(self.smear(particle, *s));
            reco_index.push(reco_position);
            truth_index.push(to_index(position)?);
        }

        Ok(Event {
            number,
            reco,
            truth,
            associations: AssociationTable::new(reco_index, truth_index)?,
            muons,
        })
    }
}

fn multiplicity(mean: f64) -> Result<Option<Poisson<f64>>, EventError> {
    if mean == 0.0 {
        return Ok(None);
    }
    Poisson::new(mean)
        .map(Some)
        .map_err(|e| EventError::InvalidConfig(e.to_string()))
}

fn to_index(position: usize) -> Result<i32, EventError> {
    i32::try_from(position)
        .map_err(|_| EventError::InvalidConfig(format!("collection position {} overflows", position)))
}

/// Generate `config.events` events.
///
/// The same configuration always produces the same events.
pub fn generate(config: &SyntheticConfig) -> Result<Vec<Event>, EventError> {
    let mut generator = Generator::new(config)?;
    let events = (0..config.events)
        .map(|n| generator.event(n as i64))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Generated {} events at {} T ({} particles)",
        events.len(),
        config.field,
        events.iter().map(Event::particle_count).sum::<usize>()
    );
    Ok(events)
}
