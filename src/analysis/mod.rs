//! # Per-event analysis
//!
//! Fills the histograms of one sample from its events:
//!
//! - `muons_p`, `muons_pt`: kinematics of the muon candidates,
//! - `muons_res_<q>`: resolution of each configured [`Quantity`] for the muon
//!   candidates, after the [`SentinelPolicy`],
//! - with `hadronic` enabled: `qq_res` (`1/ΣE_reco - 1/ΣE_truth` over final-state
//!   truth), `reco_e_tot`, `inv_pt` of charged reconstructed particles and
//!   `inv_pt_res`, the positional difference of charged reco and truth `1/pT`.
//!
//! Every step is one of the pure functions of [`crate::resolution`]; the analysis
//! only wires them to histograms.
//!
//! ```
//! use resoscan::analysis::{Analysis, AnalysisConfig};
//! use resoscan::events::synthetic::{generate, SyntheticConfig};
//!
//! let events = generate(&SyntheticConfig { events: 20, ..Default::default() })?;
//! let mut analysis = Analysis::new(AnalysisConfig::default())?;
//! for event in &events {
//!     analysis.process_event(event);
//! }
//! let histograms = analysis.finish();
//! assert!(histograms.iter().any(|h| h.name() == "muons_res_pt"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactError, ArtifactStats, HistogramWriter, HistogramWriterConfig};
use crate::events::{Event, EventError, EventReader};
use crate::histogram::{Histogram1D, HistogramError};
use crate::particle::ParticleRecord;
use crate::resolution::{
    energy_sum, extract_with, inverse_energy_difference, inverse_pt_values, is_sentinel,
    pairwise_difference, select_charged, Quantity,
};

pub use config::{default_binning, names, resolution_key, AnalysisConfig, Binning};

/// Errors that stop an analysis run
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A histogram key has neither an override nor a built-in axis
    #[error("No binning for histogram: {0}")]
    MissingBinning(String),

    /// An axis is invalid
    #[error("Histogram error: {0}")]
    Histogram(#[from] HistogramError),

    /// Reading events failed
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    /// Writing the artifact failed
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Nothing to analyze
    #[error("No input files")]
    NoInputs,
}

/// Counters collected while processing events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Events processed
    pub events: u64,
    /// Muon candidates seen
    pub muon_candidates: u64,
    /// Resolution values computed, sentinels included
    pub resolution_values: u64,
    /// Resolution values equal to the sentinel
    pub sentinels: u64,
    /// Resolution values dropped by the policy
    pub rejected: u64,
}

impl std::fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} events, {} muon candidates, {} resolution values ({} sentinels, {} rejected)",
            self.events, self.muon_candidates, self.resolution_values, self.sentinels, self.rejected
        )
    }
}

struct HadronicHistograms {
    qq_res: Histogram1D,
    reco_e_tot: Histogram1D,
    inv_pt: Histogram1D,
    inv_pt_res: Histogram1D,
}

/// Histogram filler for one sample
pub struct Analysis {
    config: AnalysisConfig,
    muons_p: Histogram1D,
    muons_pt: Histogram1D,
    resolutions: Vec<(Quantity, Histogram1D)>,
    hadronic: Option<HadronicHistograms>,
    stats: AnalysisStats,
}

impl Analysis {
    /// Book every histogram the configuration asks for
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let book = |name: &str| -> Result<Histogram1D, AnalysisError> {
            let binning = config
                .binning_for(name)
                .ok_or_else(|| AnalysisError::MissingBinning(name.to_string()))?;
            Ok(binning.histogram(name)?)
        };

        let mut resolutions = Vec::with_capacity(config.quantities.len());
        for &quantity in &config.quantities {
            if resolutions.iter().any(|(q, _)| *q == quantity) {
                continue;
            }
            resolutions.push((quantity, book(&resolution_key(quantity))?));
        }

        let hadronic = if config.hadronic {
            Some(HadronicHistograms {
                qq_res: book(names::QQ_RES)?,
                reco_e_tot: book(names::RECO_E_TOT)?,
                inv_pt: book(names::INV_PT)?,
                inv_pt_res: book(names::INV_PT_RES)?,
            })
        } else {
            None
        };

        Ok(Self {
            muons_p: book(names::MUONS_P)?,
            muons_pt: book(names::MUONS_PT)?,
            resolutions,
            hadronic,
            stats: AnalysisStats::default(),
            config,
        })
    }

    /// Fill the histograms with one event
    pub fn process_event(&mut self, event: &Event) {
        self.stats.events += 1;

        let index = event.association_index();
        let muons = event.muon_candidates();
        self.stats.muon_candidates += muons.len() as u64;

        self.muons_p.fill_all(muons.iter().map(ParticleRecord::p));
        self.muons_pt.fill_all(muons.iter().map(ParticleRecord::pt));

        for (quantity, hist) in &mut self.resolutions {
            let values = extract_with(
                self.config.lookup,
                &muons,
                &event.reco,
                &index,
                &event.truth,
                *quantity,
            );
            let kept = self.config.policy.apply(&values);

            self.stats.resolution_values += values.len() as u64;
            self.stats.sentinels += values.iter().filter(|v| is_sentinel(**v)).count() as u64;
            self.stats.rejected += (values.len() - kept.len()) as u64;
            hist.fill_all(kept);
        }

        if let Some(hadronic) = &mut self.hadronic {
            let qq = inverse_energy_difference(&event.reco, &event.final_state_truth());
            if self.config.policy.accepts(qq) {
                hadronic.qq_res.fill(f64::from(qq));
            }
            hadronic.reco_e_tot.fill(f64::from(energy_sum(&event.reco)));

            // charged truth includes non-final-state particles
            let reco_inv_pt = inverse_pt_values(&event.charged_reco());
            let truth_inv_pt = inverse_pt_values(&select_charged(&event.truth));
            hadronic
                .inv_pt_res
                .fill_all(pairwise_difference(&reco_inv_pt, &truth_inv_pt));
            hadronic.inv_pt.fill_all(reco_inv_pt);
        }
    }

    /// Counters so far
    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }

    /// Filled histograms in booking order
    pub fn finish(self) -> Vec<Histogram1D> {
        let mut histograms = vec![self.muons_p, self.muons_pt];
        histograms.extend(self.resolutions.into_iter().map(|(_, hist)| hist));
        if let Some(h) = self.hadronic {
            histograms.extend([h.qq_res, h.reco_e_tot, h.inv_pt, h.inv_pt_res]);
        }
        histograms
    }
}

/// Outcome of [`run_analysis`]
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Event-level counters
    pub stats: AnalysisStats,
    /// Artifact writer statistics
    pub artifact: ArtifactStats,
}

/// Analyze `inputs` in order and write one histogram artifact to `output`.
pub fn run_analysis(
    inputs: &[PathBuf],
    output: &Path,
    config: &AnalysisConfig,
) -> Result<AnalysisRun, AnalysisError> {
    if inputs.is_empty() {
        return Err(AnalysisError::NoInputs);
    }

    let mut analysis = Analysis::new(config.clone())?;
    for input in inputs {
        let reader = EventReader::open(input)?;
        info!("Processing {} ({} events)", input.display(), reader.num_events());
        for event in reader.events()? {
            analysis.process_event(&event?);
        }
        debug!("After {}: {}", input.display(), analysis.stats());
    }

    let stats = analysis.stats().clone();
    let histograms = analysis.finish();
    let artifact = write_artifact(&histograms, output, &source_description(inputs))?;

    info!("{}", stats);
    info!("{} -> {}", artifact, output.display());
    Ok(AnalysisRun { stats, artifact })
}

/// Write filled histograms to a new artifact file.
pub fn write_artifact(
    histograms: &[Histogram1D],
    output: &Path,
    source: &str,
) -> Result<ArtifactStats, AnalysisError> {
    let mut writer = HistogramWriter::new_file(output, source, HistogramWriterConfig::default())?;
    writer.write_histograms(histograms)?;
    Ok(writer.finish()?)
}

fn source_description(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
