//! # Event tables
//!
//! Reading and writing per-event particle collections stored in Parquet, plus a
//! seeded generator of synthetic events.
//!
//! Every event carries the full reconstructed and generated collections, the
//! association table linking them, and the positions of muons inside the
//! reconstructed collection. See [`crate::schema`] for the column layout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use resoscan::events::EventReader;
//!
//! let reader = EventReader::open("sample.parquet")?;
//! for event in reader.events()? {
//!     let event = event?;
//!     println!("event {}: {} reconstructed particles", event.number, event.reco.len());
//! }
//! # Ok::<(), resoscan::events::EventError>(())
//! ```

mod error;
mod reader;
pub mod synthetic;
mod utils;
mod writer;


use serde::{Deserialize, Serialize};

use crate::association::{AssociationIndex, AssociationTable};
use crate::particle::ParticleRecord;
use crate::resolution::{final_state, gather, select_charged};

pub use error::EventError;
pub use reader::{EventBatchIterator, EventIterator, EventReader, EventReaderConfig};
pub use writer::{EventWriter, EventWriterConfig, EventWriterStats};

/// One collision event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    /// Event number
    pub number: i64,
    /// Full reconstructed collection
    pub reco: Vec<ParticleRecord>,
    /// Full generated collection
    pub truth: Vec<ParticleRecord>,
    /// Reco-to-truth association table
    pub associations: AssociationTable,
    /// Positions of muons in `reco`
    pub muons: Vec<i32>,
}

impl Event {
    /// Empty event with the given number
    pub fn new(number: i64) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// Last-write-wins lookup built from the association table
    pub fn association_index(&self) -> AssociationIndex {
        AssociationIndex::build(&self.associations)
    }

    /// Reconstructed muons, skipping out-of-range positions
    pub fn muon_candidates(&self) -> Vec<ParticleRecord> {
        gather(&self.muons, &self.reco)
    }

    /// Reconstructed particles with non-zero charge
    pub fn charged_reco(&self) -> Vec<ParticleRecord> {
        select_charged(&self.reco)
    }

    /// Generated particles with final-state generator status
    pub fn final_state_truth(&self) -> Vec<ParticleRecord> {
        final_state(&self.truth)
    }

    /// Number of particles across both collections
    pub fn particle_count(&self) -> usize {
        self.reco.len() + self.truth.len()
    }
}

/// Per-file event counts reported by `info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Number of events
    pub events: usize,
    /// Reconstructed particles over all events
    pub reco_particles: usize,
    /// Generated particles over all events
    pub truth_particles: usize,
    /// Association pairs over all events
    pub associations: usize,
    /// Muon candidates over all events
    pub muons: usize,
}

impl EventSummary {
    /// Add one event to the summary
    pub fn add(&mut self, event: &Event) {
        self.events += 1;
        self.reco_particles += event.reco.len();
        self.truth_particles += event.truth.len();
        self.associations += event.associations.len();
        self.muons += event.muons.len();
    }
}

impl std::fmt::Display for EventSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} events, {} reconstructed / {} generated particles, {} associations, {} muons",
            self.events, self.reco_particles, self.truth_particles, self.associations, self.muons
        )
    }
}
