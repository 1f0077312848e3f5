//! # resoscan - Momentum Resolution Scans
//!
//! `resoscan` measures how well a particle detector reconstructs momentum. It pairs
//! reconstructed particles with their simulated ("truth") counterparts, histograms
//! the per-particle resolution, reduces each histogram to a handful of summary
//! statistics and assembles those statistics into curves across a scan of detector
//! configurations (for example the solenoid field strength).
//!
//! ## Pipeline
//!
//! ```text
//! events.parquet ──analyze──▶ <sample>.hist.parquet ──reduce──▶ SampleStatistic
//!                                                                    │
//!                              scan.toml ──scan──▶ ScanReport ◀──────┘
//!                                                      │
//!                                                      ▼
//!                                             curves (CSV / JSON)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use resoscan::prelude::*;
//!
//! // Fill histograms from synthetic events
//! let events = generate(&SyntheticConfig { events: 200, ..Default::default() })?;
//! let mut analysis = Analysis::new(AnalysisConfig::default())?;
//! for event in &events {
//!     analysis.process_event(event);
//! }
//! let histograms = analysis.finish();
//!
//! // Reduce the pT resolution histogram
//! let res_pt = histograms.iter().find(|h| h.name() == "muons_res_pt").unwrap();
//! let stat = reduce_with(&res_pt.rebin(10)?, &ReduceConfig::default())?;
//! println!("{}", stat.percent());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`particle`]: the particle record shared by reconstructed and truth collections
//! - [`association`]: reco-to-truth association table and index
//! - [`resolution`]: per-particle resolution values and the sentinel policy
//! - [`histogram`]: fixed-width histograms with quantiles and rebinning
//! - [`fit`]: Gaussian least-squares fit of a histogram peak
//! - [`reducer`]: histogram to [`reducer::SampleStatistic`]
//! - [`scan`]: scan runner, warnings and curve aggregation
//! - [`schema`]: Arrow schemas of the event and histogram files
//! - [`events`]: event Parquet reader/writer and the synthetic generator
//! - [`artifact`]: histogram artifact reader/writer
//! - [`analysis`]: per-event histogram filling
//!
//! ## Sentinel Values
//!
//! A particle whose resolution cannot be computed (no truth match, near-zero
//! momentum) yields [`resolution::SENTINEL`] (`-998`) instead of an error. Whether
//! such values reach the histograms is decided by [`resolution::SentinelPolicy`];
//! by default they are kept and land in the first bin.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod artifact;
pub mod association;
pub mod events;
pub mod fit;
pub mod histogram;
pub mod particle;
pub mod reducer;
pub mod resolution;
pub mod scan;
pub mod schema;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::analysis::{run_analysis, Analysis, AnalysisConfig, AnalysisError, AnalysisStats};
    pub use crate::artifact::{ArtifactError, HistogramFile, HistogramWriter, HistogramWriterConfig};
    pub use crate::association::{AssociationError, AssociationIndex, AssociationTable};
    pub use crate::events::synthetic::{generate, SmearingModel, SyntheticConfig};
    pub use crate::events::{Event, EventError, EventReader, EventWriter, EventWriterConfig};
    pub use crate::fit::{fit_gaussian, GaussianFit};
    pub use crate::histogram::{Histogram1D, HistogramError};
    pub use crate::particle::ParticleRecord;
    pub use crate::reducer::{reduce, reduce_with, FitWindow, ReduceConfig, ReduceError, SampleStatistic};
    pub use crate::resolution::{extract, PositionLookup, Quantity, SentinelPolicy, SENTINEL};
    pub use crate::scan::{
        aggregate, ArtifactSource, Estimator, SampleSpec, ScanCurve, ScanReport, ScanRunner,
    };
}
