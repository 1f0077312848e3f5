//! # Column layouts
//!
//! Arrow schemas for the two Parquet tables the crate reads and writes.
//!
//! ## Event table
//!
//! One row per event. Particle collections are stored as list columns of equal
//! length per event ("wide" layout), index columns as lists of Int32.
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | event | Int64 | Event number |
//! | reco_px, reco_py, reco_pz | `List<Float32>` | Reconstructed momentum components (GeV) |
//! | reco_e | `List<Float32>` | Reconstructed energy (GeV) |
//! | reco_charge | `List<Float32>` | Reconstructed charge |
//! | mc_px, mc_py, mc_pz | `List<Float32>` | Generated momentum components (GeV) |
//! | mc_e | `List<Float32>` | Generated energy (GeV) |
//! | mc_charge | `List<Float32>` | Generated charge |
//! | mc_generator_status | `List<Int32>` | Generator status, 1 for final state |
//! | assoc_reco_index | `List<Int32>` | Association table, reconstructed side |
//! | assoc_mc_index | `List<Int32>` | Association table, generated side |
//! | muon_index | `List<Int32>` | Positions of muons in the reconstructed collection |
//!
//! ## Histogram table
//!
//! One row per named histogram; bin contents are a single list value.
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | name | Utf8 | Histogram key |
//! | lo, hi | Float64 | Axis range |
//! | n_bins | UInt32 | Number of bins |
//! | entries | UInt64 | Number of fills |
//! | contents | `List<Float64>` | Bin contents |

mod builders;
mod constants;
/// Event table column names.
pub mod event_columns;
/// Histogram table column names.
pub mod histogram_columns;
mod validation;

#[cfg(test)]
mod tests;

pub use builders::{
    create_event_schema, create_event_schema_arc, create_histogram_schema,
    create_histogram_schema_arc,
};
pub use constants::*;
pub use validation::{validate_event_schema, validate_histogram_schema, SchemaValidationError};
