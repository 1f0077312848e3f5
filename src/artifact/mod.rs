//! # Histogram artifacts
//!
//! A sample's filled histograms are persisted as one Parquet file with one row per
//! named histogram (see [`crate::schema`] for the layout). [`HistogramWriter`]
//! streams histograms into the file; [`HistogramFile`] loads all of them and serves
//! keyed lookups, which is what the scan stage needs: one histogram per sample.

mod error;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use error::ArtifactError;
pub use reader::HistogramFile;
pub use writer::{ArtifactStats, HistogramWriter, HistogramWriterConfig};
