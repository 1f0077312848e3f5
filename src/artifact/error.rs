use crate::histogram::HistogramError;
use crate::schema::SchemaValidationError;

/// Errors that can occur while writing or reading histogram artifacts
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// The file is not a histogram table
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaValidationError),

    /// A stored row does not describe a valid histogram
    #[error("Invalid histogram '{name}': {source}")]
    InvalidHistogram {
        /// Histogram key
        name: String,
        /// Underlying binning error
        source: HistogramError,
    },

    /// Stored bin count disagrees with the contents list
    #[error("Histogram '{name}' declares {declared} bins but stores {stored}")]
    BinCountMismatch {
        /// Histogram key
        name: String,
        /// Value of the `n_bins` column
        declared: usize,
        /// Length of the `contents` list
        stored: usize,
    },

    /// The same key was written twice
    #[error("Duplicate histogram: {0}")]
    DuplicateHistogram(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
