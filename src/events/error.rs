use crate::association::AssociationError;
use crate::schema::SchemaValidationError;

/// Errors that can occur while reading, writing or generating events
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// The file does not have the event layout
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaValidationError),

    /// Association columns of one event differ in length
    #[error("Association error in event: {0}")]
    AssociationError(#[from] AssociationError),

    /// Column not found
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Per-particle columns of one collection differ in length
    #[error("Event {event}: column '{column}' has {found} values, expected {expected}")]
    InconsistentEvent {
        /// Event number
        event: i64,
        /// Offending column
        column: String,
        /// Length of the collection's momentum column
        expected: usize,
        /// Length found
        found: usize,
    },

    /// Generator settings are out of range
    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),
}
