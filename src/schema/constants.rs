/// Histogram artifact format version - follows semantic versioning
pub const ARTIFACT_FORMAT_VERSION: &str = "1.0.0";

/// File extension for histogram artifacts
pub const ARTIFACT_EXTENSION: &str = ".hist.parquet";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "resoscan:format_version";

/// Metadata key for creation timestamp
pub const KEY_CREATED: &str = "resoscan:created";

/// Metadata key for the event files a histogram artifact was filled from
pub const KEY_SOURCE: &str = "resoscan:source";

/// Metadata key for the table description
pub const KEY_SCHEMA_DESCRIPTION: &str = "resoscan:schema_description";
