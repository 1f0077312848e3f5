use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::constants::{ARTIFACT_FORMAT_VERSION, KEY_FORMAT_VERSION, KEY_SCHEMA_DESCRIPTION};
use super::{event_columns, histogram_columns};

/// Creates a Field with a physical unit annotation
fn field_with_unit(name: &str, data_type: DataType, nullable: bool, unit: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("unit".to_string(), unit.to_string());
    Field::new(name, data_type, nullable).with_metadata(metadata)
}

fn list_field(name: &str, item: DataType, unit: &str) -> Field {
    field_with_unit(
        name,
        DataType::List(Arc::new(Field::new("item", item, false))),
        false,
        unit,
    )
}

/// Creates the event table schema.
///
/// # Example
///
/// ```
/// use resoscan::schema::create_event_schema;
///
/// let schema = create_event_schema();
/// assert_eq!(schema.fields().len(), 15);
/// ```
pub fn create_event_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder.push(Field::new(event_columns::EVENT, DataType::Int64, false));

    let units = ["GeV", "GeV", "GeV", "GeV", "e"];
    for (name, unit) in event_columns::RECO_FLOAT_COLUMNS.iter().zip(units) {
        builder.push(list_field(name, DataType::Float32, unit));
    }
    for (name, unit) in event_columns::MC_FLOAT_COLUMNS.iter().zip(units) {
        builder.push(list_field(name, DataType::Float32, unit));
    }

    // Index columns are dimensionless positions
    for name in event_columns::INDEX_COLUMNS {
        builder.push(list_field(name, DataType::Int32, "1"));
    }

    let mut metadata = HashMap::new();
    metadata.insert(
        KEY_SCHEMA_DESCRIPTION.to_string(),
        "Per-event reconstructed and generated particle collections with association table"
            .to_string(),
    );

    builder.finish().with_metadata(metadata)
}

/// Returns an Arc-wrapped event schema for shared ownership
pub fn create_event_schema_arc() -> Arc<Schema> {
    Arc::new(create_event_schema())
}

/// Creates the histogram artifact schema.
///
/// ```
/// use resoscan::schema::create_histogram_schema;
///
/// let schema = create_histogram_schema();
/// assert_eq!(schema.fields().len(), 6);
/// ```
pub fn create_histogram_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder.push(Field::new(histogram_columns::NAME, DataType::Utf8, false));
    builder.push(Field::new(histogram_columns::LO, DataType::Float64, false));
    builder.push(Field::new(histogram_columns::HI, DataType::Float64, false));
    builder.push(Field::new(histogram_columns::N_BINS, DataType::UInt32, false));
    builder.push(Field::new(histogram_columns::ENTRIES, DataType::UInt64, false));
    builder.push(Field::new(
        histogram_columns::CONTENTS,
        DataType::List(Arc::new(Field::new("item", DataType::Float64, false))),
        false,
    ));

    let mut metadata = HashMap::new();
    metadata.insert(KEY_FORMAT_VERSION.to_string(), ARTIFACT_FORMAT_VERSION.to_string());
    metadata.insert(
        KEY_SCHEMA_DESCRIPTION.to_string(),
        "Fixed-width 1-D histograms, one row per named histogram".to_string(),
    );

    builder.finish().with_metadata(metadata)
}

/// Returns an Arc-wrapped histogram schema for shared ownership
pub fn create_histogram_schema_arc() -> Arc<Schema> {
    Arc::new(create_histogram_schema())
}
