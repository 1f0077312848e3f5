use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};

use super::{event_columns, histogram_columns};

fn list_of(item: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", item, false)))
}

fn check_columns(schema: &Schema, required: &[(&str, DataType)]) -> Result<(), SchemaValidationError> {
    for (name, expected_type) in required {
        match schema.field_with_name(name) {
            Ok(field) => {
                // nullability of list items is not significant
                let matches = match (field.data_type(), expected_type) {
                    (DataType::List(found), DataType::List(expected)) => {
                        found.data_type() == expected.data_type()
                    }
                    (found, expected) => found == expected,
                };
                if !matches {
                    return Err(SchemaValidationError::TypeMismatch {
                        column: name.to_string(),
                        expected: format!("{:?}", expected_type),
                        found: format!("{:?}", field.data_type()),
                    });
                }
            }
            Err(_) => {
                return Err(SchemaValidationError::MissingColumn(name.to_string()));
            }
        }
    }
    Ok(())
}

/// Validates that a schema carries every event column with the expected type.
///
/// Extra columns are allowed.
pub fn validate_event_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    let mut required = vec![(event_columns::EVENT, DataType::Int64)];
    for name in event_columns::RECO_FLOAT_COLUMNS
        .iter()
        .chain(event_columns::MC_FLOAT_COLUMNS.iter())
    {
        required.push((*name, list_of(DataType::Float32)));
    }
    for name in event_columns::INDEX_COLUMNS.iter() {
        required.push((*name, list_of(DataType::Int32)));
    }
    check_columns(schema, &required)
}

/// Validates that a schema is a histogram table.
pub fn validate_histogram_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    check_columns(
        schema,
        &[
            (histogram_columns::NAME, DataType::Utf8),
            (histogram_columns::LO, DataType::Float64),
            (histogram_columns::HI, DataType::Float64),
            (histogram_columns::N_BINS, DataType::UInt32),
            (histogram_columns::ENTRIES, DataType::UInt64),
            (histogram_columns::CONTENTS, list_of(DataType::Float64)),
        ],
    )
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A column has an incorrect data type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the column with the type mismatch
        column: String,
        /// Expected data type
        expected: String,
        /// Actual data type found
        found: String,
    },
}
