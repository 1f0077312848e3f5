use super::*;
use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;

#[test]
fn test_event_schema_creation() {
    let schema = create_event_schema();
    assert_eq!(schema.fields().len(), 15);

    assert!(schema.field_with_name(event_columns::EVENT).is_ok());
    assert!(schema.field_with_name(event_columns::ASSOC_RECO_INDEX).is_ok());
    assert!(schema.field_with_name(event_columns::MUON_INDEX).is_ok());

    let px = schema.field_with_name(event_columns::RECO_PX).unwrap();
    assert_eq!(px.metadata().get("unit").unwrap(), "GeV");
}

#[test]
fn test_event_schema_validation() {
    let schema = create_event_schema();
    assert!(validate_event_schema(&schema).is_ok());
}

#[test]
fn test_histogram_schema_validation() {
    let schema = create_histogram_schema();
    assert!(validate_histogram_schema(&schema).is_ok());
    assert_eq!(
        schema.metadata().get(KEY_FORMAT_VERSION).map(String::as_str),
        Some(ARTIFACT_FORMAT_VERSION)
    );
}

#[test]
fn test_missing_column_is_reported() {
    let schema = Schema::new(vec![Field::new(event_columns::EVENT, DataType::Int64, false)]);
    match validate_event_schema(&schema) {
        Err(SchemaValidationError::MissingColumn(name)) => assert_eq!(name, event_columns::RECO_PX),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_type_mismatch_is_reported() {
    let schema = Schema::new(vec![
        Field::new(histogram_columns::NAME, DataType::Utf8, false),
        Field::new(histogram_columns::LO, DataType::Float32, false),
    ]);
    assert!(matches!(
        validate_histogram_schema(&schema),
        Err(SchemaValidationError::TypeMismatch { .. })
    ));
}

#[test]
fn test_nullable_list_items_are_accepted() {
    let nullable_list = DataType::List(Arc::new(Field::new("item", DataType::Float64, true)));
    let schema = Schema::new(vec![
        Field::new(histogram_columns::NAME, DataType::Utf8, false),
        Field::new(histogram_columns::LO, DataType::Float64, false),
        Field::new(histogram_columns::HI, DataType::Float64, false),
        Field::new(histogram_columns::N_BINS, DataType::UInt32, false),
        Field::new(histogram_columns::ENTRIES, DataType::UInt64, false),
        Field::new(histogram_columns::CONTENTS, nullable_list, true),
    ]);
    assert!(validate_histogram_schema(&schema).is_ok());
}
