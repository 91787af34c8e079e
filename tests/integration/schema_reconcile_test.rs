use std::sync::Arc;

use arrow::array::{Array, AsArray, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use table_caster::schema::adapt::check_schema_compatibility;
use table_caster::{CastError, cast_arrow_table_to_schema, update_existing_schema};

use crate::utils::{all_categories_batch, all_categories_metadata, string_batch};

#[test]
fn test_merge_by_name_never_grows_the_schema() {
    let current = Schema::new(vec![
        Field::new("a", DataType::Utf8, true),
        Field::new("b", DataType::Utf8, true),
    ]);
    let new = Schema::new(vec![
        Field::new("b", DataType::Int64, false),
        Field::new("c", DataType::Boolean, true),
    ]);

    let merged = update_existing_schema(&current, &new);

    assert_eq!(merged.fields().len(), 2);
    assert_eq!(merged.field(0), current.field(0));
    assert_eq!(merged.field(1), new.field(0));
    assert!(merged.field_with_name("c").is_err());
}

#[test]
fn test_partial_schema_cast() {
    let batch = string_batch(vec![
        ("id", vec![Some("1"), Some("2")]),
        ("note", vec![Some("a"), None]),
    ]);
    let target = Schema::new(vec![Field::new("id", DataType::Int64, true)]);

    let cast = cast_arrow_table_to_schema(&batch, &target, false).unwrap();

    assert_eq!(cast.column(0).as_primitive::<Int64Type>().value(1), 2);
    assert_eq!(cast.schema().field(1).data_type(), &DataType::Utf8);
}

#[test]
fn test_full_schema_cast_rejects_missing_fields() {
    let batch = string_batch(vec![("id", vec![Some("1")]), ("note", vec![Some("a")])]);
    let target = Schema::new(vec![Field::new("id", DataType::Int64, true)]);

    let err = cast_arrow_table_to_schema(&batch, &target, true).unwrap_err();
    assert!(matches!(err, CastError::Value(_)));
}

#[test]
fn test_full_schema_cast_rejects_bad_values() {
    let batch = string_batch(vec![("id", vec![Some("one")])]);
    let target = Schema::new(vec![Field::new("id", DataType::Int64, true)]);

    assert!(cast_arrow_table_to_schema(&batch, &target, true).is_err());
}

#[test]
fn test_schema_from_metadata_drives_the_engine_cast() {
    let batch = all_categories_batch();
    let target = all_categories_metadata().to_arrow_schema().unwrap();

    let report = check_schema_compatibility(&batch.schema(), &target);
    assert!(report.compatible);
    assert_eq!(report.adaptations.len(), 5);

    let cast = cast_arrow_table_to_schema(&batch, &target, true).unwrap();
    assert_eq!(cast.schema().field(4).data_type(), &DataType::Date32);
    let born = cast.column(4).as_primitive::<Date32Type>();
    assert!(born.is_valid(0));
    assert!(born.is_null(2));
}

#[test]
fn test_engine_cast_keeps_schema_metadata() {
    let schema = Schema::new(vec![Field::new("id", DataType::Utf8, true)])
        .with_metadata([("source".to_string(), "csv".to_string())].into());
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(StringArray::from(vec!["7"]))],
    )
    .unwrap();
    let target = Schema::new(vec![Field::new("id", DataType::Int64, true)]);

    let cast = cast_arrow_table_to_schema(&batch, &target, false).unwrap();
    assert_eq!(
        cast.schema().metadata().get("source").map(String::as_str),
        Some("csv")
    );
}
