use serde_json::json;
use table_caster::config::TimestampRepresentation;
use table_caster::{
    CastError, CastPolicy, ErrorPolicy, Metadata, TypeCategory, cast_table_to_schema,
};

use crate::utils::{all_categories_batch, all_categories_metadata};

#[test]
fn test_mapping_and_metadata_cast_identically() {
    let metadata = all_categories_metadata();
    let mapping = metadata.to_json_value().unwrap();
    let batch = all_categories_batch();
    let policy = CastPolicy::default();

    let from_struct = cast_table_to_schema(&batch, &metadata, &policy).unwrap();
    let from_mapping = cast_table_to_schema(&batch, &mapping, &policy).unwrap();

    assert_eq!(from_struct, from_mapping);
}

#[test]
fn test_categories_are_filled_from_types() {
    let mut metadata = Metadata::from_json_str(
        r#"{
            "name": "events",
            "columns": [
                {"name": "id", "type": "uint32"},
                {"name": "when", "type": "timestamp(ms)"},
                {"name": "tags", "type": "list<string>"},
                {"name": "label", "type_category": "string"}
            ]
        }"#,
    )
    .unwrap();

    metadata.set_col_type_category_from_types().unwrap();

    let categories: Vec<Option<TypeCategory>> =
        metadata.columns.iter().map(|c| c.type_category).collect();
    assert_eq!(
        categories,
        vec![
            Some(TypeCategory::Integer),
            Some(TypeCategory::Timestamp),
            Some(TypeCategory::List),
            Some(TypeCategory::String),
        ]
    );
}

#[test]
fn test_invalid_schemas_fail_before_casting() {
    let batch = all_categories_batch();
    let policy = CastPolicy::default();

    let not_an_object = json!([1, 2]);
    assert!(matches!(
        cast_table_to_schema(&batch, &not_an_object, &policy),
        Err(CastError::Schema(_))
    ));

    let mismatched = json!({
        "columns": [{"name": "id", "type": "int64", "type_category": "string"}]
    });
    assert!(matches!(
        cast_table_to_schema(&batch, &mismatched, &policy),
        Err(CastError::Schema(_))
    ));

    let duplicated = json!({
        "columns": [{"name": "id", "type": "int64"}, {"name": "id", "type": "int64"}]
    });
    assert!(cast_table_to_schema(&batch, &duplicated, &policy).is_err());
}

#[test]
fn test_policy_from_json() {
    let policy: CastPolicy = serde_json::from_value(json!({
        "num_errors": "coerce",
        "pd_timestamp_type": "pd_timestamp",
        "bool_error_map": {"flag": "raise"},
        "drop_columns": ["tmp"]
    }))
    .unwrap();

    assert_eq!(policy.num_errors, ErrorPolicy::Coerce);
    assert_eq!(policy.bool_errors, ErrorPolicy::Coerce);
    assert_eq!(
        policy.pd_timestamp_type,
        TimestampRepresentation::HighPrecisionTimestamp
    );
    assert_eq!(policy.bool_error_map.get("flag"), Some(&ErrorPolicy::Raise));
    assert!(policy.is_dropped("tmp"));
    assert!(policy.pd_integer);
}
