use std::sync::Arc;

use arrow::array::{Array, AsArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use table_caster::{
    BoolMap, CastError, CastPolicy, ColumnDescriptor, ErrorPolicy, Metadata, TypeCategory,
    cast_table_to_schema,
};

use crate::utils::{column_names, scenario_batch, scenario_metadata, string_batch};

#[test]
fn test_coerce_scenario() {
    let policy = CastPolicy::default()
        .with_num_errors(ErrorPolicy::Coerce)
        .with_bool_errors(ErrorPolicy::Coerce);

    let result = cast_table_to_schema(&scenario_batch(), &scenario_metadata(), &policy).unwrap();

    let n: Vec<Option<i64>> = result.column(0).as_primitive::<Int64Type>().iter().collect();
    assert_eq!(n, vec![Some(1), Some(2), None]);
    let flag: Vec<Option<bool>> = result.column(1).as_boolean().iter().collect();
    assert_eq!(flag, vec![Some(true), Some(false), None]);

    assert_eq!(result.schema().field(0).data_type(), &DataType::Int64);
    assert_eq!(result.schema().field(1).data_type(), &DataType::Boolean);
}

#[test]
fn test_raise_scenario_names_column() {
    let policy = CastPolicy::default()
        .with_num_errors(ErrorPolicy::Raise)
        .with_bool_errors(ErrorPolicy::Coerce);

    let err = cast_table_to_schema(&scenario_batch(), &scenario_metadata(), &policy).unwrap_err();

    assert!(err.is_conversion_error());
    assert_eq!(err.column_name(), Some("n"));
    assert!(err.to_string().contains("type_category: integer"));
}

#[test]
fn test_boolean_raise_lists_unmapped_tokens() {
    let policy = CastPolicy::default()
        .with_num_errors(ErrorPolicy::Coerce)
        .with_bool_errors(ErrorPolicy::Raise);

    let err = cast_table_to_schema(&scenario_batch(), &scenario_metadata(), &policy).unwrap_err();
    assert_eq!(err.column_name(), Some("flag"));
    assert!(err.root_cause().to_string().contains("'maybe'"));
}

#[test]
fn test_input_table_is_unchanged() {
    let input = scenario_batch();
    let before = input.clone();
    let policy = CastPolicy::default().with_num_errors(ErrorPolicy::Coerce);

    let result = cast_table_to_schema(&input, &scenario_metadata(), &policy).unwrap();

    assert_eq!(input, before);
    assert_eq!(input.schema().field(0).data_type(), &DataType::Utf8);
    assert_ne!(result.schema(), input.schema());
}

#[test]
fn test_casting_typed_table_is_idempotent() {
    let policy = CastPolicy::default().with_num_errors(ErrorPolicy::Coerce);
    let metadata = scenario_metadata();

    let once = cast_table_to_schema(&scenario_batch(), &metadata, &policy).unwrap();
    let twice = cast_table_to_schema(&once, &metadata, &policy).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_column_order_ignores_input_order() {
    let metadata = Metadata::new(vec![
        ColumnDescriptor::new("c", "string"),
        ColumnDescriptor::new("a", "int64"),
        ColumnDescriptor::new("b", "float64"),
    ]);
    let orders = [["a", "b", "c"], ["c", "b", "a"], ["b", "c", "a"]];

    for order in orders {
        let input = string_batch(order.iter().map(|name| (*name, vec![Some("1")])).collect());
        let result = cast_table_to_schema(&input, &metadata, &CastPolicy::default()).unwrap();
        assert_eq!(column_names(&result), vec!["c", "a", "b"]);
    }
}

#[test]
fn test_missing_column_is_reported() {
    let input = string_batch(vec![("n", vec![Some("1")])]);

    let err = cast_table_to_schema(&input, &scenario_metadata(), &CastPolicy::default())
        .unwrap_err();

    assert!(matches!(err, CastError::MissingColumn(_)));
    assert_eq!(err.column_name(), Some("flag"));
    assert!(err.to_string().contains("flag"));
}

#[test]
fn test_ignore_drop_and_partitions() {
    let input = string_batch(vec![
        ("keep", vec![Some("1")]),
        ("raw", vec![Some("untouched")]),
        ("gone", vec![Some("x")]),
        ("year", vec![Some("2021")]),
    ]);
    let metadata = Metadata::new(vec![
        ColumnDescriptor::new("year", "int64"),
        ColumnDescriptor::new("gone", "int64"),
        ColumnDescriptor::new("raw", "int64"),
        ColumnDescriptor::new("keep", "int64"),
    ])
    .with_partitions(["year"]);
    let policy = CastPolicy::default()
        .with_ignore_columns(["raw"])
        .with_drop_columns(["gone"]);

    let result = cast_table_to_schema(&input, &metadata, &policy).unwrap();

    assert_eq!(column_names(&result), vec!["raw", "keep"]);
    let raw = result.column(0).as_string::<i32>();
    assert_eq!(raw.value(0), "untouched");
    assert_eq!(result.column(1).as_primitive::<Int64Type>().value(0), 1);
}

#[test]
fn test_column_overrides_take_precedence() {
    let input = string_batch(vec![
        ("a", vec![Some("x")]),
        ("b", vec![Some("x")]),
        ("c", vec![Some("x")]),
    ]);
    let metadata = Metadata::new(vec![
        ColumnDescriptor::new("a", "int64").with_num_errors(ErrorPolicy::Coerce),
        ColumnDescriptor::new("b", "int64"),
        ColumnDescriptor::new("c", "int64"),
    ]);
    // `a` overrides the map, `b` comes from the map, `c` uses the call-wide default
    let policy = CastPolicy::default()
        .with_num_errors(ErrorPolicy::Ignore)
        .with_num_error_for("a", ErrorPolicy::Raise)
        .with_num_error_for("b", ErrorPolicy::Coerce);

    let result = cast_table_to_schema(&input, &metadata, &policy).unwrap();

    assert_eq!(result.column(0).data_type(), &DataType::Int64);
    assert!(result.column(0).is_null(0));
    assert_eq!(result.column(1).data_type(), &DataType::Int64);
    assert_eq!(result.column(2).data_type(), &DataType::Utf8);
}

#[test]
fn test_custom_bool_map() {
    let input = string_batch(vec![("flag", vec![Some("Ja"), Some("Nej"), None])]);
    let metadata = Metadata::new(vec![ColumnDescriptor::with_category_only(
        "flag",
        TypeCategory::Boolean,
    )]);
    let policy =
        CastPolicy::default().with_bool_map(BoolMap::from_pairs([("Ja", true), ("Nej", false)]));

    let result = cast_table_to_schema(&input, &metadata, &policy).unwrap();
    let flag: Vec<Option<bool>> = result.column(0).as_boolean().iter().collect();
    assert_eq!(flag, vec![Some(true), Some(false), None]);
}

#[test]
fn test_complex_columns_pass_through() {
    let list = arrow::array::ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
        Some(vec![Some(1), Some(2)]),
        None,
    ]);
    let input = RecordBatch::try_new(
        Arc::new(Schema::new(vec![
            Field::new("xs", list.data_type().clone(), true),
            Field::new("n", DataType::Utf8, true),
        ])),
        vec![
            Arc::new(list),
            Arc::new(StringArray::from(vec![Some("1"), None])),
        ],
    )
    .unwrap();
    let metadata = Metadata::new(vec![
        ColumnDescriptor::new("xs", "list<int64>"),
        ColumnDescriptor::new("n", "int64"),
    ]);

    let result = cast_table_to_schema(&input, &metadata, &CastPolicy::default()).unwrap();

    assert_eq!(result.column(0), input.column(0));
    let n = result.column(1).as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(n.value(0), 1);
    assert!(n.is_null(1));
}
