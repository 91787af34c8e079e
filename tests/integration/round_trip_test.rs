use arrow::datatypes::{DataType, TimeUnit};
use table_caster::{CastPolicy, cast_table_to_schema};

use crate::utils::{all_categories_batch, all_categories_metadata, column_names, render};

#[test]
fn test_cast_then_render_recovers_strings() {
    let input = all_categories_batch();
    let metadata = all_categories_metadata();

    let cast = cast_table_to_schema(&input, &metadata, &CastPolicy::default()).unwrap();

    assert_eq!(column_names(&cast), column_names(&input));
    for (index, name) in column_names(&input).iter().enumerate() {
        assert_eq!(
            render(cast.column(index)),
            render(input.column(index)),
            "column {name}"
        );
    }
}

#[test]
fn test_output_representations() {
    let cast = cast_table_to_schema(
        &all_categories_batch(),
        &all_categories_metadata(),
        &CastPolicy::default(),
    )
    .unwrap();

    let types: Vec<DataType> = cast
        .schema()
        .fields()
        .iter()
        .map(|f| f.data_type().clone())
        .collect();
    assert_eq!(
        types,
        vec![
            DataType::Int64,
            DataType::Float64,
            DataType::Boolean,
            DataType::Utf8,
            DataType::Date32,
            DataType::Timestamp(TimeUnit::Microsecond, None),
        ]
    );
    assert!(cast.schema().fields().iter().all(|f| f.is_nullable()));
}

#[test]
fn test_legacy_representations() {
    let policy = CastPolicy::default()
        .with_pd_integer(false)
        .with_pd_string(false);

    let cast = cast_table_to_schema(&all_categories_batch(), &all_categories_metadata(), &policy)
        .unwrap();

    assert_eq!(cast.schema().field(0).data_type(), &DataType::Float64);
    assert_eq!(cast.schema().field(3).data_type(), &DataType::LargeUtf8);
}
