use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use table_caster::cast::{DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT};
use table_caster::{ColumnDescriptor, Metadata, TypeCategory};

/// Build a table where every column is a nullable `Utf8` column
#[must_use]
pub fn string_batch(columns: Vec<(&str, Vec<Option<&str>>)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|(_, values)| Arc::new(StringArray::from(values.clone())) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .expect("columns have equal length")
}

/// The `n` / `flag` schema used by the coerce and raise scenarios
#[must_use]
pub fn scenario_metadata() -> Metadata {
    Metadata::new(vec![
        ColumnDescriptor::new("n", "int64").with_type_category(TypeCategory::Integer),
        ColumnDescriptor::new("flag", "bool_").with_type_category(TypeCategory::Boolean),
    ])
}

/// Input table for the scenario schema
#[must_use]
pub fn scenario_batch() -> RecordBatch {
    string_batch(vec![
        ("n", vec![Some("1"), Some("2"), Some("x")]),
        ("flag", vec![Some("yes"), Some("no"), Some("maybe")]),
    ])
}

/// A schema with one column of each convertible category
#[must_use]
pub fn all_categories_metadata() -> Metadata {
    Metadata::new(vec![
        ColumnDescriptor::new("id", "int64"),
        ColumnDescriptor::new("score", "float64"),
        ColumnDescriptor::new("active", "bool"),
        ColumnDescriptor::new("name", "string"),
        ColumnDescriptor::new("born", "date32"),
        ColumnDescriptor::new("seen", "timestamp(s)"),
    ])
    .with_name("people")
}

/// String table matching [`all_categories_metadata`]
#[must_use]
pub fn all_categories_batch() -> RecordBatch {
    string_batch(vec![
        ("id", vec![Some("1"), Some("-20"), None]),
        ("score", vec![Some("1.5"), Some("-0.25"), None]),
        ("active", vec![Some("true"), Some("false"), None]),
        ("name", vec![Some("Ada"), Some(""), None]),
        ("born", vec![Some("1990-01-31"), Some("2000-02-29"), None]),
        (
            "seen",
            vec![Some("2021-01-01 12:00:00"), Some("1999-12-31 23:59:59"), None],
        ),
    ])
}

/// Render a column back to strings with the caster's default date formats
#[must_use]
pub fn render(array: &ArrayRef) -> Vec<Option<String>> {
    let options = FormatOptions::default()
        .with_date_format(Some(DEFAULT_DATE_FORMAT))
        .with_timestamp_format(Some(DEFAULT_DATETIME_FORMAT));
    let formatter =
        ArrayFormatter::try_new(array.as_ref(), &options).expect("formatter for column");
    (0..array.len())
        .map(|i| array.is_valid(i).then(|| formatter.value(i).to_string()))
        .collect()
}

/// Names of a table's columns in order
#[must_use]
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}
