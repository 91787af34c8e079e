//! Casting whole tables to a declared schema.

use std::sync::Arc;
use std::time::Instant;

use arrow::array::ArrayRef;
use arrow::datatypes::{Field, FieldRef, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::cast::column::cast_column_to_schema;
use crate::config::CastPolicy;
use crate::error::{CastError, Result};
use crate::schema::SchemaSource;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Cast every column of `batch` to the type `schema` declares for it.
///
/// `schema` is either a [`Metadata`](crate::schema::Metadata) or a JSON
/// mapping of the same shape; both are validated first.
///
/// Columns named in `ignore_columns` keep their values and field, columns in
/// `drop_columns` and partition columns are left out, and all other schema
/// columns are cast with [`cast_column_to_schema`]. The result holds the
/// remaining schema columns in schema order; table columns the schema does
/// not declare are not carried over. `batch` itself is never modified.
///
/// # Errors
/// Schema validation errors, [`CastError::MissingColumn`] for a kept schema
/// column the table lacks, and the first column conversion failure.
pub fn cast_table_to_schema<'a>(
    batch: &RecordBatch,
    schema: impl Into<SchemaSource<'a>>,
    policy: &CastPolicy,
) -> Result<RecordBatch> {
    let metadata = schema.into().normalize()?;
    let target = metadata.name.as_deref().unwrap_or("table");
    let start = Instant::now();
    log_operation_start("Casting", target);

    let source = batch.schema();
    let mut fields: Vec<FieldRef> = Vec::with_capacity(metadata.columns.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(metadata.columns.len());
    let mut cast_count = 0;

    for column in &metadata.columns {
        let name = column.name.as_str();
        if policy.is_dropped(name) || metadata.is_partition(name) {
            continue;
        }
        let (index, field) = source
            .column_with_name(name)
            .ok_or_else(|| CastError::MissingColumn(name.to_string()))?;
        let array = batch.column(index);

        if policy.is_ignored(name) {
            log::debug!("Leaving column '{name}' uncast");
            fields.push(Arc::new(field.clone()));
            columns.push(array.clone());
            continue;
        }

        let cast = cast_column_to_schema(array, column, policy)?;
        log::debug!(
            "Cast column '{name}' from {} to {}",
            array.data_type(),
            cast.data_type()
        );
        let field = if cast.data_type() == field.data_type() {
            Arc::new(field.clone())
        } else {
            Arc::new(Field::new(name, cast.data_type().clone(), true))
        };
        fields.push(field);
        columns.push(cast);
        cast_count += 1;
    }

    let schema = Schema::new_with_metadata(fields, source.metadata().clone());
    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    let result = RecordBatch::try_new_with_options(Arc::new(schema), columns, &options)?;

    log_operation_complete("cast", target, cast_count, Some(start.elapsed()));
    Ok(result)
}
