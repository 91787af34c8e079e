//! Schema-level reconciliation of Arrow tables.
//!
//! These functions never inspect values themselves: they decide which Arrow type
//! every column should have and delegate the conversion to Arrow's cast kernel.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::{DataType, FieldRef, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::{CastError, Result};
use crate::schema::adapt::compatibility::{TypeCompatibility, check_type_compatibility};

/// A schema compatibility report for casting a table to a target schema
#[derive(Debug)]
pub struct SchemaCompatibilityReport {
    /// Whether every column can be cast
    pub compatible: bool,
    /// Columns that cannot be cast
    pub issues: Vec<SchemaAdaptationIssue>,
    /// Columns whose type changes
    pub adaptations: Vec<SchemaAdaptation>,
}

/// A column that cannot be cast to its target type
#[derive(Debug)]
pub struct SchemaAdaptationIssue {
    /// The field name with incompatibility
    pub field_name: String,
    /// The source data type
    pub source_type: DataType,
    /// The target data type
    pub target_type: DataType,
    /// Description of the incompatibility
    pub description: String,
}

/// A column whose type will change
#[derive(Debug)]
pub struct SchemaAdaptation {
    /// The field name to adapt
    pub field_name: String,
    /// The source data type
    pub source_type: DataType,
    /// The target data type
    pub target_type: DataType,
}

/// Merge `new` into `current` by column name.
///
/// The result has `current`'s column order and length. A field that also exists
/// in `new` is replaced by `new`'s definition; fields only in `new` are ignored.
#[must_use]
pub fn update_existing_schema(current: &Schema, new: &Schema) -> Schema {
    let fields: Vec<FieldRef> = current
        .fields()
        .iter()
        .map(|field| match new.field_with_name(field.name()) {
            Ok(replacement) => Arc::new(replacement.clone()),
            Err(_) => field.clone(),
        })
        .collect();
    Schema::new_with_metadata(fields, current.metadata().clone())
}

/// Check a table schema against a target schema with the same field names
#[must_use]
pub fn check_schema_compatibility(source: &Schema, target: &Schema) -> SchemaCompatibilityReport {
    let mut issues = Vec::new();
    let mut adaptations = Vec::new();

    for target_field in target.fields() {
        let field_name = target_field.name();
        let target_type = target_field.data_type();
        let Ok(source_field) = source.field_with_name(field_name) else {
            issues.push(SchemaAdaptationIssue {
                field_name: field_name.clone(),
                source_type: DataType::Null,
                target_type: target_type.clone(),
                description: format!("Field '{field_name}' does not exist in the table"),
            });
            continue;
        };
        let source_type = source_field.data_type();

        match check_type_compatibility(source_type, target_type) {
            TypeCompatibility::Exact => {}
            TypeCompatibility::Compatible => adaptations.push(SchemaAdaptation {
                field_name: field_name.clone(),
                source_type: source_type.clone(),
                target_type: target_type.clone(),
            }),
            TypeCompatibility::Incompatible => issues.push(SchemaAdaptationIssue {
                field_name: field_name.clone(),
                source_type: source_type.clone(),
                target_type: target_type.clone(),
                description: format!(
                    "Incompatible types for field '{field_name}': {source_type:?} cannot be converted to {target_type:?}"
                ),
            }),
        }
    }

    SchemaCompatibilityReport {
        compatible: issues.is_empty(),
        issues,
        adaptations,
    }
}

/// Cast a table to a full or partial target schema.
///
/// With `expect_full_schema` the target must name exactly the table's columns,
/// in order. Otherwise the target is first merged into the table's own schema
/// with [`update_existing_schema`], so unlisted columns keep their current type.
pub fn cast_arrow_table_to_schema(
    batch: &RecordBatch,
    schema: &Schema,
    expect_full_schema: bool,
) -> Result<RecordBatch> {
    let target = if expect_full_schema {
        schema.clone()
    } else {
        update_existing_schema(&batch.schema(), schema)
    };
    cast_batch(batch, target)
}

fn cast_batch(batch: &RecordBatch, target: Schema) -> Result<RecordBatch> {
    let source = batch.schema();
    let source_names: Vec<&String> = source.fields().iter().map(|f| f.name()).collect();
    let target_names: Vec<&String> = target.fields().iter().map(|f| f.name()).collect();
    if source_names != target_names {
        return Err(CastError::value(format!(
            "Target schema's field names are not matching the table's field names: \
             {target_names:?}, {source_names:?}"
        )));
    }

    let report = check_schema_compatibility(&source, &target);
    if let Some(issue) = report.issues.first() {
        return Err(CastError::value(issue.description.clone()));
    }
    for adaptation in &report.adaptations {
        log::debug!(
            "Casting field '{}' from {:?} to {:?}",
            adaptation.field_name,
            adaptation.source_type,
            adaptation.target_type
        );
    }

    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    let columns = batch
        .columns()
        .iter()
        .zip(target.fields())
        .map(|(column, field)| {
            if column.data_type() == field.data_type() {
                Ok(column.clone())
            } else {
                cast_with_options(column, field.data_type(), &options).map_err(CastError::from)
            }
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(target),
        columns,
        &options,
    )?)
}
