//! Casting a single column according to its type category.

use arrow::array::ArrayRef;

use crate::cast::boolean::convert_to_bool_series;
use crate::cast::scalar::{
    convert_to_float_series, convert_to_integer_series, convert_to_string_series,
};
use crate::cast::timestamp::convert_str_to_timestamp_series;
use crate::config::CastPolicy;
use crate::error::{CastError, Result};
use crate::schema::{ColumnDescriptor, TypeCategory};
use crate::utils::logging::log_warning;

/// Cast one column to the type its descriptor declares.
///
/// The category is derived from the logical type when the descriptor does
/// not name one. Struct and list columns cannot be converted and are passed
/// through with a warning. Error policies are resolved per column from the
/// descriptor's overrides, the policy's maps and the policy's defaults.
///
/// # Errors
/// A schema error if the category cannot be resolved. Every failure of the
/// conversion itself is wrapped in [`CastError::Column`].
pub fn cast_column_to_schema(
    array: &ArrayRef,
    column: &ColumnDescriptor,
    policy: &CastPolicy,
) -> Result<ArrayRef> {
    let type_category = column.resolved_category()?;
    let errors = policy.errors_for(column);

    let converted = match type_category {
        TypeCategory::Integer => {
            convert_to_integer_series(array, policy.pd_integer, errors.num_errors)
        }
        TypeCategory::Float => convert_to_float_series(array, errors.num_errors),
        TypeCategory::Boolean => convert_to_bool_series(
            array,
            policy.pd_boolean,
            policy.bool_map.as_ref(),
            errors.bool_errors,
        ),
        TypeCategory::String => convert_to_string_series(array, policy.pd_string),
        TypeCategory::Timestamp => {
            let is_date = column.is_date();
            convert_str_to_timestamp_series(
                array,
                is_date,
                policy.temporal_representation(is_date),
                errors.ts_errors,
                column.datetime_format.as_deref(),
            )
        }
        TypeCategory::Struct | TypeCategory::List => {
            log_warning(
                &format!("{type_category} type_category cannot be converted, passing values through"),
                Some(&column.name),
            );
            return Ok(array.clone());
        }
    };

    converted.map_err(|source| CastError::Column {
        name: column.name.clone(),
        type_category,
        logical_type: column.logical_type.clone(),
        source: Box::new(source),
    })
}
