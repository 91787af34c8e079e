//! Value-level casting of columns and tables to a declared schema.
//!
//! Converters take any Arrow array and return a new array of the category's
//! target representation. Values that cannot be converted are collected per
//! column and settled once according to the column's [`ErrorPolicy`]:
//! `raise` reports them together in a single error, `coerce` turns them into
//! nulls and `ignore` hands back the untouched input column.

pub mod boolean;
pub mod column;
pub mod scalar;
pub mod table;
pub mod timestamp;

use arrow::array::ArrayRef;
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::DataType;
use itertools::Itertools;

use crate::config::ErrorPolicy;
use crate::error::{CastError, Result};
use crate::utils::logging::log_warning;

pub use boolean::{convert_to_bool_series, default_str_bool_mapper};
pub use column::cast_column_to_schema;
pub use scalar::{convert_to_float_series, convert_to_integer_series, convert_to_string_series};
pub use table::cast_table_to_schema;
pub use timestamp::{
    DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT, convert_str_to_timestamp_series,
};

/// Build the aggregated error for every value of a column that failed to convert
pub(crate) fn rejected_values_error(kind: &str, rejected: &[String]) -> CastError {
    let details = rejected.iter().unique().map(|t| format!("'{t}'")).join(", ");
    CastError::value(format!(
        "{} values could not be cast to {kind} values. Details: [{details}]",
        rejected.len()
    ))
}

/// Settle a value-by-value conversion.
///
/// `converted` already holds nulls in place of the `rejected` tokens.
pub(crate) fn settle_rejections(
    converted: ArrayRef,
    original: &ArrayRef,
    rejected: &[String],
    kind: &str,
    policy: ErrorPolicy,
) -> Result<ArrayRef> {
    if rejected.is_empty() {
        return Ok(converted);
    }
    match policy {
        ErrorPolicy::Raise => Err(rejected_values_error(kind, rejected)),
        ErrorPolicy::Coerce => {
            log_warning(
                &format!(
                    "{} values coerced to null while casting to {kind}",
                    rejected.len()
                ),
                None,
            );
            Ok(converted)
        }
        ErrorPolicy::Ignore => {
            log_warning(
                &format!(
                    "{} values could not be cast to {kind}, keeping the original column",
                    rejected.len()
                ),
                None,
            );
            Ok(original.clone())
        }
    }
}

/// Cast with Arrow's kernel, honouring the error policy.
///
/// Only used for inputs whose type the kernel converts without parsing text.
pub(crate) fn cast_natively(
    array: &ArrayRef,
    target: &DataType,
    policy: ErrorPolicy,
) -> Result<ArrayRef> {
    if array.data_type() == target {
        return Ok(array.clone());
    }
    let options = CastOptions {
        safe: policy == ErrorPolicy::Coerce,
        ..Default::default()
    };
    match cast_with_options(array, target, &options) {
        Ok(cast) => Ok(cast),
        Err(e) if policy == ErrorPolicy::Ignore => {
            log_warning(
                &format!(
                    "could not cast {} to {target} ({e}), keeping the original column",
                    array.data_type()
                ),
                None,
            );
            Ok(array.clone())
        }
        Err(e) => Err(e.into()),
    }
}
