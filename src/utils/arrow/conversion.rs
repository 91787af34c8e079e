//! Arrow utility functions for turning arbitrary arrays into strings
//!
//! Text formats deliver every column as strings, but a table may also arrive
//! with best-effort native types. The converters parse strings, so anything
//! else is rendered to `Utf8` first.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray, StringBuilder};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::error::{CastError, Result};

/// View any array as a `Utf8` string array, nulls preserved
///
/// # Errors
/// Returns an error if the array can be neither cast nor formatted
pub fn to_string_array(array: &ArrayRef) -> Result<StringArray> {
    let utf8 = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        arrow_array_to_utf8(array)?
    };
    utf8.as_string_opt::<i32>()
        .cloned()
        .ok_or_else(|| CastError::value(format!("expected a Utf8 array, got {}", utf8.data_type())))
}

/// Convert an array to `Utf8`, using Arrow's cast kernel where it applies and
/// the display formatter for everything else (structs, lists, binary, ...)
///
/// # Errors
/// Returns an error if no formatter exists for the array's type
pub fn arrow_array_to_utf8(array: &ArrayRef) -> Result<ArrayRef> {
    if cast::can_cast_types(array.data_type(), &DataType::Utf8) {
        if let Ok(converted) = cast::cast(array, &DataType::Utf8) {
            return Ok(converted);
        }
    }

    let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
    let mut builder = StringBuilder::with_capacity(array.len(), array.len() * 8);
    for i in 0..array.len() {
        if array.is_null(i) {
            builder.append_null();
        } else {
            builder.append_value(formatter.value(i).to_string());
        }
    }
    Ok(Arc::new(builder.finish()))
}
