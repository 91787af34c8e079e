//! Boolean mapping of arbitrary truthy representations.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanBuilder};
use arrow::compute::cast;
use arrow::datatypes::DataType;

use crate::cast::settle_rejections;
use crate::config::{BoolMap, ErrorPolicy};
use crate::error::{CastError, Result};
use crate::utils::arrow::to_string_array;

/// Map a token with the default truthy table.
///
/// Matching ignores case and surrounding whitespace. Returns `None` for tokens
/// outside the table; blank tokens are handled by the caller.
#[must_use]
pub fn default_str_bool_mapper(token: &str) -> Option<bool> {
    match token.trim().to_lowercase().as_str() {
        "yes" | "true" | "t" | "1" | "1.0" => Some(true),
        "no" | "false" | "f" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

/// Cast a column to the nullable boolean representation.
///
/// Boolean columns are returned as they are. Any other column is rendered to
/// strings and mapped token by token, through `bool_map` when given and the
/// default table otherwise. Nulls and blank strings become null; unmapped
/// tokens are settled by `bool_errors`.
///
/// # Errors
/// `NotImplemented` when `pd_boolean` is false, or a value error listing the
/// unmapped tokens under `raise`.
pub fn convert_to_bool_series(
    array: &ArrayRef,
    pd_boolean: bool,
    bool_map: Option<&BoolMap>,
    bool_errors: ErrorPolicy,
) -> Result<ArrayRef> {
    if !pd_boolean {
        return Err(CastError::NotImplemented(
            "Casting to old bool type is not yet implemented".to_string(),
        ));
    }

    match array.data_type() {
        DataType::Boolean => return Ok(array.clone()),
        DataType::Null => return Ok(cast(array, &DataType::Boolean)?),
        _ => {}
    }

    let strings = to_string_array(array)?;
    let mut builder = BooleanBuilder::with_capacity(strings.len());
    let mut rejected = Vec::new();

    for value in strings.iter() {
        let Some(token) = value.filter(|t| !t.trim().is_empty()) else {
            builder.append_null();
            continue;
        };
        let mapped = match bool_map {
            Some(map) => map.lookup(token),
            None => default_str_bool_mapper(token),
        };
        if mapped.is_none() {
            rejected.push(token.trim().to_string());
        }
        builder.append_option(mapped);
    }

    settle_rejections(
        Arc::new(builder.finish()),
        array,
        &rejected,
        "boolean",
        bool_errors,
    )
}
