//! Integer, float and string converters.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Builder, Int64Builder};
use arrow::compute::cast;
use arrow::datatypes::DataType;

use crate::cast::{cast_natively, settle_rejections};
use crate::config::ErrorPolicy;
use crate::error::Result;
use crate::schema::adapt::{is_integer, is_numeric};
use crate::utils::arrow::{arrow_array_to_utf8, to_string_array};

/// Outcome of parsing one numeric token
enum Parsed {
    Null,
    Value(f64),
    Integer(i64),
    Invalid,
}

fn parse_numeric(token: &str) -> Parsed {
    let token = token.trim();
    if token.is_empty() {
        return Parsed::Null;
    }
    if let Ok(i) = token.parse::<i64>() {
        return Parsed::Integer(i);
    }
    match token.parse::<f64>() {
        Ok(f) if f.is_nan() => Parsed::Null,
        Ok(f) => Parsed::Value(f),
        Err(_) => Parsed::Invalid,
    }
}

/// Exact `i64` for an integral float inside the `i64` range
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
}

/// Cast a column to integers.
///
/// With `pd_integer` the result is a nullable `Int64` column and every value
/// must be integral; otherwise the column becomes `Float64` and any number
/// is kept. Blank strings and `NaN` become null; other tokens are settled by
/// `num_errors`.
#[allow(clippy::cast_precision_loss)]
pub fn convert_to_integer_series(
    array: &ArrayRef,
    pd_integer: bool,
    num_errors: ErrorPolicy,
) -> Result<ArrayRef> {
    let target = if pd_integer {
        DataType::Int64
    } else {
        DataType::Float64
    };
    let data_type = array.data_type();
    if is_integer(data_type) || matches!(data_type, DataType::Boolean | DataType::Null) {
        return cast_natively(array, &target, num_errors);
    }
    if !pd_integer && is_numeric(data_type) {
        return cast_natively(array, &target, num_errors);
    }

    let strings = to_string_array(array)?;
    let mut rejected = Vec::new();

    let converted: ArrayRef = if pd_integer {
        let mut builder = Int64Builder::with_capacity(strings.len());
        for token in strings.iter() {
            let value = match token.map_or(Parsed::Null, parse_numeric) {
                Parsed::Null => None,
                Parsed::Integer(i) => Some(i),
                Parsed::Value(f) => {
                    let value = integral(f);
                    if value.is_none() {
                        rejected.push(token.unwrap_or_default().trim().to_string());
                    }
                    value
                }
                Parsed::Invalid => {
                    rejected.push(token.unwrap_or_default().trim().to_string());
                    None
                }
            };
            builder.append_option(value);
        }
        Arc::new(builder.finish())
    } else {
        let mut builder = Float64Builder::with_capacity(strings.len());
        for token in strings.iter() {
            let value = match token.map_or(Parsed::Null, parse_numeric) {
                Parsed::Null => None,
                Parsed::Integer(i) => Some(i as f64),
                Parsed::Value(f) => Some(f),
                Parsed::Invalid => {
                    rejected.push(token.unwrap_or_default().trim().to_string());
                    None
                }
            };
            builder.append_option(value);
        }
        Arc::new(builder.finish())
    };

    settle_rejections(converted, array, &rejected, "integer", num_errors)
}

/// Cast a column to `Float64`.
///
/// Numeric and boolean columns are cast by Arrow; anything else is parsed
/// from its string form. Blank strings and `NaN` become null.
#[allow(clippy::cast_precision_loss)]
pub fn convert_to_float_series(array: &ArrayRef, num_errors: ErrorPolicy) -> Result<ArrayRef> {
    let data_type = array.data_type();
    if is_numeric(data_type) || matches!(data_type, DataType::Boolean | DataType::Null) {
        return cast_natively(array, &DataType::Float64, num_errors);
    }

    let strings = to_string_array(array)?;
    let mut rejected = Vec::new();
    let mut builder = Float64Builder::with_capacity(strings.len());
    for token in strings.iter() {
        let value = match token.map_or(Parsed::Null, parse_numeric) {
            Parsed::Null => None,
            Parsed::Integer(i) => Some(i as f64),
            Parsed::Value(f) => Some(f),
            Parsed::Invalid => {
                rejected.push(token.unwrap_or_default().trim().to_string());
                None
            }
        };
        builder.append_option(value);
    }

    settle_rejections(
        Arc::new(builder.finish()),
        array,
        &rejected,
        "float",
        num_errors,
    )
}

/// Cast a column to strings: `Utf8` with `pd_string`, `LargeUtf8` otherwise.
///
/// Every value has a string form, so this never rejects values.
pub fn convert_to_string_series(array: &ArrayRef, pd_string: bool) -> Result<ArrayRef> {
    let target = if pd_string {
        DataType::Utf8
    } else {
        DataType::LargeUtf8
    };
    if array.data_type() == &target {
        return Ok(array.clone());
    }
    let utf8 = arrow_array_to_utf8(array)?;
    if pd_string {
        Ok(utf8)
    } else {
        Ok(cast(&utf8, &target)?)
    }
}
