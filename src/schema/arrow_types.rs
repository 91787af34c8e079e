//! Conversion from declared logical type strings to Arrow data types.
//!
//! The grammar covers the scalar names (`int64`, `bool_`, `date32`, ...),
//! parameterised types (`timestamp(ms)`, `decimal128(10,2)`, `binary(16)`) and
//! the nested forms `list<T>`, `large_list<T>`, `struct<name:T, ...>` and
//! `map_<K, V>`.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Fields, TimeUnit};

use crate::error::{CastError, Result};

/// Parse a logical type string into an Arrow [`DataType`]
pub fn arrow_type_from_logical(logical_type: &str) -> Result<DataType> {
    let s = logical_type.trim();

    if let Some((head, inner)) = split_wrapped(s, '<', '>') {
        return nested_type(s, head, inner);
    }
    if let Some((head, args)) = split_wrapped(s, '(', ')') {
        return parameterised_type(s, head, args);
    }

    let data_type = match s {
        "null" => DataType::Null,
        "bool" | "bool_" => DataType::Boolean,
        "int8" => DataType::Int8,
        "int16" => DataType::Int16,
        "int32" => DataType::Int32,
        "int64" => DataType::Int64,
        "uint8" => DataType::UInt8,
        "uint16" => DataType::UInt16,
        "uint32" => DataType::UInt32,
        "uint64" => DataType::UInt64,
        "float16" => DataType::Float16,
        "float32" => DataType::Float32,
        "float64" => DataType::Float64,
        "string" | "utf8" => DataType::Utf8,
        "large_string" | "large_utf8" => DataType::LargeUtf8,
        "binary" => DataType::Binary,
        "large_binary" => DataType::LargeBinary,
        "date32" => DataType::Date32,
        "date64" => DataType::Date64,
        _ => return Err(unknown(logical_type)),
    };
    Ok(data_type)
}

fn nested_type(full: &str, head: &str, inner: &str) -> Result<DataType> {
    match head {
        "list" => Ok(DataType::List(item_field(inner)?)),
        "large_list" => Ok(DataType::LargeList(item_field(inner)?)),
        "struct" => {
            let fields = split_top_level(inner)
                .into_iter()
                .map(|member| {
                    let (name, member_type) = member.split_once(':').ok_or_else(|| {
                        CastError::schema(format!(
                            "struct member '{member}' in '{full}' is not of the form name:type"
                        ))
                    })?;
                    Ok(Field::new(
                        name.trim(),
                        arrow_type_from_logical(member_type)?,
                        true,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(DataType::Struct(Fields::from(fields)))
        }
        "map_" => {
            let parts = split_top_level(inner);
            let [key, value] = parts.as_slice() else {
                return Err(CastError::schema(format!(
                    "'{full}' must name exactly a key and a value type"
                )));
            };
            let entries = Field::new(
                "entries",
                DataType::Struct(Fields::from(vec![
                    Field::new("key", arrow_type_from_logical(key)?, false),
                    Field::new("value", arrow_type_from_logical(value)?, true),
                ])),
                false,
            );
            Ok(DataType::Map(Arc::new(entries), false))
        }
        _ => Err(unknown(full)),
    }
}

fn parameterised_type(full: &str, head: &str, args: &str) -> Result<DataType> {
    let parts = split_top_level(args);
    match (head, parts.as_slice()) {
        ("timestamp", [unit]) => Ok(DataType::Timestamp(time_unit(unit, full)?, None)),
        ("timestamp", [unit, tz]) => Ok(DataType::Timestamp(
            time_unit(unit, full)?,
            Some(tz.trim().into()),
        )),
        ("time32", [unit]) => match time_unit(unit, full)? {
            unit @ (TimeUnit::Second | TimeUnit::Millisecond) => Ok(DataType::Time32(unit)),
            _ => Err(unknown(full)),
        },
        ("time64", [unit]) => match time_unit(unit, full)? {
            unit @ (TimeUnit::Microsecond | TimeUnit::Nanosecond) => Ok(DataType::Time64(unit)),
            _ => Err(unknown(full)),
        },
        ("decimal128", [precision, scale]) => {
            let precision = precision.trim().parse::<u8>().map_err(|_| unknown(full))?;
            let scale = scale.trim().parse::<i8>().map_err(|_| unknown(full))?;
            Ok(DataType::Decimal128(precision, scale))
        }
        ("binary", [width]) => {
            let width = width.trim().parse::<i32>().map_err(|_| unknown(full))?;
            Ok(DataType::FixedSizeBinary(width))
        }
        _ => Err(unknown(full)),
    }
}

fn item_field(inner: &str) -> Result<Arc<Field>> {
    Ok(Arc::new(Field::new(
        "item",
        arrow_type_from_logical(inner)?,
        true,
    )))
}

fn time_unit(unit: &str, full: &str) -> Result<TimeUnit> {
    match unit.trim() {
        "s" => Ok(TimeUnit::Second),
        "ms" => Ok(TimeUnit::Millisecond),
        "us" => Ok(TimeUnit::Microsecond),
        "ns" => Ok(TimeUnit::Nanosecond),
        _ => Err(unknown(full)),
    }
}

fn unknown(logical_type: &str) -> CastError {
    CastError::schema(format!("unknown logical type '{logical_type}'"))
}

/// Split `head<inner>` / `head(inner)` when the whole string is wrapped
fn split_wrapped(s: &str, open: char, close: char) -> Option<(&str, &str)> {
    if !s.ends_with(close) {
        return None;
    }
    let start = s.find(open)?;
    Some((s[..start].trim(), &s[start + 1..s.len() - 1]))
}

/// Split on commas that are not nested inside `<>` or `()`
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}
