//! Module for handling data type compatibility checks.

use arrow::compute::can_cast_types;
use arrow::datatypes::DataType;

/// Types of data type compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCompatibility {
    /// Types match exactly
    Exact,
    /// The columnar engine can cast between the types
    Compatible,
    /// Types are incompatible
    Incompatible,
}

/// Check if two Arrow data types are compatible for conversion
#[must_use]
pub fn check_type_compatibility(from: &DataType, to: &DataType) -> TypeCompatibility {
    if from == to {
        TypeCompatibility::Exact
    } else if can_cast_types(from, to) {
        TypeCompatibility::Compatible
    } else {
        TypeCompatibility::Incompatible
    }
}

/// Identifies whether a data type is an integer type
#[must_use]
pub const fn is_integer(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Identifies whether a data type is numeric
#[must_use]
pub const fn is_numeric(data_type: &DataType) -> bool {
    is_integer(data_type)
        || matches!(
            data_type,
            DataType::Float16
                | DataType::Float32
                | DataType::Float64
                | DataType::Decimal128(_, _)
                | DataType::Decimal256(_, _)
        )
}

/// Identifies whether a data type is a date or timestamp type
#[must_use]
pub const fn is_temporal(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _)
    )
}
