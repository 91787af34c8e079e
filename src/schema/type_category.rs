//! Type categories and the logical type classifier.

use std::fmt;
use std::str::FromStr;

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

use crate::error::{CastError, Result};
use crate::schema::arrow_types::arrow_type_from_logical;

/// The closed set of semantic kinds a column can claim to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Integer,
    Float,
    Boolean,
    String,
    Timestamp,
    Struct,
    List,
}

impl TypeCategory {
    /// Every category, in the order used in messages
    pub const ALL: [Self; 7] = [
        Self::Integer,
        Self::Boolean,
        Self::String,
        Self::Float,
        Self::Timestamp,
        Self::Struct,
        Self::List,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Timestamp => "timestamp",
            Self::Struct => "struct",
            Self::List => "list",
        }
    }

    /// Category of an Arrow data type, if it has one
    #[must_use]
    pub const fn from_arrow_type(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Some(Self::Integer),
            DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => Some(Self::Float),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Some(Self::String),
            DataType::Boolean => Some(Self::Boolean),
            DataType::Date32
            | DataType::Date64
            | DataType::Timestamp(_, _)
            | DataType::Time32(_)
            | DataType::Time64(_) => Some(Self::Timestamp),
            DataType::List(_) | DataType::LargeList(_) | DataType::FixedSizeList(_, _) => {
                Some(Self::List)
            }
            DataType::Struct(_) | DataType::Map(_, _) => Some(Self::Struct),
            _ => None,
        }
    }

    /// Derive the category of a declared logical type such as `"int64"` or
    /// `"timestamp(ms)"`.
    pub fn from_logical_type(logical_type: &str) -> Result<Self> {
        let data_type = arrow_type_from_logical(logical_type)?;
        Self::from_arrow_type(&data_type).ok_or_else(|| {
            CastError::schema(format!(
                "type '{logical_type}' does not map to any of {}",
                allowed_categories()
            ))
        })
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeCategory {
    type Err = CastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                CastError::value(format!(
                    "type_category must be one of {}. Got {s}",
                    allowed_categories()
                ))
            })
    }
}

/// Comma separated list of category names
pub(crate) fn allowed_categories() -> String {
    let names: Vec<&str> = TypeCategory::ALL.iter().map(|c| c.as_str()).collect();
    format!("[{}]", names.join(", "))
}
