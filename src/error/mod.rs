//! Error handling for the table caster.

use arrow::error::ArrowError;

use crate::schema::TypeCategory;

/// Errors that can occur while validating a schema or casting a table
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error decoding a JSON schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The schema is structurally invalid
    #[error("Schema error: {0}")]
    Schema(String),

    /// A plain-mapping schema is missing a required key
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// A column declared in the schema is absent from the table
    #[error("Column '{0}' not in table")]
    MissingColumn(String),

    /// Values could not be converted, or an argument was out of range
    #[error("Value error: {0}")]
    Value(String),

    /// The requested conversion is reserved but not built yet
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A single column failed to convert to its declared type
    #[error(
        "Failed conversion - name: {name} | type_category: {type_category} | type: {} - see source",
        .logical_type.as_deref().unwrap_or("None")
    )]
    Column {
        /// Name of the failing column
        name: String,
        /// Category the column was being cast to
        type_category: TypeCategory,
        /// Declared logical type, if any
        logical_type: Option<String>,
        /// The underlying failure
        #[source]
        source: Box<CastError>,
    },
}

impl CastError {
    /// Build a value error from anything printable
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    /// Build a schema error from anything printable
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Whether this error reports column data violating its declared type
    #[must_use]
    pub const fn is_conversion_error(&self) -> bool {
        matches!(self, Self::Column { .. })
    }

    /// Name of the column a conversion error refers to
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        match self {
            Self::Column { name, .. } | Self::MissingColumn(name) => Some(name),
            _ => None,
        }
    }

    /// The innermost error in a chain of column wrappers
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Column { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for cast operations
pub type Result<T> = std::result::Result<T, CastError>;
