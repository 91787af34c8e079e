//! Column descriptors and table metadata.
//!
//! [`Metadata`] is the validated, in-memory form of a schema. Callers may also
//! hand over a plain JSON mapping through [`SchemaSource`]; it is decoded and
//! validated at this boundary and never travels deeper as an untyped value.

use std::borrow::Cow;
use std::collections::HashSet;

use arrow::datatypes::{Field, Schema};
use serde::{Deserialize, Serialize};

use crate::config::ErrorPolicy;
use crate::error::{CastError, Result};
use crate::schema::arrow_types::arrow_type_from_logical;
use crate::schema::type_category::{TypeCategory, allowed_categories};

/// Declaration of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColumnDescriptor")]
pub struct ColumnDescriptor {
    /// Column name, case-sensitive
    pub name: String,
    /// Declared logical type, e.g. `int64` or `timestamp(s)`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub logical_type: Option<String>,
    /// Category; derived from `logical_type` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_category: Option<TypeCategory>,
    /// Explicit chrono format used to parse dates and datetimes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime_format: Option<String>,
    /// Numeric error policy override for this column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_errors: Option<ErrorPolicy>,
    /// Boolean error policy override for this column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bool_errors: Option<ErrorPolicy>,
}

/// Wire form of a column; category and policies are still plain strings here
#[derive(Deserialize)]
struct RawColumnDescriptor {
    name: String,
    #[serde(rename = "type", default)]
    logical_type: Option<String>,
    #[serde(default)]
    type_category: Option<String>,
    #[serde(default)]
    datetime_format: Option<String>,
    #[serde(default)]
    num_errors: Option<String>,
    #[serde(default)]
    bool_errors: Option<String>,
}

impl TryFrom<RawColumnDescriptor> for ColumnDescriptor {
    type Error = String;

    fn try_from(raw: RawColumnDescriptor) -> std::result::Result<Self, Self::Error> {
        let type_category = raw
            .type_category
            .map(|c| {
                c.parse::<TypeCategory>().map_err(|_| {
                    format!(
                        "meta type_category must be one of {}. Got {c} from column {}",
                        allowed_categories(),
                        raw.name
                    )
                })
            })
            .transpose()?;
        let policy = |value: Option<String>, key: &str| {
            value
                .map(|v| {
                    v.parse::<ErrorPolicy>()
                        .map_err(|e| format!("{key} of column {}: {e}", raw.name))
                })
                .transpose()
        };
        let num_errors = policy(raw.num_errors, "num_errors")?;
        let bool_errors = policy(raw.bool_errors, "bool_errors")?;

        Ok(Self {
            name: raw.name,
            logical_type: raw.logical_type,
            type_category,
            datetime_format: raw.datetime_format,
            num_errors,
            bool_errors,
        })
    }
}

impl ColumnDescriptor {
    /// Create a descriptor with a logical type; the category is derived later
    pub fn new(name: impl Into<String>, logical_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logical_type: Some(logical_type.into()),
            type_category: None,
            datetime_format: None,
            num_errors: None,
            bool_errors: None,
        }
    }

    /// Create a descriptor that only names a category
    pub fn with_category_only(name: impl Into<String>, type_category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            logical_type: None,
            type_category: Some(type_category),
            datetime_format: None,
            num_errors: None,
            bool_errors: None,
        }
    }

    #[must_use]
    pub const fn with_type_category(mut self, type_category: TypeCategory) -> Self {
        self.type_category = Some(type_category);
        self
    }

    #[must_use]
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = Some(format.into());
        self
    }

    #[must_use]
    pub const fn with_num_errors(mut self, policy: ErrorPolicy) -> Self {
        self.num_errors = Some(policy);
        self
    }

    #[must_use]
    pub const fn with_bool_errors(mut self, policy: ErrorPolicy) -> Self {
        self.bool_errors = Some(policy);
        self
    }

    /// The column's category, derived from its logical type when not declared
    pub fn resolved_category(&self) -> Result<TypeCategory> {
        match (self.type_category, self.logical_type.as_deref()) {
            (Some(category), _) => Ok(category),
            (None, Some(logical_type)) => TypeCategory::from_logical_type(logical_type)
                .map_err(|e| CastError::schema(format!("column '{}': {e}", self.name))),
            (None, None) => Err(CastError::schema(format!(
                "column '{}' declares neither a type nor a type_category",
                self.name
            ))),
        }
    }

    /// A copy of this descriptor with `type_category` filled in
    pub fn with_category_from_type(&self) -> Result<Self> {
        let type_category = self.resolved_category()?;
        Ok(Self {
            type_category: Some(type_category),
            ..self.clone()
        })
    }

    /// Whether the declared type is a date type (`date32`, `date64`)
    #[must_use]
    pub fn is_date(&self) -> bool {
        self.logical_type
            .as_deref()
            .is_some_and(|t| t.trim_start().starts_with("date"))
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CastError::schema("column names must not be empty"));
        }
        let category = self.resolved_category()?;
        if let Some(logical_type) = self.logical_type.as_deref() {
            let derived = TypeCategory::from_logical_type(logical_type)
                .map_err(|e| CastError::schema(format!("column '{}': {e}", self.name)))?;
            if derived != category {
                return Err(CastError::schema(format!(
                    "column '{}' declares type_category {category} but type '{logical_type}' \
                     is {derived}",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// A validated table schema: ordered columns plus partition columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Optional table name, used in log messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Column declarations in output order
    pub columns: Vec<ColumnDescriptor>,
    /// Columns whose values come from storage paths, never cast
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<String>,
}

impl Metadata {
    #[must_use]
    pub const fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: None,
            columns,
            partitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_partitions<I, S>(mut self, partitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partitions = partitions.into_iter().map(Into::into).collect();
        self
    }

    /// Decode and validate a plain JSON mapping
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| CastError::schema("metadata must be a JSON object"))?;
        if !object.contains_key("columns") {
            return Err(CastError::MissingKey(
                "metadata missing a \"columns\" key".to_string(),
            ));
        }
        let metadata = Self::deserialize(value)
            .map_err(|e| CastError::schema(format!("invalid metadata: {e}")))?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Decode and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    /// Render as a plain JSON mapping
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Check the structural rules every schema must satisfy
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            column.validate()?;
            if !seen.insert(column.name.as_str()) {
                return Err(CastError::schema(format!(
                    "column '{}' is declared more than once",
                    column.name
                )));
            }
        }
        if let Some(missing) = self.partitions.iter().find(|p| !seen.contains(p.as_str())) {
            return Err(CastError::schema(format!(
                "partition '{missing}' is not a declared column"
            )));
        }
        Ok(())
    }

    /// Look up a column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether `name` is a partition column
    #[must_use]
    pub fn is_partition(&self, name: &str) -> bool {
        self.partitions.iter().any(|p| p == name)
    }

    /// Fill in `type_category` for every column that lacks one
    pub fn set_col_type_category_from_types(&mut self) -> Result<()> {
        for column in &mut self.columns {
            if column.type_category.is_none() {
                column.type_category = Some(column.resolved_category()?);
            }
        }
        Ok(())
    }

    /// Build the equivalent Arrow schema; every column needs a logical type
    pub fn to_arrow_schema(&self) -> Result<Schema> {
        let fields = self
            .columns
            .iter()
            .map(|column| {
                let logical_type = column.logical_type.as_deref().ok_or_else(|| {
                    CastError::schema(format!(
                        "column '{}' has no type to convert to an Arrow type",
                        column.name
                    ))
                })?;
                Ok(Field::new(
                    &column.name,
                    arrow_type_from_logical(logical_type)?,
                    true,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema::new(fields))
    }
}

/// Either a structured [`Metadata`] or an equivalent JSON mapping
#[derive(Debug, Clone, Copy)]
pub enum SchemaSource<'a> {
    Metadata(&'a Metadata),
    Mapping(&'a serde_json::Value),
}

impl<'a> From<&'a Metadata> for SchemaSource<'a> {
    fn from(metadata: &'a Metadata) -> Self {
        Self::Metadata(metadata)
    }
}

impl<'a> From<&'a serde_json::Value> for SchemaSource<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        Self::Mapping(value)
    }
}

impl<'a> SchemaSource<'a> {
    /// Validate and return the canonical in-memory schema
    pub fn normalize(self) -> Result<Cow<'a, Metadata>> {
        match self {
            Self::Metadata(metadata) => {
                metadata.validate()?;
                Ok(Cow::Borrowed(metadata))
            }
            Self::Mapping(value) => Metadata::from_json_value(value).map(Cow::Owned),
        }
    }
}
