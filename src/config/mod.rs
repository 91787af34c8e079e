//! Configuration for table casting.
//!
//! A [`CastPolicy`] bundles the representation choices and error tolerance for one
//! cast call. Nothing here is global: every call receives its own policy.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CastError;
use crate::schema::ColumnDescriptor;

/// How a converter reacts to values it cannot convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort the cast with an error listing every rejected value
    #[default]
    Raise,
    /// Replace rejected values with null
    Coerce,
    /// Leave the whole column unchanged when any value is rejected
    Ignore,
}

impl ErrorPolicy {
    /// Lower-case name used in schemas and messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::Coerce => "coerce",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = CastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" => Ok(Self::Raise),
            "coerce" => Ok(Self::Coerce),
            "ignore" => Ok(Self::Ignore),
            other => Err(CastError::value(format!(
                "error policy must be one of raise, coerce or ignore. Got {other}"
            ))),
        }
    }
}

/// Target representation for date and datetime columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampRepresentation {
    /// Calendar values: `Date32` for dates, microsecond timestamps for datetimes
    #[default]
    DatetimeObject,
    /// Nanosecond-resolution timestamps with a bounded range
    #[serde(alias = "pd_timestamp")]
    HighPrecisionTimestamp,
    /// Reserved, not built yet
    #[serde(alias = "pd_period")]
    Period,
}

impl TimestampRepresentation {
    /// Name used in messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DatetimeObject => "datetime_object",
            Self::HighPrecisionTimestamp => "high_precision_timestamp",
            Self::Period => "period",
        }
    }
}

impl fmt::Display for TimestampRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampRepresentation {
    type Err = CastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "datetime_object" => Ok(Self::DatetimeObject),
            "high_precision_timestamp" | "pd_timestamp" => Ok(Self::HighPrecisionTimestamp),
            "period" | "pd_period" => Ok(Self::Period),
            other => Err(CastError::value(format!(
                "Incorrect timestamp type, expecting \"datetime_object\", \
                 \"high_precision_timestamp\" or \"period\". Got {other}."
            ))),
        }
    }
}

/// Signature of a caller-supplied boolean mapping function
pub type BoolMapFn = dyn Fn(&str) -> Option<bool> + Send + Sync;

/// Custom mapping from raw tokens to booleans
///
/// Tokens are matched exactly as they appear in the column. A token the map
/// does not know is handled by the column's boolean error policy.
#[derive(Clone)]
pub enum BoolMap {
    /// Lookup table keyed by the raw token
    Table(HashMap<String, bool>),
    /// Arbitrary function; `None` means unmapped
    Function(Arc<BoolMapFn>),
}

impl BoolMap {
    /// Build a lookup table from `(token, value)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self::Table(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wrap a mapping function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<bool> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Map a single token
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<bool> {
        match self {
            Self::Table(table) => table.get(token).copied(),
            Self::Function(f) => f(token),
        }
    }
}

impl fmt::Debug for BoolMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Effective error policies for one column after precedence resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnErrors {
    /// Policy for integer and float conversion
    pub num_errors: ErrorPolicy,
    /// Policy for boolean mapping
    pub bool_errors: ErrorPolicy,
    /// Policy for date and datetime parsing
    pub ts_errors: ErrorPolicy,
}

/// Configuration for a table cast
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CastPolicy {
    /// Cast integers to nullable `Int64` (otherwise `Float64`)
    pub pd_integer: bool,
    /// Cast strings to `Utf8` (otherwise `LargeUtf8`)
    pub pd_string: bool,
    /// Cast booleans to nullable `Boolean`; the legacy representation is not supported
    pub pd_boolean: bool,
    /// Representation for `date*` logical types
    pub pd_date_type: TimestampRepresentation,
    /// Representation for every other timestamp logical type
    pub pd_timestamp_type: TimestampRepresentation,
    /// Call-wide numeric error policy
    pub num_errors: ErrorPolicy,
    /// Call-wide boolean error policy
    pub bool_errors: ErrorPolicy,
    /// Call-wide timestamp error policy
    pub ts_errors: ErrorPolicy,
    /// Per-column numeric error policies, keyed by column name
    pub num_error_map: HashMap<String, ErrorPolicy>,
    /// Per-column boolean error policies, keyed by column name
    pub bool_error_map: HashMap<String, ErrorPolicy>,
    /// Custom boolean mapping replacing the default token table
    #[serde(skip)]
    pub bool_map: Option<BoolMap>,
    /// Columns passed through without casting
    pub ignore_columns: Vec<String>,
    /// Columns removed from the output
    pub drop_columns: Vec<String>,
}

impl Default for CastPolicy {
    fn default() -> Self {
        Self {
            pd_integer: true,
            pd_string: true,
            pd_boolean: true,
            pd_date_type: TimestampRepresentation::DatetimeObject,
            pd_timestamp_type: TimestampRepresentation::DatetimeObject,
            num_errors: ErrorPolicy::Raise,
            bool_errors: ErrorPolicy::Coerce,
            ts_errors: ErrorPolicy::Raise,
            num_error_map: HashMap::new(),
            bool_error_map: HashMap::new(),
            bool_map: None,
            ignore_columns: Vec::new(),
            drop_columns: Vec::new(),
        }
    }
}

impl CastPolicy {
    #[must_use]
    pub const fn with_pd_integer(mut self, pd_integer: bool) -> Self {
        self.pd_integer = pd_integer;
        self
    }

    #[must_use]
    pub const fn with_pd_string(mut self, pd_string: bool) -> Self {
        self.pd_string = pd_string;
        self
    }

    #[must_use]
    pub const fn with_pd_boolean(mut self, pd_boolean: bool) -> Self {
        self.pd_boolean = pd_boolean;
        self
    }

    #[must_use]
    pub const fn with_pd_date_type(mut self, representation: TimestampRepresentation) -> Self {
        self.pd_date_type = representation;
        self
    }

    #[must_use]
    pub const fn with_pd_timestamp_type(mut self, representation: TimestampRepresentation) -> Self {
        self.pd_timestamp_type = representation;
        self
    }

    #[must_use]
    pub const fn with_num_errors(mut self, policy: ErrorPolicy) -> Self {
        self.num_errors = policy;
        self
    }

    #[must_use]
    pub const fn with_bool_errors(mut self, policy: ErrorPolicy) -> Self {
        self.bool_errors = policy;
        self
    }

    #[must_use]
    pub const fn with_ts_errors(mut self, policy: ErrorPolicy) -> Self {
        self.ts_errors = policy;
        self
    }

    /// Set the numeric error policy for one column
    #[must_use]
    pub fn with_num_error_for(mut self, column: impl Into<String>, policy: ErrorPolicy) -> Self {
        self.num_error_map.insert(column.into(), policy);
        self
    }

    /// Set the boolean error policy for one column
    #[must_use]
    pub fn with_bool_error_for(mut self, column: impl Into<String>, policy: ErrorPolicy) -> Self {
        self.bool_error_map.insert(column.into(), policy);
        self
    }

    #[must_use]
    pub fn with_bool_map(mut self, bool_map: BoolMap) -> Self {
        self.bool_map = Some(bool_map);
        self
    }

    #[must_use]
    pub fn with_ignore_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `name` is listed in `ignore_columns`
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_columns.iter().any(|c| c == name)
    }

    /// Whether `name` is listed in `drop_columns`
    #[must_use]
    pub fn is_dropped(&self, name: &str) -> bool {
        self.drop_columns.iter().any(|c| c == name)
    }

    /// Representation governing a date (`is_date`) or datetime column
    #[must_use]
    pub const fn temporal_representation(&self, is_date: bool) -> TimestampRepresentation {
        if is_date {
            self.pd_date_type
        } else {
            self.pd_timestamp_type
        }
    }

    /// Resolve the error policies that apply to `column`
    #[must_use]
    pub fn errors_for(&self, column: &ColumnDescriptor) -> ColumnErrors {
        ColumnErrors {
            num_errors: resolve_error_policy(
                column.num_errors,
                &self.num_error_map,
                &column.name,
                self.num_errors,
            ),
            bool_errors: resolve_error_policy(
                column.bool_errors,
                &self.bool_error_map,
                &column.name,
                self.bool_errors,
            ),
            ts_errors: self.ts_errors,
        }
    }
}

/// Pick the error policy for a column.
///
/// Precedence: the column's own override, then the per-call map entry for the
/// column name, then the call-wide default.
#[must_use]
pub fn resolve_error_policy(
    column_override: Option<ErrorPolicy>,
    error_map: &HashMap<String, ErrorPolicy>,
    column_name: &str,
    default: ErrorPolicy,
) -> ErrorPolicy {
    column_override
        .or_else(|| error_map.get(column_name).copied())
        .unwrap_or(default)
}
