//! Parsing of date and datetime strings.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Date32Builder, TimestampMicrosecondBuilder, TimestampNanosecondBuilder,
};
use arrow::datatypes::{DataType, Date32Type, TimeUnit};
use chrono::NaiveDateTime;
use chrono::format::{Fixed, Item, Numeric, Parsed, StrftimeItems, parse};

use crate::cast::{cast_natively, settle_rejections};
use crate::config::{ErrorPolicy, TimestampRepresentation};
use crate::error::{CastError, Result};
use crate::schema::adapt::is_temporal;
use crate::utils::arrow::to_string_array;

/// Format used for date columns without an explicit `datetime_format`
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for datetime columns without an explicit `datetime_format`
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Tried after the default when the high precision parser has no explicit format.
const FALLBACK_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    DEFAULT_DATE_FORMAT,
];

/// Arrow type a temporal column is materialised as
#[must_use]
pub fn target_temporal_type(
    is_date: bool,
    representation: TimestampRepresentation,
) -> Option<DataType> {
    match representation {
        TimestampRepresentation::DatetimeObject if is_date => Some(DataType::Date32),
        TimestampRepresentation::DatetimeObject => {
            Some(DataType::Timestamp(TimeUnit::Microsecond, None))
        }
        TimestampRepresentation::HighPrecisionTimestamp => {
            Some(DataType::Timestamp(TimeUnit::Nanosecond, None))
        }
        TimestampRepresentation::Period => None,
    }
}

/// Whether a chrono format string reads a time of day
fn has_time_fields(format: &str) -> bool {
    StrftimeItems::new(format).any(|item| {
        matches!(
            item,
            Item::Numeric(
                Numeric::Hour
                    | Numeric::Hour12
                    | Numeric::Minute
                    | Numeric::Second
                    | Numeric::Nanosecond
                    | Numeric::Timestamp,
                _
            ) | Item::Fixed(
                Fixed::LowerAmPm
                    | Fixed::UpperAmPm
                    | Fixed::Nanosecond
                    | Fixed::Nanosecond3
                    | Fixed::Nanosecond6
                    | Fixed::Nanosecond9
            )
        )
    })
}

/// Parse a single token with a chrono format string.
///
/// Date-only formats yield midnight. A format that reads an hour but no
/// minute yields the top of that hour.
fn parse_token(token: &str, format: &str, has_time: bool) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::default();
    parse(&mut parsed, token, StrftimeItems::new(format)).ok()?;
    if has_time {
        parsed.to_naive_datetime_with_offset(0).ok().or_else(|| {
            parsed.set_minute(0).ok()?;
            parsed.to_naive_datetime_with_offset(0).ok()
        })
    } else {
        parsed.to_naive_date().ok()?.and_hms_opt(0, 0, 0)
    }
}

/// Convert a column of date or datetime strings.
///
/// `format` overrides the default for the column kind ([`DEFAULT_DATE_FORMAT`]
/// when `is_date`, [`DEFAULT_DATETIME_FORMAT`] otherwise). Nulls and blank
/// strings become null; tokens that do not parse are settled by `ts_errors`.
///
/// * `DatetimeObject` produces `Date32` for dates (time of day dropped) and
///   microsecond timestamps for datetimes.
/// * `HighPrecisionTimestamp` produces nanosecond timestamps; values outside
///   the nanosecond range are rejected like unparsable ones. Without an explicit
///   format a few ISO-8601 variants are accepted as well.
/// * `Period` is not available.
///
/// Columns that already hold dates or timestamps are cast by Arrow directly.
///
/// # Errors
/// `NotImplemented` for `Period`, or a value error listing the rejected
/// tokens under `raise`.
pub fn convert_str_to_timestamp_series(
    array: &ArrayRef,
    is_date: bool,
    representation: TimestampRepresentation,
    ts_errors: ErrorPolicy,
    format: Option<&str>,
) -> Result<ArrayRef> {
    let Some(target) = target_temporal_type(is_date, representation) else {
        return Err(CastError::NotImplemented(
            "Conversion to period is not available yet for this caster".to_string(),
        ));
    };

    if array.data_type() == &target
        || is_temporal(array.data_type())
        || array.data_type() == &DataType::Null
    {
        return cast_natively(array, &target, ts_errors);
    }

    let default_format = if is_date {
        DEFAULT_DATE_FORMAT
    } else {
        DEFAULT_DATETIME_FORMAT
    };
    let formats: Vec<(&str, bool)> = match (format, representation) {
        (Some(explicit), _) => vec![explicit],
        (None, TimestampRepresentation::HighPrecisionTimestamp) => {
            std::iter::once(default_format)
                .chain(FALLBACK_DATETIME_FORMATS)
                .collect()
        }
        (None, _) => vec![default_format],
    }
    .into_iter()
    .map(|f| (f, has_time_fields(f)))
    .collect();

    let strings = to_string_array(array)?;
    let mut rejected = Vec::new();
    let parsed: Vec<Option<NaiveDateTime>> = strings
        .iter()
        .map(|value| {
            let token = value.map(str::trim).filter(|t| !t.is_empty())?;
            let parsed = formats
                .iter()
                .find_map(|&(f, has_time)| parse_token(token, f, has_time));
            if parsed.is_none() {
                rejected.push(token.to_string());
            }
            parsed
        })
        .collect();

    let converted: ArrayRef = match target {
        DataType::Date32 => {
            let mut builder = Date32Builder::with_capacity(parsed.len());
            for value in &parsed {
                builder.append_option(value.map(|dt| Date32Type::from_naive_date(dt.date())));
            }
            Arc::new(builder.finish())
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let mut builder = TimestampMicrosecondBuilder::with_capacity(parsed.len());
            for value in &parsed {
                builder.append_option(value.map(|dt| dt.and_utc().timestamp_micros()));
            }
            Arc::new(builder.finish())
        }
        _ => {
            let mut builder = TimestampNanosecondBuilder::with_capacity(parsed.len());
            for (value, raw) in parsed.iter().zip(strings.iter()) {
                let nanos = value.and_then(|dt| dt.and_utc().timestamp_nanos_opt());
                if value.is_some() && nanos.is_none() {
                    let token = raw.map(str::trim).unwrap_or_default();
                    rejected.push(format!("{token} (out of bounds)"));
                }
                builder.append_option(nanos);
            }
            Arc::new(builder.finish())
        }
    };

    let kind = if is_date { "date" } else { "timestamp" };
    settle_rejections(converted, array, &rejected, kind, ts_errors)
}
