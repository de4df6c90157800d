//! Canonical text forms for column values.
//!
//! Every column value is held as text. This module defines the canonical
//! rendering of each Rust type that can be assigned to a column, the checks
//! applied when text is assigned to a typed column, and the parsers behind
//! the typed getters.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::DataType;

/// Canonical date format (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical time format (`HH:MM:SS`).
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Canonical date-time format (`YYYY-MM-DD HH:MM:SS`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// The "no date" value MySQL stores in non-nullable date columns.
pub const ZERO_DATE: &str = "0000-00-00";
/// The "no date-time" counterpart of [`ZERO_DATE`].
pub const ZERO_DATETIME: &str = "0000-00-00 00:00:00";

/// Date-time layouts accepted on input, in addition to [`DATETIME_FORMAT`].
const DATETIME_INPUTS: &[&str] = &[
    DATETIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y%m%d%H%M%S",
];

/// Why a value could not be put in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    /// The rejected value, rendered as text.
    pub value: String,
    pub message: String,
}

/// A value that can be assigned to a column.
///
/// `Ok(None)` is an explicit SQL `NULL`. The caller attaches the column
/// context to a [`ValueError`].
pub trait IntoColumnValue {
    fn into_column_value(self, data_type: DataType) -> Result<Option<String>, ValueError>;
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl IntoColumnValue for $ty {
                fn into_column_value(self, _data_type: DataType) -> Result<Option<String>, ValueError> {
                    Ok(Some(self.to_string()))
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl IntoColumnValue for f64 {
    fn into_column_value(self, _data_type: DataType) -> Result<Option<String>, ValueError> {
        if self.is_finite() {
            Ok(Some(self.to_string()))
        } else {
            Err(ValueError {
                value: self.to_string(),
                message: "non-finite numbers have no SQL representation".to_string(),
            })
        }
    }
}

impl IntoColumnValue for f32 {
    fn into_column_value(self, _data_type: DataType) -> Result<Option<String>, ValueError> {
        if self.is_finite() {
            Ok(Some(self.to_string()))
        } else {
            Err(ValueError {
                value: self.to_string(),
                message: "non-finite numbers have no SQL representation".to_string(),
            })
        }
    }
}

impl IntoColumnValue for bool {
    fn into_column_value(self, _data_type: DataType) -> Result<Option<String>, ValueError> {
        Ok(Some(if self { "1" } else { "0" }.to_string()))
    }
}

impl IntoColumnValue for &str {
    fn into_column_value(self, data_type: DataType) -> Result<Option<String>, ValueError> {
        match validate_text(self, data_type) {
            Ok(()) => Ok(Some(self.to_string())),
            Err(message) => Err(ValueError {
                value: self.to_string(),
                message,
            }),
        }
    }
}

impl IntoColumnValue for String {
    fn into_column_value(self, data_type: DataType) -> Result<Option<String>, ValueError> {
        match validate_text(&self, data_type) {
            Ok(()) => Ok(Some(self)),
            Err(message) => Err(ValueError {
                value: self,
                message,
            }),
        }
    }
}

impl IntoColumnValue for &String {
    fn into_column_value(self, data_type: DataType) -> Result<Option<String>, ValueError> {
        self.as_str().into_column_value(data_type)
    }
}

impl IntoColumnValue for NaiveDate {
    fn into_column_value(self, _data_type: DataType) -> Result<Option<String>, ValueError> {
        Ok(Some(self.format(DATE_FORMAT).to_string()))
    }
}

impl IntoColumnValue for NaiveTime {
    fn into_column_value(self, _data_type: DataType) -> Result<Option<String>, ValueError> {
        Ok(Some(self.format(TIME_FORMAT).to_string()))
    }
}

impl IntoColumnValue for NaiveDateTime {
    fn into_column_value(self, data_type: DataType) -> Result<Option<String>, ValueError> {
        // A date-time stored in a DATE column keeps only its date part.
        let format = if data_type == DataType::Date {
            DATE_FORMAT
        } else {
            DATETIME_FORMAT
        };
        Ok(Some(self.format(format).to_string()))
    }
}

impl<T: IntoColumnValue> IntoColumnValue for Option<T> {
    fn into_column_value(self, data_type: DataType) -> Result<Option<String>, ValueError> {
        match self {
            Some(v) => v.into_column_value(data_type),
            None => Ok(None),
        }
    }
}

/// Check that `text` is acceptable for a column of `data_type`.
///
/// Empty text is always accepted. Integer columns need an integer, floating
/// columns a finite number, temporal columns a value in one of the accepted
/// layouts (or the zero-date sentinel).
pub fn validate_text(text: &str, data_type: DataType) -> Result<(), String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    let ok = match data_type {
        t if t.is_integer() => text.parse::<i64>().is_ok() || text.parse::<u64>().is_ok(),
        t if t.is_float() => text.parse::<f64>().is_ok_and(f64::is_finite),
        DataType::Date => text == ZERO_DATE || parse_date(text).is_some(),
        DataType::Time => parse_time(text).is_some(),
        DataType::DateTime | DataType::Timestamp => {
            text == ZERO_DATETIME || parse_datetime(text).is_some()
        }
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(format!("not a valid {} value", data_type))
    }
}

/// Parse a canonical date, or the date part of a date-time.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(text).map(|dt| dt.date()))
}

/// Parse a canonical time (fractional seconds tolerated).
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .ok()
        .or_else(|| NaiveTime::parse_from_str(text, "%H:%M:%S%.f").ok())
        .or_else(|| NaiveTime::parse_from_str(text, "%H:%M").ok())
}

/// Parse a date-time in any accepted layout; a bare date reads as midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse an integer, accepting a float form such as `"12.0"` by truncation.
pub fn parse_i64(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f.trunc() as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_canonical_form() {
        assert_eq!(42i32.into_column_value(DataType::Int), Ok(Some("42".to_string())));
        assert_eq!(
            (-9_000_000_000i64).into_column_value(DataType::BigInt),
            Ok(Some("-9000000000".to_string()))
        );
    }

    #[test]
    fn test_float_round_trip_form() {
        let v = 0.1f64 + 0.2f64;
        let text = v.into_column_value(DataType::Double).unwrap().unwrap();
        assert_eq!(text.parse::<f64>().unwrap(), v);
        assert!(f64::NAN.into_column_value(DataType::Double).is_err());
        assert!(f32::INFINITY.into_column_value(DataType::Float).is_err());
    }

    #[test]
    fn test_temporal_forms() {
        let d = NaiveDate::from_ymd_opt(1999, 10, 22).unwrap();
        assert_eq!(d.into_column_value(DataType::Date), Ok(Some("1999-10-22".to_string())));
        let t = NaiveTime::from_hms_opt(11, 26, 34).unwrap();
        assert_eq!(t.into_column_value(DataType::Time), Ok(Some("11:26:34".to_string())));
        let dt = d.and_time(t);
        assert_eq!(
            dt.into_column_value(DataType::DateTime),
            Ok(Some("1999-10-22 11:26:34".to_string()))
        );
        assert_eq!(dt.into_column_value(DataType::Date), Ok(Some("1999-10-22".to_string())));
    }

    #[test]
    fn test_text_validation_by_type() {
        assert!("1999-13-45".into_column_value(DataType::Date).is_err());
        assert!("1999-10-22".into_column_value(DataType::Date).is_ok());
        assert!(ZERO_DATE.into_column_value(DataType::Date).is_ok());
        assert!("abc".into_column_value(DataType::Int).is_err());
        assert!("".into_column_value(DataType::Int).is_ok());
        assert!("1.5e3".into_column_value(DataType::Double).is_ok());
        assert!("anything".into_column_value(DataType::Blob).is_ok());
    }

    #[test]
    fn test_option_is_null() {
        assert_eq!(None::<i32>.into_column_value(DataType::Int), Ok(None));
        assert_eq!(Some("x").into_column_value(DataType::Text), Ok(Some("x".to_string())));
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_i64(" 17 "), Some(17));
        assert_eq!(parse_i64("12.9"), Some(12));
        assert_eq!(parse_i64("x"), None);
        assert_eq!(
            parse_datetime("1999-10-22"),
            NaiveDate::from_ymd_opt(1999, 10, 22).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_date("1999-10-22 08:00:00"), NaiveDate::from_ymd_opt(1999, 10, 22));
        assert_eq!(parse_time("11:26"), NaiveTime::from_hms_opt(11, 26, 0));
    }
}
