//! Serial date coercion for date-formatted cells
//!
//! Serial 0 is 1899-12-30, which absorbs the 1900 leap-year quirk for every
//! date from 1900-03-01 onward.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{CellValue, Value};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Serial of 9999-12-31, the last representable spreadsheet date
pub const MAX_SERIAL: f64 = 2_958_465.0;

/// Date/time number format: 2-3 d/m/y groups split by '/' or '-', optional time part.
/// Leading bracket sections (`[$-409]`, `[Red]`) and a trailing `;@` are tolerated.
const DATE_FORMAT_PATTERN: &str = r"(?i)^(?:\[[^\]]*\])*[dmy]{1,4}(?:[/-][dmy]{1,4}){1,2}(?:\s+h{1,2}:m{1,2}(?::s{1,2}(?:\.0+)?)?(?:\s*(?:am/pm|a/p))?)?(?:;@)?$";

/// A date-formatted cell that could not be converted
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionFailure {
    /// The uncoerced value, kept in the record
    pub raw: Value,
    pub reason: String,
}

/// Detects date display formats and converts serials under them
#[derive(Debug, Clone)]
pub struct DateCoercion {
    pattern: Regex,
}

impl DateCoercion {
    pub fn new() -> ExtractResult<Self> {
        let pattern = Regex::new(DATE_FORMAT_PATTERN)
            .map_err(|e| ExtractError::Workbook(format!("Invalid date pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Whether a display format describes a calendar date
    pub fn is_date_format(&self, format: &str) -> bool {
        self.pattern.is_match(format.trim())
    }

    /// Coerce a raw cell value under its display format.
    ///
    /// Values under non-date formats pass through unchanged.
    pub fn coerce(&self, raw: CellValue, format: &str) -> Result<Value, CoercionFailure> {
        if !self.is_date_format(format) {
            return Ok(raw.into());
        }

        let serial = match &raw {
            CellValue::Empty => return Ok(Value::Empty),
            CellValue::Text(s) if s.trim().is_empty() => return Ok(Value::Empty),
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        let Some(serial) = serial else {
            let reason = format!("'{}' is not a serial date", raw_text(&raw));
            return Err(CoercionFailure {
                raw: raw.into(),
                reason,
            });
        };

        serial_to_datetime(serial)
            .map(Value::DateTime)
            .ok_or_else(|| CoercionFailure {
                reason: format!("serial {} is outside the supported date range", serial),
                raw: raw.into(),
            })
    }
}

fn raw_text(raw: &CellValue) -> String {
    match raw {
        CellValue::Text(s) => s.clone(),
        other => Value::from(other.clone()).to_string(),
    }
}

/// Convert a spreadsheet serial (days since 1899-12-30, fraction = time of day)
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }

    let days = serial.trunc();
    let seconds = ((serial - days) * SECONDS_PER_DAY).round() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;

    epoch
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_serial_epoch() {
        assert_eq!(serial_to_datetime(0.0), Some(date(1899, 12, 30)));
        assert_eq!(serial_to_datetime(1.0), Some(date(1899, 12, 31)));
        assert_eq!(serial_to_datetime(61.0), Some(date(1900, 3, 1)));
        assert_eq!(serial_to_datetime(44197.0), Some(date(2021, 1, 1)));
        assert_eq!(serial_to_datetime(MAX_SERIAL), Some(date(9999, 12, 31)));
    }

    #[test]
    fn test_serial_time_fraction() {
        let dt = serial_to_datetime(44197.75).unwrap();
        assert_eq!(dt, date(2021, 1, 1) + Duration::hours(18));
    }

    #[test]
    fn test_serial_out_of_range() {
        assert_eq!(serial_to_datetime(-1.0), None);
        assert_eq!(serial_to_datetime(MAX_SERIAL + 1.0), None);
        assert_eq!(serial_to_datetime(f64::NAN), None);
        assert_eq!(serial_to_datetime(f64::INFINITY), None);
    }

    #[test]
    fn test_date_formats_detected() {
        let coercion = DateCoercion::new().unwrap();
        for format in [
            "mm/dd/yyyy",
            "m/d/yy",
            "yyyy-mm-dd",
            "d-mmm-yy",
            "mmm-yy",
            "DD/MM/YYYY",
            "yyyy-mm-dd hh:mm:ss",
            "m/d/yyyy h:mm",
            "[$-409]m/d/yy h:mm AM/PM;@",
            "m/d/yyyy;@",
        ] {
            assert!(coercion.is_date_format(format), "expected date: {}", format);
        }
    }

    #[test]
    fn test_non_date_formats() {
        let coercion = DateCoercion::new().unwrap();
        for format in ["General", "0.00", "#,##0", "@", "hh:mm:ss", "[h]:mm:ss", "0%", "", "yyyy"] {
            assert!(!coercion.is_date_format(format), "expected non-date: {}", format);
        }
    }

    #[test]
    fn test_coerce_serial_under_date_format() {
        let coercion = DateCoercion::new().unwrap();
        let value = coercion
            .coerce(CellValue::Number(44197.0), "mm/dd/yyyy")
            .unwrap();
        assert_eq!(value, Value::DateTime(date(2021, 1, 1)));
    }

    #[test]
    fn test_coerce_numeric_text_under_date_format() {
        let coercion = DateCoercion::new().unwrap();
        let value = coercion
            .coerce(CellValue::Text(" 44197 ".to_string()), "yyyy-mm-dd")
            .unwrap();
        assert_eq!(value, Value::DateTime(date(2021, 1, 1)));
    }

    #[test]
    fn test_coerce_passthrough() {
        let coercion = DateCoercion::new().unwrap();
        assert_eq!(
            coercion.coerce(CellValue::Number(44197.0), "General").unwrap(),
            Value::Number(44197.0)
        );
        assert_eq!(
            coercion
                .coerce(CellValue::Text("hello".to_string()), "@")
                .unwrap(),
            Value::Text("hello".to_string())
        );
        assert_eq!(
            coercion.coerce(CellValue::Empty, "mm/dd/yyyy").unwrap(),
            Value::Empty
        );
    }

    #[test]
    fn test_blank_text_under_date_format_is_empty() {
        let coercion = DateCoercion::new().unwrap();
        for blank in ["", "   ", "\t"] {
            assert_eq!(
                coercion
                    .coerce(CellValue::Text(blank.to_string()), "mm/dd/yyyy")
                    .unwrap(),
                Value::Empty
            );
        }
    }

    #[test]
    fn test_coerce_failure_keeps_raw() {
        let coercion = DateCoercion::new().unwrap();

        let failure = coercion
            .coerce(CellValue::Text("soon".to_string()), "mm/dd/yyyy")
            .unwrap_err();
        assert_eq!(failure.raw, Value::Text("soon".to_string()));
        assert!(failure.reason.contains("soon"));

        let failure = coercion
            .coerce(CellValue::Number(-5.0), "mm/dd/yyyy")
            .unwrap_err();
        assert_eq!(failure.raw, Value::Number(-5.0));
    }
}
