use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

//==============================================================================
// Cell Values
//==============================================================================

/// Raw cell content as reported by a worksheet, before any coercion
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// A coerced field value stored in a [`Record`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Empty,
    Text(String),
    Number(f64),
    #[serde(serialize_with = "serialize_datetime")]
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl From<CellValue> for Value {
    fn from(raw: CellValue) -> Self {
        match raw {
            CellValue::Empty => Value::Empty,
            CellValue::Number(n) => Value::Number(n),
            CellValue::Text(s) => Value::Text(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// ISO-8601 layout used whenever a date-time is rendered as text
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn serialize_datetime<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&dt.format(DATETIME_FORMAT))
}

/// Format a number for display, dropping the fraction of integral values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

//==============================================================================
// Records
//==============================================================================

/// One extracted row: header-keyed fields in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field unless the header is already present.
    ///
    /// Returns `false` when the header was taken, leaving the earlier value intact.
    pub fn insert_first(&mut self, header: &str, value: Value) -> bool {
        if self.contains(header) {
            return false;
        }
        self.fields.push((header.to_string(), value));
        true
    }

    pub fn get(&self, header: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, header: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == header)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

//==============================================================================
// Diagnostics
//==============================================================================

/// A recoverable anomaly recorded during extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A later column repeated a header already filled in this row; its value was dropped
    DuplicateHeader {
        header: String,
        cell: String,
        kept_cell: String,
    },
    /// A date-formatted cell could not be converted; the raw value was kept
    DateCoercion {
        cell: String,
        format: String,
        reason: String,
    },
    /// A derived header cell was blank and the column letters were used instead
    EmptyHeaderCell { cell: String, header: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateHeader {
                header,
                cell,
                kept_cell,
            } => write!(
                f,
                "duplicate header '{}': value at {} dropped, {} kept",
                header, cell, kept_cell
            ),
            Warning::DateCoercion {
                cell,
                format,
                reason,
            } => write!(
                f,
                "date coercion failed at {} (format '{}'): {}",
                cell, format, reason
            ),
            Warning::EmptyHeaderCell { cell, header } => {
                write!(f, "header cell {} is empty, using '{}'", cell, header)
            }
        }
    }
}

/// Records extracted from one range, in row order, plus the diagnostics channel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub records: Vec<Record>,
    pub warnings: Vec<Warning>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
