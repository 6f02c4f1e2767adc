//! A1-style cell and range references

use regex::Regex;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::column::{index_to_letters, letters_to_index};
use crate::error::{ExtractError, ExtractResult};

/// Last row of a worksheet grid
pub const MAX_ROWS: u32 = 1_048_576;
/// Last column of a worksheet grid (XFD)
pub const MAX_COLUMNS: u32 = 16_384;

/// One cell, 1-based on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: u32,
    pub column: u32,
}

impl CellPosition {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Fail with `CellLookup` when the position lies outside the worksheet grid
    pub fn ensure_within_grid(&self) -> ExtractResult<()> {
        if self.row == 0 || self.row > MAX_ROWS || self.column == 0 || self.column > MAX_COLUMNS {
            return Err(ExtractError::CellLookup {
                cell: self.to_string(),
                reason: format!(
                    "outside the worksheet grid ({} rows x {} columns)",
                    MAX_ROWS, MAX_COLUMNS
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match index_to_letters(self.column) {
            Ok(letters) => write!(f, "{}{}", letters, self.row),
            Err(_) => write!(f, "R{}C{}", self.row, self.column),
        }
    }
}

impl FromStr for CellPosition {
    type Err = ExtractError;

    fn from_str(s: &str) -> ExtractResult<Self> {
        parse_cell(s)
    }
}

/// A rectangular region given by its top-left and bottom-right corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeReference {
    pub start_column: u32,
    pub end_column: u32,
    pub start_row: u32,
    pub end_row: u32,
}

impl RangeReference {
    /// Range from A1 to the last used cell of a sheet
    pub fn covering(column_count: u32, row_count: u32) -> ExtractResult<Self> {
        if column_count == 0 || row_count == 0 {
            return Err(ExtractError::malformed_range(
                "<used range>",
                "worksheet has no used cells",
            ));
        }
        Ok(Self {
            start_column: 1,
            end_column: column_count,
            start_row: 1,
            end_row: row_count,
        })
    }

    pub fn column_count(&self) -> usize {
        (self.end_column - self.start_column + 1) as usize
    }

    pub fn row_count(&self) -> usize {
        (self.end_row - self.start_row + 1) as usize
    }

    pub fn columns(&self) -> RangeInclusive<u32> {
        self.start_column..=self.end_column
    }

    pub fn rows(&self) -> RangeInclusive<u32> {
        self.start_row..=self.end_row
    }

    pub fn start(&self) -> CellPosition {
        CellPosition::new(self.start_row, self.start_column)
    }

    pub fn end(&self) -> CellPosition {
        CellPosition::new(self.end_row, self.end_column)
    }
}

impl fmt::Display for RangeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start(), self.end())
    }
}

impl FromStr for RangeReference {
    type Err = ExtractError;

    fn from_str(s: &str) -> ExtractResult<Self> {
        parse_range(s)
    }
}

/// Parse a range like "A1:C10"
pub fn parse_range(range: &str) -> ExtractResult<RangeReference> {
    let parts: Vec<&str> = range.trim().split(':').collect();
    if parts.len() != 2 {
        return Err(ExtractError::malformed_range(
            range,
            "expected exactly one ':' as in 'A1:B2'",
        ));
    }

    let malformed = |reason: &str| ExtractError::malformed_range(range, reason);
    let start = parse_position(parts[0], malformed)?;
    let end = parse_position(parts[1], malformed)?;

    if end.column < start.column {
        return Err(malformed("end column precedes start column"));
    }
    if end.row < start.row {
        return Err(malformed("end row precedes start row"));
    }

    Ok(RangeReference {
        start_column: start.column,
        end_column: end.column,
        start_row: start.row,
        end_row: end.row,
    })
}

/// Parse a single cell reference like "B7".
///
/// Every failure, column overflow included, is reported as `MalformedCell`.
pub fn parse_cell(reference: &str) -> ExtractResult<CellPosition> {
    parse_position(reference, |reason| {
        ExtractError::malformed_cell(reference, reason)
    })
    .map_err(|err| match err {
        ExtractError::InvalidColumn(letters) => ExtractError::malformed_cell(
            reference,
            format!("column '{}' is beyond the addressable range", letters),
        ),
        other => other,
    })
}

/// Split `<letters><digits>` and decode both halves
fn parse_position(
    text: &str,
    malformed: impl Fn(&str) -> ExtractError,
) -> ExtractResult<CellPosition> {
    let pattern = Regex::new(r"^([A-Za-z]*)(.*)$").map_err(|e| malformed(&e.to_string()))?;
    let text = text.trim();

    let caps = pattern
        .captures(text)
        .ok_or_else(|| malformed("unreadable cell reference"))?;
    let letters = &caps[1];
    let digits = &caps[2];

    if letters.is_empty() {
        return Err(malformed("missing column letters"));
    }
    if digits.is_empty() {
        return Err(malformed("missing row number"));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed(&format!("row '{}' is not a number", digits)));
    }

    let row: u32 = digits
        .parse()
        .map_err(|_| malformed(&format!("row '{}' is out of range", digits)))?;
    if row == 0 {
        return Err(malformed("row number must be >= 1"));
    }

    let column = letters_to_index(letters)?;

    Ok(CellPosition { row, column })
}
