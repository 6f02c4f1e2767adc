//! The worksheet collaborator consumed by the extraction engine

use std::collections::HashMap;

use crate::core::reference::CellPosition;
use crate::error::ExtractResult;
use crate::types::{CellValue, Value};

/// Display format of cells with no explicit number format
pub const GENERAL_FORMAT: &str = "General";

/// Read access to one worksheet.
///
/// Positions are 1-based. Implementations report access failures as
/// [`ExtractError::CellLookup`](crate::error::ExtractError::CellLookup).
pub trait Worksheet {
    /// Text of the cell as a user would read it
    fn cell_text(&self, position: CellPosition) -> ExtractResult<String>;

    /// Raw stored value of the cell
    fn cell_value(&self, position: CellPosition) -> ExtractResult<CellValue>;

    /// Number format string declared for the cell
    fn cell_display_format(&self, position: CellPosition) -> ExtractResult<String>;

    /// `(column_count, row_count)` of the region from A1 to the last used cell
    fn used_range(&self) -> (u32, u32);
}

#[derive(Debug, Clone, PartialEq)]
struct MemoryCell {
    value: CellValue,
    format: String,
}

/// Worksheet held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWorksheet {
    cells: HashMap<CellPosition, MemoryCell>,
}

impl MemoryWorksheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from rows of text starting at A1
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        let mut sheet = Self::new();
        for (r, row) in rows.iter().enumerate() {
            sheet.set_row(r as u32 + 1, row);
        }
        sheet
    }

    /// Fill one row with text values starting at column A
    pub fn set_row(&mut self, row: u32, values: &[&str]) -> &mut Self {
        for (c, text) in values.iter().enumerate() {
            self.set_value(CellPosition::new(row, c as u32 + 1), *text);
        }
        self
    }

    pub fn set_value(&mut self, position: CellPosition, value: impl Into<CellValue>) -> &mut Self {
        self.set_formatted(position, value, GENERAL_FORMAT)
    }

    pub fn set_formatted(
        &mut self,
        position: CellPosition,
        value: impl Into<CellValue>,
        format: &str,
    ) -> &mut Self {
        self.cells.insert(
            position,
            MemoryCell {
                value: value.into(),
                format: format.to_string(),
            },
        );
        self
    }

    fn cell(&self, position: CellPosition) -> ExtractResult<Option<&MemoryCell>> {
        position.ensure_within_grid()?;
        Ok(self.cells.get(&position))
    }
}

impl Worksheet for MemoryWorksheet {
    fn cell_text(&self, position: CellPosition) -> ExtractResult<String> {
        Ok(self
            .cell(position)?
            .map(|cell| Value::from(cell.value.clone()).to_string())
            .unwrap_or_default())
    }

    fn cell_value(&self, position: CellPosition) -> ExtractResult<CellValue> {
        Ok(self
            .cell(position)?
            .map(|cell| cell.value.clone())
            .unwrap_or(CellValue::Empty))
    }

    fn cell_display_format(&self, position: CellPosition) -> ExtractResult<String> {
        Ok(self
            .cell(position)?
            .map(|cell| cell.format.clone())
            .unwrap_or_else(|| GENERAL_FORMAT.to_string()))
    }

    fn used_range(&self) -> (u32, u32) {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.value.is_empty())
            .fold((0, 0), |(cols, rows), (pos, _)| {
                (cols.max(pos.column), rows.max(pos.row))
            })
    }
}
