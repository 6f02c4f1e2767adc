//! Calamine-backed worksheet

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{
    open_workbook_auto, Data, ExcelDateTime, ExcelDateTimeType, Range, Reader, Sheets,
};
use tracing::debug;

use crate::core::dates::serial_to_datetime;
use crate::core::reference::CellPosition;
use crate::error::{ExtractError, ExtractResult};
use crate::types::{format_number, CellValue};
use crate::worksheet::{Worksheet, GENERAL_FORMAT};

/// Display format reported for calamine date cells without a time part
const DATE_FORMAT: &str = "yyyy-mm-dd";
/// Display format reported for calamine date cells with a time part
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
/// Display format reported for durations, which stay numeric
const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Days between the 1900 and 1904 date systems (1899-12-30 to 1904-01-01)
const DATE_1904_OFFSET: f64 = 1462.0;

/// An open workbook (.xlsx, .xlsm, .xlsb, .xls or .ods)
pub struct ExcelWorkbook {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl ExcelWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> ExtractResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ExtractError::Workbook(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let workbook = open_workbook_auto(&path)
            .map_err(|e| ExtractError::Workbook(format!("{}: {}", path.display(), e)))?;
        let sheet_names = workbook.sheet_names().to_vec();
        debug!("Opened {} with sheets {:?}", path.display(), sheet_names);

        Ok(Self {
            path,
            workbook,
            sheet_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Load a sheet by name, or the first sheet when `name` is `None`
    pub fn sheet(&mut self, name: Option<&str>) -> ExtractResult<ExcelSheet> {
        let name = match name {
            Some(n) => n.to_string(),
            None => self
                .sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ExtractError::SheetNotFound("No sheets in workbook".to_string()))?,
        };

        if !self.sheet_names.contains(&name) {
            return Err(ExtractError::SheetNotFound(name));
        }

        let range = self.workbook.worksheet_range(&name)?;
        Ok(ExcelSheet::from_range(name, range))
    }
}

/// A loaded sheet
#[derive(Debug, Clone)]
pub struct ExcelSheet {
    name: String,
    range: Range<Data>,
}

impl ExcelSheet {
    pub fn from_range(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn data(&self, position: CellPosition) -> ExtractResult<Option<&Data>> {
        position.ensure_within_grid()?;
        Ok(self
            .range
            .get_value((position.row - 1, position.column - 1)))
    }
}

impl Worksheet for ExcelSheet {
    fn cell_text(&self, position: CellPosition) -> ExtractResult<String> {
        Ok(self.data(position)?.map(cell_to_string).unwrap_or_default())
    }

    fn cell_value(&self, position: CellPosition) -> ExtractResult<CellValue> {
        let value = match self.data(position)? {
            None | Some(Data::Empty) => CellValue::Empty,
            Some(Data::Int(i)) => CellValue::Number(*i as f64),
            Some(Data::Float(f)) => CellValue::Number(*f),
            Some(Data::DateTime(dt)) => CellValue::Number(date_serial(dt)),
            Some(other) => CellValue::Text(cell_to_string(other)),
        };
        Ok(value)
    }

    fn cell_display_format(&self, position: CellPosition) -> ExtractResult<String> {
        let format = match self.data(position)? {
            Some(Data::DateTime(dt)) if dt.is_duration() => DURATION_FORMAT,
            Some(Data::DateTime(dt)) if dt.as_f64().fract() != 0.0 => DATETIME_FORMAT,
            Some(Data::DateTime(_)) => DATE_FORMAT,
            _ => GENERAL_FORMAT,
        };
        Ok(format.to_string())
    }

    fn used_range(&self) -> (u32, u32) {
        match self.range.end() {
            Some((row, column)) if !self.range.is_empty() => (column + 1, row + 1),
            _ => (0, 0),
        }
    }
}

/// Serial of a calamine date-time on the 1900 date system.
///
/// Workbooks saved with the 1904 date system count days from 1904-01-01;
/// calamine keeps their raw serials, so they are shifted onto the 1899-12-30
/// epoch used by [`serial_to_datetime`]. Durations are left as they are.
fn date_serial(dt: &ExcelDateTime) -> f64 {
    let serial = dt.as_f64();
    if dt.is_duration() {
        return serial;
    }

    let on_1900 = ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false);
    if dt.as_datetime() != on_1900.as_datetime() {
        serial + DATE_1904_OFFSET
    } else {
        serial
    }
}

/// Render a calamine cell as display text
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERROR: {}", e),
        Data::DateTime(dt) => {
            let serial = date_serial(dt);
            match serial_to_datetime(serial) {
                Some(value) if dt.is_datetime() && serial.fract() == 0.0 => {
                    value.format("%Y-%m-%d").to_string()
                }
                Some(value) if dt.is_datetime() => value.format("%Y-%m-%d %H:%M:%S").to_string(),
                _ => format_number(serial),
            }
        }
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet() -> ExcelSheet {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("Name".to_string()));
        range.set_value((0, 1), Data::String("Qty".to_string()));
        range.set_value((0, 2), Data::String("Ok".to_string()));
        range.set_value((1, 0), Data::String("bolt".to_string()));
        range.set_value((1, 1), Data::Int(12));
        range.set_value((1, 2), Data::Bool(true));
        range.set_value((2, 1), Data::Float(2.5));
        ExcelSheet::from_range("Parts", range)
    }

    #[test]
    fn test_cell_values() {
        let sheet = sample_sheet();
        assert_eq!(
            sheet.cell_value(CellPosition::new(2, 1)).unwrap(),
            CellValue::Text("bolt".to_string())
        );
        assert_eq!(
            sheet.cell_value(CellPosition::new(2, 2)).unwrap(),
            CellValue::Number(12.0)
        );
        assert_eq!(
            sheet.cell_value(CellPosition::new(2, 3)).unwrap(),
            CellValue::Text("true".to_string())
        );
        assert_eq!(
            sheet.cell_value(CellPosition::new(3, 1)).unwrap(),
            CellValue::Empty
        );
        // Outside the loaded range
        assert_eq!(
            sheet.cell_value(CellPosition::new(40, 40)).unwrap(),
            CellValue::Empty
        );
    }

    #[test]
    fn test_cell_text_and_format() {
        let sheet = sample_sheet();
        assert_eq!(sheet.cell_text(CellPosition::new(2, 2)).unwrap(), "12");
        assert_eq!(sheet.cell_text(CellPosition::new(3, 2)).unwrap(), "2.5");
        assert_eq!(
            sheet.cell_display_format(CellPosition::new(2, 2)).unwrap(),
            GENERAL_FORMAT
        );
    }

    #[test]
    fn test_1904_dates_shifted_to_1900_system() {
        let mut range = Range::new((0, 0), (2, 0));
        range.set_value((0, 0), Data::String("When".to_string()));
        range.set_value(
            (1, 0),
            Data::DateTime(ExcelDateTime::new(42735.0, ExcelDateTimeType::DateTime, true)),
        );
        range.set_value(
            (2, 0),
            Data::DateTime(ExcelDateTime::new(44197.0, ExcelDateTimeType::DateTime, false)),
        );
        let sheet = ExcelSheet::from_range("Dates", range);

        assert_eq!(
            sheet.cell_value(CellPosition::new(2, 1)).unwrap(),
            CellValue::Number(44197.0)
        );
        assert_eq!(sheet.cell_text(CellPosition::new(2, 1)).unwrap(), "2021-01-01");
        assert_eq!(sheet.cell_text(CellPosition::new(3, 1)).unwrap(), "2021-01-01");

        let extractor = crate::core::RangeExtractor::new(&sheet).unwrap();
        let result = extractor.extract_range("A1:A3", None).unwrap();
        let first = crate::core::serial_to_datetime(44197.0).map(crate::types::Value::DateTime);
        assert_eq!(result.records[0].get("When"), first.as_ref());
        assert_eq!(result.records[1].get("When"), first.as_ref());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_used_range() {
        assert_eq!(sample_sheet().used_range(), (3, 3));
        let empty = ExcelSheet::from_range("Empty", Range::empty());
        assert_eq!(empty.used_range(), (0, 0));
    }

    #[test]
    fn test_outside_grid_fails() {
        let sheet = sample_sheet();
        assert!(matches!(
            sheet.cell_value(CellPosition::new(1, 20_000)),
            Err(ExtractError::CellLookup { .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            ExcelWorkbook::open("does-not-exist.xlsx"),
            Err(ExtractError::Workbook(_))
        ));
    }
}
