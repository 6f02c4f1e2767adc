//! Workbook tests: fixtures authored with rust_xlsxwriter, read back through calamine

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook};
use sheet_records::excel::ExcelWorkbook;
use sheet_records::worksheet::Worksheet;
use sheet_records::{ExtractError, ExtractRequest, RangeExtractor, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// People sheet:
///
/// |   | A     | B   | C          |
/// | 1 | Name  | Age | Joined     |
/// | 2 | Alice | 30  | 2021-01-01 |
/// | 3 | Bob   | 41  | 2021-01-01 18:00 |
///
/// plus a second "Notes" sheet with a single cell.
fn write_people_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("people.xlsx");
    let mut workbook = Workbook::new();
    let date = Format::new().set_num_format("mm/dd/yyyy");
    let datetime = Format::new().set_num_format("yyyy-mm-dd hh:mm");

    let people = workbook.add_worksheet();
    people.set_name("People").unwrap();
    people.write_string(0, 0, "Name").unwrap();
    people.write_string(0, 1, "Age").unwrap();
    people.write_string(0, 2, "Joined").unwrap();
    people.write_string(1, 0, "Alice").unwrap();
    people.write_number(1, 1, 30.0).unwrap();
    people
        .write_number_with_format(1, 2, 44197.0, &date)
        .unwrap();
    people.write_string(2, 0, "Bob").unwrap();
    people.write_number(2, 1, 41.0).unwrap();
    people
        .write_number_with_format(2, 2, 44197.75, &datetime)
        .unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "checked").unwrap();

    workbook.save(&path).unwrap();
    path
}

fn jan_first(hour: u32) -> Value {
    Value::DateTime(
        NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
    )
}

#[test]
fn test_workbook_sheet_names() {
    let dir = TempDir::new().unwrap();
    let path = write_people_workbook(dir.path());

    let workbook = ExcelWorkbook::open(&path).unwrap();
    assert_eq!(workbook.sheet_names(), ["People", "Notes"]);
}

#[test]
fn test_extract_range_from_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = write_people_workbook(dir.path());

    let mut workbook = ExcelWorkbook::open(&path).unwrap();
    let sheet = workbook.sheet(None).unwrap();
    let extractor = RangeExtractor::new(&sheet).unwrap();

    let result = extractor.extract_range("A1:C3", None).unwrap();
    assert_eq!(result.records.len(), 2);
    assert!(result.warnings.is_empty());

    let alice = &result.records[0];
    assert_eq!(alice.get("Name"), Some(&Value::Text("Alice".to_string())));
    assert_eq!(alice.get("Age"), Some(&Value::Number(30.0)));
    assert_eq!(alice.get("Joined"), Some(&jan_first(0)));

    let bob = &result.records[1];
    assert_eq!(bob.get("Joined"), Some(&jan_first(18)));
}

#[test]
fn test_extract_cell_from_named_sheet() {
    let dir = TempDir::new().unwrap();
    let path = write_people_workbook(dir.path());

    let mut workbook = ExcelWorkbook::open(&path).unwrap();
    let notes = workbook.sheet(Some("Notes")).unwrap();
    let output = ExtractRequest::cell("A1").run(&notes).unwrap();

    assert_eq!(output.cell.as_deref(), Some("checked"));
}

#[test]
fn test_date_cell_text_and_format() {
    let dir = TempDir::new().unwrap();
    let path = write_people_workbook(dir.path());

    let mut workbook = ExcelWorkbook::open(&path).unwrap();
    let sheet = workbook.sheet(Some("People")).unwrap();
    let extractor = RangeExtractor::new(&sheet).unwrap();

    assert_eq!(extractor.extract_cell("C2").unwrap(), "2021-01-01");
    assert_eq!(extractor.extract_cell("B3").unwrap(), "41");
}

#[test]
fn test_used_range_from_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = write_people_workbook(dir.path());

    let mut workbook = ExcelWorkbook::open(&path).unwrap();
    let sheet = workbook.sheet(None).unwrap();
    assert_eq!(sheet.used_range(), (3, 3));

    let request = ExtractRequest {
        use_used_range: true,
        ..ExtractRequest::default()
    };
    let output = request.run(&sheet).unwrap();
    assert_eq!(output.range.unwrap().records.len(), 2);
}

#[test]
fn test_unknown_sheet() {
    let dir = TempDir::new().unwrap();
    let path = write_people_workbook(dir.path());

    let mut workbook = ExcelWorkbook::open(&path).unwrap();
    assert!(matches!(
        workbook.sheet(Some("Missing")),
        Err(ExtractError::SheetNotFound(name)) if name == "Missing"
    ));
}

#[test]
fn test_open_nonexistent_workbook() {
    assert!(ExcelWorkbook::open("nonexistent.xlsx").is_err());
}
