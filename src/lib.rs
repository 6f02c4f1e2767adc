//! Sheet Records - header-keyed records from spreadsheet ranges
//!
//! Given an Excel-style range such as `A1:B7` and optionally an explicit list
//! of headers, this library walks the rectangular region of a worksheet and
//! returns one ordered record per data row.
//!
//! # Features
//!
//! - Column letter codec (`A` = 1, `AA` = 27) and A1 range parsing
//! - Headers derived from the first row of the range, or supplied explicitly
//! - Date-formatted serial values converted to calendar date-times
//! - Duplicate headers and failed date conversions reported as warnings, never silently
//! - Any [`Worksheet`] implementation: in-memory, or calamine-backed workbooks
//!
//! # Example
//!
//! ```no_run
//! use sheet_records::excel::ExcelWorkbook;
//! use sheet_records::RangeExtractor;
//!
//! let mut workbook = ExcelWorkbook::open("people.xlsx")?;
//! let sheet = workbook.sheet(None)?;
//!
//! let extractor = RangeExtractor::new(&sheet)?;
//! let result = extractor.extract_range("A1:B7", None)?;
//!
//! for record in &result.records {
//!     println!("{:?}", record.get("Name"));
//! }
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! # Ok::<(), sheet_records::error::ExtractError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;
pub mod worksheet;

// Re-export commonly used types
pub use crate::core::{ExtractOutput, ExtractRequest, RangeExtractor, RangeReference};
pub use error::{ExtractError, ExtractResult};
pub use types::{CellValue, ExtractionResult, Record, Value, Warning};
pub use worksheet::{MemoryWorksheet, Worksheet};
