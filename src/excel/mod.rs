//! Excel workbook access through calamine
//!
//! Opening files and locating sheets is delegated to calamine; this module only
//! adapts a loaded sheet to the [`Worksheet`](crate::worksheet::Worksheet) interface.

mod workbook;

pub use workbook::{ExcelSheet, ExcelWorkbook};
