//! Header resolution for a range: derived from its first row, or supplied by the caller

use tracing::{debug, warn};

use super::column::index_to_letters;
use super::reference::{CellPosition, RangeReference};
use crate::error::{ExtractError, ExtractResult};
use crate::types::Warning;
use crate::worksheet::Worksheet;

/// Where the headers of a range come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource<'h> {
    /// Read from the first row of the range, which is then excluded from the data
    Derived,
    /// One name per column, supplied by the caller; every row of the range is data
    Explicit(&'h [String]),
}

impl<'h> HeaderSource<'h> {
    pub fn from_option(headers: Option<&'h [String]>) -> Self {
        match headers {
            Some(list) => HeaderSource::Explicit(list),
            None => HeaderSource::Derived,
        }
    }

    /// First row holding data.
    ///
    /// A derived header row is never also a data row: data begins at
    /// `start_row + 1`, which for a range anchored at row 1 is row 2.
    pub fn data_start_row(&self, range: &RangeReference) -> u32 {
        match self {
            HeaderSource::Derived => range.start_row + 1,
            HeaderSource::Explicit(_) => range.start_row,
        }
    }
}

/// Header names of a range, one per column in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet {
    columns: Vec<String>,
}

impl HeaderSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Distinct names in first-occurrence order; repeats are aliases of one field
    pub fn unique(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            if !seen.contains(&name.as_str()) {
                seen.push(name);
            }
        }
        seen
    }

    /// Offset of the leftmost column carrying `name`
    pub fn first_offset(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|h| h == name)
    }

    pub fn has_duplicates(&self) -> bool {
        self.unique().len() != self.columns.len()
    }

    /// Header names in column order, one per column of the range
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Resolve the headers of `range`, recording blank derived header cells in `warnings`
pub fn resolve_headers<W: Worksheet + ?Sized>(
    sheet: &W,
    range: &RangeReference,
    source: HeaderSource<'_>,
    warnings: &mut Vec<Warning>,
) -> ExtractResult<HeaderSet> {
    let headers = match source {
        HeaderSource::Explicit(list) => explicit_headers(range, list)?,
        HeaderSource::Derived => derived_headers(sheet, range, warnings)?,
    };

    if headers.has_duplicates() {
        debug!(
            "Range {} has {} columns but {} distinct headers",
            range,
            headers.column_count(),
            headers.unique().len()
        );
    }

    Ok(headers)
}

fn explicit_headers(range: &RangeReference, list: &[String]) -> ExtractResult<HeaderSet> {
    if list.len() != range.column_count() {
        return Err(ExtractError::HeaderCountMismatch {
            expected: range.column_count(),
            actual: list.len(),
        });
    }

    for (column, name) in range.columns().zip(list) {
        if name.trim().is_empty() {
            return Err(ExtractError::EmptyHeader {
                column: index_to_letters(column)?,
            });
        }
    }

    Ok(HeaderSet::new(list.to_vec()))
}

fn derived_headers<W: Worksheet + ?Sized>(
    sheet: &W,
    range: &RangeReference,
    warnings: &mut Vec<Warning>,
) -> ExtractResult<HeaderSet> {
    let mut columns = Vec::with_capacity(range.column_count());

    for column in range.columns() {
        let position = CellPosition::new(range.start_row, column);
        let text = sheet.cell_text(position)?;
        let name = text.trim();

        if name.is_empty() {
            let fallback = index_to_letters(column)?;
            let warning = Warning::EmptyHeaderCell {
                cell: position.to_string(),
                header: fallback.clone(),
            };
            warn!("{}", warning);
            warnings.push(warning);
            columns.push(fallback);
        } else {
            columns.push(name.to_string());
        }
    }

    Ok(HeaderSet::new(columns))
}
