//! Range-to-record extraction and single-cell fetching

use serde::Serialize;
use tracing::{debug, warn};

use super::column::index_to_letters;
use super::dates::DateCoercion;
use super::headers::{resolve_headers, HeaderSet, HeaderSource};
use super::reference::{parse_cell, parse_range, CellPosition, RangeReference};
use crate::error::{ExtractError, ExtractResult};
use crate::types::{ExtractionResult, Record, Warning};
use crate::worksheet::Worksheet;

/// Extracts cells and header-keyed records from one worksheet.
///
/// Borrows the worksheet for its own lifetime only; nothing is cached between calls.
pub struct RangeExtractor<'s, W: Worksheet + ?Sized> {
    sheet: &'s W,
    dates: DateCoercion,
}

impl<'s, W: Worksheet + ?Sized> RangeExtractor<'s, W> {
    pub fn new(sheet: &'s W) -> ExtractResult<Self> {
        Ok(Self {
            sheet,
            dates: DateCoercion::new()?,
        })
    }

    /// Display text of a single cell such as "B7"
    pub fn extract_cell(&self, reference: &str) -> ExtractResult<String> {
        let position = parse_cell(reference)?;
        debug!("Fetching cell {}", position);
        self.sheet.cell_text(position)
    }

    /// Records of a range such as "A1:B7", one per data row.
    ///
    /// Without `headers` the first row of the range names the fields.
    pub fn extract_range(
        &self,
        range: &str,
        headers: Option<&[String]>,
    ) -> ExtractResult<ExtractionResult> {
        let reference = parse_range(range)?;
        self.extract_reference(&reference, HeaderSource::from_option(headers))
    }

    /// Records of the sheet's used range (A1 to the last used cell).
    ///
    /// Without `headers` row 1 names the fields.
    pub fn extract_used_range(
        &self,
        headers: Option<&[String]>,
    ) -> ExtractResult<ExtractionResult> {
        let (columns, rows) = self.sheet.used_range();
        let reference = RangeReference::covering(columns, rows)?;
        self.extract_reference(&reference, HeaderSource::from_option(headers))
    }

    pub fn extract_reference(
        &self,
        range: &RangeReference,
        source: HeaderSource<'_>,
    ) -> ExtractResult<ExtractionResult> {
        let mut warnings = Vec::new();
        let headers = resolve_headers(self.sheet, range, source, &mut warnings)?;
        let first_row = source.data_start_row(range);

        debug!(
            "Extracting {} with {} headers, data rows {}..={}",
            range,
            headers.column_count(),
            first_row,
            range.end_row
        );

        let mut records = Vec::new();
        for row in first_row..=range.end_row {
            records.push(self.extract_row(row, range, &headers, &mut warnings)?);
        }

        Ok(ExtractionResult { records, warnings })
    }

    /// Build one record; the leftmost column of a repeated header wins
    fn extract_row(
        &self,
        row: u32,
        range: &RangeReference,
        headers: &HeaderSet,
        warnings: &mut Vec<Warning>,
    ) -> ExtractResult<Record> {
        if headers.column_count() != range.column_count() {
            return Err(ExtractError::HeaderCountMismatch {
                expected: range.column_count(),
                actual: headers.column_count(),
            });
        }

        let mut record = Record::with_capacity(headers.column_count());

        for (offset, (column, header)) in range.columns().zip(headers.iter()).enumerate() {
            let position = CellPosition::new(row, column);

            if record.contains(header) {
                let kept = headers.first_offset(header).unwrap_or(offset);
                let warning = Warning::DuplicateHeader {
                    header: header.to_string(),
                    cell: position.to_string(),
                    kept_cell: format!(
                        "{}{}",
                        index_to_letters(range.start_column + kept as u32)?,
                        row
                    ),
                };
                warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            let raw = self.sheet.cell_value(position)?;
            let format = self.sheet.cell_display_format(position)?;
            let value = match self.dates.coerce(raw, &format) {
                Ok(value) => value,
                Err(failure) => {
                    let warning = Warning::DateCoercion {
                        cell: position.to_string(),
                        format,
                        reason: failure.reason,
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                    failure.raw
                }
            };

            record.insert_first(header, value);
        }

        Ok(record)
    }
}

/// What to extract from a worksheet in one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractRequest {
    pub cell: Option<String>,
    pub range: Option<String>,
    pub headers: Option<Vec<String>>,
    /// Extract the used range when no explicit range is given
    pub use_used_range: bool,
}

impl ExtractRequest {
    pub fn cell(reference: impl Into<String>) -> Self {
        Self {
            cell: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn range(reference: impl Into<String>) -> Self {
        Self {
            range: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, headers: Vec<String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Run the request.
    ///
    /// A request naming neither a cell nor a range is rejected, as are headers
    /// with no range to apply them to.
    pub fn run<W: Worksheet + ?Sized>(&self, sheet: &W) -> ExtractResult<ExtractOutput> {
        if self.cell.is_none() && self.range.is_none() && !self.use_used_range {
            return Err(ExtractError::MissingTarget);
        }
        if self.headers.is_some() && self.range.is_none() && !self.use_used_range {
            return Err(ExtractError::HeadersWithoutRange);
        }

        let extractor = RangeExtractor::new(sheet)?;
        let cell = match &self.cell {
            Some(reference) => Some(extractor.extract_cell(reference)?),
            None => None,
        };
        let range = match (&self.range, self.use_used_range) {
            (Some(reference), _) => {
                Some(extractor.extract_range(reference, self.headers.as_deref())?)
            }
            (None, true) => Some(extractor.extract_used_range(self.headers.as_deref())?),
            (None, false) => None,
        };

        Ok(ExtractOutput { cell, range })
    }
}

/// Result of an [`ExtractRequest`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ExtractionResult>,
}
