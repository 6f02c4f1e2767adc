use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Malformed range '{reference}': {reason}")]
    MalformedRange { reference: String, reason: String },

    #[error("Malformed cell reference '{reference}': {reason}")]
    MalformedCell { reference: String, reason: String },

    #[error("Invalid column '{0}': expected letters A-Z")]
    InvalidColumn(String),

    #[error("Header count mismatch: range has {expected} columns but {actual} headers were given")]
    HeaderCountMismatch { expected: usize, actual: usize },

    #[error("Header for column {column} is empty")]
    EmptyHeader { column: String },

    #[error("Cell lookup failed at {cell}: {reason}")]
    CellLookup { cell: String, reason: String },

    #[error("Nothing to extract: supply a cell reference, a range, or the used range")]
    MissingTarget,

    #[error("Headers were given but there is no range to apply them to")]
    HeadersWithoutRange,

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    pub(crate) fn malformed_range(reference: &str, reason: impl Into<String>) -> Self {
        ExtractError::MalformedRange {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_cell(reference: &str, reason: impl Into<String>) -> Self {
        ExtractError::MalformedCell {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<calamine::Error> for ExtractError {
    fn from(err: calamine::Error) -> Self {
        ExtractError::Workbook(err.to_string())
    }
}
