//! Extraction engine: references, headers, date coercion and row building

pub mod column;
pub mod dates;
pub mod extractor;
pub mod headers;
pub mod reference;

pub use column::{index_to_letters, letters_to_index};
pub use dates::{serial_to_datetime, DateCoercion};
pub use extractor::{ExtractOutput, ExtractRequest, RangeExtractor};
pub use headers::{HeaderSet, HeaderSource};
pub use reference::{parse_cell, parse_range, CellPosition, RangeReference};
