//! Column letter codec: bijective base-26 where A=1 and AA=27

use crate::error::{ExtractError, ExtractResult};

/// Convert a 1-based column index to its letters (1→A, 26→Z, 27→AA, 703→AAA)
pub fn index_to_letters(index: u32) -> ExtractResult<String> {
    if index == 0 {
        return Err(ExtractError::InvalidColumn("0".to_string()));
    }

    let mut letters = Vec::new();
    let mut num = index;
    while num > 0 {
        let remainder = (num - 1) % 26;
        letters.push(b'A' + remainder as u8);
        num = (num - 1) / 26;
    }
    letters.reverse();

    Ok(letters.into_iter().map(char::from).collect())
}

/// Convert column letters to a 1-based index, case-insensitively
pub fn letters_to_index(letters: &str) -> ExtractResult<u32> {
    if letters.is_empty() {
        return Err(ExtractError::InvalidColumn(letters.to_string()));
    }

    let mut result: u32 = 0;
    for c in letters.chars() {
        let upper = c.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return Err(ExtractError::InvalidColumn(letters.to_string()));
        }
        let value = upper as u32 - 'A' as u32 + 1;
        result = result
            .checked_mul(26)
            .and_then(|r| r.checked_add(value))
            .ok_or_else(|| ExtractError::InvalidColumn(letters.to_string()))?;
    }

    Ok(result)
}
