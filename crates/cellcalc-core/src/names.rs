//! Rules for sheet and cell names.
//!
//! A cell name must be something a formula can reference and the `.cells`
//! format can store, so it may not look like a number or contain operators,
//! whitespace, `!` or `:`. Sheet names may not start with `#`, which marks a
//! comment line in the sheet file.

use crate::error::{Result, SheetError};
use cellcalc_engine::engine::is_number;

const NAME_FORBIDDEN: &[char] = &['+', '-', '*', '/', '(', ')', '!', ':'];

pub(crate) fn validate_sheet_name(sheet: &str) -> Result<()> {
    let invalid = sheet.is_empty()
        || sheet.starts_with('#')
        || sheet.chars().any(|c| c.is_whitespace() || c == '!' || c == ':');
    if invalid {
        return Err(SheetError::InvalidSheetName(sheet.to_string()));
    }
    Ok(())
}

pub(crate) fn validate_cell_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || is_number(name)
        || name
            .chars()
            .any(|c| c.is_whitespace() || NAME_FORBIDDEN.contains(&c));
    if invalid {
        return Err(SheetError::InvalidCellName(name.to_string()));
    }
    Ok(())
}
