//! Parser for the .cells file format

use super::memory::MemoryStore;
use crate::error::{SheetError, Result};
use crate::names::{validate_cell_name, validate_sheet_name};
use cellcalc_engine::engine::{Cell, SheetStore};
use std::fs;
use std::path::Path;

/// Parse a .cells file into a store
pub fn parse_cells(path: &Path) -> Result<MemoryStore> {
    let content = fs::read_to_string(path)?;
    parse_cells_content(&content)
}

/// Parse .cells content from a string
pub fn parse_cells_content(content: &str) -> Result<MemoryStore> {
    let store = MemoryStore::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim_start();

        // Skip empty lines and comments
        if line.trim_end().is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse "SHEET!NAME: VALUE" format
        let Some((key_str, value_str)) = line.split_once(':') else {
            return Err(SheetError::Parse {
                line: line_num + 1,
                message: "Expected 'SHEET!NAME: VALUE' format".to_string(),
            });
        };

        let Some((sheet, name)) = key_str
            .trim()
            .split_once('!')
            .filter(|(sheet, name)| !sheet.is_empty() && !name.is_empty())
        else {
            return Err(SheetError::Parse {
                line: line_num + 1,
                message: format!("Invalid cell key: {}", key_str.trim()),
            });
        };

        validate_sheet_name(sheet)
            .and_then(|_| validate_cell_name(name))
            .map_err(|e| SheetError::Parse {
                line: line_num + 1,
                message: e.to_string(),
            })?;

        let raw = parse_raw_value(value_str, line_num + 1)?;
        store.put(Cell::from_input(sheet, name, &raw));
    }

    Ok(store)
}

/// Parse a stored value into the raw text that was originally written.
fn parse_raw_value(value: &str, line_num: usize) -> Result<String> {
    let value = value.strip_prefix(' ').unwrap_or(value);

    // Formula: kept verbatim
    if value.starts_with('=') {
        return Ok(value.to_string());
    }

    let value = value.trim_end();

    // Quoted string: starts and ends with '"'
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        return Ok(unescape_text(&value[1..value.len() - 1]));
    }

    if cellcalc_engine::engine::is_number(value) {
        return Ok(value.to_string());
    }

    Err(SheetError::Parse {
        line: line_num,
        message: format!("Invalid value: {}. Use quotes for text.", value),
    })
}

fn unescape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
