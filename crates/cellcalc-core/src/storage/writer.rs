//! Writer for the .cells file format

use super::memory::MemoryStore;
use crate::error::Result;
use cellcalc_engine::engine::CellKind;
use std::fs;
use std::path::Path;

/// Write a store to a .cells file
pub fn write_cells(path: &Path, store: &MemoryStore) -> Result<()> {
    let content = write_cells_content(store);
    fs::write(path, content)?;
    Ok(())
}

/// Write a store to a .cells format string
pub fn write_cells_content(store: &MemoryStore) -> String {
    let mut lines = vec!["# cellcalc sheets".to_string()];

    for cell in store.all_cells() {
        let value_str = match &cell.kind {
            CellKind::Number(raw) => raw.clone(),
            CellKind::Formula(raw) if is_bare_safe(raw) => raw.clone(),
            CellKind::Formula(raw) | CellKind::Text(raw) => format!("\"{}\"", escape_text(raw)),
        };

        lines.push(format!("{}!{}: {}", cell.sheet, cell.name, value_str));
    }

    lines.join("\n") + "\n"
}

/// Formulas can be written unquoted unless they would not survive line parsing.
fn is_bare_safe(raw: &str) -> bool {
    !raw.contains(['\n', '\r'])
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
