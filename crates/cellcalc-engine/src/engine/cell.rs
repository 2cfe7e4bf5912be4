//! Cell data structures for sheet storage.
//!
//! This module provides the core data types for representing cells:
//! - [`CellKind`] - The classified content of a cell (text, number, or formula)
//! - [`Cell`] - A named cell belonging to a sheet

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::cell_key::CellKey;

/// The classified content of a cell. Every variant keeps the raw input verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Text(String),
    Number(String),
    /// Formula text, including the leading `=`.
    Formula(String),
}

impl CellKind {
    /// Classify raw input.
    /// - Starts with '=' -> Formula
    /// - Optionally signed decimal -> Number
    /// - Otherwise -> Text
    pub fn classify(raw: &str) -> CellKind {
        if raw.starts_with('=') {
            CellKind::Formula(raw.to_string())
        } else if is_number(raw) {
            CellKind::Number(raw.to_string())
        } else {
            CellKind::Text(raw.to_string())
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            CellKind::Text(s) | CellKind::Number(s) | CellKind::Formula(s) => s,
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellKind::Formula(_))
    }
}

/// A cell in a sheet. `sheet` and `name` keep the casing of the first write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub sheet: String,
    pub name: String,
    pub kind: CellKind,
}

impl Cell {
    pub fn new(sheet: &str, name: &str, kind: CellKind) -> Cell {
        Cell {
            sheet: sheet.to_string(),
            name: name.to_string(),
            kind,
        }
    }

    /// Create a cell by classifying raw user input.
    pub fn from_input(sheet: &str, name: &str, raw: &str) -> Cell {
        Cell::new(sheet, name, CellKind::classify(raw))
    }

    pub fn raw_value(&self) -> &str {
        self.kind.raw()
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(&self.sheet, &self.name)
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("number literal regex must compile")
    })
}

/// Whether `text` is an optionally signed decimal literal (`12`, `-3.5`).
pub fn is_number(text: &str) -> bool {
    number_re().is_match(text)
}
