//! Error types for cellcalc core.

use thiserror::Error;

use cellcalc_engine::CalculationError;

/// Errors that can occur in sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Calculation error: {0}")]
    Calculation(
        #[from]
        #[source]
        CalculationError,
    ),

    #[error("Invalid cell name: {0:?}")]
    InvalidCellName(String),

    #[error("Invalid sheet name: {0:?}")]
    InvalidSheetName(String),

    #[error("No file path set")]
    NoFilePath,
}

impl SheetError {
    pub fn cell_not_found(sheet: &str, name: &str) -> Self {
        SheetError::NotFound(format!("Cell '{}' in sheet {}", name, sheet))
    }

    pub fn sheet_not_found(sheet: &str) -> Self {
        SheetError::NotFound(format!("Sheet {}", sheet))
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
