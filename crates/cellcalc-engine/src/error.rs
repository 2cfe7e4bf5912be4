//! Error types for the cellcalc engine.

use thiserror::Error;

/// Failures that can occur while resolving or evaluating a formula.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Recursive formula: {name} refers back to itself")]
    RecursiveFormula { name: String },

    #[error("Cell {name} not found")]
    ReferenceNotFound { name: String },

    #[error("Invalid formula syntax: {0}")]
    InvalidFormulaSyntax(String),

    #[error("Failed to calculate expression {expression}")]
    NotANumber { expression: String },

    #[error("Reference chain deeper than {limit}")]
    DepthExceeded { limit: usize },

    #[error("Formula too complex: {0}")]
    TooComplex(String),
}

pub type Result<T> = std::result::Result<T, CalculationError>;
