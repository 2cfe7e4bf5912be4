use crate::storage::MemoryStore;
use cellcalc_engine::engine::{Evaluator, ResolveOptions, SheetStore};
use serde::Serialize;
use std::path::PathBuf;

/// Result text reported when a calculation fails.
pub const ERROR_RESULT: &str = "ERROR";

/// A cell's raw value together with its computed result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellResponse {
    pub value: String,
    pub result: String,
}

impl CellResponse {
    pub fn new(value: &str, result: &str) -> Self {
        Self {
            value: value.to_string(),
            result: result.to_string(),
        }
    }

    /// Response for a value whose calculation failed.
    pub fn rejected(value: &str) -> Self {
        Self::new(value, ERROR_RESULT)
    }
}

/// Sheet operations over an explicit store handle.
pub struct Workbook<S: SheetStore = MemoryStore> {
    /// Cell storage (shared with the resolver on every calculation)
    pub store: S,
    /// Rhai-backed arithmetic evaluator
    pub evaluator: Evaluator,
    /// Depth limit and cycle check used for every resolution
    pub options: ResolveOptions,
    /// File the store is saved to, if any
    pub file_path: Option<PathBuf>,
    /// Whether the store changed since it was loaded or saved
    pub modified: bool,
}

impl<S: SheetStore> Workbook<S> {
    /// Wrap an existing store.
    pub fn with_store(store: S, options: ResolveOptions) -> Self {
        Self {
            store,
            evaluator: Evaluator::new(),
            options,
            file_path: None,
            modified: false,
        }
    }
}

impl Workbook<MemoryStore> {
    /// Create an empty in-memory workbook.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), ResolveOptions::default())
    }
}

impl Default for Workbook<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}
