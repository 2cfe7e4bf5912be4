//! cellcalc-core - Sheet operations over a cell store, plus storage.

pub mod error;
mod names;
pub mod storage;
pub mod workbook;

pub use error::{Result, SheetError};
pub use storage::MemoryStore;
pub use workbook::{CascadeReport, CellResponse, ERROR_RESULT, Workbook, WriteOutcome};

pub use cellcalc_engine::engine::{CycleCheck, ResolveOptions};
