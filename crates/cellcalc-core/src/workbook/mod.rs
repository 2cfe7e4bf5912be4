//! Workbook state and sheet operations.

mod cascade;
mod io;
mod ops;
mod state;

pub use cascade::{CascadeFailure, CascadeReport, cascade_qualifies};
pub use ops::WriteOutcome;
pub use state::{CellResponse, ERROR_RESULT, Workbook};
