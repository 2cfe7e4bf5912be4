//! cellcalc_engine - Formula resolution and evaluation for named sheet cells.

pub mod engine;
pub mod error;

pub use error::{CalculationError, Result};
