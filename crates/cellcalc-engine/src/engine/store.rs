//! The sheet store contract.
//!
//! The engine never owns cells; it reads them through a [`SheetStore`]
//! handle passed in by the caller. Every lookup is case-insensitive on
//! both the sheet and the cell name.

use super::Cell;

pub trait SheetStore: Send + Sync {
    /// Look up one cell.
    fn get(&self, sheet: &str, name: &str) -> Option<Cell>;

    /// All cells of a sheet. An empty list means the sheet does not exist.
    fn list_by_sheet(&self, sheet: &str) -> Vec<Cell>;

    /// Formula cells in `sheet` whose text contains `name`, compared without case.
    fn find_dependents(&self, sheet: &str, name: &str) -> Vec<Cell>;

    /// Insert or replace a cell by its `(sheet, name)` identity.
    fn put(&self, cell: Cell);
}
