use super::cascade::{CascadeReport, cascade_qualifies};
use super::{CellResponse, Workbook};
use crate::error::{Result, SheetError};
use crate::names::{validate_cell_name, validate_sheet_name};
use cellcalc_engine::CalculationError;
use cellcalc_engine::engine::{Cell, CellKind, SheetStore, cell_result};
use std::collections::BTreeMap;

/// Outcome of a successful write.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteOutcome {
    pub response: CellResponse,
    /// Present when the write re-checked cells that mention the written name.
    pub cascade: Option<CascadeReport>,
}

impl<S: SheetStore> Workbook<S> {
    /// Compute the display result of a stored or candidate cell.
    pub fn result_of(&self, cell: &Cell) -> std::result::Result<String, CalculationError> {
        cell_result(&self.store, &self.evaluator, cell, self.options)
    }

    /// Write a cell and return its value and result.
    ///
    /// A value whose calculation fails is rejected and the store is left as it was.
    pub fn add_cell(&mut self, sheet: &str, name: &str, raw: &str) -> Result<CellResponse> {
        self.write_cell(sheet, name, raw)
            .map(|outcome| outcome.response)
    }

    /// Write a cell, also reporting the dependents re-checked afterwards.
    pub fn write_cell(&mut self, sheet: &str, name: &str, raw: &str) -> Result<WriteOutcome> {
        validate_sheet_name(sheet)?;
        validate_cell_name(name)?;

        // Overwrites keep the identity (and casing) of the existing cell.
        let cell = match self.store.get(sheet, name) {
            Some(existing) => Cell::new(&existing.sheet, &existing.name, CellKind::classify(raw)),
            None => Cell::from_input(sheet, name, raw),
        };

        let result = self.result_of(&cell).map_err(|e| {
            tracing::error!("Rejected {}!{} = {:?}: {}", sheet, name, raw, e);
            e
        })?;

        self.store.put(cell.clone());
        self.modified = true;
        tracing::info!("Stored {}!{} = {:?} (result {:?})", cell.sheet, cell.name, raw, result);

        let cascade = cascade_qualifies(&cell.kind).then(|| self.cascade(&cell));

        Ok(WriteOutcome {
            response: CellResponse::new(raw, &result),
            cascade,
        })
    }

    /// Read one cell. A failed calculation is reported as the `ERROR` result.
    pub fn get_cell(&self, sheet: &str, name: &str) -> Result<CellResponse> {
        let cell = self
            .store
            .get(sheet, name)
            .ok_or_else(|| SheetError::cell_not_found(sheet, name))?;
        Ok(self.response_for(&cell))
    }

    /// Read every cell of a sheet, keyed by stored cell name.
    pub fn get_sheet(&self, sheet: &str) -> Result<BTreeMap<String, CellResponse>> {
        let cells = self.store.list_by_sheet(sheet);
        if cells.is_empty() {
            return Err(SheetError::sheet_not_found(sheet));
        }
        Ok(cells
            .iter()
            .map(|cell| (cell.name.clone(), self.response_for(cell)))
            .collect())
    }

    fn response_for(&self, cell: &Cell) -> CellResponse {
        match self.result_of(cell) {
            Ok(result) => CellResponse::new(cell.raw_value(), &result),
            Err(e) => {
                tracing::error!("Calculation error for {}!{}: {}", cell.sheet, cell.name, e);
                CellResponse::rejected(cell.raw_value())
            }
        }
    }
}
