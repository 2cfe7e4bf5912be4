//! Re-checking of cells that mention a just-written cell.
//!
//! Dependents are found by a case-insensitive text search for the written
//! name in formula text, not from parsed references. The search can match a
//! longer name (`var10` when `var1` was written) and only finds cells that
//! mention the name directly. Each dependent is recalculated with the written
//! cell in place of its stored version; results are discarded and failures
//! are only logged and reported.

use super::Workbook;
use cellcalc_engine::CalculationError;
use cellcalc_engine::engine::{Cell, CellKind, SheetStore, calculate};

/// A dependent whose recalculation failed after a write.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeFailure {
    pub name: String,
    pub error: CalculationError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CascadeReport {
    /// Number of dependents recalculated
    pub checked: usize,
    pub failures: Vec<CascadeFailure>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Whether writing a cell of this kind re-checks its dependents.
/// Numbers only do so for the literal `0`.
pub fn cascade_qualifies(kind: &CellKind) -> bool {
    match kind {
        CellKind::Formula(_) | CellKind::Text(_) => true,
        CellKind::Number(raw) => raw == "0",
    }
}

impl<S: SheetStore> Workbook<S> {
    /// Recalculate every formula cell in `written`'s sheet that mentions its name.
    pub fn cascade(&self, written: &Cell) -> CascadeReport {
        let mut report = CascadeReport::default();

        for dependent in self.store.find_dependents(&written.sheet, &written.name) {
            if dependent.is_named(&written.name) || !dependent.kind.is_formula() {
                continue;
            }
            report.checked += 1;

            match calculate(
                &self.store,
                &self.evaluator,
                &dependent,
                Some(written),
                self.options,
            ) {
                Ok(result) => {
                    tracing::debug!("Dependent {} still calculates to {:?}", dependent.name, result);
                }
                Err(error) => {
                    tracing::warn!(
                        "Writing {}!{} breaks dependent {}: {}",
                        written.sheet,
                        written.name,
                        dependent.name,
                        error
                    );
                    report.failures.push(CascadeFailure {
                        name: dependent.name.clone(),
                        error,
                    });
                }
            }
        }

        report
    }
}
