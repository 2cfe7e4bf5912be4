//! In-memory sheet store backed by `DashMap`.

use cellcalc_engine::engine::{Cell, CellKey, SheetStore, fold};
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe cell storage keyed by case-insensitive identity.
/// Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    cells: Arc<DashMap<CellKey, Cell>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Snapshot of every cell, sorted by folded `(sheet, name)`.
    pub fn all_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<(CellKey, Cell)> = self
            .cells
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));
        cells.into_iter().map(|(_, cell)| cell).collect()
    }
}

impl SheetStore for MemoryStore {
    fn get(&self, sheet: &str, name: &str) -> Option<Cell> {
        self.cells
            .get(&CellKey::new(sheet, name))
            .map(|entry| entry.value().clone())
    }

    fn list_by_sheet(&self, sheet: &str) -> Vec<Cell> {
        self.cells
            .iter()
            .filter(|entry| entry.key().in_sheet(sheet))
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn find_dependents(&self, sheet: &str, name: &str) -> Vec<Cell> {
        let needle = fold(name);
        self.cells
            .iter()
            .filter(|entry| entry.key().in_sheet(sheet))
            .filter(|entry| {
                let cell = entry.value();
                cell.kind.is_formula() && fold(cell.raw_value()).contains(&needle)
            })
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn put(&self, cell: Cell) {
        self.cells.insert(cell.key(), cell);
    }
}
