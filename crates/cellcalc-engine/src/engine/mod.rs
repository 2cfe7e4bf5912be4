//! Formula engine API.
//!
//! This module provides the calculation pipeline for sheet cells:
//!
//! - [`Cell`], [`CellKind`] - Cell data and its text/number/formula classification
//! - [`CellKey`] - Case-insensitive `(sheet, name)` identity
//! - [`SheetStore`] - The storage contract the engine reads cells through
//! - [`tokenize`] - Split formula text into symbols and operands
//! - [`Resolver`] - Recursively substitute referenced cells into a formula
//! - [`CycleGuard`] - Reject self-referencing formulas during resolution
//! - [`Evaluator`] - Evaluate resolved arithmetic with Rhai
//! - [`format_number`] - Canonical text for numeric results

mod cell;
mod cell_key;
mod cycle;
mod eval;
mod format;
mod resolve;
mod store;
mod tokenize;

pub use cell::{Cell, CellKind, is_number};
pub use cell_key::{CellKey, fold};
pub use cycle::{CycleCheck, CycleGuard};
pub use eval::Evaluator;
pub use format::format_number;
pub use resolve::{DEFAULT_MAX_DEPTH, ResolveOptions, Resolver};
pub use store::SheetStore;
pub use tokenize::{Symbol, Token, has_symbol, join_tokens, tokenize};

use crate::error::Result;

/// Resolve and evaluate the formula of `root`, optionally reading `override_cell`
/// in place of its stored version.
pub fn calculate<S: SheetStore + ?Sized>(
    store: &S,
    evaluator: &Evaluator,
    root: &Cell,
    override_cell: Option<&Cell>,
    options: ResolveOptions,
) -> Result<String> {
    let mut resolver = Resolver::new(store, root, options);
    if let Some(cell) = override_cell {
        resolver = resolver.with_override(cell);
    }
    let tokens = resolver.resolve(root.raw_value())?;
    evaluator.evaluate_tokens(&tokens)
}

/// Compute the display result of a cell.
/// Text and number cells show their raw value; formulas are calculated.
pub fn cell_result<S: SheetStore + ?Sized>(
    store: &S,
    evaluator: &Evaluator,
    cell: &Cell,
    options: ResolveOptions,
) -> Result<String> {
    match &cell.kind {
        CellKind::Formula(_) => calculate(store, evaluator, cell, None, options),
        CellKind::Number(raw) | CellKind::Text(raw) => Ok(raw.clone()),
    }
}
