//! Self-reference detection during formula resolution.
//!
//! Every reference token is checked against the guard before the store is
//! consulted. Two checks are available:
//!
//! - [`CycleCheck::Root`] only rejects names equal to the cell whose
//!   calculation started the resolution. A chain `A -> B -> A` is missed when
//!   `A` is not the root; the resolver's depth limit ends it instead.
//! - [`CycleCheck::Path`] also rejects any name already being expanded on the
//!   current path. Names reused on sibling branches (`=a+a`) stay legal.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::cell_key::fold;
use crate::error::{CalculationError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleCheck {
    Root,
    #[default]
    Path,
}

/// Tracks the calculation root and the names currently being expanded.
#[derive(Debug)]
pub struct CycleGuard {
    check: CycleCheck,
    root: String,
    visiting: HashSet<String>,
    path: Vec<String>,
}

impl CycleGuard {
    pub fn new(root: &str, check: CycleCheck) -> Self {
        Self {
            check,
            root: fold(root),
            visiting: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Reject `name` if expanding it would recurse into a cell already in progress.
    pub fn check(&self, name: &str) -> Result<()> {
        let folded = fold(name);
        let on_path = match self.check {
            CycleCheck::Root => false,
            CycleCheck::Path => self.visiting.contains(&folded),
        };
        if folded == self.root || on_path {
            return Err(CalculationError::RecursiveFormula {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Record that a formula cell is being expanded.
    pub fn enter(&mut self, name: &str) {
        let folded = fold(name);
        self.visiting.insert(folded.clone());
        self.path.push(folded);
    }

    /// Leave the most recently entered cell.
    pub fn leave(&mut self) {
        if let Some(name) = self.path.pop() {
            self.visiting.remove(&name);
        }
    }

    /// Number of formula cells currently being expanded.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_always_rejected() {
        for check in [CycleCheck::Root, CycleCheck::Path] {
            let guard = CycleGuard::new("Total", check);
            assert_eq!(
                guard.check("TOTAL"),
                Err(CalculationError::RecursiveFormula {
                    name: "TOTAL".to_string()
                })
            );
            assert!(guard.check("other").is_ok());
        }
    }

    #[test]
    fn test_root_check_ignores_path() {
        let mut guard = CycleGuard::new("a", CycleCheck::Root);
        guard.enter("b");
        assert!(guard.check("b").is_ok());
    }

    #[test]
    fn test_path_check_rejects_names_in_progress() {
        let mut guard = CycleGuard::new("a", CycleCheck::Path);
        guard.enter("B");
        assert!(guard.check("b").is_err());
        guard.leave();
        assert!(guard.check("b").is_ok());
        assert_eq!(guard.depth(), 0);
    }
}
