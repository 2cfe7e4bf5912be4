//! Reference resolution ("filling") of formulas.
//!
//! Operand tokens that are not numeric literals name other cells in the
//! same sheet. Each one is looked up through the [`SheetStore`] and replaced:
//! formula cells are expanded recursively and spliced in, text and number
//! cells are substituted as a single token holding their raw value.
//!
//! Lookups are not cached; a name used twice is looked up twice, so a
//! formula that reuses a name at every level grows exponentially. The
//! expansion stops once it exceeds [`MAX_RESOLVED_TOKENS`].

use serde::{Deserialize, Serialize};

use super::cycle::{CycleCheck, CycleGuard};
use super::tokenize::{Token, tokenize};
use super::{Cell, CellKind, SheetStore, is_number};
use crate::error::{CalculationError, Result};

/// Default limit on nested formula expansions.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest resolved formula, in tokens, that will be evaluated.
pub const MAX_RESOLVED_TOKENS: usize = 512;

/// Tuning for a single resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    pub max_depth: usize,
    pub cycle_check: CycleCheck,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cycle_check: CycleCheck::default(),
        }
    }
}

/// Expands the formula of one root cell into operators and literal values.
pub struct Resolver<'a, S: SheetStore + ?Sized> {
    store: &'a S,
    sheet: &'a str,
    guard: CycleGuard,
    override_cell: Option<&'a Cell>,
    max_depth: usize,
}

impl<'a, S: SheetStore + ?Sized> Resolver<'a, S> {
    /// Create a resolver whose calculation root is `root`.
    pub fn new(store: &'a S, root: &'a Cell, options: ResolveOptions) -> Self {
        Self {
            store,
            sheet: &root.sheet,
            guard: CycleGuard::new(&root.name, options.cycle_check),
            override_cell: None,
            max_depth: options.max_depth,
        }
    }

    /// Use `cell` in place of its stored version for lookups of its name.
    pub fn with_override(mut self, cell: &'a Cell) -> Self {
        self.override_cell = Some(cell);
        self
    }

    /// Resolve formula text (with its leading `=`) into a substituted token sequence.
    pub fn resolve(&mut self, formula: &str) -> Result<Vec<Token>> {
        let body = formula.strip_prefix('=').ok_or_else(|| {
            CalculationError::InvalidFormulaSyntax(format!("not a formula: {}", formula))
        })?;
        let mut out = Vec::new();
        self.expand(body, &mut out)?;
        tracing::debug!("Filled formula {} into {} tokens", formula, out.len());
        Ok(out)
    }

    fn expand(&mut self, body: &str, out: &mut Vec<Token>) -> Result<()> {
        for token in tokenize(body) {
            let name = match token {
                Token::Operand(ref text) if !is_number(text) => text.clone(),
                other => {
                    push_token(out, other)?;
                    continue;
                }
            };

            self.guard.check(&name)?;
            let cell = self.lookup(&name)?;
            match &cell.kind {
                CellKind::Formula(formula) => {
                    if self.guard.depth() >= self.max_depth {
                        return Err(CalculationError::DepthExceeded {
                            limit: self.max_depth,
                        });
                    }
                    self.guard.enter(&name);
                    let body = formula.strip_prefix('=').unwrap_or(formula);
                    let expanded = self.expand(body, out);
                    self.guard.leave();
                    expanded?;
                }
                CellKind::Number(raw) | CellKind::Text(raw) => {
                    push_token(out, Token::operand(raw))?
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<Cell> {
        if let Some(cell) = self.override_cell
            && cell.is_named(name)
        {
            return Ok(cell.clone());
        }
        self.store
            .get(self.sheet, name)
            .ok_or_else(|| CalculationError::ReferenceNotFound {
                name: name.to_string(),
            })
    }
}

fn push_token(out: &mut Vec<Token>, token: Token) -> Result<()> {
    if out.len() >= MAX_RESOLVED_TOKENS {
        return Err(CalculationError::TooComplex(format!(
            "expands to more than {} tokens",
            MAX_RESOLVED_TOKENS
        )));
    }
    out.push(token);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tokenize::join_tokens;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Minimal store that counts lookups.
    #[derive(Default)]
    struct MapStore {
        cells: HashMap<String, Cell>,
        lookups: Mutex<usize>,
    }

    impl MapStore {
        fn with(cells: &[(&str, &str)]) -> Self {
            let mut store = MapStore::default();
            for (name, raw) in cells {
                store
                    .cells
                    .insert(name.to_lowercase(), Cell::from_input("sheet", name, raw));
            }
            store
        }
    }

    impl SheetStore for MapStore {
        fn get(&self, _sheet: &str, name: &str) -> Option<Cell> {
            *self.lookups.lock().unwrap() += 1;
            self.cells.get(&name.to_lowercase()).cloned()
        }

        fn list_by_sheet(&self, _sheet: &str) -> Vec<Cell> {
            self.cells.values().cloned().collect()
        }

        fn find_dependents(&self, _sheet: &str, _name: &str) -> Vec<Cell> {
            Vec::new()
        }

        fn put(&self, _cell: Cell) {}
    }

    fn resolve_with(store: &MapStore, root: &Cell, options: ResolveOptions) -> Result<String> {
        Resolver::new(store, root, options)
            .resolve(root.raw_value())
            .map(|tokens| join_tokens(&tokens))
    }

    fn resolve(store: &MapStore, root: &Cell) -> Result<String> {
        resolve_with(store, root, ResolveOptions::default())
    }

    #[test]
    fn test_fill_formula_with_cell_names() {
        let store = MapStore::with(&[("cell1", "9")]);
        let root = Cell::from_input("sheet", "testCell", "=cell1 + cell1 * (cell1 + cell1)");
        assert_eq!(resolve(&store, &root).unwrap(), "9+9*(9+9)");
        assert_eq!(*store.lookups.lock().unwrap(), 4);
    }

    #[test]
    fn test_numbers_are_kept_without_lookup() {
        let store = MapStore::default();
        let root = Cell::from_input("sheet", "x", "=1+2.5");
        assert_eq!(resolve(&store, &root).unwrap(), "1+2.5");
        assert_eq!(*store.lookups.lock().unwrap(), 0);
    }

    #[test]
    fn test_nested_formulas_are_spliced() {
        let store = MapStore::with(&[("a", "=b*2"), ("b", "3"), ("c", "hello")]);
        let root = Cell::from_input("sheet", "x", "=A+1");
        assert_eq!(resolve(&store, &root).unwrap(), "3*2+1");

        let root = Cell::from_input("sheet", "x", "=c");
        assert_eq!(resolve(&store, &root).unwrap(), "hello");
    }

    #[test]
    fn test_missing_reference_fails() {
        let store = MapStore::with(&[("cell1", "2")]);
        let root = Cell::from_input("sheet", "x", "=cell1+cell2");
        assert_eq!(
            resolve(&store, &root),
            Err(CalculationError::ReferenceNotFound {
                name: "cell2".to_string()
            })
        );
    }

    #[test]
    fn test_self_reference_fails_without_lookup() {
        let store = MapStore::with(&[("x", "1")]);
        let root = Cell::from_input("sheet", "X", "=1+x");
        assert!(matches!(
            resolve(&store, &root),
            Err(CalculationError::RecursiveFormula { .. })
        ));
        assert_eq!(*store.lookups.lock().unwrap(), 0);
    }

    #[test]
    fn test_indirect_self_reference_through_root() {
        let store = MapStore::with(&[("b", "=root+1")]);
        let root = Cell::from_input("sheet", "root", "=b");
        assert!(matches!(
            resolve(&store, &root),
            Err(CalculationError::RecursiveFormula { .. })
        ));
    }

    #[test]
    fn test_non_root_cycle_with_path_check() {
        let store = MapStore::with(&[("a", "=b"), ("b", "=a")]);
        let root = Cell::from_input("sheet", "root", "=a");
        assert_eq!(
            resolve(&store, &root),
            Err(CalculationError::RecursiveFormula {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn test_non_root_cycle_with_root_check_hits_depth_limit() {
        let store = MapStore::with(&[("a", "=b"), ("b", "=a")]);
        let root = Cell::from_input("sheet", "root", "=a");
        let options = ResolveOptions {
            max_depth: 16,
            cycle_check: CycleCheck::Root,
        };
        assert_eq!(
            resolve_with(&store, &root, options),
            Err(CalculationError::DepthExceeded { limit: 16 })
        );
    }

    #[test]
    fn test_diamond_references_are_not_cycles() {
        let store = MapStore::with(&[("a", "=b+b"), ("b", "=c"), ("c", "2")]);
        let root = Cell::from_input("sheet", "root", "=a*b");
        assert_eq!(resolve(&store, &root).unwrap(), "2+2*2");
    }

    #[test]
    fn test_override_replaces_store_value() {
        let store = MapStore::with(&[("var1", "1"), ("var2", "2")]);
        let root = Cell::from_input("sheet", "var3", "=var1+var2");
        let replacement = Cell::from_input("sheet", "VAR1", "=var2");
        let tokens = Resolver::new(&store, &root, ResolveOptions::default())
            .with_override(&replacement)
            .resolve(root.raw_value())
            .unwrap();
        assert_eq!(join_tokens(&tokens), "2+2");
    }

    /// `c1 = 1` and `cN = c(N-1)+1` up to `cLEN`.
    fn chain(len: usize) -> MapStore {
        let cells: Vec<(String, String)> = (1..=len)
            .map(|i| match i {
                1 => ("c1".to_string(), "1".to_string()),
                _ => (format!("c{}", i), format!("=c{}+1", i - 1)),
            })
            .collect();
        let refs: Vec<(&str, &str)> = cells
            .iter()
            .map(|(name, raw)| (name.as_str(), raw.as_str()))
            .collect();
        MapStore::with(&refs)
    }

    #[test]
    fn test_long_chain_resolves_within_depth() {
        let store = chain(100);
        let root = Cell::from_input("sheet", "root", "=c100");
        let tokens = Resolver::new(&store, &root, ResolveOptions::default())
            .resolve(root.raw_value())
            .unwrap();
        assert_eq!(tokens.len(), 199);
    }

    #[test]
    fn test_chain_past_default_depth_is_rejected() {
        let store = chain(200);
        let root = Cell::from_input("sheet", "root", "=c200");
        assert_eq!(
            resolve(&store, &root),
            Err(CalculationError::DepthExceeded {
                limit: DEFAULT_MAX_DEPTH
            })
        );
    }

    #[test]
    fn test_doubling_references_stop_at_token_limit() {
        let cells: Vec<(String, String)> = (0..=20)
            .map(|i| match i {
                0 => ("a0".to_string(), "1".to_string()),
                _ => (format!("a{}", i), format!("=a{}+a{}", i - 1, i - 1)),
            })
            .collect();
        let refs: Vec<(&str, &str)> = cells
            .iter()
            .map(|(name, raw)| (name.as_str(), raw.as_str()))
            .collect();
        let store = MapStore::with(&refs);
        let root = Cell::from_input("sheet", "root", "=a20");

        assert!(matches!(
            resolve(&store, &root),
            Err(CalculationError::TooComplex(_))
        ));
        assert!(*store.lookups.lock().unwrap() <= 2 * MAX_RESOLVED_TOKENS);
    }

    #[test]
    fn test_resolve_rejects_non_formula() {
        let store = MapStore::default();
        let root = Cell::from_input("sheet", "x", "12");
        assert!(matches!(
            resolve(&store, &root),
            Err(CalculationError::InvalidFormulaSyntax(_))
        ));
    }
}
