//! Case-insensitive cell identity.
//!
//! Cells are identified by `(sheet, name)` compared without regard to case.
//! A [`CellKey`] stores both parts folded to lowercase so it can be used
//! directly as a map key. Ordering is by sheet, then name.

/// A reference to a cell by folded sheet and cell name.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct CellKey {
    pub sheet: String,
    pub name: String,
}

impl CellKey {
    pub fn new(sheet: &str, name: &str) -> CellKey {
        CellKey {
            sheet: fold(sheet),
            name: fold(name),
        }
    }

    pub fn in_sheet(&self, sheet: &str) -> bool {
        self.sheet == fold(sheet)
    }
}

/// Case folding used for every identity comparison.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::CellKey;

    #[test]
    fn test_keys_compare_case_insensitively() {
        assert_eq!(CellKey::new("S", "VAR1"), CellKey::new("s", "Var1"));
        assert_ne!(CellKey::new("S", "var1"), CellKey::new("T", "var1"));
    }

    #[test]
    fn test_in_sheet_ignores_case() {
        let key = CellKey::new("Budget", "Total");
        assert!(key.in_sheet("BUDGET"));
        assert!(!key.in_sheet("Budget2"));
    }

    #[test]
    fn test_keys_order_by_sheet_then_name() {
        let mut keys = vec![
            CellKey::new("b", "a"),
            CellKey::new("A", "z"),
            CellKey::new("a", "B"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                CellKey::new("a", "b"),
                CellKey::new("a", "z"),
                CellKey::new("b", "a"),
            ]
        );
    }
}
