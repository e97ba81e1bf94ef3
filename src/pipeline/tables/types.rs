//! Intermediate values of the table pipeline:
//! Grid → merged Grid → HeaderResolution → raw records.

use std::collections::BTreeMap;

use serde::Serialize;

// ═══════════════════════════════════════════
// Grid
// ═══════════════════════════════════════════

/// Dense matrix of cell text, 0-indexed.
///
/// Reconstructed grids are rectangular. A merged grid concatenates the rows
/// of several grids and may therefore hold rows of different widths.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// A `rows × cols` grid filled with empty strings.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![String::new(); cols]; rows],
        }
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Write `text` at `(row, col)`; returns false when out of bounds.
    pub fn set(&mut self, row: usize, col: usize, text: String) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                *slot = text;
                true
            }
            None => false,
        }
    }

    pub fn extend_rows<I: IntoIterator<Item = Vec<String>>>(&mut self, rows: I) {
        self.rows.extend(rows);
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

// ═══════════════════════════════════════════
// Column mapping
// ═══════════════════════════════════════════

/// How the column mapping was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Header row was blank; columns mapped by position.
    PositionalEmptyHeaders,
    /// Header labels repeated; columns mapped by position.
    PositionalDuplicateHeaders,
    /// Positional fallback was needed but column and field counts differ.
    CountMismatch,
    /// Header labels matched to fields by similarity.
    Fuzzy,
}

impl MappingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PositionalEmptyHeaders => "positional_empty_headers",
            Self::PositionalDuplicateHeaders => "positional_duplicate_headers",
            Self::CountMismatch => "count_mismatch",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// Grid column index → field name. At most one field per column.
pub type ColumnMapping = BTreeMap<usize, String>;

/// Outcome of header resolution for one logical table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderResolution {
    /// Row consumed as header; data rows start right after it.
    pub header_row: usize,
    pub mapping: ColumnMapping,
    pub strategy: MappingStrategy,
    /// Best similarity per fuzzily matched column, for diagnostics.
    pub scores: BTreeMap<usize, f64>,
}

// ═══════════════════════════════════════════
// Statistics
// ═══════════════════════════════════════════

/// Counters describing one block graph's trip through the table pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableStats {
    pub tables_found: usize,
    pub rows_merged: usize,
    pub header_row_index: Option<usize>,
    pub columns_mapped: usize,
    pub records_extracted: usize,
    pub records_accepted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_has_no_holes() {
        let grid = Grid::empty(2, 3);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
        for r in 0..2 {
            for c in 0..3 {
                assert_eq!(grid.get(r, c), Some(""));
            }
        }
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut grid = Grid::empty(1, 1);
        assert!(grid.set(0, 0, "x".into()));
        assert!(!grid.set(1, 0, "y".into()));
        assert!(!grid.set(0, 1, "z".into()));
        assert_eq!(grid.get(0, 0), Some("x"));
    }

    #[test]
    fn column_count_uses_widest_row() {
        let grid = Grid::from_rows(vec![vec!["a".into()], vec!["b".into(), "c".into()]]);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(Grid::default().column_count(), 0);
    }

    #[test]
    fn strategy_names_are_stable() {
        assert_eq!(MappingStrategy::Fuzzy.as_str(), "fuzzy");
        assert_eq!(
            serde_json::to_string(&MappingStrategy::CountMismatch).unwrap(),
            "\"count_mismatch\""
        );
    }
}
