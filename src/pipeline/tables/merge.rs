//! Multi-page table continuation: many grids → one logical grid.

use super::types::Grid;

/// Concatenate grids that continue one logical table across pages.
///
/// The first grid is taken whole since it carries the authoritative header.
/// Each later grid loses every row up to and including its probable
/// repeated header, found among its first `scan_rows` rows.
pub fn merge_grids(grids: Vec<Grid>, scan_rows: usize) -> Grid {
    let mut grids = grids.into_iter();
    let Some(mut merged) = grids.next() else {
        return Grid::default();
    };

    for (offset, grid) in grids.enumerate() {
        let header = densest_row(grid.rows(), scan_rows, |_| true);
        let skip = header + 1;
        tracing::debug!(
            table = offset + 1,
            rows = grid.row_count(),
            skipped = skip.min(grid.row_count()),
            "Merging continuation table"
        );
        merged.extend_rows(grid.into_rows().into_iter().skip(skip));
    }

    merged
}

/// Index of the row with the most counted cells among the first `scan_rows`.
///
/// A cell counts when it is non-empty after trimming and `counts` accepts
/// its trimmed text. Ties go to the earliest row; all-empty scans give 0.
pub(crate) fn densest_row<F>(rows: &[Vec<String>], scan_rows: usize, counts: F) -> usize
where
    F: Fn(&str) -> bool,
{
    let mut best_index = 0;
    let mut best_count = 0;
    for (index, row) in rows.iter().take(scan_rows).enumerate() {
        let count = row
            .iter()
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty() && counts(*cell))
            .count();
        if count > best_count {
            best_count = count;
            best_index = index;
        }
    }
    best_index
}
