//! TABLE subgraph → dense Grid of cell text.

use crate::models::{Block, BlockType};

use super::block_index::BlockIndex;
use super::types::Grid;

/// Reconstruct every TABLE block of the document, in source order.
///
/// Tables without resolvable cells are skipped.
pub fn reconstruct_tables(index: &BlockIndex) -> Vec<Grid> {
    index
        .blocks_of_type(&BlockType::Table)
        .into_iter()
        .filter_map(|table| reconstruct_table(table, index))
        .collect()
}

/// Convert one TABLE block into a Grid.
///
/// Dimensions come from the declared span when both sides are non-zero,
/// otherwise from the largest row/column index among the cells.
/// Returns `None` when the table has no CELL children.
pub fn reconstruct_table(table: &Block, index: &BlockIndex) -> Option<Grid> {
    if table.children.is_empty() {
        tracing::debug!(table_id = %table.id, "Table block has no children");
        return None;
    }

    let cells = index.children_of_type(table, &BlockType::Cell);
    if cells.is_empty() {
        tracing::debug!(table_id = %table.id, "Table block has no resolvable cells");
        return None;
    }

    let (rows, cols) = match table.span.filter(|span| span.is_usable()) {
        Some(span) => (span.row_span, span.column_span),
        None => (
            cells.iter().map(|c| c.row()).max().unwrap_or(0),
            cells.iter().map(|c| c.column()).max().unwrap_or(0),
        ),
    };

    let mut grid = Grid::empty(rows, cols);
    for cell in cells {
        let text = cell_text(cell, index);
        let placed = match (cell.row().checked_sub(1), cell.column().checked_sub(1)) {
            (Some(row), Some(col)) => grid.set(row, col, text),
            _ => false,
        };
        if !placed {
            tracing::warn!(
                table_id = %table.id,
                cell_id = %cell.id,
                row = cell.row(),
                column = cell.column(),
                rows,
                cols,
                "Cell outside table bounds, dropped"
            );
        }
    }

    Some(grid)
}

/// Text of a cell: its WORD children joined by single spaces, trimmed.
pub fn cell_text(cell: &Block, index: &BlockIndex) -> String {
    index
        .children_of_type(cell, &BlockType::Word)
        .iter()
        .map(|word| word.text.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Vec<Block> {
        vec![
            Block::table("t1", &["c11", "c12", "c21", "c22"]).with_span(2, 2),
            Block::cell("c11", 1, 1, &["w1"]),
            Block::cell("c12", 1, 2, &["w2", "w3"]),
            Block::cell("c21", 2, 1, &["w4"]),
            Block::cell("c22", 2, 2, &[]),
            Block::word("w1", "Brand"),
            Block::word("w2", "YTD"),
            Block::word("w3", "Rank"),
            Block::word("w4", "Tito's"),
        ]
    }

    #[test]
    fn cells_land_at_their_coordinates() {
        let blocks = two_by_two();
        let index = BlockIndex::new(&blocks);
        let grid = reconstruct_table(index.get("t1").unwrap(), &index).unwrap();
        assert_eq!(grid.get(0, 0), Some("Brand"));
        assert_eq!(grid.get(0, 1), Some("YTD Rank"));
        assert_eq!(grid.get(1, 0), Some("Tito's"));
        assert_eq!(grid.get(1, 1), Some(""));
    }

    #[test]
    fn missing_span_falls_back_to_max_indices() {
        let blocks = vec![
            Block::table("t1", &["a", "b"]),
            Block::cell("a", 1, 1, &["w1"]),
            Block::cell("b", 3, 2, &["w2"]),
            Block::word("w1", "x"),
            Block::word("w2", "y"),
        ];
        let index = BlockIndex::new(&blocks);
        let grid = reconstruct_table(&blocks[0], &index).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.get(2, 1), Some("y"));
        assert_eq!(grid.get(1, 0), Some(""));
    }

    #[test]
    fn zero_span_is_treated_as_missing() {
        let blocks = vec![
            Block::table("t1", &["a"]).with_span(0, 4),
            Block::cell("a", 2, 2, &[]),
        ];
        let index = BlockIndex::new(&blocks);
        let grid = reconstruct_table(&blocks[0], &index).unwrap();
        assert_eq!((grid.row_count(), grid.column_count()), (2, 2));
    }

    #[test]
    fn out_of_bounds_cells_are_dropped() {
        let blocks = vec![
            Block::table("t1", &["a", "b", "z"]).with_span(1, 1),
            Block::cell("a", 1, 1, &["w1"]),
            Block::cell("b", 2, 1, &["w2"]),
            Block::cell("z", 0, 1, &["w2"]),
            Block::word("w1", "kept"),
            Block::word("w2", "lost"),
        ];
        let index = BlockIndex::new(&blocks);
        let grid = reconstruct_table(&blocks[0], &index).unwrap();
        assert_eq!(grid.rows(), &[vec!["kept".to_string()]]);
    }

    #[test]
    fn table_without_cells_is_no_table() {
        let blocks = vec![
            Block::table("empty", &[]),
            Block::table("words_only", &["w1"]),
            Block::word("w1", "orphan"),
        ];
        let index = BlockIndex::new(&blocks);
        assert!(reconstruct_table(&blocks[0], &index).is_none());
        assert!(reconstruct_table(&blocks[1], &index).is_none());
        assert!(reconstruct_tables(&index).is_empty());
    }

    #[test]
    fn cell_text_skips_non_word_children() {
        let mut blocks = vec![
            Block::cell("c", 1, 1, &["w1", "sel", "w2", "gone"]),
            Block::word("w1", " 1,234 "),
            Block::new("sel", BlockType::Other("SELECTION_ELEMENT".into())),
            Block::word("w2", "%"),
        ];
        blocks[2].text = Some("ignored".into());
        let index = BlockIndex::new(&blocks);
        assert_eq!(cell_text(&blocks[0], &index), "1,234  %");
    }

    #[test]
    fn reconstruction_is_lossless_within_span() {
        let blocks = two_by_two();
        let index = BlockIndex::new(&blocks);
        let grids = reconstruct_tables(&index);
        assert_eq!(grids.len(), 1);
        let non_empty: usize = grids[0]
            .rows()
            .iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .count();
        assert_eq!(non_empty, 3);
    }
}
