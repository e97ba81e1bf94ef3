//! Table pipeline: block graph → grids → merged grid → header mapping →
//! raw records → cleaned records.
//!
//! Everything here is pure and synchronous. Data-quality problems degrade
//! the output and are logged; nothing in this module returns an error.

pub mod assemble;
pub mod block_index;
pub mod clean;
pub mod header;
pub mod merge;
pub mod reconstruct;
pub mod similarity;
pub mod types;

pub use assemble::{assemble_records, Assembly};
pub use block_index::BlockIndex;
pub use clean::{clean_record, clean_value};
pub use header::{detect_header_row, resolve_headers};
pub use merge::merge_grids;
pub use reconstruct::{reconstruct_table, reconstruct_tables};
pub use similarity::similarity_ratio;
pub use types::*;

use crate::config::TableRules;
use crate::models::{Block, Record, SemanticField};

/// Result of running one block graph through the table pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableExtraction {
    /// Raw (uncleaned) records that passed the coverage filter.
    pub records: Vec<Record>,
    pub stats: TableStats,
    pub resolution: Option<HeaderResolution>,
}

/// Run reconstruction, merge, header resolution and assembly.
///
/// All TABLE blocks of the document are treated as one logical table
/// continued across pages, merged in source order.
pub fn extract_table_records(
    blocks: &[Block],
    fields: &[SemanticField],
    rules: &TableRules,
) -> TableExtraction {
    let index = BlockIndex::new(blocks);
    let grids = reconstruct_tables(&index);
    let mut stats = TableStats {
        tables_found: grids.len(),
        ..TableStats::default()
    };

    if grids.is_empty() {
        tracing::warn!(blocks = blocks.len(), "No tables found in block graph");
        return TableExtraction {
            stats,
            ..TableExtraction::default()
        };
    }

    let merged = merge_grids(grids, rules.header_scan_rows);
    stats.rows_merged = merged.row_count();
    tracing::info!(
        tables = stats.tables_found,
        rows = stats.rows_merged,
        "Merged table data"
    );

    let resolution = resolve_headers(&merged, fields, rules);
    stats.header_row_index = Some(resolution.header_row);
    stats.columns_mapped = resolution.mapping.len();
    tracing::info!(
        header_row = resolution.header_row,
        columns_mapped = stats.columns_mapped,
        strategy = resolution.strategy.as_str(),
        "Resolved column mapping"
    );

    let assembly = assemble_records(&merged, &resolution, fields.len(), rules);
    stats.records_extracted = assembly.extracted;
    stats.records_accepted = assembly.records.len();
    if assembly.dropped() > 0 {
        tracing::info!(
            dropped = assembly.dropped(),
            kept = stats.records_accepted,
            "Rows dropped below field coverage"
        );
    }

    TableExtraction {
        records: assembly.records,
        stats,
        resolution: Some(resolution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_null(record: &Record) -> usize {
        record.values().filter(|v| !v.is_null()).count()
    }

    /// Builds a table block graph from rows of cell text; blank cells get no words.
    fn table_blocks(table_id: &str, rows: &[&[&str]], with_span: bool) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut cell_ids = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                let cell_id = format!("{table_id}-c{r}-{c}");
                let mut words = Vec::new();
                for (w, word) in text.split_whitespace().enumerate() {
                    let word_id = format!("{cell_id}-w{w}");
                    blocks.push(Block::word(&word_id, word));
                    words.push(word_id);
                }
                let word_refs: Vec<&str> = words.iter().map(String::as_str).collect();
                blocks.push(Block::cell(&cell_id, r + 1, c + 1, &word_refs));
                cell_ids.push(cell_id);
            }
        }
        let cell_refs: Vec<&str> = cell_ids.iter().map(String::as_str).collect();
        let mut table = Block::table(table_id, &cell_refs);
        if with_span {
            table = table.with_span(rows.len(), rows.first().map_or(0, |r| r.len()));
        }
        blocks.push(table);
        blocks
    }

    fn schema() -> Vec<SemanticField> {
        ["brand", "type", "ytd_rank"]
            .iter()
            .map(|n| SemanticField::named(n))
            .collect()
    }

    #[test]
    fn single_table_end_to_end() {
        let blocks = table_blocks(
            "t1",
            &[
                &["Brand", "Type", "YTD Rank"],
                &["Tito's", "Vodka", "1"],
                &["Fireball", "Cordials", "2"],
            ],
            true,
        );
        let extraction = extract_table_records(&blocks, &schema(), &TableRules::default());

        assert_eq!(extraction.stats.tables_found, 1);
        assert_eq!(extraction.stats.rows_merged, 3);
        assert_eq!(extraction.stats.header_row_index, Some(0));
        assert_eq!(extraction.stats.columns_mapped, 3);
        assert_eq!(extraction.stats.records_extracted, 2);
        assert_eq!(extraction.stats.records_accepted, 2);
        assert_eq!(extraction.records[1]["brand"], "Fireball");
    }

    #[test]
    fn continuation_tables_are_merged() {
        let mut blocks = table_blocks(
            "p1",
            &[&["Brand", "Type", "YTD Rank"], &["Tito's", "Vodka", "1"]],
            true,
        );
        blocks.extend(table_blocks(
            "p2",
            &[&["Brand", "Type", "YTD Rank"], &["Fireball", "Cordials", "2"]],
            false,
        ));
        let extraction = extract_table_records(&blocks, &schema(), &TableRules::default());

        assert_eq!(extraction.stats.tables_found, 2);
        assert_eq!(extraction.stats.rows_merged, 3);
        assert_eq!(extraction.records.len(), 2);
    }

    #[test]
    fn clean_round_trip_counts_non_empty_mapped_cells() {
        let blocks = table_blocks(
            "t1",
            &[
                &["Brand", "Type", "YTD Rank"],
                &["Tito's", "", "1,234"],
                &["Jack", "Whiskey", "12.5%"],
            ],
            true,
        );
        let rules = TableRules::default();
        let extraction = extract_table_records(&blocks, &schema(), &rules);
        let cleaned: Vec<Record> = extraction
            .records
            .iter()
            .map(|r| clean_record(r, &rules))
            .collect();

        assert_eq!(non_null(&cleaned[0]), 2);
        assert_eq!(non_null(&cleaned[1]), 3);
        assert_eq!(cleaned[0]["ytd_rank"], serde_json::json!(1234));
        assert!(cleaned[0]["type"].is_null());
    }

    #[test]
    fn document_without_tables_yields_nothing() {
        let blocks = vec![Block::word("w1", "hello")];
        let extraction = extract_table_records(&blocks, &schema(), &TableRules::default());
        assert_eq!(extraction.stats, TableStats::default());
        assert!(extraction.records.is_empty());
        assert!(extraction.resolution.is_none());
    }
}
