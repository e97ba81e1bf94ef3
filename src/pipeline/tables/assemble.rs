//! Mapped grid rows → raw records, with the coverage filter applied.

use serde_json::Value;

use crate::config::TableRules;
use crate::models::Record;

use super::types::{Grid, HeaderResolution};

/// Raw records built from one logical table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    /// Records that passed the coverage filter, in row order.
    pub records: Vec<Record>,
    /// Data rows turned into raw records before filtering.
    pub extracted: usize,
}

impl Assembly {
    pub fn dropped(&self) -> usize {
        self.extracted - self.records.len()
    }
}

/// Build one raw record per data row (rows strictly after the header).
///
/// Only mapped columns present in the row contribute a key, blank or not;
/// a row is kept when it has at least `ceil(coverage_ratio × field_count)` keys.
pub fn assemble_records(
    grid: &Grid,
    resolution: &HeaderResolution,
    field_count: usize,
    rules: &TableRules,
) -> Assembly {
    let required = rules.min_populated(field_count);
    let data_rows = grid.rows().iter().enumerate().skip(resolution.header_row + 1);

    let mut assembly = Assembly::default();
    for (row_index, row) in data_rows {
        let record = build_record(row, resolution);
        assembly.extracted += 1;

        let populated = record.len();
        if populated >= required {
            assembly.records.push(record);
        } else {
            tracing::debug!(
                row = row_index,
                populated,
                required,
                "Skipping row with too few fields"
            );
        }
    }

    assembly
}

fn build_record(row: &[String], resolution: &HeaderResolution) -> Record {
    let mut record = Record::new();
    for (column, field) in &resolution.mapping {
        if let Some(value) = row.get(*column) {
            record.insert(field.clone(), Value::String(value.trim().to_string()));
        }
    }
    record
}
