//! Header row detection and header → semantic field resolution.

use std::collections::{BTreeMap, HashSet};

use crate::config::TableRules;
use crate::models::SemanticField;

use super::merge::densest_row;
use super::similarity::similarity_ratio;
use super::types::{ColumnMapping, Grid, HeaderResolution, MappingStrategy};

/// Locate the header row of `grid` and map its columns to `fields`.
///
/// Resolution order:
/// 1. blank header row → positional mapping when counts agree
/// 2. repeated (or partly blank) labels → positional mapping when counts agree
/// 3. otherwise each labelled column takes its most similar field, if the
///    score is strictly above `rules.match_threshold`
pub fn resolve_headers(
    grid: &Grid,
    fields: &[SemanticField],
    rules: &TableRules,
) -> HeaderResolution {
    let header_row = detect_header_row(grid, rules);
    let headers = grid.row(header_row).unwrap_or(&[]);

    let blank = headers.iter().all(|h| h.trim().is_empty());
    let strategy = if blank {
        Some(MappingStrategy::PositionalEmptyHeaders)
    } else if has_duplicate_labels(headers) {
        Some(MappingStrategy::PositionalDuplicateHeaders)
    } else {
        None
    };

    match strategy {
        Some(positional) => {
            let (mapping, strategy) = positional_mapping(headers.len(), fields, positional);
            HeaderResolution {
                header_row,
                mapping,
                strategy,
                scores: BTreeMap::new(),
            }
        }
        None => {
            let (mapping, scores) = fuzzy_mapping(headers, fields, rules.match_threshold);
            HeaderResolution {
                header_row,
                mapping,
                strategy: MappingStrategy::Fuzzy,
                scores,
            }
        }
    }
}

/// Row among the first `header_scan_rows` with the most meaningful cells.
///
/// A lone apostrophe is an OCR artifact and does not count.
pub fn detect_header_row(grid: &Grid, rules: &TableRules) -> usize {
    densest_row(grid.rows(), rules.header_scan_rows, |cell| {
        cell != rules.apostrophe_artifact
    })
}

/// True when the trimmed, lower-cased labels are not all distinct.
///
/// Blank labels cannot be told apart either, so any blank among labelled
/// columns also counts as a repetition.
fn has_duplicate_labels(headers: &[String]) -> bool {
    let distinct: HashSet<String> = headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .map(str::to_lowercase)
        .collect();
    distinct.len() != headers.len()
}

fn positional_mapping(
    column_count: usize,
    fields: &[SemanticField],
    strategy: MappingStrategy,
) -> (ColumnMapping, MappingStrategy) {
    if column_count != fields.len() {
        tracing::warn!(
            columns = column_count,
            fields = fields.len(),
            reason = strategy.as_str(),
            "Positional mapping impossible: column count mismatch"
        );
        return (ColumnMapping::new(), MappingStrategy::CountMismatch);
    }

    tracing::info!(reason = strategy.as_str(), "Using positional column mapping");
    let mapping = fields
        .iter()
        .enumerate()
        .map(|(index, field)| (index, field.name.clone()))
        .collect();
    (mapping, strategy)
}

fn fuzzy_mapping(
    headers: &[String],
    fields: &[SemanticField],
    threshold: f64,
) -> (ColumnMapping, BTreeMap<usize, f64>) {
    let mut mapping = ColumnMapping::new();
    let mut scores = BTreeMap::new();

    for (column, header) in headers.iter().enumerate() {
        let header = header.trim();
        if header.is_empty() {
            continue;
        }

        match best_field(header, fields) {
            Some((field, score)) if score > threshold => {
                tracing::debug!(column, header, field = %field.name, score, "Header matched");
                mapping.insert(column, field.name.clone());
                scores.insert(column, score);
            }
            Some((field, score)) => {
                tracing::debug!(column, header, best = %field.name, score, "No field matched header");
            }
            None => {
                tracing::debug!(column, header, "No fields to match header against");
            }
        }
    }

    (mapping, scores)
}

/// Field with the highest score against `header`; the first field wins ties.
fn best_field<'f>(header: &str, fields: &'f [SemanticField]) -> Option<(&'f SemanticField, f64)> {
    let mut best: Option<(&SemanticField, f64)> = None;
    for field in fields {
        let score = similarity_ratio(header, &field.name).max(similarity_ratio(header, field.label()));
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((field, score));
        }
    }
    best
}
