//! Tabular strategy: analysis output → block graph → table pipeline.

use crate::config::TableRules;
use crate::models::{Artifact, ArtifactType, Template};
use crate::pipeline::tables::extract_table_records;

use super::traits::{ContentExtractor, DocumentAnalyzer};
use super::types::ArtifactExtraction;
use super::ExtractionError;

/// Extracts records from tables found by document analysis.
pub struct TableExtractor {
    analyzer: Box<dyn DocumentAnalyzer>,
    rules: TableRules,
}

impl TableExtractor {
    pub fn new(analyzer: Box<dyn DocumentAnalyzer>, rules: TableRules) -> Self {
        Self { analyzer, rules }
    }
}

impl ContentExtractor for TableExtractor {
    fn artifact_type(&self) -> ArtifactType {
        ArtifactType::Textract
    }

    fn extract(
        &self,
        artifact: &Artifact,
        template: &Template,
    ) -> Result<ArtifactExtraction, ExtractionError> {
        let blocks = self.analyzer.analyze(artifact)?;
        let extraction = extract_table_records(&blocks, &template.fields, &self.rules);

        tracing::info!(
            artifact = %artifact.key,
            tables = extraction.stats.tables_found,
            records = extraction.records.len(),
            "Tabular extraction complete"
        );

        Ok(ArtifactExtraction {
            records: extraction.records,
            table_stats: Some(extraction.stats),
        })
    }
}
