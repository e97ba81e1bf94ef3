//! ExtractionPipeline: the façade that sequences one run.
//!
//! source → per-artifact extraction → cleaning → chunked load → stats.
//! Only job validation, table creation and source listing are fatal;
//! every later failure is counted and logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Settings, TableRules};
use crate::db::{open_database, RecordStore, SqliteRecordStore};
use crate::models::{ArtifactType, Record};
use crate::pipeline::extraction::{
    AiFieldExtractor, ContentExtractor, ExtractionError, HttpFieldExtractionClient,
    TableExtractor, TextractJsonAnalyzer,
};
use crate::pipeline::tables::{clean_record, TableStats};

use super::job::ExtractionJob;
use super::source::ArtifactSource;
use super::PipelineError;

/// Aggregate statistics of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub run_id: Uuid,
    pub entity: String,
    pub template: String,
    /// Every listed artifact, including those that failed.
    pub artifacts_processed: usize,
    /// Artifacts that could not be fetched or extracted.
    pub artifacts_failed: usize,
    pub tables_found: usize,
    pub rows_merged: usize,
    /// Header row of the last artifact that contained a table.
    pub header_row_index: Option<usize>,
    /// Columns mapped for the last artifact that contained a table.
    pub columns_mapped: usize,
    pub records_extracted: usize,
    pub records_accepted: usize,
    pub records_loaded: usize,
    pub records_failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStats {
    fn start(job: &ExtractionJob) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            entity: job.entity.name.clone(),
            template: job.template.name.clone(),
            artifacts_processed: 0,
            artifacts_failed: 0,
            tables_found: 0,
            rows_merged: 0,
            header_row_index: None,
            columns_mapped: 0,
            records_extracted: 0,
            records_accepted: 0,
            records_loaded: 0,
            records_failed: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    fn add_table_stats(&mut self, table: &TableStats) {
        self.tables_found += table.tables_found;
        self.rows_merged += table.rows_merged;
        self.records_extracted += table.records_extracted;
        self.records_accepted += table.records_accepted;
        if table.header_row_index.is_some() {
            self.header_row_index = table.header_row_index;
            self.columns_mapped = table.columns_mapped;
        }
    }
}

/// Outcome of loading a record sequence into a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub loaded: usize,
    pub failed: usize,
}

/// Insert `records` in chunks of `batch_size`.
///
/// A rejected chunk is retried one record at a time so that only the
/// records the store refuses individually are lost.
pub fn load_records(
    store: &dyn RecordStore,
    entity: &str,
    records: &[Record],
    batch_size: usize,
) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for (batch, chunk) in records.chunks(batch_size.max(1)).enumerate() {
        match store.insert_batch(entity, chunk) {
            Ok(inserted) => {
                tracing::debug!(batch, inserted, "Batch loaded");
                outcome.loaded += inserted;
            }
            Err(e) => {
                tracing::warn!(
                    batch,
                    size = chunk.len(),
                    error = %e,
                    "Batch insert rejected, retrying record by record"
                );
                for (offset, record) in chunk.iter().enumerate() {
                    match store.insert_one(entity, record) {
                        Ok(()) => outcome.loaded += 1,
                        Err(e) => {
                            tracing::error!(batch, offset, error = %e, "Record insert failed");
                            outcome.failed += 1;
                        }
                    }
                }
            }
        }
    }

    outcome
}

/// Pick the content strategy for an artifact type.
pub fn build_extractor(
    artifact_type: ArtifactType,
    settings: &Settings,
) -> Result<Box<dyn ContentExtractor>, PipelineError> {
    if artifact_type.is_tabular() {
        return Ok(Box::new(TableExtractor::new(
            Box::new(TextractJsonAnalyzer::new()),
            settings.table_rules.clone(),
        )));
    }
    if artifact_type.is_ai_extracted() {
        let client =
            HttpFieldExtractionClient::new(&settings.ai_base_url, settings.ai_timeout_secs)?;
        return Ok(Box::new(AiFieldExtractor::new(artifact_type, Box::new(client))));
    }
    Err(PipelineError::Extraction(ExtractionError::UnsupportedArtifact(
        artifact_type.to_string(),
    )))
}

/// Runs one extraction job end to end.
pub struct ExtractionPipeline {
    job: ExtractionJob,
    settings: Settings,
    source: Box<dyn ArtifactSource>,
    extractor: Box<dyn ContentExtractor>,
    store: Box<dyn RecordStore>,
}

impl ExtractionPipeline {
    /// Assemble a pipeline from explicit collaborators.
    ///
    /// Fails before any work is done if the job is invalid or the
    /// extractor does not handle the job's artifact type.
    pub fn new(
        job: ExtractionJob,
        settings: Settings,
        source: Box<dyn ArtifactSource>,
        extractor: Box<dyn ContentExtractor>,
        store: Box<dyn RecordStore>,
    ) -> Result<Self, PipelineError> {
        job.validate()?;
        if extractor.artifact_type() != job.artifact_type {
            return Err(PipelineError::Config(format!(
                "Extractor handles {} artifacts, job expects {}",
                extractor.artifact_type(),
                job.artifact_type
            )));
        }

        Ok(Self {
            job,
            settings,
            source,
            extractor,
            store,
        })
    }

    /// Pipeline with the default strategy for the job's artifact type and a
    /// SQLite store at `settings.database_path`.
    pub fn with_settings(
        job: ExtractionJob,
        settings: Settings,
        source: Box<dyn ArtifactSource>,
    ) -> Result<Self, PipelineError> {
        job.validate()?;
        let extractor = build_extractor(job.artifact_type, &settings)?;
        let store = SqliteRecordStore::new(open_database(&settings.database_path)?);
        Self::new(job, settings, source, extractor, Box::new(store))
    }

    pub fn job(&self) -> &ExtractionJob {
        &self.job
    }

    pub fn rules(&self) -> &TableRules {
        &self.settings.table_rules
    }

    pub fn run(&self) -> Result<RunStats, PipelineError> {
        let mut stats = RunStats::start(&self.job);
        let entity = self.job.entity.name.as_str();
        tracing::info!(
            run_id = %stats.run_id,
            entity,
            template = %self.job.template.name,
            artifact_type = self.job.artifact_type.as_str(),
            "Extraction run started"
        );

        self.store.ensure_table(entity, &self.job.template.fields)?;
        let keys = self.source.list()?;

        let rules = self.rules();
        let mut records = Vec::new();
        for key in &keys {
            stats.artifacts_processed += 1;
            let extraction = self
                .source
                .fetch(key)
                .and_then(|artifact| {
                    self.extractor
                        .extract(&artifact, &self.job.template)
                        .map_err(PipelineError::from)
                });

            match extraction {
                Ok(extraction) => match &extraction.table_stats {
                    // Cleaning belongs to the table path; AI values are stored as returned.
                    Some(table) => {
                        stats.add_table_stats(table);
                        records.extend(extraction.records.iter().map(|r| clean_record(r, rules)));
                    }
                    None => {
                        stats.records_extracted += extraction.records.len();
                        stats.records_accepted += extraction.records.len();
                        records.extend(extraction.records);
                    }
                },
                Err(e) => {
                    tracing::warn!(artifact = %key, error = %e, "Artifact extraction failed, skipping");
                    stats.artifacts_failed += 1;
                }
            }
        }

        let outcome = load_records(
            self.store.as_ref(),
            entity,
            &records,
            self.settings.batch_size,
        );
        stats.records_loaded = outcome.loaded;
        stats.records_failed = outcome.failed;
        stats.finished_at = Some(Utc::now());

        tracing::info!(
            run_id = %stats.run_id,
            artifacts = stats.artifacts_processed,
            artifacts_failed = stats.artifacts_failed,
            tables = stats.tables_found,
            accepted = stats.records_accepted,
            loaded = stats.records_loaded,
            failed = stats.records_failed,
            "Extraction run finished"
        );
        Ok(stats)
    }
}
