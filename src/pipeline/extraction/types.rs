use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::pipeline::tables::TableStats;

/// Raw records produced from one artifact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactExtraction {
    pub records: Vec<Record>,
    /// Present for tabular artifacts only.
    pub table_stats: Option<TableStats>,
}

impl ArtifactExtraction {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            table_stats: None,
        }
    }
}

/// Body returned by the AI field-extraction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiExtractionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Record>,
    /// Fields that came back with a value.
    #[serde(default)]
    pub fields_with_values: usize,
    /// Fields the service was asked for.
    #[serde(default)]
    pub fields_extracted: usize,
    #[serde(default)]
    pub error: Option<String>,
}
