//! Decoder for stored Textract `AnalyzeDocument` / `GetDocumentAnalysis` output.
//!
//! Accepts a single result (`{"Blocks": [...]}`), a list of paginated
//! results (each with `Blocks`, concatenated in order), or a bare block list.

use serde::Deserialize;

use crate::models::{Artifact, Block, BlockType, TableSpan};

use super::traits::DocumentAnalyzer;
use super::ExtractionError;

/// Relationship kind that links a parent to the blocks it owns.
const CHILD_RELATIONSHIP: &str = "CHILD";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalysisPayload {
    Pages(Vec<AnalysisPage>),
    Page(AnalysisPage),
    Blocks(Vec<TextractBlock>),
}

#[derive(Debug, Deserialize)]
struct AnalysisPage {
    #[serde(rename = "Blocks")]
    blocks: Vec<TextractBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextractBlock {
    id: String,
    block_type: String,
    #[serde(default)]
    row_index: Option<usize>,
    #[serde(default)]
    column_index: Option<usize>,
    #[serde(default)]
    row_span: Option<usize>,
    #[serde(default)]
    column_span: Option<usize>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    relationships: Vec<TextractRelationship>,
}

#[derive(Debug, Deserialize)]
struct TextractRelationship {
    #[serde(rename = "Type", alias = "RelationshipType")]
    kind: String,
    #[serde(rename = "Ids", default)]
    ids: Vec<String>,
}

impl From<TextractBlock> for Block {
    fn from(raw: TextractBlock) -> Self {
        let block_type = BlockType::parse(&raw.block_type);
        let children = raw
            .relationships
            .into_iter()
            .filter(|rel| rel.kind.eq_ignore_ascii_case(CHILD_RELATIONSHIP))
            .flat_map(|rel| rel.ids)
            .collect();
        // Cell spans describe merged cells, not the grid; only tables carry one.
        let span = match (&block_type, raw.row_span, raw.column_span) {
            (BlockType::Table, Some(row_span), Some(column_span)) => Some(TableSpan {
                row_span,
                column_span,
            }),
            _ => None,
        };

        Block {
            id: raw.id,
            block_type,
            row_index: raw.row_index,
            column_index: raw.column_index,
            text: raw.text,
            children,
            span,
        }
    }
}

/// Parse analysis output JSON into blocks.
pub fn parse_analysis_json(json: &[u8]) -> Result<Vec<Block>, ExtractionError> {
    let payload: AnalysisPayload = serde_json::from_slice(json)
        .map_err(|e| ExtractionError::AnalysisDecode(e.to_string()))?;

    let raw_blocks: Vec<TextractBlock> = match payload {
        AnalysisPayload::Pages(pages) => pages.into_iter().flat_map(|p| p.blocks).collect(),
        AnalysisPayload::Page(page) => page.blocks,
        AnalysisPayload::Blocks(blocks) => blocks,
    };

    Ok(raw_blocks.into_iter().map(Block::from).collect())
}

/// Reads analysis output that was stored alongside (or instead of) the
/// source document.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextractJsonAnalyzer;

impl TextractJsonAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentAnalyzer for TextractJsonAnalyzer {
    fn analyze(&self, artifact: &Artifact) -> Result<Vec<Block>, ExtractionError> {
        if artifact.content.is_empty() {
            return Err(ExtractionError::MissingContent(artifact.key.clone()));
        }
        let blocks = parse_analysis_json(&artifact.content)?;
        tracing::debug!(artifact = %artifact.key, blocks = blocks.len(), "Decoded analysis output");
        Ok(blocks)
    }
}
