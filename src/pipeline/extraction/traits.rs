//! Trait seams between the pipeline façade and its collaborators.
//!
//! - DocumentAnalyzer: artifact → block graph (the analysis service boundary)
//! - FieldExtractionClient: artifact text → field map (the AI service boundary)
//! - ContentExtractor: artifact → raw records, one strategy per artifact type

use crate::models::{Artifact, ArtifactType, Block, Template};

use super::types::{AiExtractionResponse, ArtifactExtraction};
use super::ExtractionError;

/// Produces the block graph for one artifact.
pub trait DocumentAnalyzer: Send + Sync {
    fn analyze(&self, artifact: &Artifact) -> Result<Vec<Block>, ExtractionError>;
}

/// Calls an AI service that extracts template fields from document text.
pub trait FieldExtractionClient: Send + Sync {
    fn extract_fields(
        &self,
        artifact_type: ArtifactType,
        content: &str,
        template: &Template,
    ) -> Result<AiExtractionResponse, ExtractionError>;
}

/// Strategy turning one artifact's content into raw records.
pub trait ContentExtractor: Send + Sync {
    /// Which artifact type this strategy handles.
    fn artifact_type(&self) -> ArtifactType;

    fn extract(
        &self,
        artifact: &Artifact,
        template: &Template,
    ) -> Result<ArtifactExtraction, ExtractionError>;
}
