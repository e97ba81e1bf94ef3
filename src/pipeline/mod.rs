pub mod extraction;
pub mod job;
pub mod runner;
pub mod source;
pub mod tables;

pub use job::ExtractionJob;
pub use runner::{build_extractor, load_records, ExtractionPipeline, LoadOutcome, RunStats};
pub use source::{ArtifactSource, DirectoryArtifactSource};

use thiserror::Error;

use crate::db::DatabaseError;
use extraction::ExtractionError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
