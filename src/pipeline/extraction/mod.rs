//! Content-type strategies: turn one artifact into raw records.
//!
//! Tabular artifacts go through document analysis and the table pipeline;
//! HTML and email artifacts go to the AI field extractor.

pub mod ai;
pub mod tabular;
pub mod textract;
pub mod traits;
pub mod types;

pub use ai::*;
pub use tabular::*;
pub use textract::*;
pub use traits::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Analysis output could not be decoded: {0}")]
    AnalysisDecode(String),

    #[error("Artifact content is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("Artifact has no content: {0}")]
    MissingContent(String),

    #[error("AI extraction service is not reachable at {0}")]
    Connection(String),

    #[error("AI extraction service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Unsupported artifact type: {0}")]
    UnsupportedArtifact(String),
}
