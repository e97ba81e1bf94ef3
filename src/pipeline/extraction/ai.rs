//! AI strategy for unstructured artifacts (HTML pages, emails).
//!
//! The remote service receives the document text plus the template and
//! answers with one field map. Service failures never abort a run: the
//! artifact contributes a single empty record instead.

use serde::Serialize;

use crate::models::{Artifact, ArtifactType, Record, Template};

use super::traits::{ContentExtractor, FieldExtractionClient};
use super::types::{AiExtractionResponse, ArtifactExtraction};
use super::ExtractionError;

/// Extracts one record per artifact through a [`FieldExtractionClient`].
pub struct AiFieldExtractor {
    artifact_type: ArtifactType,
    client: Box<dyn FieldExtractionClient>,
}

impl AiFieldExtractor {
    pub fn new(artifact_type: ArtifactType, client: Box<dyn FieldExtractionClient>) -> Self {
        Self {
            artifact_type,
            client,
        }
    }
}

impl ContentExtractor for AiFieldExtractor {
    fn artifact_type(&self) -> ArtifactType {
        self.artifact_type
    }

    fn extract(
        &self,
        artifact: &Artifact,
        template: &Template,
    ) -> Result<ArtifactExtraction, ExtractionError> {
        let content = std::str::from_utf8(&artifact.content)
            .map_err(|e| ExtractionError::Encoding(format!("{}: {e}", artifact.key)))?;
        if content.trim().is_empty() {
            return Err(ExtractionError::MissingContent(artifact.key.clone()));
        }

        let response = match self.client.extract_fields(self.artifact_type, content, template) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(artifact = %artifact.key, error = %e, "AI extraction call failed");
                return Ok(ArtifactExtraction::from_records(vec![Record::new()]));
            }
        };

        if !response.success {
            tracing::warn!(
                artifact = %artifact.key,
                error = response.error.as_deref().unwrap_or("unknown"),
                "AI extraction reported failure"
            );
            return Ok(ArtifactExtraction::from_records(vec![Record::new()]));
        }

        tracing::info!(
            artifact = %artifact.key,
            with_values = response.fields_with_values,
            extracted = response.fields_extracted,
            "AI extraction complete"
        );
        Ok(ArtifactExtraction::from_records(vec![response
            .data
            .unwrap_or_default()]))
    }
}

// ═══════════════════════════════════════════
// HTTP client
// ═══════════════════════════════════════════

#[derive(Serialize)]
struct HtmlExtractionRequest<'a> {
    html: &'a str,
    template: &'a Template,
}

#[derive(Serialize)]
struct EmailExtractionRequest<'a> {
    email_content: &'a str,
    template: &'a Template,
}

/// Blocking HTTP client for the field-extraction service.
pub struct HttpFieldExtractionClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpFieldExtractionClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    fn endpoint(&self, artifact_type: ArtifactType) -> Result<String, ExtractionError> {
        let path = match artifact_type {
            ArtifactType::Email => "/api/extract/email-ai",
            kind if kind.is_ai_extracted() => "/api/extract/html-ai",
            other => return Err(ExtractionError::UnsupportedArtifact(other.to_string())),
        };
        Ok(format!("{}{path}", self.base_url))
    }
}

impl FieldExtractionClient for HttpFieldExtractionClient {
    fn extract_fields(
        &self,
        artifact_type: ArtifactType,
        content: &str,
        template: &Template,
    ) -> Result<AiExtractionResponse, ExtractionError> {
        let url = self.endpoint(artifact_type)?;
        let request = self.client.post(&url);
        let request = match artifact_type {
            ArtifactType::Email => request.json(&EmailExtractionRequest {
                email_content: content,
                template,
            }),
            _ => request.json(&HtmlExtractionRequest {
                html: content,
                template,
            }),
        };

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                ExtractionError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ExtractionError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                ExtractionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))
    }
}

/// Mock client for testing: returns a fixed response, or fails.
pub struct MockFieldExtractionClient {
    response: Option<AiExtractionResponse>,
}

impl MockFieldExtractionClient {
    pub fn new(data: Record) -> Self {
        let count = data.len();
        Self {
            response: Some(AiExtractionResponse {
                success: true,
                data: Some(data),
                fields_with_values: count,
                fields_extracted: count,
                error: None,
            }),
        }
    }

    pub fn with_response(response: AiExtractionResponse) -> Self {
        Self {
            response: Some(response),
        }
    }

    /// A client whose every call fails as if the service were down.
    pub fn unreachable() -> Self {
        Self { response: None }
    }
}

impl FieldExtractionClient for MockFieldExtractionClient {
    fn extract_fields(
        &self,
        _artifact_type: ArtifactType,
        _content: &str,
        _template: &Template,
    ) -> Result<AiExtractionResponse, ExtractionError> {
        self.response
            .clone()
            .ok_or_else(|| ExtractionError::Connection("mock".to_string()))
    }
}
