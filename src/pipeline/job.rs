//! Call-time configuration of one extraction run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{ArtifactType, Entity, Source, Template};

use super::PipelineError;

/// What to extract, from where, into which entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionJob {
    pub entity: Entity,
    pub template: Template,
    pub source: Source,
    #[serde(alias = "artifactType")]
    pub artifact_type: ArtifactType,
}

impl ExtractionJob {
    /// Decode and validate a job description.
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        let job: Self = serde_json::from_str(json)
            .map_err(|e| PipelineError::Config(format!("Invalid job description: {e}")))?;
        job.validate()?;
        Ok(job)
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let missing = [
            ("entity id", &self.entity.id),
            ("entity name", &self.entity.name),
            ("template id", &self.template.id),
            ("source id", &self.source.id),
        ];
        for (what, value) in missing {
            if value.trim().is_empty() {
                return Err(PipelineError::Config(format!("Missing {what}")));
            }
        }

        if self.template.fields.is_empty() {
            return Err(PipelineError::Config(format!(
                "Template {} has no fields",
                self.template.id
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.template.fields {
            if field.name.trim().is_empty() {
                return Err(PipelineError::Config("Field with empty name".into()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(PipelineError::Config(format!(
                    "Duplicate field name: {}",
                    field.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = r#"{
        "entity": {"id": "e1", "name": "brand_leaders"},
        "template": {
            "id": "t1",
            "name": "Brand leaders",
            "fields": [
                {"name": "brand", "displayName": "Brand"},
                {"name": "ytd_rank", "displayName": "YTD Rank"}
            ]
        },
        "source": {"id": "s1", "name": "reports"},
        "artifact_type": "textract"
    }"#;

    fn job() -> ExtractionJob {
        ExtractionJob::from_json_str(JOB).unwrap()
    }

    #[test]
    fn decodes_job_description() {
        let job = job();
        assert_eq!(job.entity.name, "brand_leaders");
        assert_eq!(job.template.fields[1].label(), "YTD Rank");
        assert_eq!(job.artifact_type, ArtifactType::Textract);
    }

    #[test]
    fn unknown_artifact_type_is_config_error() {
        let json = JOB.replace("\"textract\"", "\"pdf\"");
        assert!(matches!(
            ExtractionJob::from_json_str(&json),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn empty_entity_name_is_rejected() {
        let mut job = job();
        job.entity.name = " ".into();
        assert!(matches!(job.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn template_without_fields_is_rejected() {
        let mut job = job();
        job.template.fields.clear();
        assert!(job.validate().is_err());
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let mut job = job();
        let first = job.template.fields[0].clone();
        job.template.fields.push(first);
        let err = job.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate field name: brand"));
    }

    #[test]
    fn empty_field_name_is_rejected() {
        let mut job = job();
        job.template.fields[0].name = String::new();
        assert!(job.validate().is_err());
    }
}
