use serde::{Deserialize, Serialize};

/// One target column of the caller's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticField {
    pub name: String,
    /// Human label used only for header matching; empty means "same as name".
    #[serde(rename = "displayName", alias = "display_name", default)]
    pub display_name: String,
}

impl SemanticField {
    pub fn new(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(name, name)
    }

    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Extraction template: the ordered field schema for one target entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<SemanticField>,
}

/// Target record table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
}

/// Where artifacts come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_accepts_camel_and_snake_case() {
        let camel: SemanticField =
            serde_json::from_str(r#"{"name":"ytd_rank","displayName":"YTD Rank"}"#).unwrap();
        let snake: SemanticField =
            serde_json::from_str(r#"{"name":"ytd_rank","display_name":"YTD Rank"}"#).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.label(), "YTD Rank");
    }

    #[test]
    fn label_falls_back_to_name() {
        let field: SemanticField = serde_json::from_str(r#"{"name":"brand"}"#).unwrap();
        assert_eq!(field.display_name, "");
        assert_eq!(field.label(), "brand");
    }

    #[test]
    fn template_serializes_display_name_in_camel_case() {
        let template = Template {
            id: "t1".into(),
            name: "brand_leaders".into(),
            fields: vec![SemanticField::new("brand", "Brand")],
        };
        let json = serde_json::to_string(&template).unwrap();
        assert!(json.contains("\"displayName\":\"Brand\""));
    }
}
