use serde::{Deserialize, Serialize};

use super::StructuringError;

/// Structured incident record extracted from a free-text report.
///
/// Every field is optional. Wire names follow the report locale
/// (`data_ocorrencia`, `local`, ...); English names are accepted when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// `YYYY-MM-DD HH:MM`, or `INVALIDO` when the report holds an impossible time.
    #[serde(rename = "data_ocorrencia", alias = "occurrence_datetime", default)]
    pub occurrence_datetime: Option<String>,

    /// City, public place or spatial reference.
    #[serde(rename = "local", alias = "location", default)]
    pub location: Option<String>,

    /// Short description of what happened.
    #[serde(rename = "tipo_incidente", alias = "incident_type", default)]
    pub incident_type: Option<String>,

    /// Consequence of the incident or affected systems.
    #[serde(rename = "impacto", alias = "impact", default)]
    pub impact: Option<String>,
}

/// Ollama LLM client abstraction (allows mocking)
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, StructuringError>;

    fn is_model_available(&self, model: &str) -> Result<bool, StructuringError>;

    fn list_models(&self) -> Result<Vec<String>, StructuringError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_partial_data() {
        let incident = Incident {
            location: Some("praca sete".into()),
            incident_type: Some("queda".into()),
            ..Default::default()
        };
        assert_eq!(incident.location.as_deref(), Some("praca sete"));
        assert!(incident.occurrence_datetime.is_none());
        assert!(incident.impact.is_none());
    }

    #[test]
    fn serializes_with_locale_field_names() {
        let incident = Incident {
            occurrence_datetime: Some("INVALIDO".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&incident).unwrap();
        assert_eq!(json["data_ocorrencia"], "INVALIDO");
        assert!(json["local"].is_null());
        assert!(json["tipo_incidente"].is_null());
        assert!(json["impacto"].is_null());
    }

    #[test]
    fn deserializes_english_aliases_and_missing_fields() {
        let incident: Incident =
            serde_json::from_str(r#"{"location": "bh", "impact": "pe quebrado"}"#).unwrap();
        assert_eq!(incident.location.as_deref(), Some("bh"));
        assert_eq!(incident.impact.as_deref(), Some("pe quebrado"));
        assert!(incident.incident_type.is_none());
    }
}
