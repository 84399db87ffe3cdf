use super::types::Incident;
use super::StructuringError;

/// Parse the model's response into an `Incident`.
///
/// Accepts a bare JSON object, an object wrapped in a ```json fence, or an
/// object surrounded by chatter. Unknown keys are ignored.
pub fn parse_incident_response(response: &str) -> Result<Incident, StructuringError> {
    let json_str = extract_json_object(response)?;

    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| StructuringError::JsonParsing(e.to_string()))?;

    if !value.is_object() {
        return Err(StructuringError::MalformedResponse(
            "Expected a JSON object".into(),
        ));
    }

    serde_json::from_value(value).map_err(|e| StructuringError::JsonParsing(e.to_string()))
}

/// Locate the JSON object inside the response text.
fn extract_json_object(response: &str) -> Result<&str, StructuringError> {
    let body = match response.find("```json") {
        Some(fence_start) => {
            let content_start = fence_start + 7;
            let fence_end = response[content_start..]
                .find("```")
                .ok_or_else(|| StructuringError::MalformedResponse("Unclosed JSON block".into()))?;
            &response[content_start..content_start + fence_end]
        }
        None => response,
    };

    let start = body
        .find('{')
        .ok_or_else(|| StructuringError::MalformedResponse("No JSON object found".into()))?;
    let end = body
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| StructuringError::MalformedResponse("Unclosed JSON object".into()))?;

    Ok(&body[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_object() {
        let response = r#"{"data_ocorrencia": "2026-02-23 14:00", "local": "escritorio de sao paulo", "tipo_incidente": "falha no servidor", "impacto": "sistema fora do ar"}"#;
        let incident = parse_incident_response(response).unwrap();
        assert_eq!(incident.occurrence_datetime.as_deref(), Some("2026-02-23 14:00"));
        assert_eq!(incident.location.as_deref(), Some("escritorio de sao paulo"));
        assert_eq!(incident.incident_type.as_deref(), Some("falha no servidor"));
        assert_eq!(incident.impact.as_deref(), Some("sistema fora do ar"));
    }

    #[test]
    fn parse_fenced_object_with_chatter() {
        let response = "Aqui está:\n```json\n{\"local\": \"bh\", \"impacto\": null}\n```\nEspero ter ajudado.";
        let incident = parse_incident_response(response).unwrap();
        assert_eq!(incident.location.as_deref(), Some("bh"));
        assert!(incident.impact.is_none());
    }

    #[test]
    fn missing_fields_default_to_none() {
        let incident = parse_incident_response("{}").unwrap();
        assert_eq!(incident, Incident::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let incident =
            parse_incident_response(r#"{"local": "galpao", "gravidade": "alta"}"#).unwrap();
        assert_eq!(incident.location.as_deref(), Some("galpao"));
    }

    #[test]
    fn no_object_is_malformed() {
        let err = parse_incident_response("nao sei").unwrap_err();
        assert!(matches!(err, StructuringError::MalformedResponse(_)));
    }

    #[test]
    fn unclosed_fence_is_malformed() {
        let err = parse_incident_response("```json\n{\"local\": \"x\"}").unwrap_err();
        assert!(matches!(err, StructuringError::MalformedResponse(_)));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_incident_response("{\"local\": }").unwrap_err();
        assert!(matches!(err, StructuringError::JsonParsing(_)));
    }

    #[test]
    fn wrong_field_type_is_parse_error() {
        let err = parse_incident_response(r#"{"local": 42}"#).unwrap_err();
        assert!(matches!(err, StructuringError::JsonParsing(_)));
    }
}
