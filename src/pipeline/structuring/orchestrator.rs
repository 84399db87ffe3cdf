use std::sync::LazyLock;

use regex::Regex;

use super::parser::parse_incident_response;
use super::prompt::{build_hints_block, build_incident_prompt};
use super::types::{Incident, LlmClient};
use super::{ExtractionError, StructuringError};
use crate::pipeline::preprocess::{TextPreprocessor, INVALID_SENTINEL};

/// Extra attempts for transport failures. Parse failures are final:
/// at temperature 0 the same prompt yields the same output.
const MAX_LLM_RETRIES: usize = 1;

/// Hour tokens no clock can show: "24h".."99h" territory and 3+ digits.
/// Matches from 20 up, so "20h".."23h" are caught as well.
static IMPOSSIBLE_HOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([2-9]\d|\d{3,})h\b").expect("valid regex"));

/// Orchestrates incident extraction:
/// preprocess → hints block → prompt → LLM → parse → impossible-hour check
pub struct IncidentExtractor {
    preprocessor: TextPreprocessor,
    llm: Box<dyn LlmClient + Send + Sync>,
    model_name: String,
}

impl IncidentExtractor {
    pub fn new(
        preprocessor: TextPreprocessor,
        llm: Box<dyn LlmClient + Send + Sync>,
        model_name: &str,
    ) -> Self {
        Self {
            preprocessor,
            llm,
            model_name: model_name.to_string(),
        }
    }

    pub fn preprocessor(&self) -> &TextPreprocessor {
        &self.preprocessor
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Whether the configured model is installed on the LLM backend.
    pub fn check_model(&self) -> Result<bool, StructuringError> {
        self.llm.is_model_available(&self.model_name)
    }

    /// Extract an incident record from a raw report.
    ///
    /// `extra_context` is appended to the hints block verbatim; pass `""`
    /// when there is none.
    pub fn extract(&self, text: &str, extra_context: &str) -> Result<Incident, ExtractionError> {
        self.extract_with(&self.preprocessor, text, extra_context)
    }

    /// Extract using a caller-supplied preprocessor, e.g. one pinned to the
    /// moment a request arrived rather than to construction time.
    pub fn extract_with(
        &self,
        preprocessor: &TextPreprocessor,
        text: &str,
        extra_context: &str,
    ) -> Result<Incident, ExtractionError> {
        let _span = tracing::info_span!(
            "extract_incident",
            model = %self.model_name,
            reference_date = %preprocessor.reference_date().date()
        )
        .entered();

        let preprocessed = preprocessor.preprocess(text);
        let hints_block = build_hints_block(&preprocessed.hints, extra_context);
        let prompt = build_incident_prompt(&preprocessed.cleaned_text, &hints_block);

        tracing::debug!(
            hints = preprocessed.hints.len(),
            cleaned_chars = preprocessed.cleaned_text.len(),
            "Prompt assembled"
        );

        let response = self.call_llm_with_retry(&prompt)?;
        let mut incident = parse_incident_response(&response).map_err(|e| {
            tracing::warn!(error = %e, "Model response could not be parsed");
            e
        })?;

        incident.occurrence_datetime = fix_invalid_time(incident.occurrence_datetime, text);

        tracing::info!(
            has_datetime = incident.occurrence_datetime.is_some(),
            has_location = incident.location.is_some(),
            "Incident extracted"
        );

        Ok(incident)
    }

    /// Same as [`extract`](Self::extract), as a JSON object keyed by wire names.
    pub fn extract_json(
        &self,
        text: &str,
        extra_context: &str,
    ) -> Result<serde_json::Value, ExtractionError> {
        let incident = self.extract(text, extra_context)?;
        serde_json::to_value(incident)
            .map_err(|e| ExtractionError::from(StructuringError::JsonParsing(e.to_string())))
    }

    fn call_llm_with_retry(&self, prompt: &str) -> Result<String, StructuringError> {
        let mut attempt = 0;
        loop {
            match self.llm.generate(&self.model_name, prompt) {
                Ok(response) => return Ok(response),
                Err(e) if is_retryable_error(&e) && attempt < MAX_LLM_RETRIES => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "LLM call failed, retrying");
                }
                Err(e) => {
                    tracing::error!(error = %e, "LLM call failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Check if an error is retryable at the LLM call level.
fn is_retryable_error(e: &StructuringError) -> bool {
    matches!(
        e,
        StructuringError::OllamaConnection(_)
            | StructuringError::HttpClient(_)
            | StructuringError::OllamaError { .. }
    )
}

/// True when the lower-cased text holds an hour token no clock can show.
pub fn contains_impossible_hour(text: &str) -> bool {
    IMPOSSIBLE_HOUR_RE.is_match(&text.to_lowercase())
}

/// Force the sentinel when the original report contains an impossible
/// hour, whatever the model produced.
pub fn fix_invalid_time(occurrence: Option<String>, original_text: &str) -> Option<String> {
    if contains_impossible_hour(original_text) {
        return Some(INVALID_SENTINEL.to_string());
    }
    occurrence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::structuring::ollama::MockLlmClient;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const MODEL_RESPONSE: &str = r#"{"data_ocorrencia": "2026-02-23 14:00", "local": "escritorio de sao paulo", "tipo_incidente": "falha no servidor", "impacto": "sistema fora do ar"}"#;

    fn preprocessor() -> TextPreprocessor {
        TextPreprocessor::from_date(NaiveDate::from_ymd_opt(2026, 2, 23).unwrap())
    }

    fn extractor_with(llm: impl LlmClient + Send + Sync + 'static) -> IncidentExtractor {
        IncidentExtractor::new(preprocessor(), Box::new(llm), "llama3.2")
    }

    /// Records the prompt it receives.
    struct RecordingLlmClient {
        prompts: Arc<Mutex<Vec<String>>>,
        response: String,
    }

    impl LlmClient for RecordingLlmClient {
        fn generate(&self, _model: &str, prompt: &str) -> Result<String, StructuringError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.response.clone())
        }

        fn is_model_available(&self, _model: &str) -> Result<bool, StructuringError> {
            Ok(true)
        }

        fn list_models(&self) -> Result<Vec<String>, StructuringError> {
            Ok(vec![])
        }
    }

    /// Fails with the given error N times, then succeeds.
    struct FlakyLlmClient {
        failures: usize,
        calls: AtomicUsize,
        error: fn() -> StructuringError,
    }

    impl LlmClient for FlakyLlmClient {
        fn generate(&self, _model: &str, _prompt: &str) -> Result<String, StructuringError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err((self.error)())
            } else {
                Ok(MODEL_RESPONSE.to_string())
            }
        }

        fn is_model_available(&self, _model: &str) -> Result<bool, StructuringError> {
            Ok(true)
        }

        fn list_models(&self) -> Result<Vec<String>, StructuringError> {
            Ok(vec![])
        }
    }

    #[test]
    fn extracts_incident_with_mocked_llm() {
        let extractor = extractor_with(MockLlmClient::new(MODEL_RESPONSE));
        let incident = extractor
            .extract("Houve uma falha no servidor no escritório de São Paulo às 14h", "")
            .unwrap();

        assert_eq!(incident.location.as_deref(), Some("escritorio de sao paulo"));
        assert_eq!(incident.incident_type.as_deref(), Some("falha no servidor"));
        assert_eq!(incident.impact.as_deref(), Some("sistema fora do ar"));
        assert_eq!(incident.occurrence_datetime.as_deref(), Some("2026-02-23 14:00"));
    }

    #[test]
    fn prompt_carries_cleaned_text_hints_and_context() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let extractor = extractor_with(RecordingLlmClient {
            prompts: prompts.clone(),
            response: "{}".into(),
        });

        extractor
            .extract("Amanhã Às 14h No Escritório", "relato via app")
            .unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert!(prompt.contains("2026-02-24 as 14:00 no escritorio"));
        assert!(prompt.contains("- reference_date: 2026-02-24"));
        assert!(prompt.contains("- normalized_time: 14:00"));
        assert!(prompt.contains("Contexto adicional: relato via app"));
    }

    #[test]
    fn extract_with_uses_given_reference_date() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let extractor = extractor_with(RecordingLlmClient {
            prompts: prompts.clone(),
            response: "{}".into(),
        });
        let later = TextPreprocessor::from_date(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());

        extractor.extract_with(&later, "ontem caiu a rede", "").unwrap();

        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].contains("2026-03-09 caiu a rede"));
        assert!(prompts[0].contains("- reference_date: 2026-03-09"));
    }

    #[test]
    fn impossible_hour_overrides_model_output() {
        let extractor = extractor_with(MockLlmClient::new(MODEL_RESPONSE));
        let incident = extractor.extract("erro ocorrido as 99h no sistema", "").unwrap();
        assert_eq!(incident.occurrence_datetime.as_deref(), Some(INVALID_SENTINEL));
        assert_eq!(incident.location.as_deref(), Some("escritorio de sao paulo"));
    }

    #[test]
    fn impossible_hour_fills_missing_datetime() {
        let extractor = extractor_with(MockLlmClient::new("{}"));
        let incident = extractor.extract("travou as 123h", "").unwrap();
        assert_eq!(incident.occurrence_datetime.as_deref(), Some(INVALID_SENTINEL));
    }

    #[test]
    fn fix_invalid_time_detects_invalid_hour() {
        let result = fix_invalid_time(Some("2026-02-23 14:00".into()), "erro ocorrido as 99h");
        assert_eq!(result.as_deref(), Some("INVALIDO"));
    }

    #[test]
    fn fix_invalid_time_keeps_valid() {
        let result = fix_invalid_time(Some("2026-02-23 14:00".into()), "erro ocorrido as 14h");
        assert_eq!(result.as_deref(), Some("2026-02-23 14:00"));
    }

    #[test]
    fn impossible_hour_pattern_boundaries() {
        assert!(contains_impossible_hour("as 73H"));
        assert!(contains_impossible_hour("1000h de espera"));
        assert!(contains_impossible_hour("as 20h"));
        assert!(!contains_impossible_hour("as 19h"));
        assert!(!contains_impossible_hour("as 9h"));
        // minutes glued to the hour break the word boundary
        assert!(!contains_impossible_hour("as 73h30"));
        assert!(!contains_impossible_hour("modelo x99hz"));
    }

    #[test]
    fn unparseable_response_is_extraction_failure() {
        let extractor = extractor_with(MockLlmClient::new("desculpe, nao consigo"));
        let err = extractor.extract("queda no patio", "").unwrap_err();
        let ExtractionError::Failed(source) = &err;
        assert!(matches!(source, StructuringError::MalformedResponse(_)));
        assert!(err.to_string().starts_with("Incident extraction failed"));
    }

    #[test]
    fn transient_failure_is_retried() {
        let client = FlakyLlmClient {
            failures: 1,
            calls: AtomicUsize::new(0),
            error: || StructuringError::OllamaConnection("http://localhost:11434".into()),
        };
        let extractor = extractor_with(client);
        let incident = extractor.extract("queda no patio", "").unwrap();
        assert_eq!(incident.impact.as_deref(), Some("sistema fora do ar"));
    }

    #[test]
    fn persistent_failure_surfaces_cause() {
        let client = FlakyLlmClient {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
            error: || StructuringError::OllamaError {
                status: 500,
                body: "model crashed".into(),
            },
        };
        let extractor = extractor_with(client);
        let err = extractor.extract("queda no patio", "").unwrap_err();
        assert!(err.to_string().contains("model crashed"));
    }

    #[test]
    fn non_retryable_error_is_not_retried() {
        assert!(!is_retryable_error(&StructuringError::JsonParsing("x".into())));
        assert!(!is_retryable_error(&StructuringError::MalformedResponse("x".into())));
        assert!(is_retryable_error(&StructuringError::HttpClient("x".into())));
    }

    #[test]
    fn extract_json_uses_wire_names() {
        let extractor = extractor_with(MockLlmClient::new(MODEL_RESPONSE));
        let value = extractor.extract_json("tropecei na praca sete as 14h", "").unwrap();
        assert_eq!(value["local"], "escritorio de sao paulo");
        assert_eq!(value["impacto"], "sistema fora do ar");
    }

    #[test]
    fn check_model_queries_backend() {
        let extractor = extractor_with(
            MockLlmClient::new("{}").with_models(vec!["mistral:7b".into()]),
        );
        assert!(!extractor.check_model().unwrap());
        assert_eq!(extractor.model_name(), "llama3.2");
    }
}
