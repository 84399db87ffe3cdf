pub mod types;
pub mod prompt;
pub mod parser;
pub mod ollama;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use ollama::*;
pub use orchestrator::*;

use thiserror::Error;

/// Failures of the language-model collaborator and of reading its output.
#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// The single error kind reported by incident extraction. The underlying
/// collaborator failure is kept as the source.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Incident extraction failed: {0}")]
    Failed(#[from] StructuringError),
}
