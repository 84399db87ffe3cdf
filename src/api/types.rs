//! Shared types for the HTTP API layer.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::pipeline::structuring::IncidentExtractor;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub extractor: Arc<IncidentExtractor>,
}

impl ApiContext {
    pub fn new(extractor: Arc<IncidentExtractor>) -> Self {
        Self { extractor }
    }
}

/// Body of `POST /extract`.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Free-text report. Missing counts as empty.
    #[serde(alias = "texto", default)]
    pub text: String,

    /// Appended to the hints block as additional context.
    #[serde(alias = "contexto", default)]
    pub context: Option<String>,

    /// Date relative words ("ontem", "amanha") resolve against.
    /// Defaults to the server's local clock when the request arrives.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}
