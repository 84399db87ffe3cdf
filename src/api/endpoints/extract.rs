//! `POST /extract`: free-text report in, incident record out.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::NaiveTime;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ExtractRequest};
use crate::pipeline::preprocess::TextPreprocessor;
use crate::pipeline::structuring::Incident;

/// Run the extraction pipeline on one report.
///
/// The model call blocks, so it runs on the blocking pool.
pub async fn extract(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<Incident>, ApiError> {
    let Json(ExtractRequest {
        text,
        context,
        reference_date,
    }) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    if text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text cannot be empty".into()));
    }

    let reference = reference_date
        .map(|date| date.and_time(NaiveTime::MIN))
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let context = context.unwrap_or_default();
    let extractor = ctx.extractor.clone();

    let incident = tokio::task::spawn_blocking(move || {
        let preprocessor = TextPreprocessor::new(reference);
        extractor.extract_with(&preprocessor, &text, &context)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Extraction task failed: {e}")))??;

    Ok(Json(incident))
}
