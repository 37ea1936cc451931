//! Prediction handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::logic::validation::{validate, ValidationError};
use crate::models::RiskAssessment;
use crate::{AppError, AppResult, AppState};

/// Score a set of vital signs.
///
/// The body is read as raw bytes so that oversize bodies and malformed JSON
/// produce our own error envelope instead of axum's plain-text rejections.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<RiskAssessment>> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            tracing::debug!("Failed to read request body: {}", rejection.body_text());
            AppError::Validation(ValidationError::MalformedInput)
        }
    })?;

    let raw: Value =
        serde_json::from_slice(&body).map_err(|_| ValidationError::MalformedInput)?;

    let fields = validate(&raw, state.config.field_policy)?;
    let assessment = state.scorer.score(&fields);

    tracing::info!(
        fields = fields.present_count(),
        probability = assessment.probability,
        risk = %assessment.risk,
        degraded = assessment.is_degraded(),
        "Prediction served"
    );

    Ok(Json(assessment))
}
