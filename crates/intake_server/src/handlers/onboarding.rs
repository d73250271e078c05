//! Submission writer and reader endpoints.
//!
//! POST /onboarding/submit   validate and persist a form payload
//! GET  /onboarding/:id      full submission with segments and personas

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use intake_core::{OnboardingService, OnboardingSubmission};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub submission_id: Uuid,
    pub message: String,
    pub submission: OnboardingSubmission,
}

/// The body is taken as untyped JSON so that validation, not serde, names
/// the offending field.
pub async fn submit(
    Extension(service): Extension<Arc<OnboardingService>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let Json(body) = payload?;
    let submission = service.submit(&body).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            submission_id: submission.id,
            message: "Onboarding form submitted successfully".to_string(),
            submission,
        }),
    ))
}

pub async fn get_submission(
    Extension(service): Extension<Arc<OnboardingService>>,
    Path(id): Path<String>,
) -> Result<Json<OnboardingSubmission>, AppError> {
    Ok(Json(service.get_submission(&id).await?))
}
