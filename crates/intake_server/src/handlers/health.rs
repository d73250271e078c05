use std::sync::Arc;

use axum::{Extension, Json};
use chrono::Utc;
use intake_core::OnboardingService;
use serde_json::{json, Value};

use crate::error::AppError;

/// Liveness. Never touches the store.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Readiness: 503 when the store does not answer within the store timeout.
pub async fn store_health(
    Extension(service): Extension<Arc<OnboardingService>>,
) -> Result<Json<Value>, AppError> {
    service.check_store().await?;
    Ok(Json(json!({ "status": "ready" })))
}
