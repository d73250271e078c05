//! GET /onboarding/clients/:client_id/context: campaign context of the
//! client's latest submission, for the downstream generator.

use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use intake_core::{CampaignContext, OnboardingService};

use crate::error::AppError;

pub async fn get_campaign_context(
    Extension(service): Extension<Arc<OnboardingService>>,
    Path(client_id): Path<String>,
) -> Result<Json<CampaignContext>, AppError> {
    Ok(Json(service.campaign_context(&client_id).await?))
}
