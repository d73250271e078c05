//! Router construction for the onboarding intake server.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use intake_core::OnboardingService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;

pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<OnboardingService>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/store", get(handlers::health::store_health))
        .route("/onboarding/submit", post(handlers::onboarding::submit))
        .route("/onboarding/:id", get(handlers::onboarding::get_submission))
        .route(
            "/onboarding/clients/:client_id/context",
            get(handlers::context::get_campaign_context),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        // The reverse proxy in front is the trust boundary.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(service))
}
