use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::{SeedSource, SimilarityClient},
        recommendations::RunDefaults,
    },
};

pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub similarity: Arc<dyn SimilarityClient>,
    pub seed_source: Arc<dyn SeedSource>,
    pub defaults: RunDefaults,
}

impl AppState {
    pub fn new(
        similarity: Arc<dyn SimilarityClient>,
        seed_source: Arc<dyn SeedSource>,
        defaults: RunDefaults,
    ) -> Self {
        Self {
            similarity,
            seed_source,
            defaults,
        }
    }

    pub fn defaults_from_config(config: &Config) -> RunDefaults {
        RunDefaults {
            concurrency: config.default_concurrency,
            threshold: config.default_threshold,
            seed_limit: config.seed_limit,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recommendations", post(recommendations::recommend))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
