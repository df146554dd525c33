use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        explicit_seeds = ?request.seeds.as_ref().map(Vec::len),
        "Processing recommendation request"
    );

    let response = recommendations::recommend(
        state.similarity.clone(),
        state.seed_source.clone(),
        state.defaults,
        request,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        total = response.total,
        failed_seeds = response.failed_seeds.len(),
        "Recommendations generated"
    );

    Ok(Json(response))
}
