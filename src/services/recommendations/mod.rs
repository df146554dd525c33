use crate::{
    error::AppResult,
    models::{
        CandidateRecommendation, FailedSeed, RecommendationRequest, RecommendationResponse,
        SeedTrack,
    },
    services::providers::{SeedSource, SimilarityClient},
};
use std::sync::Arc;

pub mod filter;
pub mod orchestrator;
pub mod pool;
pub mod ranker;

pub use filter::ThresholdFilter;
pub use orchestrator::{AdmissionStats, FetchOrchestrator, JobOutcome, RunReport};
pub use pool::{DuplicatePolicy, RecommendationPool};

/// Recommends tracks similar to `seeds`, best match first
///
/// Runs one similarity lookup per seed with at most `concurrency` in flight,
/// keeps candidates scoring at least `threshold`, and collapses duplicates
/// across seeds by case-insensitive artist and title. Failed lookups shrink
/// the result but never fail the call; only invalid arguments do.
pub async fn generate_recommendations(
    client: Arc<dyn SimilarityClient>,
    seeds: Vec<SeedTrack>,
    concurrency: usize,
    threshold: f64,
) -> AppResult<Vec<CandidateRecommendation>> {
    FetchOrchestrator::new(client)
        .run(seeds, concurrency, threshold)
        .await
}

/// Fallbacks for request fields the caller leaves out
#[derive(Debug, Clone, Copy)]
pub struct RunDefaults {
    pub concurrency: usize,
    pub threshold: f64,
    pub seed_limit: u32,
}

/// Serves one API request end to end
///
/// Seeds come from the request when given, otherwise from the listener's
/// recently played tracks.
pub async fn recommend(
    similarity: Arc<dyn SimilarityClient>,
    seed_source: Arc<dyn SeedSource>,
    defaults: RunDefaults,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let concurrency = request.concurrency.unwrap_or(defaults.concurrency);
    let threshold = request.threshold.unwrap_or(defaults.threshold);

    // Validate before the seed fetch so bad input never costs an upstream call
    orchestrator::validate_run_args(concurrency, threshold)?;

    let seeds: Vec<SeedTrack> = match request.seeds {
        Some(seeds) => seeds.into_iter().map(SeedTrack::from).collect(),
        None => seed_source.recent_tracks(defaults.seed_limit).await?,
    };

    let policy = if request.keep_highest {
        DuplicatePolicy::KeepHighest
    } else {
        DuplicatePolicy::KeepFirst
    };

    let report = FetchOrchestrator::new(similarity)
        .with_policy(policy)
        .run_with_report(seeds, concurrency, threshold)
        .await?;

    let failed_seeds = report
        .outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            JobOutcome::Failed { seed, reason } => Some(FailedSeed {
                artist: seed.artist,
                title: seed.title,
                reason,
            }),
            JobOutcome::Succeeded { .. } => None,
        })
        .collect();

    let mut recommendations = report.recommendations;
    if let Some(limit) = request.limit {
        recommendations.truncate(limit);
    }

    Ok(RecommendationResponse {
        total: recommendations.len(),
        recommendations,
        failed_seeds,
    })
}
