use super::{
    filter::ThresholdFilter,
    pool::{DuplicatePolicy, RecommendationPool},
    ranker,
};
use crate::{
    error::{AppError, AppResult},
    models::{CandidateRecommendation, SeedTrack},
    services::providers::SimilarityClient,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// Result of one seed's lookup job
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Succeeded { seed: SeedTrack, candidates: usize },
    Failed { seed: SeedTrack, reason: String },
}

impl JobOutcome {
    pub fn seed(&self) -> &SeedTrack {
        match self {
            JobOutcome::Succeeded { seed, .. } | JobOutcome::Failed { seed, .. } => seed,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobOutcome::Failed { .. })
    }
}

/// Counters of what happened to candidates on their way into the pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionStats {
    pub candidates_seen: usize,
    pub admitted: usize,
    pub below_threshold: usize,
    pub duplicates: usize,
}

/// Everything a run produced: the ranked list plus per-job visibility
#[derive(Debug, Clone)]
pub struct RunReport {
    pub recommendations: Vec<CandidateRecommendation>,
    pub outcomes: Vec<JobOutcome>,
    pub stats: AdmissionStats,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }
}

/// Checks run arguments and builds the threshold filter they describe
pub(crate) fn validate_run_args(concurrency: usize, threshold: f64) -> AppResult<ThresholdFilter> {
    if concurrency == 0 {
        return Err(AppError::InvalidInput(
            "concurrency must be at least 1".to_string(),
        ));
    }
    ThresholdFilter::new(threshold)
}

/// Fans similarity lookups out over seeds and merges the answers
///
/// Each run dispatches exactly one lookup per seed with at most `concurrency`
/// in flight. Lookups run on their own tokio tasks; their results come back
/// to this run's single consumer in completion order, where they pass the
/// threshold filter and the pool's duplicate check. A failed or panicked
/// lookup contributes nothing and never stops its siblings.
#[derive(Clone)]
pub struct FetchOrchestrator {
    client: Arc<dyn SimilarityClient>,
    policy: DuplicatePolicy,
}

impl FetchOrchestrator {
    pub fn new(client: Arc<dyn SimilarityClient>) -> Self {
        Self {
            client,
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(
        &self,
        seeds: Vec<SeedTrack>,
        concurrency: usize,
        threshold: f64,
    ) -> AppResult<Vec<CandidateRecommendation>> {
        Ok(self
            .run_with_report(seeds, concurrency, threshold)
            .await?
            .recommendations)
    }

    pub async fn run_with_report(
        &self,
        seeds: Vec<SeedTrack>,
        concurrency: usize,
        threshold: f64,
    ) -> AppResult<RunReport> {
        let filter = validate_run_args(concurrency, threshold)?;

        let start = Instant::now();
        let seed_count = seeds.len();

        tracing::info!(
            seeds = seed_count,
            concurrency,
            threshold,
            provider = self.client.name(),
            "Starting recommendation run"
        );

        let mut pool = RecommendationPool::new(self.policy);
        let mut outcomes = Vec::with_capacity(seed_count);
        let mut stats = AdmissionStats::default();

        // Tasks are spawned lazily as slots free up, so no more than
        // `concurrency` lookups are ever outstanding
        let mut jobs = stream::iter(seeds)
            .map(|seed| {
                let client = Arc::clone(&self.client);
                let (artist, title) = (seed.artist.clone(), seed.title.clone());
                let task =
                    tokio::spawn(async move { client.fetch_similar(&artist, &title).await });
                async move { (seed, task.await) }
            })
            .buffer_unordered(concurrency);

        while let Some((seed, joined)) = jobs.next().await {
            let outcome = match joined {
                Ok(Ok(candidates)) => {
                    let count = candidates.len();
                    for candidate in candidates {
                        stats.candidates_seen += 1;
                        if !filter.admit(&candidate) {
                            stats.below_threshold += 1;
                        } else if pool.try_admit(candidate) {
                            stats.admitted += 1;
                        } else {
                            stats.duplicates += 1;
                        }
                    }

                    tracing::debug!(seed = %seed, candidates = count, "Lookup completed");
                    JobOutcome::Succeeded {
                        seed,
                        candidates: count,
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(seed = %seed, error = %e, "Lookup failed for seed");
                    JobOutcome::Failed {
                        seed,
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    tracing::error!(seed = %seed, error = %e, "Lookup task join error");
                    JobOutcome::Failed {
                        seed,
                        reason: format!("lookup task aborted: {}", e),
                    }
                }
            };
            outcomes.push(outcome);
        }

        // Under KeepHighest a replacement counts as admitted without growing the pool
        let pooled = pool.len();
        let report = RunReport {
            recommendations: ranker::rank(pool),
            outcomes,
            stats,
        };

        let succeeded = report.succeeded();
        let failed = report.outcomes.len() - succeeded;
        if failed > 0 {
            tracing::warn!(
                success_count = succeeded,
                error_count = failed,
                "Partial lookup failure"
            );
        }

        tracing::info!(
            seeds = seed_count,
            succeeded,
            failed,
            candidates_seen = stats.candidates_seen,
            admitted = stats.admitted,
            below_threshold = stats.below_threshold,
            duplicates = stats.duplicates,
            pooled,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendation run completed"
        );

        Ok(report)
    }
}
