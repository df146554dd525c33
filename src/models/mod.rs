use serde::{Deserialize, Serialize};

pub mod track;

pub use track::{CandidateRecommendation, NormalizedKey, PlayedAt, SeedTrack};

// ============================================================================
// API Types
// ============================================================================

/// Seed supplied directly by an API caller
#[derive(Debug, Clone, Deserialize)]
pub struct SeedInput {
    pub artist: String,
    pub title: String,
}

impl From<SeedInput> for SeedTrack {
    fn from(input: SeedInput) -> Self {
        SeedTrack::new(input.artist, input.title)
    }
}

/// Request for a recommendation run
///
/// Seeds default to the listener's recently played tracks; the numeric
/// knobs default to the server configuration.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub seeds: Option<Vec<SeedInput>>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Keep the highest score among duplicates instead of the first arrival
    #[serde(default)]
    pub keep_highest: bool,
}

/// A seed whose lookup failed during the run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailedSeed {
    pub artist: String,
    pub title: String,
    pub reason: String,
}

/// Ranked recommendations plus the seeds that contributed nothing due to errors
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<CandidateRecommendation>,
    pub total: usize,
    pub failed_seeds: Vec<FailedSeed>,
}
