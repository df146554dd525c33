/// Music data provider abstraction
///
/// The recommendation core only ever sees normalized records. Each provider is
/// responsible for its own transport, authentication and payload parsing, and
/// for turning all of that into `CandidateRecommendation` / `SeedTrack` values.
use crate::{
    error::FetchError,
    models::{CandidateRecommendation, SeedTrack},
};

pub mod lastfm;

pub use lastfm::LastFmProvider;

/// Looks up tracks similar to a seed
///
/// Implementations own per-call timeouts; the orchestrator never cancels a
/// lookup once it has started.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SimilarityClient: Send + Sync {
    /// Fetch tracks similar to `artist` - `title`
    ///
    /// An empty list is a valid answer. Transport, status and payload problems
    /// are reported as `FetchError`.
    async fn fetch_similar(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<Vec<CandidateRecommendation>, FetchError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Supplies the listener's recently played tracks
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SeedSource: Send + Sync {
    async fn recent_tracks(&self, limit: u32) -> Result<Vec<SeedTrack>, FetchError>;
}
