use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// When a seed track was played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayedAt {
    At(DateTime<Utc>),
    NowPlaying,
}

/// A track the listener has already played, used as a similarity lookup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTrack {
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub played_at: Option<PlayedAt>,
}

impl SeedTrack {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            played_at: None,
        }
    }

    pub fn with_played_at(mut self, played_at: PlayedAt) -> Self {
        self.played_at = Some(played_at);
        self
    }
}

impl Display for SeedTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// A track surfaced by a similarity lookup for one seed
///
/// `match_score` is the provider's similarity in [0, 1]; it is not validated
/// and defaults to 0 when the provider omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecommendation {
    pub artist: String,
    pub title: String,
    pub match_score: f64,
}

impl CandidateRecommendation {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, match_score: f64) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            match_score,
        }
    }

    pub fn key(&self) -> NormalizedKey {
        NormalizedKey::new(&self.artist, &self.title)
    }
}

/// Case-insensitive (artist, title) identity used to detect duplicates
///
/// Only for comparison; never shown to the listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey {
    artist: String,
    title: String,
}

impl NormalizedKey {
    pub fn new(artist: &str, title: &str) -> Self {
        Self {
            artist: normalize(artist),
            title: normalize(title),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
