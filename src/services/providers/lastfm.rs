/// Last.fm API provider
///
/// Serves both capabilities the recommendation core consumes:
/// 1. Similarity: `track.getsimilar` → candidates with Last.fm's `match` score
/// 2. Seeds: `user.getrecenttracks` → the configured user's listening history
///
/// Last.fm reports some failures as `{"error": <code>, "message": ...}` with a
/// 200 status, so every payload is checked for an error body before parsing.
use crate::{
    error::FetchError,
    models::{CandidateRecommendation, PlayedAt, SeedTrack},
    services::providers::{SeedSource, SimilarityClient},
};
use chrono::DateTime;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct LastFmProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    username: String,
    similar_limit: u32,
}

impl LastFmProvider {
    /// Every call, connect through body, is bounded by `timeout`; an expired
    /// call surfaces as `FetchError::Http`
    pub fn new(
        api_key: String,
        api_url: String,
        username: String,
        similar_limit: u32,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            username,
            similar_limit,
        })
    }

    async fn request(&self, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str()), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Error bodies are JSON even on non-success statuses; prefer their message
        let payload: Option<Value> = serde_json::from_str(&body).ok();
        if let Some(err) = payload.as_ref().and_then(provider_error) {
            return Err(err);
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        payload.ok_or_else(|| FetchError::Malformed("response is not valid JSON".to_string()))
    }
}

#[async_trait::async_trait]
impl SimilarityClient for LastFmProvider {
    async fn fetch_similar(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<Vec<CandidateRecommendation>, FetchError> {
        let limit = self.similar_limit.to_string();
        let payload = self
            .request(&[
                ("method", "track.getsimilar"),
                ("artist", artist),
                ("track", title),
                ("limit", limit.as_str()),
            ])
            .await?;

        let candidates = parse_similar_tracks(payload)?;

        tracing::debug!(
            artist = %artist,
            title = %title,
            results = candidates.len(),
            provider = "lastfm",
            "Similar tracks fetched"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "lastfm"
    }
}

#[async_trait::async_trait]
impl SeedSource for LastFmProvider {
    async fn recent_tracks(&self, limit: u32) -> Result<Vec<SeedTrack>, FetchError> {
        let limit = limit.to_string();
        let payload = self
            .request(&[
                ("method", "user.getrecenttracks"),
                ("user", self.username.as_str()),
                ("limit", limit.as_str()),
            ])
            .await?;

        let seeds = parse_recent_tracks(payload)?;

        tracing::info!(
            user = %self.username,
            seeds = seeds.len(),
            provider = "lastfm",
            "Recent tracks fetched"
        );

        Ok(seeds)
    }
}

// ============================================================================
// Last.fm payload types
// ============================================================================

/// Last.fm collapses single-element lists into a bare object, and empty lists
/// sometimes into a whitespace string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
    Blank(String),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Result<Vec<T>, FetchError> {
        match self {
            OneOrMany::Many(items) => Ok(items),
            OneOrMany::One(item) => Ok(vec![item]),
            OneOrMany::Blank(s) if s.trim().is_empty() => Ok(Vec::new()),
            OneOrMany::Blank(s) => Err(FetchError::Malformed(format!(
                "expected a track list, got string {:?}",
                s
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatchScore {
    Number(f64),
    Text(String),
}

impl MatchScore {
    fn value(&self) -> f64 {
        match self {
            MatchScore::Number(n) => *n,
            MatchScore::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SimilarTracksResponse {
    similartracks: Option<SimilarTracks>,
}

#[derive(Debug, Deserialize)]
struct SimilarTracks {
    track: Option<OneOrMany<SimilarTrack>>,
}

#[derive(Debug, Deserialize)]
struct SimilarTrack {
    name: String,
    artist: NamedArtist,
    #[serde(default, rename = "match")]
    match_score: Option<MatchScore>,
}

#[derive(Debug, Deserialize)]
struct NamedArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RecentTracksResponse {
    recenttracks: RecentTracks,
}

#[derive(Debug, Deserialize)]
struct RecentTracks {
    track: Option<OneOrMany<RecentTrack>>,
}

#[derive(Debug, Deserialize)]
struct RecentTrack {
    name: String,
    artist: TextField,
    #[serde(default)]
    date: Option<PlayedDate>,
    #[serde(default, rename = "@attr")]
    attr: Option<RecentTrackAttr>,
}

#[derive(Debug, Deserialize)]
struct TextField {
    #[serde(rename = "#text")]
    text: String,
}

#[derive(Debug, Deserialize)]
struct PlayedDate {
    uts: String,
}

#[derive(Debug, Deserialize)]
struct RecentTrackAttr {
    #[serde(default)]
    nowplaying: Option<String>,
}

impl From<SimilarTrack> for CandidateRecommendation {
    fn from(track: SimilarTrack) -> Self {
        CandidateRecommendation {
            artist: track.artist.name,
            title: track.name,
            match_score: track.match_score.map(|m| m.value()).unwrap_or(0.0),
        }
    }
}

impl From<RecentTrack> for SeedTrack {
    fn from(track: RecentTrack) -> Self {
        let now_playing = track
            .attr
            .and_then(|a| a.nowplaying)
            .is_some_and(|v| v == "true");

        let played_at = if now_playing {
            Some(PlayedAt::NowPlaying)
        } else {
            track
                .date
                .and_then(|d| d.uts.parse::<i64>().ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(PlayedAt::At)
        };

        SeedTrack {
            artist: track.artist.text,
            title: track.name,
            played_at,
        }
    }
}

fn provider_error(payload: &Value) -> Option<FetchError> {
    let code = payload.get("error")?.as_i64()?;
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(FetchError::Provider { code, message })
}

fn parse_similar_tracks(payload: Value) -> Result<Vec<CandidateRecommendation>, FetchError> {
    let response: SimilarTracksResponse = serde_json::from_value(payload)
        .map_err(|e| FetchError::Malformed(format!("similar tracks: {}", e)))?;

    let tracks = match response.similartracks.and_then(|s| s.track) {
        Some(tracks) => tracks.into_vec()?,
        None => Vec::new(),
    };

    Ok(tracks.into_iter().map(CandidateRecommendation::from).collect())
}

fn parse_recent_tracks(payload: Value) -> Result<Vec<SeedTrack>, FetchError> {
    let response: RecentTracksResponse = serde_json::from_value(payload)
        .map_err(|e| FetchError::Malformed(format!("recent tracks: {}", e)))?;

    let tracks = match response.recenttracks.track {
        Some(tracks) => tracks.into_vec()?,
        None => Vec::new(),
    };

    Ok(tracks.into_iter().map(SeedTrack::from).collect())
}
