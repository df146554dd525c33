use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use trackmix::{
    error::FetchError,
    models::{CandidateRecommendation, SeedTrack},
    routes::{create_router, AppState},
    services::{
        providers::{SeedSource, SimilarityClient},
        recommendations::RunDefaults,
    },
};

struct FixedSimilarity;

#[async_trait::async_trait]
impl SimilarityClient for FixedSimilarity {
    async fn fetch_similar(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<Vec<CandidateRecommendation>, FetchError> {
        match (artist, title) {
            ("Artist1", "Song1") => Ok(vec![
                CandidateRecommendation::new("Artist2", "Song2", 0.5),
                CandidateRecommendation::new("Artist3", "Song3", 0.2),
            ]),
            ("B", "Y") => Ok(vec![CandidateRecommendation::new("C", "Z", 0.9)]),
            ("Broken", _) => Err(FetchError::Status {
                status: 500,
                body: "upstream exploded".to_string(),
            }),
            _ => Ok(vec![]),
        }
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

struct FixedHistory(Result<Vec<SeedTrack>, ()>);

#[async_trait::async_trait]
impl SeedSource for FixedHistory {
    async fn recent_tracks(&self, _limit: u32) -> Result<Vec<SeedTrack>, FetchError> {
        self.0.clone().map_err(|_| FetchError::Provider {
            code: 6,
            message: "User not found".to_string(),
        })
    }
}

fn create_test_server_with_history(history: Result<Vec<SeedTrack>, ()>) -> TestServer {
    let state = Arc::new(AppState::new(
        Arc::new(FixedSimilarity),
        Arc::new(FixedHistory(history)),
        RunDefaults {
            concurrency: 2,
            threshold: 0.3,
            seed_limit: 10,
        },
    ));
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with_history(Ok(vec![
        SeedTrack::new("Artist1", "Song1"),
        SeedTrack::new("B", "Y"),
    ]))
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_recommendations_from_explicit_seeds() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "seeds": [{ "artist": "Artist1", "title": "Song1" }]
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["recommendations"][0]["artist"], "Artist2");
    assert_eq!(body["recommendations"][0]["title"], "Song2");
    assert_eq!(body["recommendations"][0]["match_score"], 0.5);
    assert_eq!(body["failed_seeds"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_recommendations_from_listening_history() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["recommendations"][0]["artist"], "C");
    assert_eq!(body["recommendations"][1]["artist"], "Artist2");
}

#[tokio::test]
async fn test_failed_seed_reported_without_failing_request() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "seeds": [
                { "artist": "Broken", "title": "X" },
                { "artist": "B", "title": "Y" }
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["recommendations"][0]["title"], "Z");
    assert_eq!(body["failed_seeds"][0]["artist"], "Broken");
    assert!(body["failed_seeds"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("500"));
}

#[tokio::test]
async fn test_threshold_and_limit_overrides() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "threshold": 0.0, "limit": 2 }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["recommendations"][0]["match_score"], 0.9);
    assert_eq!(body["recommendations"][1]["match_score"], 0.5);
}

#[tokio::test]
async fn test_zero_concurrency_rejected() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "concurrency": 0 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("concurrency"));
}

#[tokio::test]
async fn test_threshold_out_of_range_rejected() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "threshold": 1.5 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_failure_is_bad_gateway() {
    let server = create_test_server_with_history(Err(()));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("client-trace-42"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), "client-trace-42");
}
