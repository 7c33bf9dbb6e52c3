//! HTTP Journey
//!
//! Load artifacts from disk, build the real router, and drive it the way the
//! web frontend does.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use stacksearch_e2e_tests::TestArtifactDir;
use stacksearch_server::{build_router, ServerConfig};
use tower::ServiceExt;

async fn call(dir: &TestArtifactDir, request: Request<Body>) -> (StatusCode, Value) {
    let engine = Arc::new(dir.load_engine());
    let app = build_router(engine, &ServerConfig::default());

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_liveness() {
    let dir = TestArtifactDir::new_temp();
    let (status, body) = call(&dir, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["test"], "Working!");
}

#[tokio::test]
async fn test_search_response_shape() {
    let dir = TestArtifactDir::new_temp();
    let (status, body) = call(&dir, get("/getsearchresults?query=python%20test%20query&num_results=2")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["tags"], serde_json::json!(["python"]));
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    for result in results {
        let object = result.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["body", "similarity_score", "title", "url", "votes"]);
        assert!(result["similarity_score"].as_str().unwrap().len() <= 5);
        assert_eq!(result["votes"], "12");
    }
    assert_eq!(results[0]["title"], "Best match");
    assert_eq!(results[0]["url"], "https://stackoverflow.com/questions/0");
}

#[tokio::test]
async fn test_json_body_request() {
    let dir = TestArtifactDir::new_temp();
    let request = Request::builder()
        .method("POST")
        .uri("/getsearchresults")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query": "test query", "num_results": 3}"#))
        .unwrap();

    let (status, body) = call(&dir, request).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Best match", "Middle match", "Weak match"]);
}

#[tokio::test]
async fn test_caller_errors() {
    let dir = TestArtifactDir::new_temp();

    let (status, body) = call(&dir, get("/getsearchresults?num_results=2")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(&dir, get("/getsearchresults?query=test&num_results=two")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("num_results"));
}
