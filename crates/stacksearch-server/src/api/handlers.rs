//! Route handlers

use std::collections::HashMap;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Json;
use serde_json::Value;
use stacksearch_core::SearchResponse;
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;

/// Liveness probe
pub async fn homepage() -> Json<Value> {
    Json(serde_json::json!({ "test": "Working!" }))
}

// ============================================================================
// SEARCH PARAMETERS
// ============================================================================

/// Validated `/getsearchresults` parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub num_results: usize,
}

impl SearchParams {
    /// Read parameters from a JSON object body
    pub fn from_json(body: &Value) -> Result<Self, ApiError> {
        let object = body
            .as_object()
            .ok_or_else(|| ApiError::BadRequest("JSON body must be an object".to_string()))?;

        let query = match object.get("query") {
            Some(Value::String(query)) => query.clone(),
            Some(_) => return Err(ApiError::BadRequest("'query' must be a string".to_string())),
            None => return Err(missing("query")),
        };
        let num_results = match object.get("num_results") {
            Some(value) => parse_num_results(value)?,
            None => return Err(missing("num_results")),
        };

        Ok(Self { query, num_results })
    }

    /// Read parameters from the URL query string
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, ApiError> {
        let query = params.get("query").cloned().ok_or_else(|| missing("query"))?;
        let num_results = params
            .get("num_results")
            .ok_or_else(|| missing("num_results"))
            .and_then(|raw| parse_count(raw))?;

        Ok(Self { query, num_results })
    }
}

fn missing(name: &str) -> ApiError {
    ApiError::BadRequest(format!("missing required parameter '{}'", name))
}

/// Accept a non-negative integer as a JSON number or a numeric string
fn parse_num_results(value: &Value) -> Result<usize, ApiError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid_count(&n.to_string())),
        Value::String(raw) => parse_count(raw),
        other => Err(invalid_count(&other.to_string())),
    }
}

fn parse_count(raw: &str) -> Result<usize, ApiError> {
    raw.trim().parse::<usize>().map_err(|_| invalid_count(raw))
}

fn invalid_count(raw: &str) -> ApiError {
    ApiError::BadRequest(format!(
        "'num_results' must be a non-negative integer, got '{}'",
        raw
    ))
}

// ============================================================================
// SEARCH
// ============================================================================

/// Ranked results and predicted tags for a query
///
/// A non-empty body is parsed as JSON and takes precedence over the query
/// string.
pub async fn get_search_results(
    State(state): State<AppState>,
    Query(query_string): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        SearchParams::from_query(&query_string)?
    } else {
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))?;
        SearchParams::from_json(&value)?
    };

    let request_id = Uuid::new_v4();
    let span = info_span!("search", %request_id, num_results = params.num_results);
    run_search(state, params).instrument(span).await.map(Json)
}

async fn run_search(state: AppState, params: SearchParams) -> Result<SearchResponse, ApiError> {
    let started = Instant::now();
    let engine = state.engine.clone();
    let span = Span::current();

    let SearchParams { query, num_results } = params;
    let response = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        engine.search(&query, num_results)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("search task failed: {}", e)))?;

    info!(
        results = response.results.len(),
        tags = response.tags.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Search served"
    );
    Ok(response)
}

// ============================================================================
// TESTS
// ============================================================================
