//! JSON endpoints: search and cache revalidation

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::pages::SearchParams;
use super::AppState;
use crate::search::SearchResult;

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RevalidateParams {
    pub secret: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
struct RevalidateResponse {
    revalidated: bool,
    path: String,
    message: String,
    timestamp: DateTime<Utc>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// `GET /api/search?q=`
pub async fn search(State(blog): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default();
    let outcome = tokio::task::spawn_blocking(move || blog.search(&query)).await;
    match outcome {
        Ok(Ok(results)) => Json(SearchResponse { results }).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Search failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to perform search")
        }
        Err(e) => {
            tracing::error!("Search task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to perform search")
        }
    }
}

/// `GET /api/revalidate?secret=&path=`
pub async fn revalidate(
    State(blog): State<AppState>,
    Query(params): Query<RevalidateParams>,
) -> Response {
    let expected = blog
        .config
        .revalidation_secret
        .as_deref()
        .filter(|s| !s.is_empty());
    match (expected, params.secret.as_deref()) {
        (Some(expected), Some(given)) if expected == given => {}
        _ => {
            tracing::warn!("Rejected revalidation request with an invalid token");
            return error_response(StatusCode::UNAUTHORIZED, "Invalid token");
        }
    }

    let path = params
        .path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "/".to_string());
    blog.cache().invalidate(&path);

    Json(RevalidateResponse {
        revalidated: true,
        message: format!("Revalidated path: {}", path),
        path,
        timestamp: Utc::now(),
    })
    .into_response()
}
