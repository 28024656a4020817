//! Page handlers

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::{run_blocking, AppError, AppState};
use crate::cache::cache_key;
use crate::helpers;
use crate::listing::{FilterState, ListingParams};
use crate::Blog;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

fn request_key(uri: &Uri) -> String {
    cache_key(uri.path(), uri.query())
}

/// The page, or the not-found page with a 404
fn page_or_not_found(blog: &Blog, page: Option<String>, message: &str) -> Result<Response> {
    Ok(match page {
        Some(html) => Html(html).into_response(),
        None => (StatusCode::NOT_FOUND, Html(blog.not_found_page(message)?)).into_response(),
    })
}

pub async fn home(
    State(blog): State<AppState>,
    uri: Uri,
    Query(params): Query<ListingParams>,
) -> Result<Response, AppError> {
    let state = FilterState::from(params);
    run_blocking(blog, move |b| {
        let page = b.cached(&request_key(&uri), |b| b.home_page(&state).map(Some))?;
        page_or_not_found(b, page, "Page not found")
    })
    .await
}

pub async fn categories(State(blog): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    run_blocking(blog, move |b| {
        let page = b.cached(&request_key(&uri), |b| b.categories_page().map(Some))?;
        page_or_not_found(b, page, "Page not found")
    })
    .await
}

pub async fn category(
    State(blog): State<AppState>,
    uri: Uri,
    Path(name): Path<String>,
    Query(params): Query<ListingParams>,
) -> Result<Response, AppError> {
    let state = FilterState::from(params);
    run_blocking(blog, move |b| {
        let page = b.cached(&request_key(&uri), |b| b.category_page(&name, &state))?;
        page_or_not_found(b, page, "Category not found")
    })
    .await
}

pub async fn article(
    State(blog): State<AppState>,
    uri: Uri,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    run_blocking(blog, move |b| {
        let page = b.cached(&request_key(&uri), |b| b.article_page(&slug))?;
        page_or_not_found(b, page, "Article not found")
    })
    .await
}

pub async fn about(State(blog): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    run_blocking(blog, move |b| {
        let page = b.cached(&request_key(&uri), |b| b.about_page().map(Some))?;
        page_or_not_found(b, page, "Page not found")
    })
    .await
}

/// Search results are never cached
pub async fn search(
    State(blog): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let query = params.q.unwrap_or_default();
    let html = run_blocking(blog, move |b| b.search_page(&query)).await?;
    Ok(Html(html))
}

/// Fallback for anything no route or static file answers
pub async fn not_found(State(blog): State<AppState>, uri: Uri) -> Response {
    tracing::debug!("Not found: {}", uri);
    match blog.not_found_page("Page not found") {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn legacy_index() -> Redirect {
    Redirect::permanent("/")
}

pub async fn legacy_article(Path(slug): Path<String>) -> Redirect {
    Redirect::permanent(&helpers::article_path(&slug))
}
