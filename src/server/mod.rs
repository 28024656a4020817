//! HTTP server: pages, JSON endpoints, legacy redirects and static assets
//!
//! Rendered pages go through the blog's render cache. With watching enabled,
//! any change under the content directory clears the cache.

mod api;
mod pages;

use anyhow::Result;
use axum::{
    handler::Handler,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::Blog;

/// Shared handler state
pub type AppState = Arc<Blog>;

/// Error returned by page handlers, rendered as a plain 500
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Internal Server Error</h1>"),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Run blocking catalog work off the async runtime
pub(crate) async fn run_blocking<T, F>(blog: AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Blog) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&blog))
        .await?
        .map_err(AppError::from)
}

/// Build the application router
pub fn router(blog: AppState) -> Router {
    let static_files = ServeDir::new(blog.static_dir())
        .not_found_service(pages::not_found.with_state(blog.clone()));

    Router::new()
        .route("/", get(pages::home))
        .route("/categories", get(pages::categories))
        .route("/categories/:category", get(pages::category))
        .route("/article/:slug", get(pages::article))
        .route("/about", get(pages::about))
        .route("/search", get(pages::search))
        .route("/api/search", get(api::search))
        .route("/api/revalidate", get(api::revalidate))
        // Legacy blog URLs
        .route("/blog", get(pages::legacy_index))
        .route("/blog/:slug", get(pages::legacy_article))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(blog)
}

/// Start the server
pub async fn start(blog: Blog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let blog = Arc::new(blog);
    let app = router(blog.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Watching {:?} for content changes...", blog.content_dir());
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let watched = blog.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_content(watched) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the content directory and drop cached pages on change
fn watch_content(blog: AppState) -> Result<()> {
    let content_dir = blog.content_dir();
    if !content_dir.exists() {
        tracing::warn!("Content directory {:?} does not exist, not watching", content_dir);
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", content_dir);

    for result in rx {
        match result {
            Ok(events) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant_change(&e.path.to_string_lossy()))
                    .collect();
                if relevant.is_empty() {
                    continue;
                }
                for event in &relevant {
                    tracing::info!("Content changed: {}", event.path.display());
                }
                blog.cache().clear();
                tracing::info!("Render cache cleared");
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Editor droppings and VCS files don't count as content changes
fn is_relevant_change(path: &str) -> bool {
    !path.contains(".git")
        && !path.contains(".DS_Store")
        && !path.ends_with('~')
        && !path.ends_with(".swp")
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{Block, Category, ContentSource, FileSource, PostFilter, PostRecord};
    use crate::error::{SourceError, SourceResult};
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (TempDir, AppState) {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "content/posts/zeta.md",
            "---\ntitle: Zeta\ncategory: Spirit Teachings\ndate: 2024-01-01\n---\nZeta body\n",
        );
        write(
            tmp.path(),
            "content/posts/alpha.md",
            "---\ntitle: Alpha\ncategory: Y\ndate: 2024-06-01\n---\n- one\n- two\n",
        );
        write(tmp.path(), "static/css/site.css", "body { margin: 0; }");

        let config = SiteConfig {
            revalidation_secret: Some("s3cret".to_string()),
            ..Default::default()
        };
        let source = FileSource::new(config.content_path(tmp.path()));
        let blog = Blog::with_source(config, tmp.path().to_path_buf(), Arc::new(source)).unwrap();
        (tmp, Arc::new(blog))
    }

    async fn get_response(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_home_and_article() {
        let (_tmp, blog) = fixture();
        let response = get_response(router(blog.clone()), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(">Alpha<"));
        assert!(html.contains(">Zeta<"));

        let response = get_response(router(blog.clone()), "/article/alpha").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"<ul class="notion-list list-disc pl-5 my-2">"#));
        assert_eq!(blog.cache().stats().entries, 2);
    }

    #[tokio::test]
    async fn test_missing_pages_are_404() {
        let (_tmp, blog) = fixture();
        let response = get_response(router(blog.clone()), "/article/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("Article not found"));

        let response = get_response(router(blog.clone()), "/categories/y").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get_response(router(blog), "/no/such/page").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("404"));
    }

    #[tokio::test]
    async fn test_category_pages() {
        let (_tmp, blog) = fixture();
        let response = get_response(router(blog.clone()), "/categories/Spirit%20Teachings").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(">Zeta<"));
        assert!(!html.contains(">Alpha<"));

        let response = get_response(router(blog), "/categories").await;
        let html = body_string(response).await;
        assert!(html.contains(r#"href="/categories/Spirit%20Teachings""#));
    }

    #[tokio::test]
    async fn test_about_page() {
        let (tmp, blog) = fixture();
        let response = get_response(router(blog.clone()), "/about").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(">About Notion Blog</h1>"));
        assert!(html.contains(r#"href="/about""#));

        std::fs::create_dir_all(tmp.path().join("content/pages")).unwrap();
        std::fs::write(
            tmp.path().join("content/pages/about.md"),
            "---\ntitle: Who writes here\n---\nHello there.\n",
        )
        .unwrap();
        blog.cache().clear();
        let html = body_string(get_response(router(blog), "/about").await).await;
        assert!(html.contains(">Who writes here</h1>"));
        assert!(html.contains("Hello there."));
    }

    #[tokio::test]
    async fn test_legacy_redirects_are_permanent() {
        let (_tmp, blog) = fixture();
        let response = get_response(router(blog.clone()), "/blog").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = get_response(router(blog), "/blog/hello-world").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/article/hello-world");
    }

    #[tokio::test]
    async fn test_static_files() {
        let (_tmp, blog) = fixture();
        let response = get_response(router(blog), "/css/site.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "body { margin: 0; }");
    }

    #[tokio::test]
    async fn test_search_api() {
        let (_tmp, blog) = fixture();
        let response = get_response(router(blog.clone()), "/api/search?q=%20%20").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "results": [] }));

        let response = get_response(router(blog.clone()), "/api/search?q=ALPHA").await;
        let json = body_json(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["slug"], "alpha");
        assert_eq!(results[0]["category"], "Y");
        assert_eq!(results[0]["excerpt"], "No description available");

        let response = get_response(router(blog), "/search?q=zeta").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Found 1 result<"));
    }

    struct BrokenSource;

    impl ContentSource for BrokenSource {
        fn query_published(&self, _filter: &PostFilter) -> SourceResult<Vec<PostRecord>> {
            Err(SourceError::NotFound("catalog".to_string()))
        }

        fn query_by_slug(&self, _slug: &str) -> SourceResult<Option<PostRecord>> {
            Err(SourceError::NotFound("catalog".to_string()))
        }

        fn list_categories(&self) -> SourceResult<Vec<Category>> {
            Ok(Vec::new())
        }

        fn get_content_blocks(&self, id: &str) -> SourceResult<Vec<Block>> {
            Err(SourceError::NotFound(id.to_string()))
        }
    }

    #[tokio::test]
    async fn test_search_failure() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_source(
            SiteConfig::default(),
            tmp.path().to_path_buf(),
            Arc::new(BrokenSource),
        )
        .unwrap();
        let blog = Arc::new(blog);

        let response = get_response(router(blog.clone()), "/api/search?q=x").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to perform search" })
        );

        let response = get_response(router(blog.clone()), "/search?q=x").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Please try again."));

        let response = get_response(router(blog), "/").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_revalidate() {
        let (_tmp, blog) = fixture();
        get_response(router(blog.clone()), "/").await;
        get_response(router(blog.clone()), "/article/zeta").await;
        assert_eq!(blog.cache().stats().entries, 2);

        let response = get_response(router(blog.clone()), "/api/revalidate?secret=wrong").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Invalid token" })
        );
        let response = get_response(router(blog.clone()), "/api/revalidate").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = get_response(
            router(blog.clone()),
            "/api/revalidate?secret=s3cret&path=/article/zeta",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["revalidated"], true);
        assert_eq!(json["path"], "/article/zeta");
        assert_eq!(json["message"], "Revalidated path: /article/zeta");
        assert!(json["timestamp"].is_string());
        assert_eq!(blog.cache().stats().entries, 1);

        let response = get_response(router(blog.clone()), "/api/revalidate?secret=s3cret").await;
        assert_eq!(body_json(response).await["path"], "/");
        assert_eq!(blog.cache().stats().entries, 0);
    }

    #[tokio::test]
    async fn test_unconfigured_secret_rejects_everything() {
        let tmp = TempDir::new().unwrap();
        let blog = Arc::new(Blog::new(tmp.path()).unwrap());
        if blog.config.revalidation_secret.is_some() {
            // REVALIDATION_SECRET is set in the environment
            return;
        }
        let response = get_response(router(blog), "/api/revalidate?secret=").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_relevant_changes() {
        assert!(is_relevant_change("/site/content/posts/a.md"));
        assert!(!is_relevant_change("/site/content/.git/index"));
        assert!(!is_relevant_change("/site/content/posts/a.md~"));
        assert!(!is_relevant_change("/site/content/posts/.a.md.swp"));
    }
}
