//! Full-text search over the live catalog
//!
//! The content source only answers equality queries, so search fetches every
//! live post and filters the set in memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentSource, PostFilter, PostRecord};
use crate::error::SourceResult;

/// One search hit as returned by `/api/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub slug: String,
    /// When the post was created in the catalog
    pub date: DateTime<Utc>,
    pub category: String,
}

impl From<&PostRecord> for SearchResult {
    fn from(post: &PostRecord) -> Self {
        Self {
            id: post.id.clone(),
            title: post.display_title().to_string(),
            excerpt: post.display_description().to_string(),
            slug: post.slug.clone(),
            date: post.created_at,
            category: post.display_category().to_string(),
        }
    }
}

/// Text a query is matched against: title, description, category and slug
fn searchable_text(post: &PostRecord) -> String {
    format!(
        "{} {} {} {}",
        post.title,
        post.description.as_deref().unwrap_or(""),
        post.category,
        post.slug
    )
    .to_lowercase()
}

/// Whether `post` matches an already lower-cased, trimmed query
pub fn matches(post: &PostRecord, query: &str) -> bool {
    searchable_text(post).contains(query)
}

/// Search live posts for `query`; a blank query returns nothing and never
/// touches the source
pub fn search_posts(source: &dyn ContentSource, query: &str) -> SourceResult<Vec<SearchResult>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let posts = source.query_published(&PostFilter::default())?;
    let results: Vec<SearchResult> = posts
        .iter()
        .filter(|p| matches(p, &query))
        .map(SearchResult::from)
        .collect();

    tracing::debug!("Search {:?}: {} of {} posts", query, results.len(), posts.len());
    Ok(results)
}
