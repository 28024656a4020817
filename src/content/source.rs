//! The content source contract
//!
//! A content source is an opaque catalog: it answers equality queries over
//! post records and hands back the ordered blocks of a post. It has no
//! full-text search; searching happens over the fetched set.

use super::{Block, Category, PostRecord, SitePage, Status};
use crate::error::SourceResult;

/// Equality filter for [`ContentSource::query_published`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub status: Status,
    pub category: Option<String>,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            status: Status::Live,
            category: None,
        }
    }
}

impl PostFilter {
    /// Live posts in one category
    pub fn category(name: &str) -> Self {
        Self {
            category: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, post: &PostRecord) -> bool {
        post.status == self.status
            && self
                .category
                .as_deref()
                .map_or(true, |c| post.category == c)
    }
}

/// Catalog of published content
pub trait ContentSource: Send + Sync {
    /// All posts matching the filter, in catalog order
    fn query_published(&self, filter: &PostFilter) -> SourceResult<Vec<PostRecord>>;

    /// The first live post with the given slug
    fn query_by_slug(&self, slug: &str) -> SourceResult<Option<PostRecord>>;

    /// The category catalog
    fn list_categories(&self) -> SourceResult<Vec<Category>>;

    /// Ordered blocks of a post
    fn get_content_blocks(&self, id: &str) -> SourceResult<Vec<Block>>;

    /// A standalone page by name; sources without pages have none
    fn get_page(&self, _name: &str) -> SourceResult<Option<SitePage>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_filter_matches_status_and_category() {
        let mut post = PostRecord::new("1", "T", Utc::now());
        post.category = "History".to_string();

        assert!(PostFilter::default().matches(&post));
        assert!(PostFilter::category("History").matches(&post));
        assert!(!PostFilter::category("history").matches(&post));

        post.status = Status::Draft;
        assert!(!PostFilter::default().matches(&post));
    }
}
