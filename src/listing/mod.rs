//! Listing engine - search, category filter, sort and pagination over posts
//!
//! [`compute_page`] is a pure function of the post collection and a
//! [`FilterState`]; it never looks at request or URL state itself.

mod collate;
mod state;
mod stats;

use serde::Serialize;
use std::cmp::Ordering;

pub use collate::locale_cmp;
pub use state::{FilterState, ListingParams, SortKey};
pub use stats::{count_by_category, BlogStatistics, TOP_CATEGORIES};

use crate::content::PostSummary;

/// One page of a filtered, sorted listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPage {
    /// Posts on the current page
    pub items: Vec<PostSummary>,
    /// Number of posts after filtering
    pub total_count: usize,
    /// `ceil(total_count / page_size)`; 0 for an empty result
    pub total_pages: usize,
    /// Page actually shown, after clamping
    pub page: usize,
}

impl ResultPage {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Pages to offer in a paginator (always at least one)
    pub fn display_pages(&self) -> usize {
        self.total_pages.max(1)
    }
}

/// Filter, sort and paginate `posts` according to `state`
pub fn compute_page(posts: &[PostSummary], state: &FilterState, page_size: usize) -> ResultPage {
    let page_size = page_size.max(1);

    let query = state.search_query.trim().to_lowercase();
    let mut filtered: Vec<&PostSummary> = posts
        .iter()
        .filter(|p| matches_search(p, &query))
        .filter(|p| matches_category(p, &state.category_filter))
        .collect();

    // `sort_by` is stable, so ties keep their input order
    filtered.sort_by(|a, b| compare(a, b, state.sort_key));

    let total_count = filtered.len();
    let total_pages = total_count.div_ceil(page_size);
    let page = state.page.clamp(1, total_pages.max(1));

    let start = ((page - 1) * page_size).min(total_count);
    let end = (page * page_size).min(total_count);
    let items = filtered[start..end].iter().map(|p| (*p).clone()).collect();

    tracing::debug!(
        "Listing: {} of {} posts match, page {}/{}",
        total_count,
        posts.len(),
        page,
        total_pages
    );

    ResultPage {
        items,
        total_count,
        total_pages,
        page,
    }
}

/// Case-insensitive substring match on title or category.
/// `query` must already be trimmed and lower-cased; empty matches everything.
fn matches_search(post: &PostSummary, query: &str) -> bool {
    query.is_empty()
        || post.title.to_lowercase().contains(query)
        || post.category.to_lowercase().contains(query)
}

/// Exact, case-sensitive match against the catalog's category name
fn matches_category(post: &PostSummary, category: &str) -> bool {
    category.is_empty() || post.category == category
}

fn compare(a: &PostSummary, b: &PostSummary, key: SortKey) -> Ordering {
    match key {
        SortKey::Newest => b.published_at.cmp(&a.published_at),
        SortKey::Oldest => a.published_at.cmp(&b.published_at),
        SortKey::TitleAsc => locale_cmp(&a.title, &b.title),
        SortKey::TitleDesc => locale_cmp(&b.title, &a.title),
    }
}
