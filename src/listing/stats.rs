//! Catalog statistics for the category index

use crate::content::{Category, PostSummary};

/// How many categories the "popular" strip shows
pub const TOP_CATEGORIES: usize = 5;

/// Totals, the newest post and the busiest categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogStatistics {
    pub total_posts: usize,
    pub total_categories: usize,
    pub newest: Option<PostSummary>,
    /// Categories with at least one post, busiest first
    pub top_categories: Vec<(Category, usize)>,
}

impl BlogStatistics {
    pub fn compute(posts: &[PostSummary], counts: &[(Category, usize)]) -> Self {
        // first post wins a tie on date
        let newest = posts.iter().fold(None::<&PostSummary>, |best, post| match best {
            Some(b) if b.published_at >= post.published_at => Some(b),
            _ => Some(post),
        });

        let mut top: Vec<(Category, usize)> = counts
            .iter()
            .filter(|(_, count)| *count > 0)
            .cloned()
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1));
        top.truncate(TOP_CATEGORIES);

        Self {
            total_posts: posts.len(),
            total_categories: counts.len(),
            newest: newest.cloned(),
            top_categories: top,
        }
    }
}

/// Pair every category with its number of posts, in catalog order
pub fn count_by_category(
    posts: &[PostSummary],
    categories: Vec<Category>,
) -> Vec<(Category, usize)> {
    categories
        .into_iter()
        .map(|c| {
            let count = posts.iter().filter(|p| p.category == c.name).count();
            (c, count)
        })
        .collect()
}
