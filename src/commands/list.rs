//! List site content

use anyhow::Result;

use crate::content::PostFilter;
use crate::listing::{compute_page, FilterState};
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = blog.post_summaries(&PostFilter::default())?;
            let page = compute_page(&posts, &FilterState::default(), posts.len().max(1));
            println!("Posts ({}):", page.total_count);
            for post in page.items {
                println!(
                    "  {} - {} [{}]",
                    post.published_at.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        "category" | "categories" => {
            let categories = blog.category_counts()?;
            println!("Categories ({}):", categories.len());
            for (category, count) in categories {
                println!("  {} ({})", category.name, count);
            }
        }
        "stats" | "statistics" => {
            let stats = blog.statistics()?;
            println!("Posts: {}", stats.total_posts);
            println!("Categories: {}", stats.total_categories);
            if let Some(newest) = &stats.newest {
                println!(
                    "Newest: {} ({})",
                    newest.title,
                    newest.published_at.format("%Y-%m-%d")
                );
            }
            for (category, count) in &stats.top_categories {
                println!("  {} ({})", category.name, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category, stats",
                content_type
            );
        }
    }

    Ok(())
}
