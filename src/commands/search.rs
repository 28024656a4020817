//! Search posts from the command line

use anyhow::Result;

use crate::Blog;

pub fn run(blog: &Blog, query: &str) -> Result<()> {
    let results = blog.search(query)?;
    println!(
        "Found {} result{} for {:?}:",
        results.len(),
        if results.len() == 1 { "" } else { "s" },
        query.trim()
    );
    for result in results {
        println!(
            "  {} - {} [{}] {}",
            result.date.format("%Y-%m-%d"),
            result.title,
            result.category,
            crate::helpers::article_path(&result.slug)
        );
    }
    Ok(())
}
