//! Print an article's normalized body

use anyhow::Result;

use crate::Blog;

pub fn run(blog: &Blog, slug: &str, full_page: bool) -> Result<()> {
    let html = if full_page {
        blog.article_page(slug)?
    } else {
        blog.article_body(slug)?
    };
    match html {
        Some(html) => {
            println!("{}", html);
            Ok(())
        }
        None => anyhow::bail!("No live article with slug {:?}", slug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_slug_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        assert!(run(&blog, "missing", false).is_err());
    }
}
