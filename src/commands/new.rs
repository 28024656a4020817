//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Quote a front-matter value when YAML would otherwise misread it
fn yaml_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.contains(": ")
        || value.contains(" #")
        || value.starts_with(|c: char| "-?:,[]{}#&*!|>'\"%@`".contains(c))
        || value != value.trim();
    if needs_quotes {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_string()
    }
}

/// Write a new live post under the content directory and return its path
pub fn create_post(
    blog: &Blog,
    title: &str,
    category: Option<&str>,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) if !s.trim().is_empty() => slug::slugify(s),
        _ => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    let posts_dir = blog.content_dir().join("posts");
    fs::create_dir_all(&posts_dir)?;

    let file_path = posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let mut content = format!("---\ntitle: {}\nslug: {}\n", yaml_value(title), slug);
    if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
        content.push_str(&format!("category: {}\n", yaml_value(category.trim())));
    }
    content.push_str(&format!(
        "date: {}\nstatus: Live\ndescription: ''\n---\n",
        now.format("%Y-%m-%d %H:%M:%S")
    ));

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}
