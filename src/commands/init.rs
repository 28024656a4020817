//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# notion-blog configuration

# Site
title: Notion Blog
description: 'Articles, notes and ideas'
author: John Doe
language: en
timezone: ''
url: http://localhost:4000

# Directories
content_dir: content
static_dir: static

# Listing
per_page: 9
excerpt_length: 150
date_format: MMMM D, YYYY

# Render cache lifetime in seconds (0 disables caching)
revalidate_secs: 60
cache_max_entries: 512

# Secret for /api/revalidate; REVALIDATION_SECRET overrides it
# revalidation_secret: change-me
"#;

const CATEGORIES_TEMPLATE: &str = r#"- name: General
  color: gray
- name: Notes
  color: blue
"#;

const ABOUT_TEMPLATE: &str = r#"---
title: About
description: Who writes here and why
---

Tell readers about yourself. This page lives in `content/pages/about.md`.
"#;

const STYLESHEET: &str = r#":root {
  --background: #ffffff;
  --foreground: #1f2937;
  --primary: #2563eb;
}

.notion-callout { display: flex; gap: 0.75rem; padding: 1rem; border-radius: 0.375rem; }
.notion-quote { border-left: 3px solid currentColor; padding-left: 1rem; }
.bg-gray-bg { background: #f1f1ef; }
.bg-blue-bg { background: #e7f3f8; }
.bg-yellow-bg { background: #fbf3db; }
.bg-green-bg { background: #edf3ec; }
.bg-red-bg { background: #fdebec; }
.bg-purple-bg { background: #f6f3f9; }
.bg-pink-bg { background: #faf1f5; }
.bg-brown-bg { background: #f4eeee; }
.bg-orange-bg { background: #faebdd; }
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?} exists", config_path);
    }

    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("content/pages"))?;
    fs::create_dir_all(target_dir.join("static/css"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(target_dir.join("content/categories.yml"), CATEGORIES_TEMPLATE)?;
    fs::write(target_dir.join("content/pages/about.md"), ABOUT_TEMPLATE)?;
    fs::write(target_dir.join("static/css/site.css"), STYLESHEET)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
category: General
date: {}
description: Your very first post
---

Welcome! Posts live in `content/posts` as markdown files with a YAML
front-matter block.

## Quick Start

- Create a post with `notion-blog new "My New Post"`
- Start the server with `notion-blog server`
- Search from the command line with `notion-blog search hello`

> [!TIP]
> Set `status: Draft` in the front-matter to keep a post off the site.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;

    Ok(())
}
