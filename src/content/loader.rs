//! File-backed content source
//!
//! Layout of a content directory:
//!
//! ```text
//! content/
//!   categories.yml      # [{ name, color, id? }]
//!   posts/**/*.md       # front-matter + markdown body
//!   pages/<name>.md     # standalone pages (about)
//! ```
//!
//! Every query walks the directory again, so edits show up without a restart.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{
    Block, BlockParser, Category, ContentSource, FrontMatter, PostFilter, PostRecord, SitePage,
    Status,
};
use crate::error::{SourceError, SourceResult};

/// A post file that has been read and parsed
struct LoadedPost {
    record: PostRecord,
    path: PathBuf,
}

/// Content source reading posts and categories from disk
pub struct FileSource {
    root: PathBuf,
    parser: BlockParser,
}

impl FileSource {
    /// Create a source rooted at a content directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            parser: BlockParser::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.root.join("posts")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.root.join("categories.yml")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    /// Load every post file regardless of status, in file-name order
    fn load_all(&self) -> SourceResult<Vec<LoadedPost>> {
        let posts_dir = self.posts_dir();
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            match self.load_post(path) {
                Ok(record) => posts.push(LoadedPost {
                    record,
                    path: path.to_path_buf(),
                }),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        tracing::debug!("Loaded {} post files from {:?}", posts.len(), posts_dir);
        Ok(posts)
    }

    /// Read a post file's record (body not parsed)
    fn load_post(&self, path: &Path) -> SourceResult<PostRecord> {
        let content = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
        let (fm, _) =
            FrontMatter::parse(&content).map_err(|e| SourceError::front_matter(path, e))?;

        let file_modified = fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        let published_at = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Utc::now));
        let created_at = fm.parse_created().unwrap_or(published_at);

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let status = match fm.status.as_deref() {
            Some(s) => s
                .parse::<Status>()
                .map_err(|e| SourceError::front_matter(path, e))?,
            None => Status::Live,
        };

        Ok(PostRecord {
            id: fm.id.clone().unwrap_or_else(|| stem.clone()),
            title: fm.title.clone().unwrap_or_default(),
            slug: fm
                .slug
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| slug::slugify(&stem)),
            category: fm.primary_category().unwrap_or_default().to_string(),
            status,
            published_at,
            created_at,
            description: fm.description.clone(),
        })
    }
}

impl ContentSource for FileSource {
    fn query_published(&self, filter: &PostFilter) -> SourceResult<Vec<PostRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|p| p.record)
            .filter(|r| filter.matches(r))
            .collect())
    }

    fn query_by_slug(&self, slug: &str) -> SourceResult<Option<PostRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|p| p.record)
            .find(|r| r.status == Status::Live && r.slug == slug))
    }

    fn list_categories(&self) -> SourceResult<Vec<Category>> {
        let path = self.categories_file();
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| SourceError::io(&path, e))?;
            let mut categories: Vec<Category> = serde_yaml::from_str(&content)
                .map_err(|source| SourceError::Yaml {
                    path: path.clone(),
                    source,
                })?;
            for category in &mut categories {
                if category.id.is_empty() {
                    category.id = slug::slugify(&category.name);
                }
            }
            return Ok(categories);
        }

        // No catalog file: derive one from the posts themselves
        let mut names = indexmap::IndexSet::new();
        for post in self.query_published(&PostFilter::default())? {
            if !post.category.is_empty() {
                names.insert(post.category);
            }
        }
        Ok(names.iter().map(|n| Category::new(n, "gray")).collect())
    }

    fn get_content_blocks(&self, id: &str) -> SourceResult<Vec<Block>> {
        let post = self
            .load_all()?
            .into_iter()
            .find(|p| p.record.id == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;

        let content = fs::read_to_string(&post.path).map_err(|e| SourceError::io(&post.path, e))?;
        let (_, body) = FrontMatter::parse(&content)
            .map_err(|e| SourceError::front_matter(&post.path, e))?;

        Ok(self.parser.parse(body, id))
    }

    fn get_page(&self, name: &str) -> SourceResult<Option<SitePage>> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Ok(None);
        }
        let path = self.pages_dir().join(format!("{}.md", name));
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| SourceError::io(&path, e))?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| SourceError::front_matter(&path, e))?;
        Ok(Some(SitePage {
            name: name.to_string(),
            title: fm.title.clone().filter(|t| !t.trim().is_empty()),
            description: fm.description.clone(),
            blocks: self.parser.parse(body, name),
        }))
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "posts/zeta.md",
            "---\ntitle: Zeta\ncategory: X\ndate: 2024-01-01\n---\nZeta body\n",
        );
        write(
            tmp.path(),
            "posts/alpha.md",
            "---\ntitle: Alpha\nslug: alpha-post\ncategory: Y\ndate: 2024-06-01\ndescription: First letter\n---\n- one\n- two\n",
        );
        write(
            tmp.path(),
            "posts/draft.md",
            "---\ntitle: Draft\ncategory: X\nstatus: Draft\n---\nNot yet\n",
        );
        write(tmp.path(), "posts/notes.txt", "ignored");
        tmp
    }

    #[test]
    fn test_query_published_skips_drafts() {
        let tmp = fixture();
        let source = FileSource::new(tmp.path());
        let posts = source.query_published(&PostFilter::default()).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_query_by_category() {
        let tmp = fixture();
        let source = FileSource::new(tmp.path());
        let posts = source.query_published(&PostFilter::category("X")).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Zeta");
    }

    #[test]
    fn test_query_by_slug() {
        let tmp = fixture();
        let source = FileSource::new(tmp.path());
        let post = source.query_by_slug("alpha-post").unwrap().unwrap();
        assert_eq!(post.id, "alpha");
        assert_eq!(post.description.as_deref(), Some("First letter"));
        assert!(source.query_by_slug("zeta").unwrap().is_some());
        assert!(source.query_by_slug("draft").unwrap().is_none());
        assert!(source.query_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_content_blocks() {
        let tmp = fixture();
        let source = FileSource::new(tmp.path());
        let blocks = source.get_content_blocks("alpha").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].type_name(), "bulleted_list_item");
        assert_eq!(blocks[0].id, "alpha-1");

        assert!(matches!(
            source.get_content_blocks("nope"),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_categories_from_file_or_posts() {
        let tmp = fixture();
        let source = FileSource::new(tmp.path());
        let derived = source.list_categories().unwrap();
        let names: Vec<_> = derived.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Y", "X"]);

        write(
            tmp.path(),
            "categories.yml",
            "- name: History\n  color: blue\n- name: Spirit Teachings\n",
        );
        let listed = source.list_categories().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "history");
        assert_eq!(listed[1].color, "gray");
    }

    #[test]
    fn test_missing_posts_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let source = FileSource::new(tmp.path());
        assert!(source
            .query_published(&PostFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_standalone_pages() {
        let tmp = fixture();
        let source = FileSource::new(tmp.path());
        assert_eq!(source.get_page("about").unwrap(), None);

        write(
            tmp.path(),
            "pages/about.md",
            "---\ntitle: About Us\n---\nWe write things.\n\n## Mission\n",
        );
        let page = source.get_page("about").unwrap().unwrap();
        assert_eq!(page.title.as_deref(), Some("About Us"));
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].id, "about-1");

        assert_eq!(source.get_page("../posts/zeta").unwrap(), None);
    }
}
