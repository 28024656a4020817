//! notion-blog: a blog front-end over a Notion-style content catalog
//!
//! Posts, categories and content blocks come from a [`content::ContentSource`].
//! The listing engine filters, sorts and paginates them; block bodies are
//! rendered to exported markup and repaired by the markup normalizer before
//! they reach the Tera templates.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod listing;
pub mod markup;
pub mod pages;
pub mod search;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cache::RenderCache;
use config::SiteConfig;
use content::{Category, ContentSource, FileSource, PostFilter, PostSummary};
use error::SourceResult;
use listing::{count_by_category, BlogStatistics, FilterState};
use pages::{ListingView, PageBuilder, SEARCH_ERROR_MESSAGE};
use search::SearchResult;

/// The blog application
pub struct Blog {
    /// Site configuration
    pub config: SiteConfig,
    /// Site directory holding `_config.yml`
    pub base_dir: PathBuf,
    source: Arc<dyn ContentSource>,
    pages: PageBuilder,
    cache: RenderCache,
}

impl Blog {
    /// Open the site in `base_dir`, reading content from its content directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = SiteConfig::load_from_dir(&base_dir)?;
        let source = FileSource::new(config.content_path(&base_dir));
        Self::with_source(config, base_dir, Arc::new(source))
    }

    /// Build a blog over any content source
    pub fn with_source(
        config: SiteConfig,
        base_dir: PathBuf,
        source: Arc<dyn ContentSource>,
    ) -> Result<Self> {
        let cache = RenderCache::with_capacity(
            Duration::from_secs(config.revalidate_secs),
            config.cache_max_entries,
        );
        let pages = PageBuilder::new(config.clone())?;
        Ok(Self {
            config,
            base_dir,
            source,
            pages,
            cache,
        })
    }

    pub fn source(&self) -> &dyn ContentSource {
        self.source.as_ref()
    }

    pub fn pages(&self) -> &PageBuilder {
        &self.pages
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn content_dir(&self) -> PathBuf {
        self.config.content_path(&self.base_dir)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.config.static_path(&self.base_dir)
    }

    /// Serve `key` from the render cache, or render it. Misses (`None`) are
    /// not cached.
    pub fn cached<F>(&self, key: &str, render: F) -> Result<Option<String>>
    where
        F: FnOnce(&Self) -> Result<Option<String>>,
    {
        self.cache.get_or_render(key, || render(self))
    }

    /// Live posts projected onto the listing model
    pub fn post_summaries(&self, filter: &PostFilter) -> SourceResult<Vec<PostSummary>> {
        Ok(self
            .source
            .query_published(filter)?
            .iter()
            .map(|p| p.summary())
            .collect())
    }

    /// Every catalog category with its number of live posts
    pub fn category_counts(&self) -> SourceResult<Vec<(Category, usize)>> {
        let posts = self.post_summaries(&PostFilter::default())?;
        Ok(count_by_category(&posts, self.source.list_categories()?))
    }

    /// Totals, newest post and busiest categories over live posts
    pub fn statistics(&self) -> SourceResult<BlogStatistics> {
        let posts = self.post_summaries(&PostFilter::default())?;
        let counts = count_by_category(&posts, self.source.list_categories()?);
        Ok(BlogStatistics::compute(&posts, &counts))
    }

    /// The home feed
    pub fn home_page(&self, state: &FilterState) -> Result<String> {
        let posts = self.post_summaries(&PostFilter::default())?;
        let categories = self.source.list_categories()?;
        self.pages
            .listing(&posts, &categories, state, &ListingView::home(&self.config))
    }

    pub fn categories_page(&self) -> Result<String> {
        let posts = self.post_summaries(&PostFilter::default())?;
        let counts = count_by_category(&posts, self.source.list_categories()?);
        let stats = BlogStatistics::compute(&posts, &counts);
        self.pages.categories(&counts, &stats)
    }

    /// The about page, from the `about` site page when the source has one
    pub fn about_page(&self) -> Result<String> {
        let page = self.source.get_page("about")?;
        self.pages.about(page.as_ref())
    }

    /// A category's listing, or `None` when the category has no live posts
    pub fn category_page(&self, name: &str, state: &FilterState) -> Result<Option<String>> {
        let posts = self.post_summaries(&PostFilter::category(name))?;
        if posts.is_empty() {
            tracing::debug!("No posts in category {:?}", name);
            return Ok(None);
        }
        let category = self
            .source
            .list_categories()?
            .into_iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| Category::new(name, "gray"));

        // The category is fixed by the path, not by the query
        let state = FilterState {
            category_filter: String::new(),
            ..state.clone()
        };
        let html = self
            .pages
            .listing(&posts, &[], &state, &ListingView::category(&category))?;
        Ok(Some(html))
    }

    /// Full article page, or `None` for an unknown slug
    pub fn article_page(&self, slug: &str) -> Result<Option<String>> {
        let Some(post) = self.source.query_by_slug(slug)? else {
            return Ok(None);
        };
        let blocks = self.source.get_content_blocks(&post.id)?;
        Ok(Some(self.pages.article(&post, &blocks)?))
    }

    /// Normalized article body alone, or `None` for an unknown slug
    pub fn article_body(&self, slug: &str) -> Result<Option<String>> {
        let Some(post) = self.source.query_by_slug(slug)? else {
            return Ok(None);
        };
        let blocks = self.source.get_content_blocks(&post.id)?;
        Ok(Some(self.pages.article_body(&blocks)))
    }

    pub fn search(&self, query: &str) -> SourceResult<Vec<SearchResult>> {
        search::search_posts(self.source.as_ref(), query)
    }

    /// Search results page; a failing source renders an error notice
    pub fn search_page(&self, query: &str) -> Result<String> {
        let query = query.trim();
        match self.search(query) {
            Ok(results) => self.pages.search(query, &results, None),
            Err(e) => {
                tracing::error!("Search for {:?} failed: {}", query, e);
                self.pages.search(query, &[], Some(SEARCH_ERROR_MESSAGE))
            }
        }
    }

    pub fn not_found_page(&self, message: &str) -> Result<String> {
        self.pages.not_found(message)
    }
}
