//! Page builder - turns catalog data into rendered HTML pages
//!
//! Every page shares a base context (site data, current path, canonical URL,
//! footer year). Article bodies go through the block renderer and then the
//! markup normalizer before they reach the template.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{Block, Category, PostRecord, PostSummary, SitePage};
use crate::helpers::{self, Helpers};
use crate::listing::{compute_page, BlogStatistics, FilterState, SortKey};
use crate::markup::{BlockRenderer, Normalizer};
use crate::search::SearchResult;
use crate::templates::{
    CategoryData, PostData, SearchResultData, SiteData, SortOption, StatisticsData,
    TemplateRenderer,
};

/// Message shown when the search endpoint fails
pub const SEARCH_ERROR_MESSAGE: &str = "Something went wrong while searching. Please try again.";

/// How a listing page presents itself
#[derive(Debug, Clone)]
pub struct ListingView {
    pub heading: String,
    pub subheading: Option<String>,
    /// Path the filter form and paginator link back to
    pub base_url: String,
    /// Whether the category dropdown is offered
    pub show_category_filter: bool,
}

impl ListingView {
    /// The home feed
    pub fn home(config: &SiteConfig) -> Self {
        Self {
            heading: config.title.clone(),
            subheading: (!config.description.is_empty()).then(|| config.description.clone()),
            base_url: "/".to_string(),
            show_category_filter: true,
        }
    }

    /// A single category's listing
    pub fn category(category: &Category) -> Self {
        Self {
            heading: category.name.clone(),
            subheading: Some("Browse all articles in this category".to_string()),
            base_url: category.path(),
            show_category_filter: false,
        }
    }
}

/// Page builder
pub struct PageBuilder {
    config: SiteConfig,
    helpers: Helpers,
    templates: TemplateRenderer,
    blocks: BlockRenderer,
    normalizer: Normalizer,
}

impl PageBuilder {
    pub fn new(config: SiteConfig) -> Result<Self> {
        Ok(Self {
            helpers: Helpers::new(config.clone()),
            templates: TemplateRenderer::new()?,
            blocks: BlockRenderer::new(),
            normalizer: Normalizer::default(),
            config,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    fn site_data(&self) -> SiteData {
        SiteData {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            author: self.config.author.clone(),
            url: self.config.url.clone(),
            language: self.config.language.clone(),
        }
    }

    fn base_context(&self, current_path: &str) -> Context {
        let now = Utc::now();
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("current_path", current_path);
        context.insert("canonical_url", &self.helpers.full_url_for(current_path));
        context.insert(
            "current_year",
            &helpers::format_in_timezone(&now, &self.config.timezone, "YYYY"),
        );
        context
    }

    fn post_data(
        &self,
        id: &str,
        title: &str,
        slug: &str,
        category: &str,
        description: &str,
        date: &DateTime<Utc>,
    ) -> PostData {
        PostData {
            id: id.to_string(),
            title: if title.trim().is_empty() {
                "Untitled".to_string()
            } else {
                title.to_string()
            },
            slug: slug.to_string(),
            path: helpers::article_path(slug),
            category: category.to_string(),
            category_path: helpers::category_path(category),
            description: description.to_string(),
            date: self.helpers.date(date),
            date_iso: helpers::date_xml(date),
        }
    }

    fn summary_data(&self, post: &PostSummary) -> PostData {
        self.post_data(
            &post.id,
            &post.title,
            &post.slug,
            &post.category,
            "",
            &post.published_at,
        )
    }

    /// A filtered, sorted, paginated listing
    pub fn listing(
        &self,
        posts: &[PostSummary],
        categories: &[Category],
        state: &FilterState,
        view: &ListingView,
    ) -> Result<String> {
        let page = compute_page(posts, state, self.config.page_size());
        let posts: Vec<PostData> = page.items.iter().map(|p| self.summary_data(p)).collect();
        let categories: Vec<CategoryData> = categories
            .iter()
            .map(|c| Self::category_data(c, 0))
            .collect();
        let sort_options: Vec<SortOption> = SortKey::ALL
            .iter()
            .map(|k| SortOption {
                value: k.as_str(),
                label: k.display_name(),
                selected: *k == state.sort_key,
            })
            .collect();

        let current_url = state.with_page(page.page).to_url(&view.base_url);
        let mut context = self.base_context(&current_url);
        context.insert("heading", &view.heading);
        context.insert("subheading", &view.subheading);
        context.insert("base_url", &view.base_url);
        context.insert("show_category_filter", &view.show_category_filter);
        context.insert("search_query", &state.search_query);
        context.insert("category_filter", &state.category_filter);
        context.insert("categories", &categories);
        context.insert("sort_options", &sort_options);
        context.insert("posts", &posts);
        context.insert("total_count", &page.total_count);
        context.insert(
            "pagination",
            &helpers::paginator(&page, state, &view.base_url, 2),
        );

        self.templates.render("listing.html", &context)
    }

    fn category_data(category: &Category, count: usize) -> CategoryData {
        CategoryData {
            name: category.name.clone(),
            color: category.color.clone(),
            path: category.path(),
            count,
        }
    }

    /// The category index with post counts and catalog statistics
    pub fn categories(
        &self,
        categories: &[(Category, usize)],
        stats: &BlogStatistics,
    ) -> Result<String> {
        let data: Vec<CategoryData> = categories
            .iter()
            .map(|(c, count)| Self::category_data(c, *count))
            .collect();
        let stats = StatisticsData {
            total_posts: stats.total_posts,
            total_categories: stats.total_categories,
            newest: stats.newest.as_ref().map(|p| self.summary_data(p)),
            top_categories: stats
                .top_categories
                .iter()
                .map(|(c, count)| Self::category_data(c, *count))
                .collect(),
        };

        let mut context = self.base_context("/categories");
        context.insert("categories", &data);
        context.insert("stats", &stats);
        context.insert("category_list", &helpers::list_categories(categories, true));
        self.templates.render("categories.html", &context)
    }

    /// Render blocks to exported markup and normalize it
    pub fn article_body(&self, blocks: &[Block]) -> String {
        let raw = self.blocks.render(blocks);
        self.normalizer.normalize_html(&raw)
    }

    pub fn article(&self, post: &PostRecord, blocks: &[Block]) -> Result<String> {
        let data = self.post_data(
            &post.id,
            &post.title,
            &post.slug,
            &post.category,
            post.description.as_deref().unwrap_or(""),
            &post.published_at,
        );
        let share_links =
            helpers::share_links(&data.title, &self.helpers.full_url_for(&data.path));
        let mut context = self.base_context(&data.path);
        context.insert("post", &data);
        context.insert("content", &self.article_body(blocks));
        context.insert("share_links", &share_links);
        self.templates.render("article.html", &context)
    }

    /// The about page; without page content the site description stands in
    pub fn about(&self, page: Option<&SitePage>) -> Result<String> {
        let heading = page
            .and_then(|p| p.title.clone())
            .unwrap_or_else(|| format!("About {}", self.config.title));
        let content = page
            .filter(|p| !p.blocks.is_empty())
            .map(|p| self.article_body(&p.blocks));

        let mut context = self.base_context("/about");
        context.insert("heading", &heading);
        context.insert("content", &content);
        context.insert("description", &page.and_then(|p| p.description.clone()));
        self.templates.render("about.html", &context)
    }

    /// Search results page; `error` replaces the result list when set
    pub fn search(&self, query: &str, results: &[SearchResult], error: Option<&str>) -> Result<String> {
        let data: Vec<SearchResultData> = results
            .iter()
            .map(|r| SearchResultData {
                title: r.title.clone(),
                path: helpers::article_path(&r.slug),
                category: r.category.clone(),
                category_path: helpers::category_path(&r.category),
                excerpt: r.excerpt.clone(),
                date: self.helpers.date(&r.date),
                date_iso: helpers::date_xml(&r.date),
            })
            .collect();

        let current = format!("/search?q={}", helpers::encode_query_value(query));
        let mut context = self.base_context(&current);
        context.insert("query", query);
        context.insert("results", &data);
        context.insert("error", &error);
        self.templates.render("search.html", &context)
    }

    pub fn not_found(&self, message: &str) -> Result<String> {
        let mut context = self.base_context("/404");
        context.insert("message", message);
        self.templates.render("not_found.html", &context)
    }
}
