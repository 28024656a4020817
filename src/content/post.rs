//! Post and category models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FrontMatterError;

/// Publication status of a post in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Status {
    /// Visible on the site
    #[default]
    Live,
    /// Work in progress
    Draft,
    /// Retired, kept for history
    Archived,
}

impl FromStr for Status {
    type Err = FrontMatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "published" => Ok(Status::Live),
            "draft" => Ok(Status::Draft),
            "archived" => Ok(Status::Archived),
            other => Err(FrontMatterError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Live => "Live",
            Status::Draft => "Draft",
            Status::Archived => "Archived",
        };
        f.write_str(name)
    }
}

/// A full post record as returned by a content source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    /// Opaque identifier, unique within the catalog
    pub id: String,

    /// Post title
    pub title: String,

    /// URL-friendly name
    pub slug: String,

    /// Category name (canonical casing from the catalog)
    pub category: String,

    /// Publication status
    pub status: Status,

    /// Publication date
    pub published_at: DateTime<Utc>,

    /// When the record was created in the catalog
    pub created_at: DateTime<Utc>,

    /// Short description shown in listings and search results
    pub description: Option<String>,
}

impl PostRecord {
    /// Create a new live post with minimal required fields
    pub fn new(id: &str, title: &str, published_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            slug: slug::slugify(title),
            category: String::new(),
            status: Status::Live,
            published_at,
            created_at: published_at,
            description: None,
        }
    }

    /// Project the record onto the lightweight listing model
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            category: self.category.clone(),
            published_at: self.published_at,
        }
    }

    /// Title for display, never empty
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// Category for display, never empty
    pub fn display_category(&self) -> &str {
        if self.category.trim().is_empty() {
            "Uncategorized"
        } else {
            &self.category
        }
    }

    /// Description for display, never empty
    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "No description available",
        }
    }
}

/// Lightweight record used for listing, filtering and sorting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub published_at: DateTime<Utc>,
}

/// A category from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Palette hint (gray, blue, yellow, ...)
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "gray".to_string()
}

impl Category {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            id: slug::slugify(name),
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    /// URL path segment for this category's listing page
    pub fn path(&self) -> String {
        crate::helpers::category_path(&self.name)
    }
}
