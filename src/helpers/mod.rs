//! Helper functions for templates and handlers
//!
//! URL generation, HTML escaping, date formatting, share links and the
//! listing chrome (paginator, category index).

mod date;
mod html;
mod list;
mod share;
mod url;

pub use date::*;
pub use html::*;
pub use list::*;
pub use share::*;
pub use url::*;

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;

/// Helpers bound to a site configuration
pub struct Helpers {
    config: SiteConfig,
}

impl Helpers {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Get full_url_for helper
    pub fn full_url_for(&self, path: &str) -> String {
        full_url_for(&self.config, path)
    }

    /// Format a date with the site's format and timezone
    pub fn date(&self, date: &DateTime<Utc>) -> String {
        format_in_timezone(date, &self.config.timezone, &self.config.date_format)
    }

    /// Plain-text excerpt at the site's configured length
    pub fn excerpt(&self, html: &str) -> String {
        excerpt(html, self.config.excerpt_length)
    }
}
