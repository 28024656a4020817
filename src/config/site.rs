//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `revalidation_secret`
pub const REVALIDATION_SECRET_ENV: &str = "REVALIDATION_SECRET";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// IANA timezone name used when displaying dates; empty means UTC
    pub timezone: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,

    // Listing
    pub per_page: usize,
    pub excerpt_length: usize,

    // Date format (Moment.js tokens)
    pub date_format: String,

    // Cache
    /// Seconds a rendered page stays fresh
    pub revalidate_secs: u64,
    /// Upper bound on cached pages; the oldest are evicted first
    pub cache_max_entries: usize,
    /// Token required by `/api/revalidate`; unset disables the endpoint
    pub revalidation_secret: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Notion Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost:4000".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),

            per_page: 9,
            excerpt_length: 150,

            date_format: "MMMM D, YYYY".to_string(),

            revalidate_secs: 60,
            cache_max_entries: 512,
            revalidation_secret: None,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Load `_config.yml` from a site directory, defaulting when it is absent,
    /// then apply environment overrides
    pub fn load_from_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");
        let mut config = if config_path.exists() {
            Self::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir.as_ref());
            Self::default()
        };
        config.override_secret(std::env::var(REVALIDATION_SECRET_ENV).ok());
        Ok(config)
    }

    /// Replace the revalidation secret when a non-empty override is given
    pub fn override_secret(&mut self, secret: Option<String>) {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.revalidation_secret = Some(secret);
        }
    }

    pub fn content_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.content_dir)
    }

    pub fn static_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.static_dir)
    }

    /// Page size for listings, never zero
    pub fn page_size(&self) -> usize {
        self.per_page.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.per_page, 9);
        assert_eq!(config.revalidate_secs, 60);
        assert_eq!(config.cache_max_entries, 512);
        assert_eq!(config.date_format, "MMMM D, YYYY");
        assert_eq!(config.content_dir, "content");
        assert!(config.revalidation_secret.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
per_page: 12
timezone: Europe/London
revalidation_secret: s3cret
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 12);
        assert_eq!(config.timezone, "Europe/London");
        assert_eq!(config.revalidation_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn test_override_secret() {
        let mut config = SiteConfig {
            revalidation_secret: Some("file".to_string()),
            ..Default::default()
        };
        config.override_secret(Some(String::new()));
        assert_eq!(config.revalidation_secret.as_deref(), Some("file"));
        config.override_secret(Some("env".to_string()));
        assert_eq!(config.revalidation_secret.as_deref(), Some("env"));
        config.override_secret(None);
        assert_eq!(config.revalidation_secret.as_deref(), Some("env"));
    }

    #[test]
    fn test_load_from_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("_config.yml"), "title: From Disk\nper_page: 0\n").unwrap();
        let config = SiteConfig::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.title, "From Disk");
        assert_eq!(config.page_size(), 1);
        assert_eq!(config.content_path(tmp.path()), tmp.path().join("content"));

        let empty = TempDir::new().unwrap();
        let config = SiteConfig::load_from_dir(empty.path()).unwrap();
        assert_eq!(config.title, "Notion Blog");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        std::fs::write(&path, "per_page: [not a number").unwrap();
        assert!(SiteConfig::load(&path).is_err());
    }
}
