//! Render cache for incremental page regeneration
//!
//! Rendered pages are kept in memory keyed by request path and query. An
//! entry is served until it is older than the configured TTL or until the
//! path is revalidated. Revalidating `/` drops every entry, since the home
//! feed, category pages and search all derive from the same catalog.
//!
//! Keys carry arbitrary query strings, so the map is bounded: stale entries
//! are swept on insert and the oldest page is evicted past `max_entries`.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::helpers::decode_component;

/// A rendered page
#[derive(Debug, Clone)]
struct CacheEntry {
    html: String,
    rendered_at: Instant,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Default bound on cached pages
pub const DEFAULT_MAX_ENTRIES: usize = 512;

/// In-memory cache of rendered pages
#[derive(Debug)]
pub struct RenderCache {
    ttl: Duration,
    max_entries: usize,
    inner: RwLock<Inner>,
}

/// Cache key for a request: the path plus its query string, if any
pub fn cache_key(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{}?{}", path, q),
        _ => path.to_string(),
    }
}

fn key_path(key: &str) -> &str {
    key.split('?').next().unwrap_or(key)
}

/// Normalize a revalidation path: percent-decoded, leading slash, no
/// trailing slash
pub fn normalize_path(path: &str) -> String {
    let decoded = decode_component(path);
    let trimmed = decoded.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl RenderCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    /// A cache holding at most `max_entries` pages (at least one)
    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // entries are plain values, so a poisoned lock is still safe to use
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Fresh cached page for `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.rendered_at) < self.ttl
    }

    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<String> {
        let mut inner = self.write();
        let fresh = inner
            .entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.html.clone());
        if fresh.is_some() {
            inner.hits += 1;
        } else {
            inner.entries.remove(key);
            inner.misses += 1;
        }
        fresh
    }

    pub fn insert(&self, key: &str, html: String) {
        self.insert_at(key, html, Instant::now());
    }

    pub(crate) fn insert_at(&self, key: &str, html: String, now: Instant) {
        if self.ttl.is_zero() {
            return;
        }
        let mut inner = self.write();
        inner.entries.retain(|_, entry| self.is_fresh(entry, now));
        if !inner.entries.contains_key(key) {
            while inner.entries.len() >= self.max_entries {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.rendered_at)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(oldest) => {
                        tracing::debug!("Cache full, evicting {}", oldest);
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                html,
                rendered_at: now,
            },
        );
    }

    /// Cached page, or render it and cache the result. A render that yields
    /// `None` (nothing to show) is passed through uncached.
    pub fn get_or_render<F, E>(&self, key: &str, render: F) -> Result<Option<String>, E>
    where
        F: FnOnce() -> Result<Option<String>, E>,
    {
        if let Some(html) = self.get(key) {
            tracing::debug!("Cache hit: {}", key);
            return Ok(Some(html));
        }
        let page = render()?;
        if let Some(html) = &page {
            self.insert(key, html.clone());
        }
        Ok(page)
    }

    /// Drop cached renderings of `path` (any query); `/` drops everything.
    /// Returns the number of entries removed.
    pub fn invalidate(&self, path: &str) -> usize {
        let path = normalize_path(path);
        let mut inner = self.write();
        let before = inner.entries.len();
        if path == "/" {
            inner.entries.clear();
        } else {
            inner.entries.retain(|key, _| normalize_path(key_path(key)) != path);
        }
        let removed = before - inner.entries.len();
        tracing::info!("Revalidated {} ({} cached page(s) dropped)", path, removed);
        removed
    }

    pub fn clear(&self) {
        self.write().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.read();
        CacheStats {
            entries: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}
