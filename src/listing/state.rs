//! Filter state carried in listing URLs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering applied to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::TitleAsc,
        SortKey::TitleDesc,
    ];

    /// Value used in the `sort` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::Oldest => "Oldest First",
            SortKey::TitleAsc => "Title (A-Z)",
            SortKey::TitleDesc => "Title (Z-A)",
        }
    }

    /// Parse a query value, falling back to `Newest` for anything unknown
    pub fn from_param(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "title-asc" | "a-z" => Ok(SortKey::TitleAsc),
            "title-desc" | "z-a" => Ok(SortKey::TitleDesc),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing inputs owned by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    /// Empty means all categories
    pub category_filter: String,
    pub sort_key: SortKey,
    /// 1-based
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            category_filter: String::new(),
            sort_key: SortKey::Newest,
            page: 1,
        }
    }
}

/// Raw listing query parameters (`?q=&category=&sort=&page=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl From<ListingParams> for FilterState {
    fn from(params: ListingParams) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        Self {
            search_query: params.q.unwrap_or_default(),
            category_filter: params.category.unwrap_or_default(),
            sort_key: params
                .sort
                .as_deref()
                .map(SortKey::from_param)
                .unwrap_or_default(),
            page,
        }
    }
}

impl FilterState {
    /// Change the search text; the listing restarts at page 1
    pub fn with_search(&self, query: &str) -> Self {
        Self {
            search_query: query.to_string(),
            page: 1,
            ..self.clone()
        }
    }

    /// Change the category; the listing restarts at page 1
    pub fn with_category(&self, category: &str) -> Self {
        Self {
            category_filter: category.to_string(),
            page: 1,
            ..self.clone()
        }
    }

    /// Change the ordering; the listing restarts at page 1
    pub fn with_sort(&self, sort_key: SortKey) -> Self {
        Self {
            sort_key,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Query pairs for a URL; defaults are left out
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.search_query.trim().is_empty() {
            pairs.push(("q", self.search_query.clone()));
        }
        if !self.category_filter.is_empty() {
            pairs.push(("category", self.category_filter.clone()));
        }
        if self.sort_key != SortKey::Newest {
            pairs.push(("sort", self.sort_key.as_str().to_string()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        pairs
    }

    /// Build a URL for this state under `base` (e.g. `/`)
    pub fn to_url(&self, base: &str) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return base.to_string();
        }
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, crate::helpers::encode_query_value(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", base, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::from_param("oldest"), SortKey::Oldest);
        assert_eq!(SortKey::from_param("a-z"), SortKey::TitleAsc);
        assert_eq!(SortKey::from_param("title-desc"), SortKey::TitleDesc);
        assert_eq!(SortKey::from_param("bogus"), SortKey::Newest);
    }

    #[test]
    fn test_params_to_state_defaults() {
        let state: FilterState = ListingParams::default().into();
        assert_eq!(state, FilterState::default());

        let state: FilterState = ListingParams {
            page: Some("0".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(state.page, 1);

        let state: FilterState = ListingParams {
            page: Some("abc".into()),
            sort: Some("z-a".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(state.page, 1);
        assert_eq!(state.sort_key, SortKey::TitleDesc);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let state = FilterState::default().with_page(4);
        assert_eq!(state.with_category("History").page, 1);
        assert_eq!(state.with_sort(SortKey::Oldest).page, 1);
        assert_eq!(state.with_search("spirit").page, 1);
        assert_eq!(state.with_page(2).page, 2);
    }

    #[test]
    fn test_to_url_omits_defaults() {
        assert_eq!(FilterState::default().to_url("/"), "/");
        let state = FilterState::default()
            .with_category("Spirit Teachings")
            .with_sort(SortKey::TitleAsc)
            .with_page(2);
        assert_eq!(
            state.to_url("/"),
            "/?category=Spirit%20Teachings&sort=title-asc&page=2"
        );
    }
}
