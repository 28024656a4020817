//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Everything but unreserved characters (RFC 3986)
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a single path segment or query value
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Percent-encode a query parameter value (spaces become `%20`)
pub fn encode_query_value(s: &str) -> String {
    encode_component(s)
}

/// Decode a percent-encoded path segment, keeping invalid UTF-8 lossy
pub fn decode_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Path of an article page
///
/// # Examples
/// ```ignore
/// article_path("hello-world") // -> "/article/hello-world"
/// ```
pub fn article_path(slug: &str) -> String {
    format!("/article/{}", encode_component(slug))
}

/// Path of a category listing page, keyed by the category's display name
pub fn category_path(name: &str) -> String {
    format!("/categories/{}", encode_component(name))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/article/x") // -> "https://example.com/article/x"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_query_value("Spirit Teachings"), "Spirit%20Teachings");
        assert_eq!(encode_component("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_component("a&b=c/d"), "a%26b%3Dc%2Fd");
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("Spirit%20Teachings"), "Spirit Teachings");
        assert_eq!(decode_component("caf%C3%A9"), "café");
    }

    #[test]
    fn test_paths() {
        assert_eq!(article_path("hello-world"), "/article/hello-world");
        assert_eq!(category_path("Spirit Teachings"), "/categories/Spirit%20Teachings");
    }

    #[test]
    fn test_full_url_for() {
        let config = SiteConfig {
            url: "https://example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(full_url_for(&config, "/about"), "https://example.com/about");
        assert_eq!(full_url_for(&config, ""), "https://example.com/");
    }
}
