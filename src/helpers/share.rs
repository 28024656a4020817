//! Social share links for article pages

use serde::Serialize;

use super::encode_query_value;

/// A share target; `url` is a complete, percent-encoded link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub name: &'static str,
    pub url: String,
}

/// Twitter, Facebook and LinkedIn links sharing `page_url`
pub fn share_links(title: &str, page_url: &str) -> Vec<ShareLink> {
    let url = encode_query_value(page_url);
    vec![
        ShareLink {
            name: "Twitter",
            url: format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                encode_query_value(title),
                url
            ),
        },
        ShareLink {
            name: "Facebook",
            url: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        },
        ShareLink {
            name: "LinkedIn",
            url: format!("https://www.linkedin.com/sharing/share-offsite/?url={}", url),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_links() {
        let links = share_links("Tom & Jerry", "https://example.com/article/tom-jerry");
        let names: Vec<_> = links.iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Twitter", "Facebook", "LinkedIn"]);
        assert_eq!(
            links[0].url,
            "https://twitter.com/intent/tweet?text=Tom%20%26%20Jerry&url=https%3A%2F%2Fexample.com%2Farticle%2Ftom-jerry"
        );
        assert_eq!(
            links[1].url,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Farticle%2Ftom-jerry"
        );
    }
}
