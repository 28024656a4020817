//! List helpers: the listing paginator and the category index

use super::html::html_escape;
use crate::content::Category;
use crate::listing::{FilterState, ResultPage};

/// Generate a paginator for a listing page
///
/// Links keep the current filters and only change `page`. Pages further than
/// `mid_size` from the current one collapse into an ellipsis, except the
/// first and last.
pub fn paginator(page: &ResultPage, state: &FilterState, base_url: &str, mid_size: usize) -> String {
    let total = page.display_pages();
    if total <= 1 {
        return String::new();
    }
    let current = page.page;
    let url = |n: usize| html_escape(&state.with_page(n).to_url(base_url));

    let mut html = r#"<nav class="pagination">"#.to_string();

    if page.has_prev() {
        html.push_str(&format!(
            r#"<a class="pagination-prev" href="{}">Previous</a>"#,
            url(current - 1)
        ));
    } else {
        html.push_str(r#"<span class="pagination-prev disabled">Previous</span>"#);
    }

    html.push_str(r#"<span class="pagination-numbers">"#);

    let start = current.saturating_sub(mid_size).max(1);
    let end = (current + mid_size).min(total);

    if start > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">1</a>"#,
            url(1)
        ));
        if start > 2 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
    }

    for n in start..=end {
        if n == current {
            html.push_str(&format!(
                r#"<span class="pagination-number current">{}</span>"#,
                n
            ));
        } else {
            html.push_str(&format!(
                r#"<a class="pagination-number" href="{}">{}</a>"#,
                url(n),
                n
            ));
        }
    }

    if end < total {
        if end < total - 1 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">{}</a>"#,
            url(total),
            total
        ));
    }

    html.push_str("</span>");

    if page.has_next() {
        html.push_str(&format!(
            r#"<a class="pagination-next" href="{}">Next</a>"#,
            url(current + 1)
        ));
    } else {
        html.push_str(r#"<span class="pagination-next disabled">Next</span>"#);
    }

    html.push_str("</nav>");
    html
}

/// Generate the category index as HTML, with an optional post count each
pub fn list_categories(categories: &[(Category, usize)], show_count: bool) -> String {
    if categories.is_empty() {
        return String::new();
    }

    let mut html = r#"<ul class="category-list">"#.to_string();
    for (category, count) in categories {
        html.push_str(&format!(
            r#"<li class="category-list-item bg-{}-bg"><a class="category-list-link" href="{}">{}</a>"#,
            html_escape(&category.color),
            html_escape(&category.path()),
            html_escape(&category.name)
        ));
        if show_count {
            html.push_str(&format!(
                r#"<span class="category-list-count">{}</span>"#,
                count
            ));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::SortKey;

    fn result_page(page: usize, total_pages: usize) -> ResultPage {
        ResultPage {
            items: Vec::new(),
            total_count: total_pages * 9,
            total_pages,
            page,
        }
    }

    #[test]
    fn test_single_page_has_no_paginator() {
        assert_eq!(paginator(&result_page(1, 1), &FilterState::default(), "/", 2), "");
        assert_eq!(paginator(&result_page(1, 0), &FilterState::default(), "/", 2), "");
    }

    #[test]
    fn test_paginator_keeps_filters() {
        let state = FilterState::default()
            .with_category("History")
            .with_sort(SortKey::Oldest)
            .with_page(2);
        let html = paginator(&result_page(2, 3), &state, "/", 2);
        assert!(html.contains(r#"<a class="pagination-prev" href="/?category=History&amp;sort=oldest">"#));
        assert!(html.contains(r#"<a class="pagination-next" href="/?category=History&amp;sort=oldest&amp;page=3">"#));
        assert!(html.contains(r#"<span class="pagination-number current">2</span>"#));
    }

    #[test]
    fn test_paginator_ellipsis() {
        let html = paginator(&result_page(10, 20), &FilterState::default(), "/", 2);
        assert!(html.contains(r#"<a class="pagination-number" href="/">1</a><span class="pagination-ellipsis">…</span>"#));
        assert!(html.contains(r#"<a class="pagination-number" href="/?page=20">20</a>"#));
        assert!(html.contains(r#"href="/?page=8">8</a>"#));
        assert!(!html.contains(r#">7</a>"#));
    }

    #[test]
    fn test_list_categories() {
        let cats = vec![(Category::new("Spirit Teachings", "blue"), 3)];
        let html = list_categories(&cats, true);
        assert!(html.contains(r#"href="/categories/Spirit%20Teachings">Spirit Teachings</a>"#));
        assert!(html.contains(r#"<span class="category-list-count">3</span>"#));
        assert!(html.contains("bg-blue-bg"));
        assert_eq!(list_categories(&[], true), "");
    }
}
