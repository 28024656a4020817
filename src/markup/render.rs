//! Render content blocks to exporter-style markup
//!
//! The output is deliberately flat, the way a page exporter emits it: list
//! items carry a type class but no container, headings are classed divs and
//! callouts are plain divs. [`super::Normalizer`] turns it into semantic HTML.

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::content::{Block, BlockKind};
use crate::helpers::html_escape;

/// Block renderer with syntax highlighting for code blocks
pub struct BlockRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl Default for BlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRenderer {
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render blocks in order
    pub fn render(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            out.push_str(&self.render_block(block));
            out.push('\n');
        }
        out
    }

    pub fn render_block(&self, block: &Block) -> String {
        let id = html_escape(&block.id);
        match &block.kind {
            BlockKind::Paragraph { html } => {
                format!(r#"<p class="notion-text" data-block-id="{}">{}</p>"#, id, html)
            }
            BlockKind::Heading { html, .. } => format!(
                r#"<div class="notion-text {}" data-block-id="{}">{}</div>"#,
                block.type_name(),
                id,
                html
            ),
            BlockKind::BulletedListItem { html } | BlockKind::NumberedListItem { html } => format!(
                r#"<li class="{}" data-block-id="{}">{}</li>"#,
                block.type_name(),
                id,
                html
            ),
            BlockKind::Quote { html } => {
                format!(r#"<div class="quote" data-block-id="{}">{}</div>"#, id, html)
            }
            BlockKind::Callout { icon, color, html } => {
                let color = color.as_deref().unwrap_or("default");
                let icon = icon
                    .as_deref()
                    .map(|i| format!(r#"<span class="notion-emoji">{}</span>"#, html_escape(i)))
                    .unwrap_or_default();
                format!(
                    r#"<div class="callout {}" data-block-id="{}">{}<div>{}</div></div>"#,
                    html_escape(color),
                    id,
                    icon,
                    html
                )
            }
            BlockKind::Code { language, code } => format!(
                r#"<div class="code" data-block-id="{}">{}</div>"#,
                id,
                self.highlight_code(code, language.as_deref())
            ),
            BlockKind::Image { url, caption } => {
                let alt = caption.as_deref().unwrap_or("");
                let caption = caption
                    .as_deref()
                    .map(|c| format!("<figcaption>{}</figcaption>", html_escape(c)))
                    .unwrap_or_default();
                format!(
                    r#"<figure class="image" data-block-id="{}"><img src="{}" alt="{}">{}</figure>"#,
                    id,
                    html_escape(url),
                    html_escape(alt),
                    caption
                )
            }
            BlockKind::Table { header, rows } => {
                let mut out = format!(r#"<table data-block-id="{}">"#, id);
                for (i, row) in rows.iter().enumerate() {
                    let cell = if *header && i == 0 { "th" } else { "td" };
                    out.push_str("<tr>");
                    for value in row {
                        out.push_str(&format!("<{0}>{1}</{0}>", cell, value));
                    }
                    out.push_str("</tr>");
                }
                out.push_str("</table>");
                out
            }
            BlockKind::Divider => format!(r#"<hr data-block-id="{}">"#, id),
            BlockKind::Html { html } => html.clone(),
        }
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight a code block, falling back to plain escaped text
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme()
            .and_then(|theme| highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok());

        match highlighted {
            Some(html) => html,
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::normalize;

    fn block(id: &str, kind: BlockKind) -> Block {
        Block::new(id, kind)
    }

    #[test]
    fn test_flat_list_items() {
        let r = BlockRenderer::new();
        let html = r.render(&[
            block("a", BlockKind::BulletedListItem { html: "one".into() }),
            block("b", BlockKind::NumberedListItem { html: "two".into() }),
        ]);
        assert_eq!(
            html,
            "<li class=\"bulleted_list_item\" data-block-id=\"a\">one</li>\n<li class=\"numbered_list_item\" data-block-id=\"b\">two</li>\n"
        );
    }

    #[test]
    fn test_heading_and_callout_markup() {
        let r = BlockRenderer::new();
        assert_eq!(
            r.render_block(&block("h", BlockKind::Heading { level: 2, html: "Title".into() })),
            r#"<div class="notion-text heading_2" data-block-id="h">Title</div>"#
        );
        assert_eq!(
            r.render_block(&block(
                "c",
                BlockKind::Callout {
                    icon: Some("💡".into()),
                    color: Some("green_background".into()),
                    html: "Tip".into(),
                }
            )),
            r#"<div class="callout green_background" data-block-id="c"><span class="notion-emoji">💡</span><div>Tip</div></div>"#
        );
    }

    #[test]
    fn test_code_is_highlighted() {
        let r = BlockRenderer::new();
        let html = r.render_block(&block(
            "k",
            BlockKind::Code {
                language: Some("rust".into()),
                code: "fn main() {}\n".into(),
            },
        ));
        assert!(html.starts_with(r#"<div class="code" data-block-id="k"><pre"#));
        assert!(html.contains("<span"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_image_and_table() {
        let r = BlockRenderer::new();
        assert_eq!(
            r.render_block(&block(
                "i",
                BlockKind::Image {
                    url: "/cat.png".into(),
                    caption: Some("A \"cat\"".into()),
                }
            )),
            r#"<figure class="image" data-block-id="i"><img src="/cat.png" alt="A &quot;cat&quot;"><figcaption>A &quot;cat&quot;</figcaption></figure>"#
        );
        assert_eq!(
            r.render_block(&block(
                "t",
                BlockKind::Table {
                    header: true,
                    rows: vec![vec!["A".into()], vec!["1".into()]],
                }
            )),
            r#"<table data-block-id="t"><tr><th>A</th></tr><tr><td>1</td></tr></table>"#
        );
    }

    #[test]
    fn test_rendered_page_normalizes_to_semantic_markup() {
        let r = BlockRenderer::new();
        let raw = r.render(&[
            block("h", BlockKind::Heading { level: 1, html: "Intro".into() }),
            block("1", BlockKind::BulletedListItem { html: "a".into() }),
            block("2", BlockKind::BulletedListItem { html: "b".into() }),
            block("q", BlockKind::Quote { html: "Wise".into() }),
        ]);
        let out = normalize(&raw);
        assert!(out.contains(r#"<h1 class="notion-text heading_1 notion-heading-1" data-block-id="h">Intro</h1>"#));
        assert!(out.contains(r#"<ul class="notion-list list-disc pl-5 my-2"><li"#));
        assert!(out.contains(r#"<blockquote class="notion-quote" data-block-id="q">Wise</blockquote>"#));
    }
}
