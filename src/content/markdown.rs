//! Markdown to content blocks
//!
//! Post bodies are stored as markdown and split into top-level blocks the
//! same way a block-based CMS hands them out: one block per paragraph,
//! heading, list item, quote, callout, code fence, table or rule.

use pulldown_cmark::{html, BlockQuoteKind, CodeBlockKind, Event, Options, Parser, Tag};

use super::{Block, BlockKind};

/// Splits markdown into content blocks
pub struct BlockParser {
    options: Options,
}

impl BlockParser {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_SMART_PUNCTUATION
                | Options::ENABLE_GFM,
        }
    }

    /// Parse a markdown body; block ids are `{id_prefix}-{n}`
    pub fn parse(&self, markdown: &str, id_prefix: &str) -> Vec<Block> {
        let mut kinds = Vec::new();
        let mut current: Vec<Event> = Vec::new();
        let mut depth = 0usize;

        for event in Parser::new_ext(markdown, self.options) {
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
            current.push(event);
            if depth == 0 {
                convert(std::mem::take(&mut current), &mut kinds);
            }
        }

        kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Block::new(format!("{}-{}", id_prefix, i + 1), kind))
            .collect()
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert one top-level event group into blocks
fn convert(events: Vec<Event>, out: &mut Vec<BlockKind>) {
    let Some(first) = events.first().cloned() else {
        return;
    };

    match first {
        Event::Start(Tag::Paragraph) => {
            let inner = strip_outer(events);
            if let Some(image) = lone_image(&inner) {
                out.push(image);
            } else {
                out.push(BlockKind::Paragraph {
                    html: render_events(inner),
                });
            }
        }
        Event::Start(Tag::Heading { level, .. }) => {
            out.push(BlockKind::Heading {
                level: (level as u8).min(3),
                html: render_events(strip_outer(events)),
            });
        }
        Event::Start(Tag::BlockQuote(kind)) => {
            let html = render_events(strip_outer(events));
            match kind {
                Some(kind) => {
                    let (icon, color) = callout_style(kind);
                    out.push(BlockKind::Callout {
                        icon: Some(icon.to_string()),
                        color: Some(color.to_string()),
                        html,
                    });
                }
                None => out.push(BlockKind::Quote { html }),
            }
        }
        Event::Start(Tag::CodeBlock(kind)) => {
            let language = match kind {
                CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                _ => None,
            };
            let code = events
                .iter()
                .filter_map(|e| match e {
                    Event::Text(t) => Some(&**t),
                    _ => None,
                })
                .collect::<String>();
            out.push(BlockKind::Code { language, code });
        }
        Event::Start(Tag::List(start)) => {
            for item in split_children(strip_outer(events)) {
                let html = render_events(strip_outer(item));
                let html = html.trim_end().to_string();
                out.push(if start.is_some() {
                    BlockKind::NumberedListItem { html }
                } else {
                    BlockKind::BulletedListItem { html }
                });
            }
        }
        Event::Start(Tag::Table(_)) => out.push(convert_table(events)),
        Event::Start(Tag::HtmlBlock) => {
            let html = events
                .iter()
                .filter_map(|e| match e {
                    Event::Html(h) | Event::Text(h) => Some(&**h),
                    _ => None,
                })
                .collect::<String>();
            out.push(BlockKind::Html { html });
        }
        Event::Html(h) => out.push(BlockKind::Html {
            html: h.to_string(),
        }),
        Event::Rule => out.push(BlockKind::Divider),
        other => tracing::debug!("Skipping top-level markdown event {:?}", other),
    }
}

fn callout_style(kind: BlockQuoteKind) -> (&'static str, &'static str) {
    match kind {
        BlockQuoteKind::Note => ("ℹ️", "blue_background"),
        BlockQuoteKind::Tip => ("💡", "green_background"),
        BlockQuoteKind::Important => ("❗", "purple_background"),
        BlockQuoteKind::Warning => ("⚠️", "yellow_background"),
        BlockQuoteKind::Caution => ("🛑", "red_background"),
    }
}

fn convert_table(events: Vec<Event>) -> BlockKind {
    let mut header = false;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut cell: Option<Vec<Event>> = None;
    let mut cell_depth = 0usize;

    for event in strip_outer(events) {
        if cell.is_some() {
            let closes_cell = match &event {
                Event::Start(_) => {
                    cell_depth += 1;
                    false
                }
                Event::End(_) if cell_depth == 0 => true,
                Event::End(_) => {
                    cell_depth -= 1;
                    false
                }
                _ => false,
            };
            if closes_cell {
                let html = render_events(cell.take().unwrap_or_default());
                if let Some(row) = rows.last_mut() {
                    row.push(html);
                }
            } else if let Some(buf) = cell.as_mut() {
                buf.push(event);
            }
            continue;
        }

        match event {
            Event::Start(Tag::TableHead) => {
                header = true;
                rows.push(Vec::new());
            }
            Event::Start(Tag::TableRow) => rows.push(Vec::new()),
            Event::Start(Tag::TableCell) => {
                cell = Some(Vec::new());
                cell_depth = 0;
            }
            _ => {}
        }
    }

    BlockKind::Table { header, rows }
}

/// A paragraph that holds nothing but one image becomes an image block
fn lone_image(inner: &[Event]) -> Option<BlockKind> {
    let Some(Event::Start(Tag::Image { dest_url, .. })) = inner.first() else {
        return None;
    };
    if !matches!(inner.last(), Some(Event::End(_))) {
        return None;
    }
    let body = &inner[1..inner.len() - 1];
    if body.iter().any(|e| matches!(e, Event::Start(_) | Event::End(_))) {
        return None;
    }
    let caption = body
        .iter()
        .filter_map(|e| match e {
            Event::Text(t) => Some(&**t),
            _ => None,
        })
        .collect::<String>();
    Some(BlockKind::Image {
        url: dest_url.to_string(),
        caption: if caption.is_empty() { None } else { Some(caption) },
    })
}

/// Drop the opening and closing event of a container
fn strip_outer(mut events: Vec<Event>) -> Vec<Event> {
    if events.len() >= 2 {
        events.pop();
        events.remove(0);
    }
    events
}

/// Split a container's inner events into its direct children
fn split_children(events: Vec<Event>) -> Vec<Vec<Event>> {
    let mut children = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for event in events {
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push(event);
        if depth == 0 {
            children.push(std::mem::take(&mut current));
        }
    }
    children
}

fn render_events(events: Vec<Event>) -> String {
    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out.trim_end_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(md: &str) -> Vec<BlockKind> {
        BlockParser::new()
            .parse(md, "p")
            .into_iter()
            .map(|b| b.kind)
            .collect()
    }

    #[test]
    fn test_paragraph_and_heading() {
        let blocks = kinds("# Title\n\nHello *world*.");
        assert_eq!(
            blocks[0],
            BlockKind::Heading {
                level: 1,
                html: "Title".to_string()
            }
        );
        assert_eq!(
            blocks[1],
            BlockKind::Paragraph {
                html: "Hello <em>world</em>.".to_string()
            }
        );
    }

    #[test]
    fn test_list_items_are_flat_blocks() {
        let blocks = kinds("- one\n- two\n- three\n\n1. first\n2. second\n");
        let bulleted = blocks
            .iter()
            .filter(|k| matches!(k, BlockKind::BulletedListItem { .. }))
            .count();
        let numbered = blocks
            .iter()
            .filter(|k| matches!(k, BlockKind::NumberedListItem { .. }))
            .count();
        assert_eq!(bulleted, 3);
        assert_eq!(numbered, 2);
        assert_eq!(
            blocks[0],
            BlockKind::BulletedListItem {
                html: "one".to_string()
            }
        );
    }

    #[test]
    fn test_code_block() {
        let blocks = kinds("```rust\nfn main() {}\n```\n");
        assert_eq!(
            blocks[0],
            BlockKind::Code {
                language: Some("rust".to_string()),
                code: "fn main() {}\n".to_string()
            }
        );
    }

    #[test]
    fn test_quote_and_callout() {
        let blocks = kinds("> plain quote\n\n> [!TIP]\n> Use the source\n");
        assert!(matches!(blocks[0], BlockKind::Quote { .. }));
        match &blocks[1] {
            BlockKind::Callout { icon, color, html } => {
                assert_eq!(icon.as_deref(), Some("💡"));
                assert_eq!(color.as_deref(), Some("green_background"));
                assert!(html.contains("Use the source"));
            }
            other => panic!("expected callout, got {:?}", other),
        }
    }

    #[test]
    fn test_image_table_and_divider() {
        let blocks = kinds("![A cat](cat.png)\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(
            blocks[0],
            BlockKind::Image {
                url: "cat.png".to_string(),
                caption: Some("A cat".to_string())
            }
        );
        assert_eq!(blocks[1], BlockKind::Divider);
        assert_eq!(
            blocks[2],
            BlockKind::Table {
                header: true,
                rows: vec![
                    vec!["a".to_string(), "b".to_string()],
                    vec!["1".to_string(), "2".to_string()]
                ]
            }
        );
    }

    #[test]
    fn test_block_ids() {
        let blocks = BlockParser::new().parse("a\n\nb", "post");
        assert_eq!(blocks[0].id, "post-1");
        assert_eq!(blocks[1].id, "post-2");
    }
}
