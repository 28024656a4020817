//! Content blocks - the units a post body is made of

use serde::{Deserialize, Serialize};

/// A single content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block identifier, emitted as `data-block-id`
    pub id: String,
    pub kind: BlockKind,
}

/// A standalone page outside the post catalog, such as `about`
#[derive(Debug, Clone, PartialEq)]
pub struct SitePage {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub blocks: Vec<Block>,
}

/// Kinds of content block a source can return
///
/// Text-bearing variants hold inline HTML (already rendered from the
/// block's rich text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph { html: String },
    Heading { level: u8, html: String },
    BulletedListItem { html: String },
    NumberedListItem { html: String },
    Quote { html: String },
    Callout {
        icon: Option<String>,
        color: Option<String>,
        html: String,
    },
    Code { language: Option<String>, code: String },
    Image { url: String, caption: Option<String> },
    Table { header: bool, rows: Vec<Vec<String>> },
    Divider,
    /// Raw embedded markup, passed through untouched
    Html { html: String },
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Notion-style block type name
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { level: 1, .. } => "heading_1",
            BlockKind::Heading { level: 2, .. } => "heading_2",
            BlockKind::Heading { .. } => "heading_3",
            BlockKind::BulletedListItem { .. } => "bulleted_list_item",
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::Quote { .. } => "quote",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Code { .. } => "code",
            BlockKind::Image { .. } => "image",
            BlockKind::Table { .. } => "table",
            BlockKind::Divider => "divider",
            BlockKind::Html { .. } => "embed",
        }
    }
}
