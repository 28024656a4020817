//! Styling hooks for quotes, code, tables and images

use crate::markup::tree::{Document, NodeId};
use crate::markup::Pass;

pub const QUOTE_CLASS: &str = "notion-quote";
pub const CODE_CLASS: &str = "notion-code";
pub const TABLE_CLASS: &str = "notion-table";
pub const IMAGE_CLASS: &str = "notion-image";

pub struct TaggingPass;

impl TaggingPass {
    fn is_quote_block(doc: &Document, id: NodeId) -> bool {
        doc.is_tag(id, "div") && doc.class_attr(id).to_lowercase().contains("quote")
    }

    fn is_code_block(doc: &Document, id: NodeId) -> bool {
        doc.is_tag(id, "pre")
            || (doc.is_tag(id, "div")
                && doc.has_attr(id, "data-block-id")
                && doc.class_attr(id).to_lowercase().contains("code"))
    }

    /// Swap a quote-classed div for a `blockquote`, keeping its block id
    fn retag_quote(doc: &mut Document, id: NodeId) {
        let mut attrs = vec![("class".to_string(), QUOTE_CLASS.to_string())];
        if let Some(block_id) = doc.attr(id, "data-block-id") {
            attrs.push(("data-block-id".to_string(), block_id.to_string()));
        }
        let quote = doc.create_element("blockquote", attrs);
        doc.replace_with(id, quote);
        doc.move_children(id, quote);
    }
}

impl Pass for TaggingPass {
    fn name(&self) -> &'static str {
        "tagging"
    }

    fn apply(&self, doc: &mut Document) -> usize {
        let mut count = 0;
        for id in doc.elements() {
            if !doc.is_attached(id) {
                continue;
            }
            let tagged = if Self::is_quote_block(doc, id) {
                Self::retag_quote(doc, id);
                true
            } else if Self::is_code_block(doc, id) {
                doc.add_class(id, CODE_CLASS)
            } else if doc.is_tag(id, "table") {
                doc.add_class(id, TABLE_CLASS)
            } else if doc.is_tag(id, "img") {
                doc.add_class(id, IMAGE_CLASS)
            } else {
                false
            };
            if tagged {
                count += 1;
            }
        }
        count
    }
}
