//! Promote heading-like blocks to real `h1`-`h6` elements

use crate::markup::tree::{is_heading_tag, Document, NodeId, StyleHints};
use crate::markup::Pass;

/// Longest text (in characters, after trimming) that can be inferred as a heading
pub const MAX_HEADING_TEXT: usize = 99;

/// Level suggested by class names, if any
pub fn level_from_class(class: &str) -> Option<u8> {
    let class = class.to_lowercase().replace('_', "-");
    if class.trim().is_empty() {
        return None;
    }
    for level in 1..=6u8 {
        if class.contains(&format!("heading-{}", level)) || class.contains(&format!("h{}", level)) {
            return Some(level);
        }
    }
    if class.contains("subhead") || class.contains("subtitle") {
        return Some(2);
    }
    if class.contains("title") {
        return Some(1);
    }
    if class.contains("header") || class.contains("heading") {
        return Some(2);
    }
    None
}

/// Level suggested by inline presentation, if the text qualifies
pub fn level_from_style(hints: StyleHints, text: &str) -> Option<u8> {
    let len = text.trim().chars().count();
    if len == 0 || len > MAX_HEADING_TEXT {
        return None;
    }
    let size = hints.font_size.unwrap_or(0.0);
    let bold = hints.font_weight.is_some_and(|w| w >= 600);
    if size <= 16.0 && !bold {
        return None;
    }
    let level = if size >= 24.0 {
        1
    } else if size >= 20.0 {
        2
    } else if size >= 18.0 {
        3
    } else {
        4
    };
    Some(level)
}

fn inside_heading(doc: &Document, id: NodeId) -> bool {
    doc.ancestors(id)
        .into_iter()
        .any(|a| doc.tag(a).is_some_and(is_heading_tag))
}

pub struct HeadingPass;

impl HeadingPass {
    fn classify(doc: &Document, id: NodeId) -> Option<u8> {
        if !matches!(doc.tag(id), Some("div") | Some("p")) {
            return None;
        }
        level_from_class(doc.class_attr(id))
            .or_else(|| level_from_style(doc.style_hints(id), &doc.text_content(id)))
    }

    fn promote(doc: &mut Document, id: NodeId, level: u8) {
        let mut attrs: Vec<(String, String)> = doc
            .element(id)
            .map(|el| {
                el.attrs
                    .iter()
                    .filter(|(k, _)| k != "style" && k != "class")
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let class = doc.class_attr(id).trim();
        let marker = format!("notion-heading-{}", level);
        let class = if class.is_empty() {
            marker
        } else {
            format!("{} {}", class, marker)
        };
        attrs.insert(0, ("class".to_string(), class));

        let heading = doc.create_element(&format!("h{}", level), attrs);
        doc.replace_with(id, heading);
        doc.move_children(id, heading);
    }
}

impl Pass for HeadingPass {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn apply(&self, doc: &mut Document) -> usize {
        let mut promoted = 0;
        for id in doc.elements() {
            if !doc.is_attached(id) || inside_heading(doc, id) {
                continue;
            }
            if let Some(level) = Self::classify(doc, id) {
                Self::promote(doc, id, level);
                promoted += 1;
            }
        }
        promoted
    }
}
