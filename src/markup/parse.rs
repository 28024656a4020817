//! HTML fragment parsing
//!
//! Fragments go through html5ever's tree builder in a `<body>` context, so
//! implied end tags, misnested markup and junk inside tags are resolved the
//! way a browser would. The resulting DOM is copied into the arena
//! [`Document`] the passes work on.

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as DomData, RcDom};

use super::tree::{Document, NodeId};

/// Elements whose text content is emitted without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript",
];

/// Parse a fragment into a fresh document
pub fn parse_fragment(html: &str) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    parse_into(&mut doc, root, html);
    doc
}

/// Parse a fragment and append the resulting nodes to `parent`
pub fn parse_into(doc: &mut Document, parent: NodeId, html: &str) {
    let dom = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(html);

    // fragment nodes hang off a synthetic <html> element
    let fragment_root = dom.document.children.borrow().first().cloned();
    if let Some(fragment_root) = fragment_root {
        copy_children(doc, parent, &fragment_root);
    }
}

/// Copy the subtree below `from` under `parent`, without recursion
fn copy_children(doc: &mut Document, parent: NodeId, from: &Handle) {
    let mut stack: Vec<(Handle, NodeId)> = Vec::new();
    push_children(&mut stack, from, parent);

    while let Some((handle, parent)) = stack.pop() {
        match &handle.data {
            DomData::Text { contents } => {
                let text = contents.borrow();
                let raw = doc
                    .tag(parent)
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                let node = if raw {
                    doc.create_raw_text(&text)
                } else {
                    doc.create_text(&text)
                };
                doc.append_child(parent, node);
            }
            DomData::Comment { contents } => {
                let body: &str = contents;
                let node = doc.create_raw(&format!("<!--{}-->", body));
                doc.append_child(parent, node);
            }
            DomData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .filter(|(name, _)| is_valid_attr_name(name))
                    .collect();
                let node = doc.create_element(&name.local, attrs);
                doc.append_child(parent, node);

                if let Some(contents) = template_contents.borrow().as_ref() {
                    push_children(&mut stack, contents, node);
                }
                push_children(&mut stack, &handle, node);
            }
            DomData::Document | DomData::Doctype { .. } | DomData::ProcessingInstruction { .. } => {}
        }
    }
}

/// Queue `from`'s children so they pop in document order
fn push_children(stack: &mut Vec<(Handle, NodeId)>, from: &Handle, parent: NodeId) {
    for child in from.children.borrow().iter().rev() {
        stack.push((child.clone(), parent));
    }
}

/// The tokenizer keeps stray quotes and `=` in attribute names; those
/// cannot be serialized back, so they are dropped
fn is_valid_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !"\"'<>/=".contains(c))
}
