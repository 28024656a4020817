//! Arena-backed document tree
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]. Detached nodes stay
//! in the arena; they are simply unreachable from the root. Text is stored in
//! its serialized (escaped) form; attribute values are stored decoded and
//! escaped on output.

use lazy_static::lazy_static;
use regex::Regex;

/// Handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// The fragment root; never serialized itself
    Root,
    Element(Element),
    /// Escaped text, emitted verbatim
    Text(String),
    /// Comments, doctypes and processing instructions, emitted verbatim
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lower-cased tag name
    pub tag: String,
    /// Attributes in source order, names lower-cased
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Presentation hints read from an element's inline style
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StyleHints {
    /// Font size in CSS pixels
    pub font_size: Option<f32>,
    /// Numeric font weight (`bold` = 700)
    pub font_weight: Option<u16>,
}

lazy_static! {
    static ref FONT_SIZE_RE: Regex =
        Regex::new(r"(?i)font-size\s*:\s*([0-9]*\.?[0-9]+)\s*(px|rem|em|pt)?").unwrap();
    static ref FONT_WEIGHT_RE: Regex =
        Regex::new(r"(?i)font-weight\s*:\s*(bold|bolder|normal|lighter|[0-9]+)").unwrap();
}

/// Elements that never have children or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// A mutable document fragment
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty fragment
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    /// Whitespace-only text node
    pub fn is_blank_text(&self, id: NodeId) -> bool {
        matches!(&self.nodes[id.0].data, NodeData::Text(t) if t.trim().is_empty())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            match el.attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => el.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attrs.retain(|(k, _)| k != name);
        }
    }

    /// Raw `class` attribute, empty when absent
    pub fn class_attr(&self, id: NodeId) -> &str {
        self.attr(id, "class").unwrap_or("")
    }

    pub fn class_names(&self, id: NodeId) -> Vec<&str> {
        self.class_attr(id).split_whitespace().collect()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_attr(id).split_whitespace().any(|c| c == class)
    }

    /// Add a class token; returns false if it was already present
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.element(id).is_none() || self.has_class(id, class) {
            return false;
        }
        let current = self.class_attr(id).trim().to_string();
        let value = if current.is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current, class)
        };
        self.set_attr(id, "class", &value);
        true
    }

    /// Font size and weight from the inline `style` attribute
    pub fn style_hints(&self, id: NodeId) -> StyleHints {
        let style = self.attr(id, "style").unwrap_or("");
        let font_size = FONT_SIZE_RE.captures(style).and_then(|caps| {
            let value: f32 = caps.get(1)?.as_str().parse().ok()?;
            let scale = match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
                Some("rem") | Some("em") => 16.0,
                Some("pt") => 4.0 / 3.0,
                _ => 1.0,
            };
            Some(value * scale)
        });
        let font_weight = FONT_WEIGHT_RE.captures(style).and_then(|caps| {
            match caps.get(1)?.as_str().to_lowercase().as_str() {
                "bold" | "bolder" => Some(700),
                "normal" => Some(400),
                "lighter" => Some(300),
                n => n.parse().ok(),
            }
        });
        StyleHints {
            font_size,
            font_weight,
        }
    }

    /// Concatenated text of a subtree with basic entities decoded
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        decode_entities(&out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Raw(_) => {}
            _ => {
                for &child in &self.nodes[id.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Ancestors from the parent up to (and including) the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root() || self.ancestors(id).last() == Some(&self.root())
    }

    /// Pre-order descendants of `id`, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// All attached elements in document order
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.element(id).is_some())
            .collect()
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.push_node(NodeData::Element(Element {
            tag: tag.to_lowercase(),
            attrs,
        }))
    }

    /// Create a detached text node from plain (unescaped) text
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(escape_text(text)))
    }

    /// Create a detached text node from already-escaped markup text
    pub(crate) fn create_raw_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    pub(crate) fn create_raw(&mut self, raw: &str) -> NodeId {
        self.push_node(NodeData::Raw(raw.to_string()))
    }

    /// Remove a node from its parent; it stays in the arena
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Move `node` to sit immediately before `reference`
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.detach(node);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(0);
        self.nodes[parent.0].children.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
    }

    /// Put `replacement` where `old` was and detach `old`
    pub fn replace_with(&mut self, old: NodeId, replacement: NodeId) {
        if self.parent(old).is_none() {
            return;
        }
        self.insert_before(old, replacement);
        self.detach(old);
    }

    /// Move every child of `from` to the end of `to`
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = self.nodes[from.0].children.clone();
        for child in children {
            self.append_child(to, child);
        }
    }

    /// Serialize the whole fragment
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    /// Serialize the children of a node
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize a node including its own tags
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Root => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeData::Text(t) | NodeData::Raw(t) => out.push_str(t),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if is_void(&el.tag) {
                    return;
                }
                // the parser drops one newline right after these start tags
                if matches!(el.tag.as_str(), "pre" | "textarea" | "listing")
                    && self.children(id).first().is_some_and(|&first| {
                        matches!(&self.nodes[first.0].data, NodeData::Text(t) if t.starts_with('\n'))
                    })
                {
                    out.push('\n');
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

/// Escape text for use between tags
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

/// Decode the handful of entities that matter for length checks
pub fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
