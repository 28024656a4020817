//! Regroup flat list items into real list containers

use crate::markup::tree::{Document, NodeId};
use crate::markup::Pass;

pub const BULLETED_ITEM: &str = "bulleted_list_item";
pub const NUMBERED_ITEM: &str = "numbered_list_item";

pub const BULLETED_CONTAINER_CLASS: &str = "notion-list list-disc pl-5 my-2";
pub const NUMBERED_CONTAINER_CLASS: &str = "notion-list list-decimal pl-5 my-2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    fn container_tag(self) -> &'static str {
        match self {
            ListKind::Bulleted => "ul",
            ListKind::Numbered => "ol",
        }
    }

    fn container_class(self) -> &'static str {
        match self {
            ListKind::Bulleted => BULLETED_CONTAINER_CLASS,
            ListKind::Numbered => NUMBERED_CONTAINER_CLASS,
        }
    }
}

/// Kind of a loose list item, `None` if the node isn't one
pub fn list_kind(doc: &Document, id: NodeId) -> Option<ListKind> {
    if !doc.is_tag(id, "li") {
        return None;
    }
    if doc.has_class(id, BULLETED_ITEM) {
        Some(ListKind::Bulleted)
    } else if doc.has_class(id, NUMBERED_ITEM) {
        Some(ListKind::Numbered)
    } else {
        None
    }
}

/// A maximal run of same-kind siblings, with the blank text between them
struct Run {
    kind: ListKind,
    members: Vec<NodeId>,
}

pub struct ListPass;

impl ListPass {
    fn runs(doc: &Document, parent: NodeId) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut current: Option<Run> = None;
        let mut pending_blank: Vec<NodeId> = Vec::new();

        for &child in doc.children(parent) {
            if let Some(kind) = list_kind(doc, child) {
                match current.as_mut() {
                    Some(run) if run.kind == kind => {
                        run.members.append(&mut pending_blank);
                        run.members.push(child);
                    }
                    _ => {
                        runs.extend(current.take());
                        pending_blank.clear();
                        current = Some(Run {
                            kind,
                            members: vec![child],
                        });
                    }
                }
            } else if doc.is_blank_text(child) && current.is_some() {
                pending_blank.push(child);
            } else {
                runs.extend(current.take());
                pending_blank.clear();
            }
        }
        runs.extend(current);
        runs
    }
}

impl Pass for ListPass {
    fn name(&self) -> &'static str {
        "lists"
    }

    fn apply(&self, doc: &mut Document) -> usize {
        let mut parents = vec![doc.root()];
        parents.extend(doc.elements());

        let mut created = 0;
        for parent in parents {
            if matches!(doc.tag(parent), Some("ul") | Some("ol")) {
                continue;
            }
            for run in Self::runs(doc, parent) {
                let container = doc.create_element(
                    run.kind.container_tag(),
                    vec![("class".to_string(), run.kind.container_class().to_string())],
                );
                doc.insert_before(run.members[0], container);
                for member in run.members {
                    doc.append_child(container, member);
                }
                created += 1;
            }
        }
        created
    }
}
