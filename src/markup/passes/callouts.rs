//! Restructure callout boxes into an icon slot and a content slot

use crate::markup::tree::{Document, NodeId};
use crate::markup::Pass;

pub const CALLOUT_CLASS: &str = "notion-callout";
pub const ICON_SLOT_CLASS: &str = "notion-callout-icon";
pub const CONTENT_SLOT_CLASS: &str = "notion-callout-content";
pub const EMOJI_CLASS: &str = "notion-emoji";

const CALLOUT_HINTS: &[&str] = &["callout", "notice", "alert", "info", "warning", "note"];

/// Colors with a matching `bg-<color>-bg` utility class, in lookup order
pub const PALETTE: &[&str] = &[
    "gray", "blue", "yellow", "green", "red", "purple", "pink", "brown", "orange",
];

/// Whether a class attribute marks a callout container
pub fn is_callout_class(class: &str) -> bool {
    let class = class.to_lowercase();
    CALLOUT_HINTS.iter().any(|hint| class.contains(hint))
}

/// Background utility class for the first palette color named in `classes`
pub fn background_class(classes: &[&str]) -> String {
    let color = classes
        .iter()
        .map(|c| c.to_lowercase())
        .find_map(|c| PALETTE.iter().find(|color| c.contains(*color)).copied())
        .unwrap_or("gray");
    format!("bg-{}-bg", color)
}

pub struct CalloutPass;

impl CalloutPass {
    fn is_candidate(doc: &Document, id: NodeId) -> bool {
        doc.is_tag(id, "div")
            && is_callout_class(doc.class_attr(id))
            && !doc.has_class(id, CALLOUT_CLASS)
            && !doc
                .class_names(id)
                .iter()
                .any(|c| c.starts_with("notion-callout-"))
    }

    fn restructure(doc: &mut Document, id: NodeId) {
        let background = {
            let classes = doc.class_names(id);
            background_class(&classes)
        };
        doc.add_class(id, CALLOUT_CLASS);
        doc.add_class(id, &background);

        let icon = doc
            .descendants(id)
            .into_iter()
            .find(|&d| doc.has_class(d, EMOJI_CLASS));

        let content = doc.create_element(
            "div",
            vec![("class".to_string(), CONTENT_SLOT_CLASS.to_string())],
        );
        if let Some(icon) = icon {
            let slot = doc.create_element(
                "div",
                vec![("class".to_string(), ICON_SLOT_CLASS.to_string())],
            );
            doc.append_child(slot, icon);
            doc.move_children(id, content);
            doc.append_child(id, slot);
        } else {
            doc.move_children(id, content);
        }
        doc.append_child(id, content);
    }
}

impl Pass for CalloutPass {
    fn name(&self) -> &'static str {
        "callouts"
    }

    fn apply(&self, doc: &mut Document) -> usize {
        let mut count = 0;
        for id in doc.elements() {
            if Self::is_candidate(doc, id) {
                Self::restructure(doc, id);
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse::parse_fragment;

    #[test]
    fn test_callout_hints() {
        assert!(is_callout_class("callout"));
        assert!(is_callout_class("Admonition-WARNING"));
        assert!(is_callout_class("info-box"));
        assert!(!is_callout_class("paragraph"));
    }

    #[test]
    fn test_background_class() {
        assert_eq!(background_class(&["callout", "blue_background"]), "bg-blue-bg");
        assert_eq!(background_class(&["callout", "Red"]), "bg-red-bg");
        assert_eq!(background_class(&["callout"]), "bg-gray-bg");
        assert_eq!(background_class(&[]), "bg-gray-bg");
    }

    #[test]
    fn test_restructures_with_icon() {
        let mut doc = parse_fragment(
            r#"<div class="callout blue_background"><span class="notion-emoji">💡</span><div>Remember this</div></div>"#,
        );
        assert_eq!(CalloutPass.apply(&mut doc), 1);
        assert_eq!(
            doc.to_html(),
            concat!(
                r#"<div class="callout blue_background notion-callout bg-blue-bg">"#,
                r#"<div class="notion-callout-icon"><span class="notion-emoji">💡</span></div>"#,
                r#"<div class="notion-callout-content"><div>Remember this</div></div></div>"#,
            )
        );
    }

    #[test]
    fn test_restructures_without_icon() {
        let mut doc = parse_fragment(r#"<div class="warning">Careful</div>"#);
        assert_eq!(CalloutPass.apply(&mut doc), 1);
        assert_eq!(
            doc.to_html(),
            r#"<div class="warning notion-callout bg-gray-bg"><div class="notion-callout-content">Careful</div></div>"#
        );
    }

    #[test]
    fn test_marked_callouts_and_slots_are_skipped() {
        let mut doc = parse_fragment(r#"<div class="note">x</div>"#);
        assert_eq!(CalloutPass.apply(&mut doc), 1);
        let once = doc.to_html();
        assert_eq!(CalloutPass.apply(&mut doc), 0);
        assert_eq!(doc.to_html(), once);
    }

    #[test]
    fn test_only_divs_qualify() {
        let html = r#"<span class="callout">x</span>"#;
        let mut doc = parse_fragment(html);
        assert_eq!(CalloutPass.apply(&mut doc), 0);
        assert_eq!(doc.to_html(), html);
    }
}
