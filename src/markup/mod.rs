//! Markup normalization
//!
//! Exported page markup arrives flat: list items without containers, headings
//! as styled paragraphs, callouts as loose divs. The [`Normalizer`] runs a
//! fixed sequence of [`Pass`]es over a parsed [`Document`] until the markup is
//! semantic. Every pass is idempotent, so a second run over the same tree
//! changes nothing. Parsing follows HTML5 tree construction, which never
//! leaves a list item inside an open `<p>`, so normalized output also
//! reparses to the tree it was serialized from.

pub mod observer;
pub mod parse;
pub mod passes;
pub mod render;
pub mod tree;

pub use observer::{LiveDocument, TreeEvent};
pub use parse::{parse_fragment, parse_into};
pub use render::BlockRenderer;
pub use tree::{Document, NodeId};

use passes::{CalloutPass, HeadingPass, ListPass, TaggingPass};

/// One structural rewrite over a document
pub trait Pass: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrite `doc` in place, returning how many nodes were changed
    fn apply(&self, doc: &mut Document) -> usize;
}

/// Per-pass mutation counts from one normalization run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub passes: Vec<(&'static str, usize)>,
}

impl NormalizeReport {
    pub fn total(&self) -> usize {
        self.passes.iter().map(|(_, n)| n).sum()
    }

    pub fn is_noop(&self) -> bool {
        self.total() == 0
    }
}

pub struct Normalizer {
    passes: Vec<Box<dyn Pass>>,
}

impl Default for Normalizer {
    /// Lists, then headings, then callouts, then tagging
    fn default() -> Self {
        Self::with_passes(vec![
            Box::new(ListPass),
            Box::new(HeadingPass),
            Box::new(CalloutPass),
            Box::new(TaggingPass),
        ])
    }
}

impl Normalizer {
    pub fn with_passes(passes: Vec<Box<dyn Pass>>) -> Self {
        Self { passes }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass once, in order
    pub fn run(&self, doc: &mut Document) -> NormalizeReport {
        let mut report = NormalizeReport::default();
        for pass in &self.passes {
            let changed = pass.apply(doc);
            if changed > 0 {
                tracing::debug!("Pass {} changed {} node(s)", pass.name(), changed);
            }
            report.passes.push((pass.name(), changed));
        }
        report
    }

    /// Parse, normalize and serialize a fragment
    pub fn normalize_html(&self, html: &str) -> String {
        let mut doc = parse_fragment(html);
        self.run(&mut doc);
        doc.to_html()
    }
}

/// Normalize a fragment with the default passes
pub fn normalize(html: &str) -> String {
    Normalizer::default().normalize_html(html)
}
