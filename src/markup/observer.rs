//! Keep a document normalized while markup keeps arriving
//!
//! A [`LiveDocument`] owns a [`Document`] and a [`Normalizer`]. Changes are
//! delivered as [`TreeEvent`]s over a channel; every burst of events that is
//! already queued is applied first and then followed by a single normalization
//! run, so a flood of late content costs one pass rather than one per event.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::parse::{parse_fragment, parse_into};
use super::tree::Document;
use super::{NormalizeReport, Normalizer};

/// A change to a live document
#[derive(Debug)]
pub enum TreeEvent {
    /// Markup appended at the end of the document
    Append(String),
    /// The whole document replaced with new markup
    Reset(String),
    /// Reply with the serialized document once pending work has settled
    Snapshot(oneshot::Sender<String>),
}

pub struct LiveDocument {
    doc: Document,
    normalizer: Normalizer,
    pending: bool,
    runs: usize,
}

impl LiveDocument {
    /// Wrap a document; it is normalized on the first settle
    pub fn new(doc: Document, normalizer: Normalizer) -> Self {
        Self {
            doc,
            normalizer,
            pending: true,
            runs: 0,
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self::new(parse_fragment(html), Normalizer::default())
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn to_html(&self) -> String {
        self.doc.to_html()
    }

    /// Normalization runs performed so far
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn append_html(&mut self, html: &str) {
        let root = self.doc.root();
        parse_into(&mut self.doc, root, html);
        self.pending = true;
    }

    pub fn reset(&mut self, html: &str) {
        self.doc = parse_fragment(html);
        self.pending = true;
    }

    /// Normalize if anything changed since the last run
    pub fn settle(&mut self) -> Option<NormalizeReport> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.runs += 1;
        let report = self.normalizer.run(&mut self.doc);
        tracing::debug!("Live document settled, {} node(s) changed", report.total());
        Some(report)
    }

    fn handle(&mut self, event: TreeEvent, replies: &mut Vec<oneshot::Sender<String>>) {
        match event {
            TreeEvent::Append(html) => self.append_html(&html),
            TreeEvent::Reset(html) => self.reset(&html),
            TreeEvent::Snapshot(reply) => replies.push(reply),
        }
    }

    /// Apply events until every sender is dropped, then return the document
    pub async fn run(mut self, mut rx: mpsc::Receiver<TreeEvent>) -> Self {
        let mut replies = Vec::new();
        while let Some(event) = rx.recv().await {
            self.handle(event, &mut replies);
            while let Ok(event) = rx.try_recv() {
                self.handle(event, &mut replies);
            }
            self.settle();
            let html = self.doc.to_html();
            for reply in replies.drain(..) {
                let _ = reply.send(html.clone());
            }
        }
        self.settle();
        self
    }

    /// Spawn the event loop on the current runtime
    pub fn spawn(self, buffer: usize) -> (mpsc::Sender<TreeEvent>, JoinHandle<Self>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let handle = tokio::spawn(self.run(rx));
        (tx, handle)
    }
}

/// Ask a running live document for its settled markup
pub async fn snapshot(tx: &mpsc::Sender<TreeEvent>) -> Option<String> {
    let (reply, rx) = oneshot::channel();
    tx.send(TreeEvent::Snapshot(reply)).await.ok()?;
    rx.await.ok()
}
