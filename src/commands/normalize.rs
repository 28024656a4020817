//! Normalize an exported HTML file, optionally following edits

use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::markup::observer::snapshot;
use crate::markup::{parse_fragment, LiveDocument, NormalizeReport, Normalizer, TreeEvent};

/// Normalize the markup in `path`
pub fn normalize_file(path: &Path) -> Result<(String, NormalizeReport)> {
    let html = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let mut doc = parse_fragment(&html);
    let report = Normalizer::default().run(&mut doc);
    Ok((doc.to_html(), report))
}

pub fn run(path: &Path) -> Result<()> {
    let (html, report) = normalize_file(path)?;
    for (pass, changed) in &report.passes {
        tracing::info!("{}: {} node(s) changed", pass, changed);
    }
    println!("{}", html);
    Ok(())
}

/// Keep `path` normalized, printing the result after every change until
/// interrupted
pub async fn watch(path: &Path) -> Result<()> {
    let html = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let (tx, handle) = LiveDocument::from_html(&html).spawn(16);
    if let Some(out) = snapshot(&tx).await {
        println!("{}", out);
    }

    let (fs_tx, mut fs_rx) = mpsc::channel::<DebounceEventResult>(16);
    let mut debouncer = new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
        let _ = fs_tx.blocking_send(res);
    })?;
    debouncer
        .watcher()
        .watch(path, RecursiveMode::NonRecursive)?;
    println!("Watching {:?}. Press Ctrl+C to stop.", path);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = fs_rx.recv() => match event {
                Some(Ok(_)) => {
                    let html = match tokio::fs::read_to_string(path).await {
                        Ok(html) => html,
                        Err(e) => {
                            tracing::warn!("Failed to re-read {:?}: {}", path, e);
                            continue;
                        }
                    };
                    if tx.send(TreeEvent::Reset(html)).await.is_err() {
                        break;
                    }
                    if let Some(out) = snapshot(&tx).await {
                        println!("{}", out);
                    }
                }
                Some(Err(e)) => tracing::error!("Watch error: {:?}", e),
                None => break,
            },
        }
    }

    drop(tx);
    let live = handle.await?;
    tracing::info!("Stopped after {} normalization run(s)", live.runs());
    Ok(())
}
