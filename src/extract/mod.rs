//! Static-site content extraction.
//!
//! Walks a generated static build output directory, extracts one
//! [`PageRecord`] per qualifying HTML file, and serializes the result to the
//! JSON artifact consumed by the index builder. A single bad file is logged
//! and skipped; extraction never aborts the whole run for one file.

mod page;

pub use page::extract_page;

use std::path::{Path, PathBuf};

use anyhow::Context;
use ignore::WalkBuilder;

use crate::error::Result;
use crate::types::PageRecord;

/// Extracts page records from every `*.{ext}` file under `root`.
///
/// Files are visited in sorted path order, so repeated runs over unchanged
/// input produce identical output.
pub fn extract_site(root: &Path, ext: &str) -> Result<Vec<PageRecord>> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == ext)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    let mut pages = Vec::new();
    for path in files {
        let html = match std::fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}, skipping", path.display(), e);
                continue;
            }
        };

        let route = match path.strip_prefix(root) {
            Ok(rel) => route_for(rel),
            Err(_) => {
                tracing::warn!("{} is outside the site root, skipping", path.display());
                continue;
            }
        };

        if let Some(page) = extract_page(&html, &route) {
            pages.push(page);
        }
    }

    tracing::info!("Extracted {} pages from {}", pages.len(), root.display());
    Ok(pages)
}

/// Serializes the extracted records to the artifact path.
pub fn write_artifact(pages: &[PageRecord], out: &Path) -> Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string(pages).context("Failed to serialize page records")?;
    std::fs::write(out, json)
        .with_context(|| format!("Failed to write artifact to {}", out.display()))?;

    tracing::info!("Wrote {} page records to {}", pages.len(), out.display());
    Ok(())
}

/// Derives the route for a file path relative to the site root.
///
/// The extension is stripped and `index` collapses to its directory:
/// `guides/setup.html` → `/guides/setup`, `guides/index.html` → `/guides`,
/// root `index.html` → `/`.
fn route_for(rel: &Path) -> String {
    let without_ext = rel.with_extension("");
    let mut parts: Vec<String> = without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.last().is_some_and(|last| last == "index") {
        parts.pop();
    }

    format!("/{}", parts.join("/"))
}
