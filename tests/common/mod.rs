//! Shared test fixtures for integration tests.
//!
//! Each test gets a throwaway temp directory holding a fake static site
//! and/or a serialized artifact, so tests can run in parallel without
//! touching shared state. [`IndexStore`] instances are created per test;
//! nothing is memoized across tests.

use std::path::{Path, PathBuf};

use docsift::types::{PageRecord, PageSection};
use rstest::fixture;
use tempfile::TempDir;

/// A temporary static-site directory plus a spot for the artifact.
pub struct TempSite {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempSite {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Root of the fake static build output.
    pub fn site_dir(&self) -> PathBuf {
        self.root.join("site")
    }

    /// Where tests write/read the serialized artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.root.join("searchIndex.json")
    }

    /// Writes one rendered page under the site root, creating parents.
    pub fn create_page(&self, rel_path: &str, html: &str) {
        let full = self.site_dir().join(rel_path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create parent of '{}': {}", rel_path, e));
        }
        std::fs::write(&full, html)
            .unwrap_or_else(|e| panic!("Failed to write page '{}': {}", rel_path, e));
    }

    /// Serializes records straight to the artifact path, bypassing
    /// extraction, for tests that only exercise the index/query side.
    pub fn write_artifact(&self, pages: &[PageRecord]) {
        let json = serde_json::to_string(pages).expect("Failed to serialize artifact");
        std::fs::write(self.artifact_path(), json).expect("Failed to write artifact");
    }

    /// Writes raw bytes to the artifact path (for corrupt-artifact tests).
    pub fn write_raw_artifact(&self, bytes: &[u8]) {
        std::fs::write(self.artifact_path(), bytes).expect("Failed to write artifact");
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for TempSite {
    fn default() -> Self {
        Self::new()
    }
}

#[fixture]
pub fn temp_site() -> TempSite {
    TempSite::new()
}

/// A minimal page record for index/query tests.
#[allow(dead_code)]
pub fn page(href: &str, title: &str, sections: Vec<PageSection>) -> PageRecord {
    PageRecord {
        href: href.to_string(),
        title: title.to_string(),
        sections,
    }
}

/// A section with a title and anchor.
#[allow(dead_code)]
pub fn section(title: &str, href: &str, content: &str) -> PageSection {
    PageSection {
        title: Some(title.to_string()),
        href: href.to_string(),
        content: content.to_string(),
    }
}

/// The two-page fixture from the ranking contract: a title match and a
/// content-only match for the query "wallet".
#[allow(dead_code)]
pub fn wallet_pages() -> Vec<PageRecord> {
    vec![
        page(
            "/a",
            "Wallets",
            vec![section("Connect", "#connect", "connect your wallet using the SDK")],
        ),
        page(
            "/b",
            "Contracts",
            vec![section("Deploy", "#deploy", "deploy a wallet contract")],
        ),
    ]
}
