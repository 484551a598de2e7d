//! Single-flight index construction over the serialized artifact.
//!
//! `IndexStore` is the one-way lifecycle gate: not built → build in flight →
//! built. Concurrent first queries share a single in-flight build future and
//! all receive the same `Arc`; after success the result is cached for the
//! life of the store with no TTL or invalidation (a new artifact requires a
//! new store, i.e. a process restart in the binary).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, RwLock};

use crate::error::ArtifactError;
use crate::types::PageRecord;

use super::index::SearchIndexes;

/// Type alias for the shared build future awaited by concurrent callers.
type SharedBuild = Shared<BoxFuture<'static, Result<Arc<SearchIndexes>, ArtifactError>>>;

/// Lazily-built, process-lifetime cache of [`SearchIndexes`].
///
/// An explicit object rather than module-level state so tests can create
/// independent instances without cross-test pollution.
pub struct IndexStore {
    artifact_path: PathBuf,
    built: RwLock<Option<Arc<SearchIndexes>>>,
    in_flight: Mutex<Option<SharedBuild>>,
    build_count: Arc<AtomicUsize>,
}

impl IndexStore {
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            built: RwLock::new(None),
            in_flight: Mutex::new(None),
            build_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the cached indexes, building them on first call.
    ///
    /// At most one build runs at a time: a caller arriving during a build
    /// awaits the same shared future instead of starting a second one. A
    /// failed build propagates to every waiter of that flight; only a
    /// successful build is cached.
    pub async fn get_or_build(&self) -> Result<Arc<SearchIndexes>, ArtifactError> {
        if let Some(indexes) = self.built.read().await.as_ref() {
            return Ok(indexes.clone());
        }

        let build = {
            let mut in_flight = self.in_flight.lock().await;
            // Re-check under the lock: a build may have completed and been
            // cached between the fast-path read and acquiring the lock.
            if let Some(indexes) = self.built.read().await.as_ref() {
                return Ok(indexes.clone());
            }
            if let Some(existing) = in_flight.as_ref() {
                tracing::debug!("Awaiting in-flight index build");
                existing.clone()
            } else {
                let path = self.artifact_path.clone();
                let build_count = self.build_count.clone();
                let future: BoxFuture<'static, Result<Arc<SearchIndexes>, ArtifactError>> =
                    Box::pin(async move {
                        build_count.fetch_add(1, Ordering::SeqCst);
                        let pages = load_artifact(&path).await?;
                        Ok(Arc::new(SearchIndexes::build(pages)))
                    });
                let shared = future.shared();
                *in_flight = Some(shared.clone());
                tracing::info!(
                    "Starting index build from {}",
                    self.artifact_path.display()
                );
                shared
            }
        };

        let result = build.clone().await;

        // Publish before clearing the flight so no caller can observe
        // "nothing cached, nothing in flight" after a successful build.
        if let Ok(ref indexes) = result {
            let mut built = self.built.write().await;
            // A concurrent waiter may have stored the same Arc already.
            built.get_or_insert_with(|| indexes.clone());
        }

        {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight.as_ref().is_some_and(|f| f.ptr_eq(&build)) {
                in_flight.take();
            }
        }

        result
    }

    /// Number of underlying builds that have started. Exposed so the
    /// single-flight contract is observable in tests.
    pub fn build_count(&self) -> usize {
        self.build_count.load(Ordering::SeqCst)
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }
}

/// Reads and deserializes the `PageRecord[]` artifact.
async fn load_artifact(path: &Path) -> Result<Vec<PageRecord>, ArtifactError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
