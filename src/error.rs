//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for docsift operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()`
/// and `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading the serialized search artifact fails.
///
/// Fatal to the query that triggered the build; there is no retry within a
/// call. The HTTP layer translates it into a 500-class response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtifactError {
    /// Artifact file not found at the expected path.
    #[error("search artifact not found at {path}")]
    NotFound { path: PathBuf },
    /// Failed to read or deserialize the artifact file.
    #[error("failed to load search artifact at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}
