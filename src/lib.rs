//! docsift: search indexing and serving for static documentation sites.
//!
//! The pipeline is one-directional: static build output → content extraction
//! → serialized page records → lazily-built in-memory indexes → tiered query
//! results. Indexes are immutable once built; a new site build requires a
//! process restart.

pub mod cli;
pub mod error;
pub mod extract;
pub mod search;
pub mod server;
pub mod tracing;
pub mod types;

pub use error::{ArtifactError, Result};
pub use search::{IndexStore, SearchIndexes};
pub use types::{PageRecord, PageSection, SearchResponse, SearchResultItem};
