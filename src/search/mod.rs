//! Full-text search over extracted page records.
//!
//! Tokenization and indexing feed a tiered query engine: page-title matches
//! rank above section-title matches, which rank above fuzzy section-content
//! matches. Index construction is memoized per [`IndexStore`] with a
//! single-flight guard.

pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod store;
pub(crate) mod tokenize;

pub use index::SearchIndexes;
pub use query::{RESULT_CAP, search};
pub use store::IndexStore;
