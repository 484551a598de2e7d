//! Text tokenization and stemming shared by index building and querying.
//!
//! Both sides must agree on how text becomes terms, so the section index and
//! the query engine funnel through `tokenize_and_stem` and `hash_term`.

use ahash::AHasher;
use rust_stemmers::Stemmer;
use std::hash::{Hash, Hasher};

/// Minimum token length. Single characters in rendered prose are noise.
const MIN_TOKEN_LENGTH: usize = 2;

/// Common English stop words filtered out of both index and query terms.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "or", "that", "the", "this", "to", "was", "will", "with", "you", "your",
];

/// Term hash for fast postings lookup.
pub(crate) type TermHash = u64;

/// Splits text on non-alphanumeric boundaries, lowercases, drops stop words
/// and too-short fragments, and stems what remains.
///
/// Documentation prose (not source identifiers) flows through here, so there
/// is no camelCase or snake_case sub-word splitting: "connect your wallet"
/// becomes `["connect", "wallet"]`.
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() >= MIN_TOKEN_LENGTH)
        .filter_map(|word| {
            let lowered = word.to_lowercase();
            if STOP_WORDS.contains(&lowered.as_str()) {
                None
            } else {
                Some(stemmer.stem(&lowered).into_owned())
            }
        })
        .collect()
}

/// Hashes a term for postings lookup (case-insensitive).
pub(crate) fn hash_term(term: &str) -> TermHash {
    let mut hasher = AHasher::default();
    term.to_lowercase().hash(&mut hasher);
    hasher.finish()
}
