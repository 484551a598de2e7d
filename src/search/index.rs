//! In-memory search indexes built from extracted page records.
//!
//! Two indexes are built in one pass: a page-title index keyed by page ID
//! (the page's position in the artifact array) and a fielded section index
//! keyed by section ID (a globally monotonic counter across all pages in
//! order). Both are read-only after construction.

use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};

use crate::types::PageRecord;

use super::tokenize::{TermHash, hash_term, tokenize_and_stem};

/// Postings for one term: `(doc_id, tf score)` sorted by score descending,
/// ties broken by ascending doc ID for deterministic output.
type Postings = Vec<(u32, f32)>;

/// Retrieval metadata for one indexed section.
#[derive(Debug, Clone)]
pub(crate) struct SectionEntry {
    pub(crate) page_id: u32,
    pub(crate) title: Option<String>,
    pub(crate) href: String,
}

/// The process-lifetime search structures: page-title postings, fielded
/// section postings, and the ordered page list used to resolve IDs back to
/// content.
pub struct SearchIndexes {
    pages: Vec<PageRecord>,
    title_terms: HashMap<TermHash, Postings>,
    section_title_terms: HashMap<TermHash, Postings>,
    section_content_terms: HashMap<TermHash, Postings>,
    /// Unique stemmed content terms, kept for fuzzy query expansion.
    content_vocab: Vec<String>,
    sections: Vec<SectionEntry>,
}

impl SearchIndexes {
    /// Builds both indexes from the artifact's page array.
    ///
    /// Page IDs are array positions; section IDs increase monotonically as
    /// sections are enumerated across all pages in order.
    pub fn build(pages: Vec<PageRecord>) -> Self {
        let start = std::time::Instant::now();
        let stemmer = Stemmer::create(Algorithm::English);

        let mut title_terms: HashMap<TermHash, Postings> = HashMap::new();
        let mut section_title_terms: HashMap<TermHash, Postings> = HashMap::new();
        let mut section_content_terms: HashMap<TermHash, Postings> = HashMap::new();
        let mut content_vocab: HashMap<TermHash, String> = HashMap::new();
        let mut sections = Vec::new();

        let mut next_section_id: u32 = 0;
        for (page_id, page) in pages.iter().enumerate() {
            let page_id = page_id as u32;
            add_terms(&mut title_terms, &page.title, page_id, &stemmer);

            for section in &page.sections {
                let section_id = next_section_id;
                next_section_id += 1;

                if let Some(title) = &section.title {
                    add_terms(&mut section_title_terms, title, section_id, &stemmer);
                }
                for term in tokenize_and_stem(&section.content, &stemmer) {
                    let term_hash = hash_term(&term);
                    bump_posting(&mut section_content_terms, term_hash, section_id);
                    content_vocab.entry(term_hash).or_insert(term);
                }

                sections.push(SectionEntry {
                    page_id,
                    title: section.title.clone(),
                    href: section.href.clone(),
                });
            }
        }

        sort_postings(&mut title_terms);
        sort_postings(&mut section_title_terms);
        sort_postings(&mut section_content_terms);

        let mut content_vocab: Vec<String> = content_vocab.into_values().collect();
        content_vocab.sort_unstable();

        tracing::info!(
            "Built search indexes: {} pages, {} sections, {} content terms in {:?}",
            pages.len(),
            sections.len(),
            content_vocab.len(),
            start.elapsed()
        );

        Self {
            pages,
            title_terms,
            section_title_terms,
            section_content_terms,
            content_vocab,
            sections,
        }
    }

    /// Page-title matches, highest combined term frequency first.
    pub(crate) fn search_titles(&self, query: &str, limit: usize) -> Vec<u32> {
        search_field(&self.title_terms, query, limit)
    }

    /// Section-title matches as section IDs.
    pub(crate) fn search_section_titles(&self, query: &str, limit: usize) -> Vec<u32> {
        search_field(&self.section_title_terms, query, limit)
    }

    /// Section-content matches with fuzzy term expansion: a query token that
    /// misses the vocabulary exactly still matches close indexed terms,
    /// weighted by string similarity.
    pub(crate) fn search_section_contents(&self, query: &str, limit: usize) -> Vec<u32> {
        const FUZZY_THRESHOLD: f64 = 0.9;

        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(query, &stemmer);
        if tokens.is_empty() {
            return vec![];
        }

        let mut combined: HashMap<u32, f32> = HashMap::new();
        for token in &tokens {
            if let Some(postings) = self.section_content_terms.get(&hash_term(token)) {
                for (section_id, score) in postings {
                    *combined.entry(*section_id).or_insert(0.0) += score;
                }
                continue;
            }

            // Exact miss: expand against the content vocabulary.
            for term in &self.content_vocab {
                let similarity =
                    rapidfuzz::distance::jaro_winkler::similarity(token.chars(), term.chars());
                if similarity < FUZZY_THRESHOLD {
                    continue;
                }
                if let Some(postings) = self.section_content_terms.get(&hash_term(term)) {
                    for (section_id, score) in postings {
                        *combined.entry(*section_id).or_insert(0.0) +=
                            score * similarity as f32;
                    }
                }
            }
        }

        rank(combined, limit)
    }

    /// Resolve a section ID assigned at build time.
    pub(crate) fn section(&self, section_id: u32) -> &SectionEntry {
        &self.sections[section_id as usize]
    }

    /// Resolve a page ID (artifact array position).
    pub(crate) fn page(&self, page_id: u32) -> &PageRecord {
        &self.pages[page_id as usize]
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

/// Tokenizes `text` and bumps the `(term, doc)` posting for every token.
fn add_terms(
    terms: &mut HashMap<TermHash, Postings>,
    text: &str,
    doc_id: u32,
    stemmer: &Stemmer,
) {
    for term in tokenize_and_stem(text, stemmer) {
        bump_posting(terms, hash_term(&term), doc_id);
    }
}

fn bump_posting(terms: &mut HashMap<TermHash, Postings>, term_hash: TermHash, doc_id: u32) {
    let postings = terms.entry(term_hash).or_default();
    match postings.iter_mut().find(|(id, _)| *id == doc_id) {
        Some((_, score)) => *score += 1.0,
        None => postings.push((doc_id, 1.0)),
    }
}

fn sort_postings(terms: &mut HashMap<TermHash, Postings>) {
    for postings in terms.values_mut() {
        postings.sort_by(|(id_a, score_a), (id_b, score_b)| {
            score_b.total_cmp(score_a).then(id_a.cmp(id_b))
        });
    }
}

/// Exact-match search over one field: combine per-token scores, rank.
fn search_field(terms: &HashMap<TermHash, Postings>, query: &str, limit: usize) -> Vec<u32> {
    let stemmer = Stemmer::create(Algorithm::English);
    let tokens = tokenize_and_stem(query, &stemmer);
    if tokens.is_empty() {
        return vec![];
    }

    let mut combined: HashMap<u32, f32> = HashMap::new();
    for token in &tokens {
        if let Some(postings) = terms.get(&hash_term(token)) {
            for (doc_id, score) in postings {
                *combined.entry(*doc_id).or_insert(0.0) += score;
            }
        }
    }

    rank(combined, limit)
}

fn rank(combined: HashMap<u32, f32>, limit: usize) -> Vec<u32> {
    let mut ranked: Vec<_> = combined.into_iter().collect();
    ranked.sort_by(|(id_a, score_a), (id_b, score_b)| {
        score_b.total_cmp(score_a).then(id_a.cmp(id_b))
    });
    ranked.into_iter().take(limit).map(|(id, _)| id).collect()
}
