//! Data model shared between the extraction step and the serving step.
//!
//! `PageRecord` / `PageSection` are the artifact schema: the extractor writes
//! a flat JSON array of `PageRecord` and the index builder reads it back.
//! `SearchResultItem` is the per-query aggregation view returned over HTTP.

use serde::{Deserialize, Serialize};

/// One crawlable document, produced once per static HTML file.
///
/// `href` is path-derived and unique within one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub href: String,
    pub title: String,
    pub sections: Vec<PageSection>,
}

/// A heading-delimited slice of a page's body text.
///
/// `href` is the in-page anchor (`#id`), empty when the section precedes any
/// anchored heading. Sections have no lifecycle outside their parent page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub href: String,
    pub content: String,
}

/// A matched section within a result item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub href: String,
}

/// A page joined to the subset of its sections that matched a query.
///
/// Constructed fresh per query and discarded after the response. A page
/// matched only by title carries no `sections` array at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub page_title: String,
    pub page_href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SearchResultSection>>,
}

/// Wire shape of the search endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}
