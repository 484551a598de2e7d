//! Tiered query engine over the built indexes.
//!
//! Tier order is the ranking signal: page-title matches, then section-title
//! matches, then section-content matches. There is no score blending across
//! tiers, and a page only ever appears once, in the earliest tier that
//! matched it.

use std::collections::HashMap;

use ahash::AHashSet;

use crate::types::{SearchResultItem, SearchResultSection};

use super::index::SearchIndexes;

/// Hard cap on total results per query.
pub const RESULT_CAP: usize = 100;

/// Runs a free-text query and returns the ranked, deduplicated result list.
///
/// Empty or whitespace queries are not special-cased: tokenization yields no
/// terms and therefore no matches.
pub fn search(indexes: &SearchIndexes, query: &str) -> Vec<SearchResultItem> {
    let mut by_page: HashMap<u32, SearchResultItem> = HashMap::new();

    // Tier 1: page titles. Matches become top-level results with no sections.
    let title_pages = indexes.search_titles(query, RESULT_CAP);
    for &page_id in &title_pages {
        let page = indexes.page(page_id);
        by_page.insert(
            page_id,
            SearchResultItem {
                page_title: page.title.clone(),
                page_href: page.href.clone(),
                sections: None,
            },
        );
    }

    // The title tier alone can exhaust the budget; the section index is not
    // touched at all in that case.
    if title_pages.len() >= RESULT_CAP {
        return collect(title_pages, &mut by_page, &[], &[]);
    }

    let mut seen_sections: AHashSet<u32> = AHashSet::new();

    // Tier 2: section titles, bounded by the remaining budget.
    let budget = RESULT_CAP - title_pages.len();
    let mut section_tier = Vec::new();
    for section_id in indexes.search_section_titles(query, budget) {
        seen_sections.insert(section_id);
        attach_section(indexes, &mut by_page, &mut section_tier, section_id);
    }

    // Tier 3: section contents (fuzzy). A section already attached by its
    // title is never duplicated here.
    let mut content_tier = Vec::new();
    for section_id in indexes.search_section_contents(query, RESULT_CAP) {
        if !seen_sections.insert(section_id) {
            continue;
        }
        attach_section(indexes, &mut by_page, &mut content_tier, section_id);
    }

    // Pages first seen in the content tier: most matched sections first,
    // ties broken by case-insensitive page title.
    content_tier.sort_by(|a, b| {
        let count_a = section_count(&by_page, *a);
        let count_b = section_count(&by_page, *b);
        count_b.cmp(&count_a).then_with(|| {
            let title_a = by_page[a].page_title.to_lowercase();
            let title_b = by_page[b].page_title.to_lowercase();
            title_a.cmp(&title_b)
        })
    });

    collect(title_pages, &mut by_page, &section_tier, &content_tier)
}

/// Appends a matched section to its page's result, creating the result (and
/// recording the page in `new_pages`) if this is the page's first match.
fn attach_section(
    indexes: &SearchIndexes,
    by_page: &mut HashMap<u32, SearchResultItem>,
    new_pages: &mut Vec<u32>,
    section_id: u32,
) {
    let entry = indexes.section(section_id);
    let matched = SearchResultSection {
        title: entry.title.clone(),
        href: entry.href.clone(),
    };

    if let Some(item) = by_page.get_mut(&entry.page_id) {
        item.sections.get_or_insert_with(Vec::new).push(matched);
    } else {
        let page = indexes.page(entry.page_id);
        by_page.insert(
            entry.page_id,
            SearchResultItem {
                page_title: page.title.clone(),
                page_href: page.href.clone(),
                sections: Some(vec![matched]),
            },
        );
        new_pages.push(entry.page_id);
    }
}

fn section_count(by_page: &HashMap<u32, SearchResultItem>, page_id: u32) -> usize {
    by_page[&page_id].sections.as_ref().map_or(0, Vec::len)
}

/// Drains the page map in tier order and applies the result cap.
fn collect(
    title_tier: Vec<u32>,
    by_page: &mut HashMap<u32, SearchResultItem>,
    section_tier: &[u32],
    content_tier: &[u32],
) -> Vec<SearchResultItem> {
    title_tier
        .iter()
        .chain(section_tier)
        .chain(content_tier)
        .filter_map(|page_id| by_page.remove(page_id))
        .take(RESULT_CAP)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PageRecord, PageSection};
    use assert2::check;

    fn page(href: &str, title: &str, sections: Vec<PageSection>) -> PageRecord {
        PageRecord {
            href: href.to_string(),
            title: title.to_string(),
            sections,
        }
    }

    fn section(title: &str, href: &str, content: &str) -> PageSection {
        PageSection {
            title: Some(title.to_string()),
            href: href.to_string(),
            content: content.to_string(),
        }
    }

    /// Title-matching page ranks strictly before a content-only match, and
    /// the content match carries its matched section.
    #[test]
    fn title_tier_outranks_content_tier() {
        let indexes = SearchIndexes::build(vec![
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
        ]);

        let results = search(&indexes, "wallet");
        check!(results.len() == 2);
        check!(results[0].page_href == "/a");
        check!(results[1].page_href == "/b");

        let b_sections = results[1].sections.as_ref().unwrap();
        check!(b_sections.len() == 1);
        check!(b_sections[0].title.as_deref() == Some("Deploy"));
    }

    /// A page matched by both title and sections appears once, in the title
    /// tier, with its sections still attached.
    #[test]
    fn title_match_keeps_its_matched_sections() {
        let indexes = SearchIndexes::build(vec![page(
            "/wallets",
            "Wallets",
            vec![section("Wallet setup", "#setup", "set up a wallet")],
        )]);

        let results = search(&indexes, "wallet");
        check!(results.len() == 1);
        check!(results[0].page_href == "/wallets");

        let sections = results[0].sections.as_ref().unwrap();
        check!(sections.len() == 1);
        check!(sections[0].href == "#setup");
    }

    /// A section matching on both its title and its content shows up exactly
    /// once, under the section-title tier.
    #[test]
    fn section_matching_both_fields_is_not_duplicated() {
        let indexes = SearchIndexes::build(vec![page(
            "/guides",
            "Guides",
            vec![section("Wallet basics", "#basics", "everything about wallet use")],
        )]);

        let results = search(&indexes, "wallet");
        check!(results.len() == 1);
        let sections = results[0].sections.as_ref().unwrap();
        check!(sections.len() == 1);
    }

    /// Content-tier pages sort by descending matched-section count, ties by
    /// case-insensitive title.
    #[test]
    fn content_tier_sorts_by_section_count_then_title() {
        let indexes = SearchIndexes::build(vec![
            page(
                "/zeta",
                "zeta docs",
                vec![section("One", "#one", "wallet wallet")],
            ),
            page(
                "/alpha",
                "Alpha docs",
                vec![section("Two", "#two", "a wallet mention")],
            ),
            page(
                "/many",
                "Many docs",
                vec![
                    section("Three", "#three", "wallet here"),
                    section("Four", "#four", "wallet there"),
                ],
            ),
        ]);

        let results = search(&indexes, "wallet");
        let hrefs: Vec<_> = results.iter().map(|r| r.page_href.as_str()).collect();
        // /many has two matched sections; Alpha sorts before zeta
        // case-insensitively.
        check!(hrefs == vec!["/many", "/alpha", "/zeta"]);
    }

    /// With the cap reached by title matches alone, the section tiers never
    /// contribute anything.
    #[test]
    fn cap_short_circuits_section_tiers() {
        let pages: Vec<_> = (0..150)
            .map(|i| {
                page(
                    &format!("/p{i}"),
                    "Wallet guide",
                    vec![section("Extra", "#extra", "wallet content everywhere")],
                )
            })
            .collect();
        let indexes = SearchIndexes::build(pages);

        let results = search(&indexes, "wallet");
        check!(results.len() == RESULT_CAP);
        check!(results.iter().all(|r| r.sections.is_none()));
    }

    #[test]
    fn empty_query_returns_nothing() {
        let indexes = SearchIndexes::build(vec![page("/a", "Wallets", vec![])]);
        check!(search(&indexes, "").is_empty());
        check!(search(&indexes, "   ").is_empty());
    }
}
