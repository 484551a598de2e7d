//! Per-file HTML extraction: one parsed document in, one `PageRecord` out.
//!
//! The DOM is parsed once into scraper's node tree and folded depth-first
//! into a list of heading-delimited sections. The fold owns its accumulator
//! and threads it through the traversal, so the section-splitting logic is
//! testable without any filesystem involvement.

use ego_tree::NodeRef;
use scraper::node::{Element, Node};
use scraper::{Html, Selector};

use crate::types::{PageRecord, PageSection};

/// Subtrees never descended into. Headings inside these can never open a
/// section.
const SKIPPED_TAGS: &[&str] = &["code", "nav", "pre"];

/// Headings whose lowercased text never opens a section; the text that
/// follows them merges into the previously open section instead. These are
/// per-page chrome repeated across the whole site.
const IGNORED_HEADINGS: &[&str] = &["on this page", "feedback", "was this page helpful?"];

/// Extracts one page record from a rendered HTML document.
///
/// Returns `None` when the page is not indexable: no `<main>` element
/// (logged as a warning with the route) or a `<main>` flagged
/// `data-noindex`.
pub fn extract_page(html: &str, route: &str) -> Option<PageRecord> {
    let document = Html::parse_document(html);

    let main_selector = Selector::parse("main").expect("valid selector");
    let Some(main) = document.select(&main_selector).next() else {
        tracing::warn!("No <main> element in {}, skipping", route);
        return None;
    };
    if is_noindex(main.value()) {
        tracing::debug!("<main> of {} is marked data-noindex, skipping", route);
        return None;
    }

    let h1_selector = Selector::parse("h1").expect("valid selector");
    let title = match main.select(&h1_selector).next() {
        Some(h1) => collapse_whitespace(&h1.text().collect::<String>()),
        None => {
            tracing::warn!("No <h1> element in {}", route);
            String::new()
        }
    };

    let mut fold = SectionFold::default();
    for child in main.children() {
        fold = fold.fold(child);
    }

    Some(PageRecord {
        href: route.to_string(),
        title,
        sections: fold.finish(),
    })
}

/// A section being accumulated during the fold, before whitespace cleanup.
struct OpenSection {
    title: Option<String>,
    href: String,
    content: String,
}

impl OpenSection {
    fn untitled() -> Self {
        Self {
            title: None,
            href: String::new(),
            content: String::new(),
        }
    }
}

/// Fold over the parsed DOM producing the ordered section list.
///
/// `h2`–`h6` headings close the open section and open a new one; text nodes
/// append to the open section (opening an untitled one if none exists yet);
/// skipped subtrees and comments contribute nothing.
#[derive(Default)]
struct SectionFold {
    closed: Vec<OpenSection>,
    open: Option<OpenSection>,
}

impl SectionFold {
    fn fold(mut self, node: NodeRef<'_, Node>) -> Self {
        match node.value() {
            Node::Text(text) => {
                let open = self.open.get_or_insert_with(OpenSection::untitled);
                open.content.push_str(text);
                open.content.push(' ');
                self
            }
            Node::Element(element) => self.fold_element(node, element),
            // Comments and anything else structural contribute nothing and
            // have no children worth visiting.
            _ => self,
        }
    }

    fn fold_element(mut self, node: NodeRef<'_, Node>, element: &Element) -> Self {
        let tag = element.name();
        if SKIPPED_TAGS.contains(&tag) || is_noindex(element) {
            return self;
        }

        // The <h1> is the page title, not section content.
        if tag == "h1" {
            return self;
        }

        if is_section_heading(tag) {
            let text = collapse_whitespace(&text_of(node));
            if IGNORED_HEADINGS.contains(&text.to_lowercase().as_str()) {
                // The heading's own line is dropped; following text merges
                // into whatever section is already open.
                return self;
            }
            let href = element
                .attr("id")
                .map(|id| format!("#{id}"))
                .unwrap_or_default();
            if let Some(finished) = self.open.take() {
                self.closed.push(finished);
            }
            self.open = Some(OpenSection {
                title: Some(text),
                href,
                content: String::new(),
            });
            return self;
        }

        node.children().fold(self, Self::fold)
    }

    /// Cleans up whitespace and drops sections with neither title nor
    /// content.
    fn finish(mut self) -> Vec<PageSection> {
        if let Some(open) = self.open.take() {
            self.closed.push(open);
        }

        self.closed
            .into_iter()
            .filter_map(|section| {
                let title = section
                    .title
                    .map(|t| collapse_whitespace(&t))
                    .filter(|t| !t.is_empty());
                let content = collapse_whitespace(&section.content);
                if title.is_none() && content.is_empty() {
                    return None;
                }
                Some(PageSection {
                    title,
                    href: section.href,
                    content,
                })
            })
            .collect()
    }
}

fn is_section_heading(tag: &str) -> bool {
    matches!(tag, "h2" | "h3" | "h4" | "h5" | "h6")
}

fn is_noindex(element: &Element) -> bool {
    element.attr("data-noindex") == Some("true")
}

/// Concatenated text of a node's subtree, without skip-list filtering.
/// Heading subtrees are small and never contain skipped tags worth honoring.
fn text_of(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Comment(_) => {}
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

/// Collapses runs of whitespace to single spaces and trims the ends.
fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
