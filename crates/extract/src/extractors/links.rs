// ABOUTME: Link extraction: collects anchor text and resolved hrefs from a scope in document order.
// ABOUTME: Placeholder anchors (empty or bare "#") are dropped; duplicates are kept.

use scraper::ElementRef;

use crate::compiled::CompiledSelectors;
use crate::model::Link;
use crate::text::{resolve_url, trimmed_text};

/// Collects every anchor under `scope` whose href resolves.
pub fn extract_links(scope: &ElementRef, sel: &CompiledSelectors, base_url: &str) -> Vec<Link> {
    scope
        .select(&sel.anchor)
        .filter_map(|a| {
            let href = resolve_url(a.value().attr("href").unwrap_or(""), base_url)?;
            Some(Link {
                text: trimmed_text(&a),
                href,
            })
        })
        .collect()
}
