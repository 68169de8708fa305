// ABOUTME: Search-result extraction: builds identity, status, and address entries from result cards.
// ABOUTME: Registry code comes from the result URL path, falling back to a "Registry code" row in the card.

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::compiled::CompiledSelectors;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::extractors::sections::closest;
use crate::model::SearchResultEntry;
use crate::text::{element_text, normalize_whitespace, resolve_url, trimmed_text};

const REGISTRY_CODE_LABEL: &str = "Registry code";
const STATUS_LABEL: &str = "Status";
const ADDRESS_LABEL: &str = "Address";

/// Parses a search-results page and extracts one entry per result link.
///
/// A page without result links yields an empty vec.
pub fn extract_search_results(
    html: &str,
    config: &ExtractConfig,
) -> Result<Vec<SearchResultEntry>, ExtractError> {
    let doc = Html::parse_document(html);
    let sel = CompiledSelectors::compile(&config.selectors)?;
    Ok(results_in(&doc, &sel, &config.base_url))
}

/// Extracts search results from an already parsed document.
pub fn results_in(doc: &Html, sel: &CompiledSelectors, base_url: &str) -> Vec<SearchResultEntry> {
    let results: Vec<SearchResultEntry> = doc
        .select(&sel.result_link)
        .filter_map(|link| result_entry(&link, sel, base_url))
        .collect();
    debug!(count = results.len(), "search results extracted");
    results
}

fn result_entry(link: &ElementRef, sel: &CompiledSelectors, base_url: &str) -> Option<SearchResultEntry> {
    let name = trimmed_text(link);
    if name.is_empty() {
        return None;
    }

    let href = link.value().attr("href").unwrap_or("");
    let mut entry = SearchResultEntry {
        name,
        registry_code: registry_code_from_href(href, &sel.registry_code_path).unwrap_or_default(),
        url: resolve_url(href, base_url).unwrap_or_default(),
        ..Default::default()
    };

    if let Some(card) = closest(link, &sel.content_card) {
        for (label, value) in card_rows(&card, sel) {
            match label.as_str() {
                REGISTRY_CODE_LABEL if entry.registry_code.is_empty() => entry.registry_code = value,
                STATUS_LABEL => entry.status = value,
                ADDRESS_LABEL => entry.address = value,
                _ => {}
            }
        }
    }

    Some(entry)
}

/// First capture group of the registry-code path pattern.
pub fn registry_code_from_href(href: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Label/value texts of every row in a result card.
fn card_rows(card: &ElementRef, sel: &CompiledSelectors) -> Vec<(String, String)> {
    card.select(&sel.row)
        .map(|row| {
            let label: String = row
                .select(&sel.result_label)
                .map(|el| element_text(&el))
                .collect();
            let value: String = row
                .select(&sel.result_value)
                .map(|el| element_text(&el))
                .collect();
            (label.trim().to_string(), normalize_whitespace(&value))
        })
        .collect()
}
