// ABOUTME: Section location and assembly: matches wanted headings and builds Section records from their cards.
// ABOUTME: Content text strips the heading and script/style/image nodes before whitespace normalization.

//! Section location and assembly.
//!
//! Every element carrying the section-heading marker is a candidate. A
//! candidate is kept when its trimmed text matches a wanted title
//! (case-insensitive) and it sits inside a content card. The card is the
//! scope for fields, links, and content text.
//!
//! Output follows heading document order. Two headings with the same title
//! produce two sections.

use std::collections::HashSet;

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::compiled::CompiledSelectors;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::extractors::fields::extract_fields;
use crate::extractors::links::extract_links;
use crate::model::Section;
use crate::text::{normalize_whitespace, trimmed_text};

/// Parses `html` and extracts every wanted section.
pub fn extract_sections(html: &str, config: &ExtractConfig) -> Result<Vec<Section>, ExtractError> {
    let doc = Html::parse_document(html);
    let sel = CompiledSelectors::compile(&config.selectors)?;
    Ok(sections_in(&doc, &sel, config))
}

/// Extracts wanted sections from an already parsed document.
pub fn sections_in(doc: &Html, sel: &CompiledSelectors, config: &ExtractConfig) -> Vec<Section> {
    let wanted: Vec<String> = config
        .wanted_sections
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let mut sections = Vec::new();
    for heading in doc.select(&sel.section_heading) {
        let title = trimmed_text(&heading);
        if title.is_empty() || !wanted.contains(&title.to_lowercase()) {
            continue;
        }

        let Some(card) = closest(&heading, &sel.content_card) else {
            debug!(title = %title, "section heading has no content card, skipping");
            continue;
        };

        sections.push(assemble_section(title, &heading, &card, sel, &config.base_url));
    }

    debug!(count = sections.len(), "sections extracted");
    sections
}

/// Builds one section from a heading and its card.
pub fn assemble_section(
    title: String,
    heading: &ElementRef,
    card: &ElementRef,
    sel: &CompiledSelectors,
    base_url: &str,
) -> Section {
    Section {
        title,
        fields: extract_fields(card, sel),
        content: card_content(card, heading, &sel.content_strip),
        links: extract_links(card, sel, base_url),
    }
}

/// Nearest element, starting with `el` itself, that matches `selector`.
pub fn closest<'a>(el: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    if selector.matches(el) {
        return Some(*el);
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

/// Text of `card` without the heading and stripped nodes, whitespace collapsed.
pub fn card_content(card: &ElementRef, heading: &ElementRef, strip: &Selector) -> String {
    let mut excluded: HashSet<NodeId> = card.select(strip).map(|el| el.id()).collect();
    excluded.insert(heading.id());

    let mut out = String::new();
    for child in card.children() {
        collect_text(child, &excluded, &mut out);
    }
    normalize_whitespace(&out)
}

fn collect_text(node: NodeRef<Node>, excluded: &HashSet<NodeId>, out: &mut String) {
    if excluded.contains(&node.id()) {
        return;
    }
    match node.value() {
        Node::Text(text) => out.push_str(&**text),
        Node::Element(_) => {
            for child in node.children() {
                collect_text(child, excluded, out);
            }
        }
        _ => {}
    }
}
