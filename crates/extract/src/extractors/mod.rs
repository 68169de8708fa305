// ABOUTME: Extraction strategies for registry pages: field rows, links, sections, search results, relation tables.
// ABOUTME: Each submodule works on scraper element scopes and never fails on missing markup.

//! Registry extraction strategies.
//!
//! Submodules:
//! - `fields`: label/value rows to a field mapping (grid columns, then a div fallback).
//! - `links`: anchors to resolved links.
//! - `sections`: wanted headings to assembled sections.
//! - `search`: search-result cards to result entries.
//! - `relations`: officer / shareholder / beneficial-owner tables.

pub mod fields;
pub mod links;
pub mod relations;
pub mod search;
pub mod sections;
