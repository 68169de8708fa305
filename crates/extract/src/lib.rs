// ABOUTME: Main library entry point for the registry document extraction engine.
// ABOUTME: Re-exports the public API: extractors, configuration, data model, and the detail composer.

//! Registry document extraction engine.
//!
//! Turns rendered HTML from a company-registry website (detail pages and
//! search-result pages) into normalized records: titled sections with
//! label/value fields, search-result entries, and officer / shareholder /
//! beneficial-owner relations.
//!
//! Everything here is pure and synchronous. Fetching and rendering pages is
//! the caller's job; the engine only consumes HTML strings or rows read from
//! a live DOM through [`RowSource`].
//!
//! # Example
//!
//! ```
//! use regscrape_extract::{extract_sections, ExtractConfig};
//!
//! let html = r#"<div class="card-body">
//!     <h2 class="h2">General information</h2>
//!     <div class="row"><div class="col-md-4">Status</div><div class="col font-weight-bold">Registered</div></div>
//! </div>"#;
//!
//! let config = ExtractConfig::new("https://registry.example");
//! let sections = extract_sections(html, &config).unwrap();
//! assert_eq!(sections[0].fields["Status"], "Registered");
//! ```

pub mod compiled;
pub mod compose;
pub mod config;
pub mod error;
pub mod extractors;
pub mod model;
pub mod text;

pub use crate::compose::{compose_detail, extract_detail, title_company_name};
pub use crate::config::{ExtractConfig, FieldMap, Selectors, DEFAULT_SECTIONS};
pub use crate::error::{ExtractError, QueryError};
pub use crate::extractors::relations::{
    extract_beneficial_owners, extract_officers, extract_relations, extract_shareholders,
    RelationSet, RowSource, StaticRows, TableLocator,
};
pub use crate::extractors::search::extract_search_results;
pub use crate::extractors::sections::extract_sections;
pub use crate::model::{
    BeneficialOwner, CompanyDetailRecord, Fields, Link, Officer, SearchResultEntry, Section,
    Shareholder,
};
pub use crate::text::{normalize_whitespace, resolve_url};
