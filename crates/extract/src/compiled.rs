// ABOUTME: Pre-compiled CSS selector cache plus the per-call bundle of compiled registry selectors.
// ABOUTME: Invalid caller-supplied selectors surface once, up front, as ExtractError::Selector.

//! Selector caching for repeated extraction calls.
//!
//! The engine runs the same handful of selectors against every page, so they
//! are compiled once per process and cloned out of a shared cache.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

use crate::config::Selectors;
use crate::error::ExtractError;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Selector>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching valid results.
pub fn get_or_compile(css: &str) -> Result<Selector, ExtractError> {
    if let Ok(cache) = SELECTOR_CACHE.read() {
        if let Some(cached) = cache.get(css) {
            return Ok(cached.clone());
        }
    }

    let compiled = Selector::parse(css).map_err(|e| ExtractError::selector(css, e))?;
    if let Ok(mut cache) = SELECTOR_CACHE.write() {
        cache
            .entry(css.to_string())
            .or_insert_with(|| compiled.clone());
    }
    Ok(compiled)
}

/// Fixed structural selectors used by the extractors.
pub(crate) mod fixed {
    pub const ANCHOR: &str = "a";
    pub const TABLE: &str = "table";
    pub const HEADER_CELL: &str = "thead th";
    pub const BODY_ROW: &str = "tbody tr";
    pub const CELL: &str = "td";
    pub const TITLE: &str = "title";
}

/// The registry selectors of one [`Selectors`] value, compiled.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub section_heading: Selector,
    pub content_card: Selector,
    pub content_strip: Selector,
    pub row: Selector,
    pub label: Selector,
    pub value: Selector,
    pub result_link: Selector,
    pub result_label: Selector,
    pub result_value: Selector,
    pub registry_code_path: Regex,
    pub anchor: Selector,
}

impl CompiledSelectors {
    pub fn compile(selectors: &Selectors) -> Result<Self, ExtractError> {
        let registry_code_path = Regex::new(&selectors.registry_code_path)
            .map_err(|e| ExtractError::selector(&selectors.registry_code_path, e))?;
        Ok(Self {
            section_heading: get_or_compile(&selectors.section_heading)?,
            content_card: get_or_compile(&selectors.content_card)?,
            content_strip: get_or_compile(&selectors.content_strip)?,
            row: get_or_compile(&selectors.row)?,
            label: get_or_compile(&selectors.label)?,
            value: get_or_compile(&selectors.value)?,
            result_link: get_or_compile(&selectors.result_link)?,
            result_label: get_or_compile(&selectors.result_label)?,
            result_value: get_or_compile(&selectors.result_value)?,
            registry_code_path,
            anchor: get_or_compile(fixed::ANCHOR)?,
        })
    }
}
