// ABOUTME: The three lookup flows (search, autocomplete, complete info) written against BrowserDriver.
// ABOUTME: Each flow drives the page, hands the HTML to the extraction engine, and persists a snapshot.

use regscrape_extract::{
    compose_detail, extract_relations, extract_search_results, extract_sections,
    normalize_whitespace, title_company_name, CompanyDetailRecord, SearchResultEntry,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ServiceConfig;
use crate::driver::{accept_cookies_if_present, BrowserDriver, LiveRows};
use crate::error::ServiceError;
use crate::persist::persist_snapshot;

/// One autocomplete suggestion as shown in the dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
}

/// Opens the search page and waits for the search input.
fn open_search(driver: &dyn BrowserDriver, config: &ServiceConfig) -> Result<(), ServiceError> {
    driver.goto(&config.search_url)?;
    accept_cookies_if_present(driver, &config.page, &config.waits)?;
    if !driver.wait_for(&config.page.search_input, config.waits.search_input)? {
        return Err(ServiceError::timeout(
            "WaitFor",
            config.page.search_input.as_str(),
            None,
        ));
    }
    Ok(())
}

/// Submits `query` on the registry search page and extracts the result list.
#[instrument(skip(driver, config), fields(jurisdiction = %config.jurisdiction))]
pub fn search_company(
    driver: &dyn BrowserDriver,
    config: &ServiceConfig,
    query: &str,
) -> Result<Vec<SearchResultEntry>, ServiceError> {
    open_search(driver, config)?;
    driver.fill(&config.page.search_input, query)?;
    driver.click(&config.page.search_button)?;
    driver.sleep(config.waits.after_search);

    let result_link = &config.extract.selectors.result_link;
    if !driver.wait_for(result_link, config.waits.results)? {
        info!("no search results rendered");
        return Ok(Vec::new());
    }

    let html = driver.content()?;
    let results = extract_search_results(&html, &config.extract)?;
    info!(count = results.len(), "search results extracted");

    if !results.is_empty() {
        persist_snapshot(
            driver,
            &config.data_folder,
            &config.jurisdiction,
            &format!("search-{}", query),
            &results,
            true,
        );
    }
    Ok(results)
}

/// Whitespace-collapsed, non-empty suggestion texts.
pub fn collect_suggestions<I, S>(texts: I) -> Vec<Suggestion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .map(|t| normalize_whitespace(t.as_ref()))
        .filter(|t| !t.is_empty())
        .map(|text| Suggestion { text })
        .collect()
}

/// Types `query` into the search box and reads the suggestion dropdown.
#[instrument(skip(driver, config), fields(jurisdiction = %config.jurisdiction))]
pub fn autocomplete(
    driver: &dyn BrowserDriver,
    config: &ServiceConfig,
    query: &str,
) -> Result<Vec<Suggestion>, ServiceError> {
    open_search(driver, config)?;
    let input = &config.page.search_input;
    driver.click(input)?;
    driver.type_slowly(input, query, config.waits.typing_delay)?;

    if !driver.wait_for_visible(&config.page.autocomplete_dropdown, config.waits.autocomplete)? {
        info!("no autocomplete dropdown");
        return Ok(Vec::new());
    }

    let suggestions = collect_suggestions(driver.query_texts(&config.page.autocomplete_item)?);
    info!(count = suggestions.len(), "suggestions collected");

    persist_snapshot(
        driver,
        &config.data_folder,
        &config.jurisdiction,
        &format!("autocomplete-{}", query),
        &suggestions,
        false,
    );
    Ok(suggestions)
}

/// Opens a company detail page and composes the full record.
#[instrument(skip(driver, config), fields(jurisdiction = %config.jurisdiction))]
pub fn complete_info(
    driver: &dyn BrowserDriver,
    config: &ServiceConfig,
    url: &str,
) -> Result<CompanyDetailRecord, ServiceError> {
    driver.goto(url)?;
    let company_name = title_company_name(&driver.title()?);
    accept_cookies_if_present(driver, &config.page, &config.waits)?;

    if !driver.wait_for(&config.page.detail_ready, config.waits.detail)? {
        return Err(ServiceError::timeout(
            "WaitFor",
            config.page.detail_ready.as_str(),
            None,
        ));
    }

    driver.wait_for_network_idle(config.waits.network_quiet, config.waits.network_idle)?;

    let html = driver.content()?;
    let sections = extract_sections(&html, &config.extract)?;
    let relations = extract_relations(&LiveRows::new(driver), &config.extract.selectors);
    let record = compose_detail(
        company_name,
        &sections,
        relations,
        &config.extract.field_map,
    );
    info!(
        sections = sections.len(),
        officers = record.officers.len(),
        shareholders = record.shareholders.len(),
        "company detail composed"
    );

    let stem = if record.company_name.is_empty() {
        "company"
    } else {
        record.company_name.as_str()
    };
    persist_snapshot(
        driver,
        &config.data_folder,
        &config.jurisdiction,
        stem,
        &record,
        true,
    );
    Ok(record)
}
