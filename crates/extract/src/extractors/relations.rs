// ABOUTME: Relation-table extraction for officers, shareholders, and beneficial owners.
// ABOUTME: One procedure parametrized by a TableLocator and a row mapper, reading rows through a RowSource.

//! Relation-table extraction.
//!
//! Relation tables are found either by a stable element id (officers,
//! beneficial owners) or by the text of their first header cell
//! (shareholders). Rows come from a [`RowSource`], which is either the
//! static HTML ([`StaticRows`]) or a live browser DOM provided by the caller.
//!
//! A missing table is an empty vec. A failing source is an error for that
//! relation only; [`extract_relations`] keeps the three relations apart so
//! one failure never hides the others.

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::compiled::{fixed, get_or_compile};
use crate::config::Selectors;
use crate::error::{ExtractError, QueryError};
use crate::model::{BeneficialOwner, Officer, Shareholder};
use crate::text::{collapsed_text, normalize_whitespace, trimmed_text};

/// How a relation table is found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLocator {
    /// The table carries this element id.
    ByStableId(String),
    /// The first table whose first header cell reads exactly this text.
    ByHeaderSignature { first_header: String },
}

impl TableLocator {
    /// Whether a table's header cells satisfy this locator's signature.
    ///
    /// Always true for stable ids.
    pub fn matches_headers(&self, headers: &[String]) -> bool {
        match self {
            TableLocator::ByStableId(_) => true,
            TableLocator::ByHeaderSignature { first_header } => {
                headers.first().map(|h| h.trim()) == Some(first_header.as_str())
            }
        }
    }
}

/// Produces body rows of a located table as cell texts.
///
/// Returns an empty vec when no table matches. `Err` is reserved for the
/// source itself failing, e.g. a live DOM query that throws.
pub trait RowSource {
    fn rows(&self, locator: &TableLocator) -> Result<Vec<Vec<String>>, QueryError>;
}

/// Row source over a parsed HTML document.
#[derive(Debug, Clone, Copy)]
pub struct StaticRows<'a> {
    doc: &'a Html,
}

impl<'a> StaticRows<'a> {
    pub fn new(doc: &'a Html) -> Self {
        Self { doc }
    }
}

impl RowSource for StaticRows<'_> {
    fn rows(&self, locator: &TableLocator) -> Result<Vec<Vec<String>>, QueryError> {
        let cell = get_or_compile(fixed::CELL)?;
        match locator {
            TableLocator::ByStableId(id) => {
                let rows = get_or_compile(&format!("#{} {}", id, fixed::BODY_ROW))?;
                Ok(self
                    .doc
                    .select(&rows)
                    .map(|row| row_cells(&row, &cell))
                    .collect())
            }
            TableLocator::ByHeaderSignature { .. } => {
                let tables = get_or_compile(fixed::TABLE)?;
                let headers = get_or_compile(fixed::HEADER_CELL)?;
                let rows = get_or_compile(fixed::BODY_ROW)?;
                for table in self.doc.select(&tables) {
                    let header_texts: Vec<String> =
                        table.select(&headers).map(|th| trimmed_text(&th)).collect();
                    if locator.matches_headers(&header_texts) {
                        return Ok(table
                            .select(&rows)
                            .map(|row| row_cells(&row, &cell))
                            .collect());
                    }
                }
                Ok(Vec::new())
            }
        }
    }
}

fn row_cells(row: &ElementRef, cell: &scraper::Selector) -> Vec<String> {
    row.select(cell).map(|td| collapsed_text(&td)).collect()
}

/// Reads a located table and maps each non-empty row.
pub fn extract_relation<S, T, F>(
    source: &S,
    relation: &'static str,
    locator: &TableLocator,
    map: F,
) -> Result<Vec<T>, ExtractError>
where
    S: RowSource + ?Sized,
    F: Fn(&[String]) -> T,
{
    let rows = source
        .rows(locator)
        .map_err(|source| ExtractError::Query { relation, source })?;

    let records: Vec<T> = rows
        .into_iter()
        .filter(|cells| !cells.is_empty())
        .map(|cells| {
            let cells: Vec<String> = cells.iter().map(|c| normalize_whitespace(c)).collect();
            map(&cells)
        })
        .collect();
    debug!(relation, count = records.len(), "relation rows extracted");
    Ok(records)
}

fn cell(cells: &[String], index: usize) -> String {
    cells.get(index).cloned().unwrap_or_default()
}

/// Officers: name in the first cell, position in the third.
pub fn officer_from_cells(cells: &[String]) -> Officer {
    Officer::new(cell(cells, 0), cell(cells, 2))
}

/// Beneficial owners: name in the first cell, control type in the third.
pub fn beneficial_owner_from_cells(cells: &[String]) -> BeneficialOwner {
    BeneficialOwner::new(cell(cells, 0), cell(cells, 2))
}

/// Matches `<amount> <currency> <free text>` in a contribution cell.
pub fn contribution_pattern(currency: &str) -> Result<Regex, ExtractError> {
    let pattern = format!(r"^[\d.,]+\s+{}\s+(.*)", regex::escape(currency));
    Regex::new(&pattern).map_err(|e| ExtractError::selector(pattern.as_str(), e))
}

/// Control type from a contribution cell; the whole cell when it does not
/// follow the amount/currency form.
pub fn control_type(contribution: &str, pattern: &Regex) -> String {
    match pattern.captures(contribution).and_then(|caps| caps.get(1)) {
        Some(m) => m.as_str().trim().to_string(),
        None => contribution.to_string(),
    }
}

/// Shareholders: share in the first cell, contribution in the second, name in the third.
pub fn shareholder_from_cells(cells: &[String], pattern: &Regex) -> Shareholder {
    Shareholder::new(
        cell(cells, 2),
        cell(cells, 0),
        control_type(&cell(cells, 1), pattern),
    )
}

pub fn extract_officers<S: RowSource + ?Sized>(
    source: &S,
    selectors: &Selectors,
) -> Result<Vec<Officer>, ExtractError> {
    let locator = TableLocator::ByStableId(selectors.officers_table.clone());
    extract_relation(source, "officers", &locator, officer_from_cells)
}

pub fn extract_shareholders<S: RowSource + ?Sized>(
    source: &S,
    selectors: &Selectors,
) -> Result<Vec<Shareholder>, ExtractError> {
    let locator = TableLocator::ByHeaderSignature {
        first_header: selectors.shareholders_header.clone(),
    };
    let pattern = contribution_pattern(&selectors.contribution_currency)?;
    extract_relation(source, "shareholders", &locator, |cells| {
        shareholder_from_cells(cells, &pattern)
    })
}

pub fn extract_beneficial_owners<S: RowSource + ?Sized>(
    source: &S,
    selectors: &Selectors,
) -> Result<Vec<BeneficialOwner>, ExtractError> {
    let locator = TableLocator::ByStableId(selectors.beneficial_owners_table.clone());
    extract_relation(source, "beneficial owners", &locator, beneficial_owner_from_cells)
}

/// The three relation extractions of one detail page, each independent.
#[derive(Debug)]
pub struct RelationSet {
    pub officers: Result<Vec<Officer>, ExtractError>,
    pub shareholders: Result<Vec<Shareholder>, ExtractError>,
    pub beneficial_owners: Result<Vec<BeneficialOwner>, ExtractError>,
}

impl RelationSet {
    /// A set with every relation present and empty.
    pub fn empty() -> Self {
        Self {
            officers: Ok(Vec::new()),
            shareholders: Ok(Vec::new()),
            beneficial_owners: Ok(Vec::new()),
        }
    }
}

/// Runs all three relation extractions against one source.
pub fn extract_relations<S: RowSource + ?Sized>(source: &S, selectors: &Selectors) -> RelationSet {
    RelationSet {
        officers: extract_officers(source, selectors),
        shareholders: extract_shareholders(source, selectors),
        beneficial_owners: extract_beneficial_owners(source, selectors),
    }
}
