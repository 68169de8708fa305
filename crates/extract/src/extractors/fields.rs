// ABOUTME: Field-row extraction: converts label/value layout rows inside a scope into a field mapping.
// ABOUTME: Tries the grid-column convention first, then a short-label multi-div fallback.

//! Field-row extraction.
//!
//! Registry markup mixes two row conventions:
//! - grid columns, where the label carries a muted/label-column class and the
//!   value a bold/value-column class;
//! - free-form rows of plain `div`s, where the first div is the label and the
//!   rest are value lines.
//!
//! Each row is classified into a [`RowMatch`]; only complete pairs reach the
//! mapping. A label of 60 characters or more in the fallback path is taken to
//! be prose, not a label.

use scraper::ElementRef;

use crate::compiled::CompiledSelectors;
use crate::model::Fields;
use crate::text::trimmed_text;

/// Fallback labels must be shorter than this many characters.
pub const MAX_FALLBACK_LABEL_CHARS: usize = 60;

/// How a single row was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMatch {
    /// Label and value came from the label/value column classes.
    Primary { label: String, value: String },
    /// Label and value came from the row's direct child divs.
    Fallback { label: String, value: String },
    /// The row does not contribute a field.
    Skipped,
}

impl RowMatch {
    /// The label/value pair, if the row contributes one.
    pub fn into_pair(self) -> Option<(String, String)> {
        match self {
            RowMatch::Primary { label, value } | RowMatch::Fallback { label, value } => {
                Some((label, value))
            }
            RowMatch::Skipped => None,
        }
    }
}

/// First label-column and first value-column text within a row, trimmed.
///
/// Either side may be empty.
pub fn primary_pair(row: &ElementRef, sel: &CompiledSelectors) -> (String, String) {
    let label = row
        .select(&sel.label)
        .next()
        .map(|el| trimmed_text(&el))
        .unwrap_or_default();
    let value = row
        .select(&sel.value)
        .next()
        .map(|el| trimmed_text(&el))
        .unwrap_or_default();
    (label, value)
}

/// Label from the first direct child div, value from the remaining ones
/// joined by newlines.
///
/// Returns `None` when the row has fewer than two child divs or the first
/// div's text is too long to be a label.
pub fn fallback_pair(row: &ElementRef) -> Option<(String, String)> {
    let divs: Vec<ElementRef> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "div")
        .collect();
    if divs.len() < 2 {
        return None;
    }

    let label = trimmed_text(&divs[0]);
    if label.chars().count() >= MAX_FALLBACK_LABEL_CHARS {
        return None;
    }

    let value = divs[1..]
        .iter()
        .map(trimmed_text)
        .collect::<Vec<_>>()
        .join("\n");
    Some((label, value))
}

/// Classifies one row. The fallback runs only when the primary label is empty.
pub fn classify_row(row: &ElementRef, sel: &CompiledSelectors) -> RowMatch {
    let (label, value) = primary_pair(row, sel);
    if !label.is_empty() {
        return complete(label, value, true);
    }
    match fallback_pair(row) {
        Some((label, value)) => complete(label, value, false),
        None => RowMatch::Skipped,
    }
}

fn complete(label: String, value: String, primary: bool) -> RowMatch {
    let label = label.trim().to_string();
    let value = value.trim().to_string();
    if label.is_empty() || value.is_empty() {
        return RowMatch::Skipped;
    }
    if primary {
        RowMatch::Primary { label, value }
    } else {
        RowMatch::Fallback { label, value }
    }
}

/// Extracts every row under `scope` into a field mapping. Later rows with
/// the same label overwrite earlier ones.
pub fn extract_fields(scope: &ElementRef, sel: &CompiledSelectors) -> Fields {
    let mut fields = Fields::new();
    for row in scope.select(&sel.row) {
        if let Some((label, value)) = classify_row(&row, sel).into_pair() {
            fields.insert(label, value);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Selectors;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    fn compiled() -> CompiledSelectors {
        CompiledSelectors::compile(&Selectors::default()).unwrap()
    }

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn primary_grid_row() {
        let doc = Html::parse_fragment(
            r#"<div class="row"><div class="col-md-4 text-muted"> Registry code </div><div class="col font-weight-bold"> 14532901 </div></div>"#,
        );
        let row = first(&doc, ".row");
        assert_eq!(
            classify_row(&row, &compiled()),
            RowMatch::Primary {
                label: "Registry code".to_string(),
                value: "14532901".to_string()
            }
        );
    }

    #[test]
    fn primary_takes_first_match_in_document_order() {
        let doc = Html::parse_fragment(
            r#"<div class="row">
                <span class="text-muted">First</span><span class="text-muted">Second</span>
                <b class="font-weight-bold">One</b><b class="font-weight-bold">Two</b>
            </div>"#,
        );
        let row = first(&doc, ".row");
        assert_eq!(
            primary_pair(&row, &compiled()),
            ("First".to_string(), "One".to_string())
        );
    }

    #[test]
    fn fallback_two_divs() {
        let doc = Html::parse_fragment(
            r#"<div class="row"><div>Status</div><div>Active</div></div>"#,
        );
        let row = first(&doc, ".row");
        assert_eq!(
            classify_row(&row, &compiled()),
            RowMatch::Fallback {
                label: "Status".to_string(),
                value: "Active".to_string()
            }
        );
    }

    #[test]
    fn fallback_joins_remaining_divs_with_newline() {
        let doc = Html::parse_fragment(
            r#"<div class="row"><div>Address</div><div>Main 1</div><div>Tallinn</div></div>"#,
        );
        let row = first(&doc, ".row");
        assert_eq!(
            fallback_pair(&row),
            Some(("Address".to_string(), "Main 1\nTallinn".to_string()))
        );
    }

    #[test]
    fn fallback_rejects_long_first_div() {
        let prose = "This paragraph is clearly a sentence of prose and not a short label";
        let html = format!(r#"<div class="row"><div>{}</div><div>Value</div></div>"#, prose);
        let doc = Html::parse_fragment(&html);
        let row = first(&doc, ".row");
        assert_eq!(fallback_pair(&row), None);
        assert_eq!(classify_row(&row, &compiled()), RowMatch::Skipped);
    }

    #[test]
    fn fallback_needs_two_divs() {
        let doc = Html::parse_fragment(r#"<div class="row"><div>Lonely</div><span>x</span></div>"#);
        let row = first(&doc, ".row");
        assert_eq!(fallback_pair(&row), None);
    }

    #[test]
    fn empty_value_is_skipped() {
        let doc = Html::parse_fragment(
            r#"<div class="row"><div class="text-muted">Email</div><div class="font-weight-bold">  </div></div>"#,
        );
        let row = first(&doc, ".row");
        assert_eq!(classify_row(&row, &compiled()), RowMatch::Skipped);
    }

    #[test]
    fn later_label_overwrites_earlier() {
        let doc = Html::parse_fragment(
            r#"<div class="card-body">
                <div class="row"><div class="col-md-4">Status</div><div class="col">Old</div></div>
                <div class="row"><div class="col-md-4">Name</div><div class="col">Acme</div></div>
                <div class="row"><div class="col-md-4">Status</div><div class="col">New</div></div>
            </div>"#,
        );
        let scope = first(&doc, ".card-body");
        let fields = extract_fields(&scope, &compiled());
        let pairs: Vec<(&str, &str)> = fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Status", "New"), ("Name", "Acme")]);
    }
}
