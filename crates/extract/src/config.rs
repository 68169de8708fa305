// ABOUTME: Extraction configuration: wanted sections, base URL, field-name map, and markup selectors.
// ABOUTME: Passed explicitly into every extraction call; defaults follow the Estonian registry markup.

use serde::{Deserialize, Serialize};

/// Section titles extracted when the caller does not supply a list.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "General information",
    "VAT information",
    "Right of representation",
    "Contacts",
    "Shareholders",
    "Tax information",
    "Activity licenses and notices of economic activities",
    "Annual reports",
    "Areas of activity",
    "Articles of association",
    "Beneficial owners",
    "Data protection officer",
];

/// Everything an extraction call needs to know about the target site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Origin prepended to root-relative hrefs, e.g. `https://ariregister.rik.ee`.
    pub base_url: String,
    /// Section titles to keep, matched case-insensitively.
    pub wanted_sections: Vec<String>,
    #[serde(default)]
    pub field_map: FieldMap,
    #[serde(default)]
    pub selectors: Selectors,
}

impl ExtractConfig {
    /// Default sections, field map, and selectors for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            wanted_sections: DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect(),
            field_map: FieldMap::default(),
            selectors: Selectors::default(),
        }
    }

    /// Replace the wanted-section list.
    pub fn with_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wanted_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }
}

/// Maps detail-record fields to the label text used on the page.
///
/// Labels differ per locale and jurisdiction, so they are data rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    /// Title of the section holding identity fields.
    pub general_section: String,
    /// Title of the section holding the VAT number.
    pub vat_section: String,
    pub registry_code: String,
    pub vat_number: String,
    pub incorporated: String,
    pub legal_form: String,
    pub status: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            general_section: "General information".to_string(),
            vat_section: "VAT information".to_string(),
            registry_code: "Registry code".to_string(),
            vat_number: "VAT number".to_string(),
            incorporated: "Registered".to_string(),
            legal_form: "Legal form".to_string(),
            status: "Status".to_string(),
        }
    }
}

/// CSS selectors and marker strings describing the registry markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Section heading marker.
    pub section_heading: String,
    /// Container a section heading belongs to.
    pub content_card: String,
    /// Removed from a card before its text content is taken.
    pub content_strip: String,
    /// A label/value row.
    pub row: String,
    /// Label column inside a row.
    pub label: String,
    /// Value column inside a row.
    pub value: String,
    /// Heading link of one search result.
    pub result_link: String,
    /// Label column inside a search-result row.
    pub result_label: String,
    /// Value column inside a search-result row.
    pub result_value: String,
    /// Path pattern whose first capture group is the registry code.
    pub registry_code_path: String,
    /// `id` of the officers table.
    pub officers_table: String,
    /// `id` of the beneficial owners table.
    pub beneficial_owners_table: String,
    /// Text of the first header cell of the shareholders table.
    pub shareholders_header: String,
    /// Currency code expected in shareholder contribution cells.
    pub contribution_currency: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            section_heading: ".h2".to_string(),
            content_card: ".card-body".to_string(),
            content_strip: "h2, script, style, img".to_string(),
            row: ".row".to_string(),
            label: ".text-muted, .col-md-4, .col-4".to_string(),
            value: ".font-weight-bold, .col:not(.col-md-4):not(.text-muted)".to_string(),
            result_link: "a.h2.text-primary".to_string(),
            result_label: ".col-md-2".to_string(),
            result_value: ".col.font-weight-bold".to_string(),
            registry_code_path: r"/company/(\d+)/".to_string(),
            officers_table: "representativesTable".to_string(),
            beneficial_owners_table: "beneficiaries-table".to_string(),
            shareholders_header: "Participation".to_string(),
            contribution_currency: "EUR".to_string(),
        }
    }
}
