// ABOUTME: Record types produced by the extraction engine: sections, links, search results, relations, detail record.
// ABOUTME: All are serde value objects whose JSON shape is the external payload contract.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label/value pairs of one section, in first-seen label order.
///
/// Inserting an existing label overwrites the value but keeps its position.
pub type Fields = IndexMap<String, String>;

/// A titled block of a registry detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub fields: Fields,
    pub content: String,
    pub links: Vec<Link>,
}

impl Section {
    /// Look up a field by its label.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }
}

/// An anchor with a resolved, non-placeholder href.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// One entry of a search-results page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultEntry {
    pub name: String,
    pub registry_code: String,
    pub status: String,
    pub address: String,
    pub url: String,
}

/// A management board member or other representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,
    pub position: String,
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
}

impl Officer {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            entity_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shareholder {
    pub name: String,
    pub shares: String,
    #[serde(rename = "shareCount")]
    pub share_count: Option<String>,
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
    #[serde(rename = "type_of_control")]
    pub control_type: String,
}

impl Shareholder {
    pub fn new(
        name: impl Into<String>,
        shares: impl Into<String>,
        control_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            shares: shares.into(),
            share_count: None,
            entity_type: None,
            control_type: control_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficialOwner {
    pub name: String,
    pub position: Option<String>,
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
    #[serde(rename = "type_of_control")]
    pub control_type: String,
}

impl BeneficialOwner {
    pub fn new(name: impl Into<String>, control_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            entity_type: None,
            control_type: control_type.into(),
        }
    }
}

/// The composed result of a detail-page extraction.
///
/// Identity fields default to an empty string when the page does not carry
/// them. `dissolution_date` is never populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetailRecord {
    pub company_name: String,
    pub company_number: String,
    pub jurisdiction_ident: String,
    pub incorporation_date: String,
    pub dissolution_date: String,
    pub company_type: String,
    pub current_status: String,
    pub more_info_available: bool,
    pub ultimate_beneficial_owners: Vec<BeneficialOwner>,
    pub officers: Vec<Officer>,
    pub shareholders: Vec<Shareholder>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_entry_uses_camel_case_keys() {
        let entry = SearchResultEntry {
            name: "Acme OÜ".to_string(),
            registry_code: "12345678".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["registryCode"], "12345678");
        assert!(value.get("registry_code").is_none());
    }

    #[test]
    fn relation_placeholders_serialize_as_null() {
        let value = serde_json::to_value(Shareholder::new("Jane", "100%", "Owner")).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Jane",
                "shares": "100%",
                "shareCount": null,
                "entityType": null,
                "type_of_control": "Owner",
            })
        );

        let value = serde_json::to_value(Officer::new("John", "Board member")).unwrap();
        assert_eq!(value["entityType"], serde_json::Value::Null);

        let value = serde_json::to_value(BeneficialOwner::new("Ann", "Direct")).unwrap();
        assert_eq!(value["position"], serde_json::Value::Null);
    }

    #[test]
    fn fields_keep_first_seen_position_on_overwrite() {
        let mut fields = Fields::new();
        fields.insert("A".to_string(), "1".to_string());
        fields.insert("B".to_string(), "2".to_string());
        fields.insert("A".to_string(), "3".to_string());

        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(fields["A"], "3");
    }
}
