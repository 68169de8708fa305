// ABOUTME: Detail record composition: merges sections and relation tables into one CompanyDetailRecord.
// ABOUTME: Also offers a static-HTML detail extraction that reads relations from the same document.

use scraper::Html;
use tracing::warn;

use crate::compiled::{fixed, get_or_compile, CompiledSelectors};
use crate::config::{ExtractConfig, FieldMap};
use crate::error::ExtractError;
use crate::extractors::relations::{extract_relations, RelationSet, StaticRows};
use crate::extractors::sections::sections_in;
use crate::model::{CompanyDetailRecord, Section};
use crate::text::trimmed_text;

/// Company name from a page title of the form `Name | Site`.
pub fn title_company_name(title: &str) -> String {
    title.split('|').next().unwrap_or("").trim().to_string()
}

fn find_section<'a>(sections: &'a [Section], title: &str) -> Option<&'a Section> {
    let title = title.trim().to_lowercase();
    sections.iter().find(|s| s.title.to_lowercase() == title)
}

fn field_or_empty(section: Option<&Section>, label: &str) -> String {
    section
        .and_then(|s| s.field(label))
        .unwrap_or_default()
        .to_string()
}

fn or_empty<T>(relation: Result<Vec<T>, ExtractError>) -> Vec<T> {
    relation.unwrap_or_else(|err| {
        warn!(error = %err, "relation extraction failed, using empty list");
        Vec::new()
    })
}

/// Merges extracted sections and relations into a detail record.
///
/// Missing sections or fields become empty strings; a failed relation
/// becomes an empty list.
pub fn compose_detail(
    company_name: impl Into<String>,
    sections: &[Section],
    relations: RelationSet,
    field_map: &FieldMap,
) -> CompanyDetailRecord {
    let general = find_section(sections, &field_map.general_section);
    let vat = find_section(sections, &field_map.vat_section);

    CompanyDetailRecord {
        company_name: company_name.into(),
        company_number: field_or_empty(general, &field_map.registry_code),
        jurisdiction_ident: field_or_empty(vat, &field_map.vat_number),
        incorporation_date: field_or_empty(general, &field_map.incorporated),
        dissolution_date: String::new(),
        company_type: field_or_empty(general, &field_map.legal_form),
        current_status: field_or_empty(general, &field_map.status),
        more_info_available: !sections.is_empty(),
        ultimate_beneficial_owners: or_empty(relations.beneficial_owners),
        officers: or_empty(relations.officers),
        shareholders: or_empty(relations.shareholders),
    }
}

/// Extracts a detail record from saved HTML, reading relation tables from
/// the same document. The company name comes from the `<title>` element.
pub fn extract_detail(html: &str, config: &ExtractConfig) -> Result<CompanyDetailRecord, ExtractError> {
    let doc = Html::parse_document(html);
    let sel = CompiledSelectors::compile(&config.selectors)?;
    let title = get_or_compile(fixed::TITLE)?;

    let company_name = doc
        .select(&title)
        .next()
        .map(|t| title_company_name(&trimmed_text(&t)))
        .unwrap_or_default();
    let sections = sections_in(&doc, &sel, config);
    let relations = extract_relations(&StaticRows::new(&doc), &config.selectors);

    Ok(compose_detail(company_name, &sections, relations, &config.field_map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::model::{Fields, Officer};
    use pretty_assertions::assert_eq;

    fn section(title: &str, fields: &[(&str, &str)]) -> Section {
        Section {
            title: title.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Fields>(),
            content: String::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_title_company_name() {
        assert_eq!(title_company_name("Acme OÜ | e-Business Register"), "Acme OÜ");
        assert_eq!(title_company_name("  No separator "), "No separator");
        assert_eq!(title_company_name(""), "");
    }

    #[test]
    fn compose_pulls_mapped_fields() {
        let sections = vec![
            section(
                "General information",
                &[
                    ("Registry code", "14532901"),
                    ("Registered", "18.06.2018"),
                    ("Legal form", "Private limited company"),
                    ("Status", "Entered into the register"),
                ],
            ),
            section("VAT information", &[("VAT number", "EE102090374")]),
        ];
        let record = compose_detail("Acme", &sections, RelationSet::empty(), &FieldMap::default());
        assert_eq!(
            record,
            CompanyDetailRecord {
                company_name: "Acme".to_string(),
                company_number: "14532901".to_string(),
                jurisdiction_ident: "EE102090374".to_string(),
                incorporation_date: "18.06.2018".to_string(),
                dissolution_date: String::new(),
                company_type: "Private limited company".to_string(),
                current_status: "Entered into the register".to_string(),
                more_info_available: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn compose_uses_locale_field_map() {
        let field_map = FieldMap {
            general_section: "Üldandmed".to_string(),
            registry_code: "Registrikood".to_string(),
            ..Default::default()
        };
        let sections = vec![section("Üldandmed", &[("Registrikood", "10000001")])];
        let record = compose_detail("", &sections, RelationSet::empty(), &field_map);
        assert_eq!(record.company_number, "10000001");
    }

    #[test]
    fn compose_without_sections() {
        let record = compose_detail("Acme", &[], RelationSet::empty(), &FieldMap::default());
        assert!(!record.more_info_available);
        assert_eq!(record.company_number, "");
        assert_eq!(record.jurisdiction_ident, "");
    }

    #[test]
    fn failed_relation_collapses_to_empty() {
        let relations = RelationSet {
            officers: Ok(vec![Officer::new("Jane", "CEO")]),
            shareholders: Err(ExtractError::Query {
                relation: "shareholders",
                source: QueryError::new("timeout"),
            }),
            beneficial_owners: Ok(Vec::new()),
        };
        let record = compose_detail("Acme", &[], relations, &FieldMap::default());
        assert_eq!(record.officers.len(), 1);
        assert!(record.shareholders.is_empty());
    }
}
