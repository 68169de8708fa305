// ABOUTME: Text and URL normalization helpers shared by every extractor.
// ABOUTME: Whitespace collapsing (including non-breaking spaces), element text, and root-relative URL resolution.

use scraper::ElementRef;

/// Collapses every run of whitespace into a single ASCII space and trims.
///
/// Uses Unicode whitespace, so U+00A0 (non-breaking space) folds too.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves an href against the registry origin.
///
/// Returns `None` for an empty href or a bare `#`. Root-relative paths are
/// appended to `base_url`; anything else is returned verbatim.
pub fn resolve_url(href: &str, base_url: &str) -> Option<String> {
    if href.is_empty() || href == "#" {
        return None;
    }
    if href.starts_with('/') {
        return Some(format!("{}{}", base_url, href));
    }
    Some(href.to_string())
}

/// Concatenated descendant text of an element, untouched.
pub fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>()
}

/// Descendant text, trimmed at both ends.
pub fn trimmed_text(el: &ElementRef) -> String {
    element_text(el).trim().to_string()
}

/// Descendant text with whitespace collapsed.
pub fn collapsed_text(el: &ElementRef) -> String {
    normalize_whitespace(&element_text(el))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello   world  "), "hello world");
        assert_eq!(normalize_whitespace("no\textra\nspaces"), "no extra spaces");
        assert_eq!(normalize_whitespace("a\u{00A0}\u{00A0}b"), "a b");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve_url("/company/123/Foo", "https://example.test"),
            Some("https://example.test/company/123/Foo".to_string())
        );
    }

    #[test]
    fn test_resolve_placeholder_is_absent() {
        assert_eq!(resolve_url("#", "https://example.test"), None);
        assert_eq!(resolve_url("", "https://example.test"), None);
    }

    #[test]
    fn test_resolve_passes_through_other_hrefs() {
        assert_eq!(
            resolve_url("https://other.test/x", "https://example.test"),
            Some("https://other.test/x".to_string())
        );
        assert_eq!(
            resolve_url("relative/path", "https://example.test"),
            Some("relative/path".to_string())
        );
        assert_eq!(
            resolve_url("#anchor", "https://example.test"),
            Some("#anchor".to_string())
        );
    }

    #[test]
    fn test_element_text_variants() {
        let doc = Html::parse_fragment("<p>  One <b>two</b>\n\tthree&nbsp; </p>");
        let sel = Selector::parse("p").unwrap();
        let p = doc.select(&sel).next().unwrap();
        assert_eq!(trimmed_text(&p), "One two\n\tthree");
        assert_eq!(collapsed_text(&p), "One two three");
    }
}
