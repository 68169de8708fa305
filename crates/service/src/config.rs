// ABOUTME: Service configuration: jurisdiction endpoints, page selectors, browser settings, waits, and data folder.
// ABOUTME: Every value can be overridden from the environment; from_lookup keeps resolution testable.

use std::path::PathBuf;
use std::time::Duration;

use regscrape_extract::{ExtractConfig, FieldMap, DEFAULT_SECTIONS};

pub const DEFAULT_JURISDICTION: &str = "ee";

pub const DEFAULT_PORT: u16 = 6666;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Registry endpoints of one jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: &'static str,
    pub search_url: &'static str,
}

/// ISO 3166-1 alpha-2 keyed registry endpoints.
const JURISDICTIONS: &[(&str, Endpoints)] = &[
    (
        "ee",
        Endpoints {
            base_url: "https://ariregister.rik.ee",
            search_url: "https://ariregister.rik.ee/eng",
        },
    ),
    (
        "lv",
        Endpoints {
            base_url: "https://www.ur.gov.lv",
            search_url: "https://www.ur.gov.lv/lv/search",
        },
    ),
    (
        "lt",
        Endpoints {
            base_url: "https://www.registrucentras.lt",
            search_url: "https://www.registrucentras.lt/jar/paieska",
        },
    ),
    (
        "fi",
        Endpoints {
            base_url: "https://www.ytj.fi",
            search_url: "https://www.ytj.fi/en/yrityshaku",
        },
    ),
    (
        "se",
        Endpoints {
            base_url: "https://www.bolagsverket.se",
            search_url: "https://www.bolagsverket.se/en/foretagsinformation/foretagsregister",
        },
    ),
    (
        "dk",
        Endpoints {
            base_url: "https://datacvr.virk.dk",
            search_url: "https://datacvr.virk.dk/data/visenhed",
        },
    ),
    (
        "no",
        Endpoints {
            base_url: "https://www.brreg.no",
            search_url: "https://w2.brreg.no/enhet/sok",
        },
    ),
    (
        "de",
        Endpoints {
            base_url: "https://www.handelsregister.de",
            search_url: "https://www.handelsregister.de/rp_web/mask.do?Typ=e",
        },
    ),
    (
        "pl",
        Endpoints {
            base_url: "https://ekrs.ms.gov.pl",
            search_url: "https://ekrs.ms.gov.pl/rdf/podmioty",
        },
    ),
];

/// Lowercased jurisdiction code, `ee` when missing or blank.
pub fn normalize_jurisdiction(code: Option<&str>) -> String {
    match code.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_lowercase(),
        _ => DEFAULT_JURISDICTION.to_string(),
    }
}

/// Endpoints for a jurisdiction code; unknown codes get the Estonian registry.
pub fn endpoints(code: &str) -> Endpoints {
    let code = code.to_lowercase();
    JURISDICTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, e)| *e)
        .unwrap_or(JURISDICTIONS[0].1)
}

/// Selectors for the interactive parts of the registry pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors {
    pub search_input: String,
    pub search_button: String,
    pub autocomplete_dropdown: String,
    pub autocomplete_item: String,
    pub cookie_button: String,
    /// Present once a detail page has rendered its content.
    pub detail_ready: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            search_input: "input#company_search".to_string(),
            search_button: "button.btn-search".to_string(),
            autocomplete_dropdown: ".typeahead[role='listbox']".to_string(),
            autocomplete_item: ".typeahead [role='option']".to_string(),
            cookie_button: "button#accept-cookies".to_string(),
            detail_ready: ".card-body".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub headless: bool,
    pub user_agent: String,
    /// Chrome binary; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_path: None,
        }
    }
}

/// Wait budgets and settle delays for browser flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waits {
    pub search_input: Duration,
    pub results: Duration,
    pub autocomplete: Duration,
    pub detail: Duration,
    pub cookie_banner: Duration,
    pub after_search: Duration,
    pub after_cookies: Duration,
    pub typing_delay: Duration,
    /// Resource-quiet window that counts as network idle on detail pages.
    pub network_quiet: Duration,
    /// Upper bound on waiting for network idle.
    pub network_idle: Duration,
}

impl Default for Waits {
    fn default() -> Self {
        Self {
            search_input: Duration::from_secs(30),
            results: Duration::from_secs(5),
            autocomplete: Duration::from_secs(4),
            detail: Duration::from_secs(15),
            cookie_banner: Duration::from_secs(2),
            after_search: Duration::from_millis(1500),
            after_cookies: Duration::from_millis(800),
            typing_delay: Duration::from_millis(80),
            network_quiet: Duration::from_millis(500),
            network_idle: Duration::from_secs(10),
        }
    }
}

impl Waits {
    /// All waits and delays zeroed, for scripted drivers.
    pub fn none() -> Self {
        Self {
            search_input: Duration::ZERO,
            results: Duration::ZERO,
            autocomplete: Duration::ZERO,
            detail: Duration::ZERO,
            cookie_banner: Duration::ZERO,
            after_search: Duration::ZERO,
            after_cookies: Duration::ZERO,
            typing_delay: Duration::ZERO,
            network_quiet: Duration::ZERO,
            network_idle: Duration::ZERO,
        }
    }
}

/// Everything one lookup request needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub jurisdiction: String,
    pub search_url: String,
    pub extract: ExtractConfig,
    pub page: PageSelectors,
    pub browser: BrowserSettings,
    pub waits: Waits,
    pub data_folder: PathBuf,
}

impl ServiceConfig {
    /// Configuration for `jurisdiction` with process environment overrides.
    pub fn from_env(jurisdiction: &str) -> Self {
        Self::from_lookup(jurisdiction, |key| std::env::var(key).ok())
    }

    /// Configuration for `jurisdiction`, reading overrides through `lookup`.
    pub fn from_lookup<F>(jurisdiction: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let jurisdiction = normalize_jurisdiction(Some(jurisdiction));
        let endpoints = endpoints(&jurisdiction);
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let wanted_sections = parse_sections(lookup("WANTED_SECTIONS").as_deref());
        let field_defaults = FieldMap::default();
        let field_map = FieldMap {
            registry_code: var("FIELD_REGISTRY_CODE", &field_defaults.registry_code),
            vat_number: var("FIELD_VAT_NUMBER", &field_defaults.vat_number),
            incorporated: var("FIELD_INCORPORATED", &field_defaults.incorporated),
            legal_form: var("FIELD_LEGAL_FORM", &field_defaults.legal_form),
            status: var("FIELD_STATUS", &field_defaults.status),
            ..field_defaults
        };
        let extract = ExtractConfig::new(var("BASE_URL", endpoints.base_url))
            .with_sections(wanted_sections)
            .with_field_map(field_map);

        let page_defaults = PageSelectors::default();
        let page = PageSelectors {
            search_input: var("SELECTOR_SEARCH_INPUT", &page_defaults.search_input),
            search_button: var("SELECTOR_SEARCH_BUTTON", &page_defaults.search_button),
            autocomplete_dropdown: var(
                "SELECTOR_AUTOCOMPLETE_DROPDOWN",
                &page_defaults.autocomplete_dropdown,
            ),
            autocomplete_item: var("SELECTOR_AUTOCOMPLETE_ITEM", &page_defaults.autocomplete_item),
            ..page_defaults
        };

        let browser = BrowserSettings {
            headless: lookup("BROWSER_HEADLESS").as_deref() != Some("false"),
            user_agent: var("USER_AGENT", DEFAULT_USER_AGENT),
            chrome_path: lookup("CHROME_PATH").map(PathBuf::from),
        };

        Self {
            search_url: var("SEARCH_URL", endpoints.search_url),
            jurisdiction,
            extract,
            page,
            browser,
            waits: Waits::default(),
            data_folder: PathBuf::from(var("DATA_FOLDER", "../data")),
        }
    }
}

/// HTTP port from `PORT`, falling back to 6666 when unset or unparsable.
pub fn port_from_lookup<F>(lookup: F) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    lookup("PORT")
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn port_from_env() -> u16 {
    port_from_lookup(|key| std::env::var(key).ok())
}

/// Comma-separated section list; blank or missing means the defaults.
fn parse_sections(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if parsed.is_empty() {
        DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        parsed
    }
}
