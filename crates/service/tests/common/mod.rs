// ABOUTME: Scripted BrowserDriver for service tests, serving static HTML pages instead of a real browser.
// ABOUTME: Also a canned Lookup for handler and route tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use regscrape_extract::{CompanyDetailRecord, RowSource, SearchResultEntry, StaticRows, TableLocator};
use regscrape_service::{BrowserDriver, Lookup, ServiceConfig, ServiceError, Suggestion, Waits};
use scraper::{ElementRef, Html, Selector};

pub const SEARCH_URL: &str = "https://ariregister.rik.ee/eng";

pub const SEARCH_PAGE: &str = r#"<html><head><title>Search | e-Business Register</title></head><body>
    <div class="cookie-banner"><button id="accept-cookies">Accept</button></div>
    <form><input id="company_search" name="q"><button class="btn-search" type="submit">Search</button></form>
</body></html>"#;

pub const EMPTY_RESULTS_PAGE: &str = r#"<html><head><title>Search | e-Business Register</title></head><body>
    <input id="company_search" name="q"><p>Nothing found.</p>
</body></html>"#;

pub const DROPDOWN_PAGE: &str = r#"<html><head><title>Search | e-Business Register</title></head><body>
    <input id="company_search" name="q">
    <div class="typeahead" role="listbox">
        <div role="option">  Bolt   Operations OÜ </div>
        <div role="option"> </div>
        <div role="option">Bolt Services EE OÜ</div>
    </div>
</body></html>"#;

pub const HIDDEN_DROPDOWN_PAGE: &str = r#"<html><head><title>Search | e-Business Register</title></head><body>
    <input id="company_search" name="q">
    <div class="typeahead" role="listbox" style="display: none">
        <div role="option">Stale suggestion</div>
    </div>
</body></html>"#;

/// Load an HTML snapshot shared with the extraction engine's tests.
pub fn load_html_fixture(name: &str) -> String {
    let path = format!(
        "{}/../extract/tests/fixtures/html/{}.html",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read HTML fixture: {}", path))
}

/// Configuration for Estonia with no waits, writing into `data_folder`.
pub fn test_config(data_folder: &Path) -> ServiceConfig {
    let folder = data_folder.display().to_string();
    let mut config = ServiceConfig::from_lookup("ee", move |key| match key {
        "DATA_FOLDER" => Some(folder.clone()),
        _ => None,
    });
    config.waits = Waits::none();
    config
}

#[derive(Default)]
pub struct ScriptedDriver {
    pages: HashMap<String, String>,
    after_click: HashMap<String, String>,
    after_typing: Option<String>,
    fail_tables: bool,
    current: Mutex<String>,
    pub clicks: Mutex<Vec<String>>,
    pub filled: Mutex<Vec<(String, String)>>,
    pub typed: Mutex<String>,
    pub screenshots: Mutex<Vec<(PathBuf, bool)>>,
    pub idle_waits: Mutex<usize>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Page shown after clicking `selector`.
    pub fn on_click(mut self, selector: &str, html: impl Into<String>) -> Self {
        self.after_click.insert(selector.to_string(), html.into());
        self
    }

    /// Page shown once something has been typed.
    pub fn on_typing(mut self, html: impl Into<String>) -> Self {
        self.after_typing = Some(html.into());
        self
    }

    pub fn failing_tables(mut self) -> Self {
        self.fail_tables = true;
        self
    }

    fn current(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn show(&self, html: &str) {
        *self.current.lock().unwrap() = html.to_string();
    }
}

/// Hidden through the `hidden` attribute or an inline style, on the element
/// or any ancestor.
fn is_hidden(el: &ElementRef) -> bool {
    std::iter::once(*el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .any(|node| {
            let style = node
                .value()
                .attr("style")
                .unwrap_or("")
                .replace(' ', "")
                .to_lowercase();
            node.value().attr("hidden").is_some()
                || style.contains("display:none")
                || style.contains("visibility:hidden")
        })
}

fn parse_selector(selector: &str) -> Result<Selector, ServiceError> {
    Selector::parse(selector).map_err(|e| {
        ServiceError::browser("Selector", selector, Some(anyhow::anyhow!("{:?}", e)))
    })
}

impl BrowserDriver for ScriptedDriver {
    fn goto(&self, url: &str) -> Result<(), ServiceError> {
        match self.pages.get(url) {
            Some(html) => {
                self.show(html);
                Ok(())
            }
            None => Err(ServiceError::navigation(
                "Goto",
                url,
                Some(anyhow::anyhow!("net::ERR_NAME_NOT_RESOLVED")),
            )),
        }
    }

    fn title(&self) -> Result<String, ServiceError> {
        let doc = Html::parse_document(&self.current());
        let title = parse_selector("title")?;
        Ok(doc
            .select(&title)
            .next()
            .map(|t| t.text().collect::<String>())
            .unwrap_or_default())
    }

    fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<bool, ServiceError> {
        let doc = Html::parse_document(&self.current());
        let sel = parse_selector(selector)?;
        let found = doc.select(&sel).next().is_some();
        Ok(found)
    }

    fn wait_for_visible(&self, selector: &str, _timeout: Duration) -> Result<bool, ServiceError> {
        let doc = Html::parse_document(&self.current());
        let sel = parse_selector(selector)?;
        let found = doc.select(&sel).next().is_some_and(|el| !is_hidden(&el));
        Ok(found)
    }

    fn wait_for_network_idle(&self, _quiet: Duration, _timeout: Duration) -> Result<(), ServiceError> {
        *self.idle_waits.lock().unwrap() += 1;
        Ok(())
    }

    fn fill(&self, selector: &str, text: &str) -> Result<(), ServiceError> {
        self.filled
            .lock()
            .unwrap()
            .push((selector.to_string(), text.to_string()));
        Ok(())
    }

    fn click(&self, selector: &str) -> Result<(), ServiceError> {
        self.clicks.lock().unwrap().push(selector.to_string());
        if let Some(next) = self.after_click.get(selector) {
            self.show(next);
        }
        Ok(())
    }

    fn type_slowly(&self, _selector: &str, text: &str, _delay: Duration) -> Result<(), ServiceError> {
        self.typed.lock().unwrap().push_str(text);
        if let Some(next) = &self.after_typing {
            self.show(next);
        }
        Ok(())
    }

    fn content(&self) -> Result<String, ServiceError> {
        Ok(self.current())
    }

    fn query_texts(&self, selector: &str) -> Result<Vec<String>, ServiceError> {
        let doc = Html::parse_document(&self.current());
        let sel = parse_selector(selector)?;
        Ok(doc
            .select(&sel)
            .map(|el| el.text().collect::<String>())
            .collect())
    }

    fn table_rows(&self, locator: &TableLocator) -> Result<Vec<Vec<String>>, ServiceError> {
        if self.fail_tables {
            return Err(ServiceError::browser(
                "TableRows",
                format!("{:?}", locator),
                Some(anyhow::anyhow!("Execution context was destroyed")),
            ));
        }
        let doc = Html::parse_document(&self.current());
        StaticRows::new(&doc)
            .rows(locator)
            .map_err(|e| ServiceError::browser("TableRows", "", Some(e.into())))
    }

    fn screenshot(&self, path: &Path, full_page: bool) -> Result<(), ServiceError> {
        fs::write(path, b"\xFF\xD8\xFF").map_err(|e| {
            ServiceError::persist("Screenshot", path.display().to_string(), Some(e.into()))
        })?;
        self.screenshots
            .lock()
            .unwrap()
            .push((path.to_path_buf(), full_page));
        Ok(())
    }
}

/// The dated snapshot folder for `jurisdiction` under `data_folder`.
pub fn snapshot_dir(data_folder: &Path, jurisdiction: &str) -> PathBuf {
    data_folder
        .join(chrono::Utc::now().format("%Y-%m-%d").to_string())
        .join(jurisdiction)
}

/// Lookup returning canned results, or failing every call.
#[derive(Default)]
pub struct FakeLookup {
    pub results: Vec<SearchResultEntry>,
    pub suggestions: Vec<Suggestion>,
    pub fail: bool,
}

impl FakeLookup {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn check(&self, op: &str, target: &str) -> Result<(), ServiceError> {
        if self.fail {
            Err(ServiceError::navigation(
                op,
                target,
                Some(anyhow::anyhow!("net::ERR_CONNECTION_REFUSED")),
            ))
        } else {
            Ok(())
        }
    }
}

impl Lookup for FakeLookup {
    async fn search(
        &self,
        _jurisdiction: &str,
        query: &str,
    ) -> Result<Vec<SearchResultEntry>, ServiceError> {
        self.check("Search", query)?;
        Ok(self.results.clone())
    }

    async fn autocomplete(
        &self,
        _jurisdiction: &str,
        query: &str,
    ) -> Result<Vec<Suggestion>, ServiceError> {
        self.check("Autocomplete", query)?;
        Ok(self.suggestions.clone())
    }

    async fn complete_info(
        &self,
        _jurisdiction: &str,
        url: &str,
    ) -> Result<CompanyDetailRecord, ServiceError> {
        self.check("Goto", url)?;
        Ok(CompanyDetailRecord {
            company_name: "Acme OÜ".to_string(),
            company_number: "12345678".to_string(),
            ..Default::default()
        })
    }
}
