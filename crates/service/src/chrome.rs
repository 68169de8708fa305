// ABOUTME: BrowserDriver implementation over headless_chrome, one browser process per driver.
// ABOUTME: DOM queries run as page scripts returning JSON so results match what the page renders.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use headless_chrome::protocol::cdp::Page::{CaptureScreenshotFormatOption, Viewport};
use headless_chrome::{Browser, LaunchOptions, Tab};
use regscrape_extract::TableLocator;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::BrowserSettings;
use crate::driver::BrowserDriver;
use crate::error::ServiceError;
use crate::service::Launch;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const JPEG_QUALITY: u32 = 80;

/// Launches a fresh Chrome per lookup.
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher;

impl Launch for ChromeLauncher {
    type Driver = ChromeDriver;

    fn launch(&self, settings: &BrowserSettings) -> Result<ChromeDriver, ServiceError> {
        ChromeDriver::launch(settings)
    }
}

/// A Chrome process with a single tab.
///
/// The process is killed when the driver is dropped.
pub struct ChromeDriver {
    tab: Arc<Tab>,
    // Held so the process lives as long as the tab.
    _browser: Browser,
}

impl ChromeDriver {
    pub fn launch(settings: &BrowserSettings) -> Result<Self, ServiceError> {
        let options = launch_options(settings)?;
        let browser = Browser::new(options).map_err(|e| {
            ServiceError::browser("Launch", "chrome", Some(anyhow!("Failed to launch Chrome: {}", e)))
        })?;
        let tab = browser
            .new_tab()
            .map_err(|e| ServiceError::browser("NewTab", "chrome", Some(e)))?;
        tab.set_user_agent(&settings.user_agent, None, None)
            .map_err(|e| ServiceError::browser("SetUserAgent", &settings.user_agent, Some(e)))?;
        info!(headless = settings.headless, "launched chrome");
        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    /// Evaluates `script` and decodes the JSON string it returns.
    fn eval_json<T: DeserializeOwned>(&self, op: &str, target: &str, script: &str) -> Result<T, ServiceError> {
        let remote = self
            .tab
            .evaluate(script, false)
            .map_err(|e| ServiceError::browser(op, target, Some(e)))?;
        let raw = remote
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| ServiceError::browser(op, target, Some(anyhow!("script returned no value"))))?;
        serde_json::from_str(&raw).map_err(|e| ServiceError::browser(op, target, Some(e.into())))
    }

    /// Polls a boolean page script until it holds or `timeout` elapses.
    fn poll(&self, op: &str, selector: &str, script: &str, timeout: Duration) -> Result<bool, ServiceError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.eval_json::<bool>(op, selector, script)? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!(selector, ?timeout, "wait timed out");
                return Ok(false);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

fn exists_script(selector: &str) -> String {
    format!(
        "JSON.stringify(document.querySelector({}) !== null)",
        js_string(selector)
    )
}

fn visible_script(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (!el) return JSON.stringify(false); \
         const style = window.getComputedStyle(el); const rect = el.getBoundingClientRect(); \
         return JSON.stringify(style.display !== 'none' && style.visibility !== 'hidden' \
         && rect.width > 0 && rect.height > 0); }})()",
        js_string(selector)
    )
}

const LOAD_STATE_SCRIPT: &str =
    "JSON.stringify([document.readyState, performance.getEntriesByType('resource').length])";

fn launch_options(settings: &BrowserSettings) -> Result<LaunchOptions<'static>, ServiceError> {
    let in_container = Path::new("/.dockerenv").exists();
    let path: Option<PathBuf> = settings.chrome_path.clone();
    LaunchOptions::default_builder()
        .headless(settings.headless)
        .sandbox(!in_container)
        .path(path)
        .build()
        .map_err(|e| {
            ServiceError::browser(
                "Launch",
                "chrome",
                Some(anyhow!("Failed to build Chrome launch options: {}", e)),
            )
        })
}

/// Quotes a string as a JavaScript literal.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn table_rows_script(locator: &TableLocator) -> String {
    let cells = "Array.from(t.querySelectorAll('tbody tr')).map(r => Array.from(r.querySelectorAll('td')).map(td => td.textContent || ''))";
    match locator {
        TableLocator::ByStableId(id) => format!(
            "(() => {{ const t = document.getElementById({}); return JSON.stringify(t ? {} : []); }})()",
            js_string(id),
            cells
        ),
        TableLocator::ByHeaderSignature { first_header } => format!(
            "(() => {{ for (const t of document.querySelectorAll('table')) {{ \
             const th = t.querySelector('thead th'); \
             if (th && th.textContent.trim() === {}) return JSON.stringify({}); }} \
             return JSON.stringify([]); }})()",
            js_string(first_header),
            cells
        ),
    }
}

impl BrowserDriver for ChromeDriver {
    fn goto(&self, url: &str) -> Result<(), ServiceError> {
        debug!(url, "navigating");
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| ServiceError::navigation("Goto", url, Some(e)))
    }

    fn title(&self) -> Result<String, ServiceError> {
        self.tab
            .get_title()
            .map_err(|e| ServiceError::browser("Title", "", Some(e)))
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, ServiceError> {
        self.poll("WaitFor", selector, &exists_script(selector), timeout)
    }

    fn wait_for_visible(&self, selector: &str, timeout: Duration) -> Result<bool, ServiceError> {
        self.poll("WaitForVisible", selector, &visible_script(selector), timeout)
    }

    fn wait_for_network_idle(&self, quiet: Duration, timeout: Duration) -> Result<(), ServiceError> {
        let deadline = Instant::now() + timeout;
        let mut last_count: Option<u64> = None;
        let mut quiet_since = Instant::now();
        loop {
            let (state, count): (String, u64) =
                self.eval_json("NetworkIdle", "", LOAD_STATE_SCRIPT)?;
            let now = Instant::now();
            if state != "complete" || last_count != Some(count) {
                last_count = Some(count);
                quiet_since = now;
            } else if now.duration_since(quiet_since) >= quiet {
                return Ok(());
            }
            if now >= deadline {
                debug!(?timeout, "network idle wait gave up");
                return Ok(());
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn fill(&self, selector: &str, text: &str) -> Result<(), ServiceError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return JSON.stringify(false); \
             el.focus(); el.value = {}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return JSON.stringify(true); }})()",
            js_string(selector),
            js_string(text)
        );
        if self.eval_json::<bool>("Fill", selector, &script)? {
            Ok(())
        } else {
            Err(ServiceError::browser("Fill", selector, Some(anyhow!("element not found"))))
        }
    }

    fn click(&self, selector: &str) -> Result<(), ServiceError> {
        self.tab
            .find_element(selector)
            .and_then(|el| el.click().map(|_| ()))
            .map_err(|e| ServiceError::browser("Click", selector, Some(e)))
    }

    fn type_slowly(&self, selector: &str, text: &str, delay: Duration) -> Result<(), ServiceError> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.tab
                .type_str(ch.encode_utf8(&mut buf))
                .map_err(|e| ServiceError::browser("Type", selector, Some(e)))?;
            self.sleep(delay);
        }
        Ok(())
    }

    fn content(&self) -> Result<String, ServiceError> {
        self.tab
            .get_content()
            .map_err(|e| ServiceError::browser("Content", "", Some(e)))
    }

    fn query_texts(&self, selector: &str) -> Result<Vec<String>, ServiceError> {
        let script = format!(
            "JSON.stringify(Array.from(document.querySelectorAll({})).map(el => el.textContent || ''))",
            js_string(selector)
        );
        self.eval_json("QueryTexts", selector, &script)
    }

    fn table_rows(&self, locator: &TableLocator) -> Result<Vec<Vec<String>>, ServiceError> {
        self.eval_json("TableRows", &format!("{:?}", locator), &table_rows_script(locator))
    }

    fn screenshot(&self, path: &Path, full_page: bool) -> Result<(), ServiceError> {
        let target = path.display().to_string();
        let clip = if full_page {
            let (width, height): (f64, f64) = self.eval_json(
                "Screenshot",
                &target,
                "JSON.stringify([document.documentElement.scrollWidth, document.documentElement.scrollHeight])",
            )?;
            Some(Viewport {
                x: 0.0,
                y: 0.0,
                width,
                height,
                scale: 1.0,
            })
        } else {
            None
        };
        let bytes = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Jpeg, Some(JPEG_QUALITY), clip, true)
            .map_err(|e| ServiceError::browser("Screenshot", &target, Some(e)))?;
        std::fs::write(path, bytes)
            .map_err(|e| ServiceError::persist("Screenshot", &target, Some(e.into())))
    }
}
