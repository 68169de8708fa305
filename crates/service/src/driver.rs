// ABOUTME: The BrowserDriver trait the lookup flows are written against, plus a live-DOM RowSource adapter.
// ABOUTME: Drivers are blocking; callers run them on tokio's blocking pool.

use std::path::Path;
use std::time::Duration;

use regscrape_extract::{QueryError, RowSource, TableLocator};
use tracing::debug;

use crate::config::{PageSelectors, Waits};
use crate::error::ServiceError;

/// One browser page driven by a lookup flow.
///
/// Implementations own the browser process; dropping the driver closes it.
pub trait BrowserDriver: Send {
    fn goto(&self, url: &str) -> Result<(), ServiceError>;

    fn title(&self) -> Result<String, ServiceError>;

    /// Waits until `selector` matches an element.
    ///
    /// `Ok(false)` means the timeout elapsed, which flows treat as "nothing
    /// there" rather than a failure.
    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, ServiceError>;

    /// Like [`BrowserDriver::wait_for`], but the element must also be rendered
    /// and not hidden.
    fn wait_for_visible(&self, selector: &str, timeout: Duration) -> Result<bool, ServiceError>;

    /// Waits until the page has finished loading and no new resources
    /// arrived for `quiet`. Gives up silently after `timeout`.
    fn wait_for_network_idle(&self, quiet: Duration, timeout: Duration) -> Result<(), ServiceError> {
        let _ = timeout;
        self.sleep(quiet);
        Ok(())
    }

    /// Replaces the value of an input element.
    fn fill(&self, selector: &str, text: &str) -> Result<(), ServiceError>;

    fn click(&self, selector: &str) -> Result<(), ServiceError>;

    /// Types `text` into the focused element one character at a time.
    fn type_slowly(&self, selector: &str, text: &str, delay: Duration) -> Result<(), ServiceError>;

    /// Serialized HTML of the rendered document.
    fn content(&self) -> Result<String, ServiceError>;

    /// Text content of every element matching `selector`, in document order.
    fn query_texts(&self, selector: &str) -> Result<Vec<String>, ServiceError>;

    /// Body rows of the located table as cell texts; empty when absent.
    fn table_rows(&self, locator: &TableLocator) -> Result<Vec<Vec<String>>, ServiceError>;

    /// Writes a JPEG screenshot to `path`.
    fn screenshot(&self, path: &Path, full_page: bool) -> Result<(), ServiceError>;

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Reads relation tables from the live DOM of a driver.
pub struct LiveRows<'a> {
    driver: &'a dyn BrowserDriver,
}

impl<'a> LiveRows<'a> {
    pub fn new(driver: &'a dyn BrowserDriver) -> Self {
        Self { driver }
    }
}

impl RowSource for LiveRows<'_> {
    fn rows(&self, locator: &TableLocator) -> Result<Vec<Vec<String>>, QueryError> {
        self.driver
            .table_rows(locator)
            .map_err(|err| QueryError::new(err.to_string()))
    }
}

/// Clicks the cookie consent button if it shows up; a missing banner is fine.
pub fn accept_cookies_if_present(
    driver: &dyn BrowserDriver,
    page: &PageSelectors,
    waits: &Waits,
) -> Result<(), ServiceError> {
    if driver.wait_for(&page.cookie_button, waits.cookie_banner)? {
        driver.click(&page.cookie_button)?;
        driver.sleep(waits.after_cookies);
        debug!(selector = %page.cookie_button, "accepted cookie banner");
    }
    Ok(())
}
