// ABOUTME: RegistryService runs lookup flows on tokio's blocking pool with a fresh browser per request.
// ABOUTME: Implements the Lookup trait consumed by the API handlers.

use std::sync::Arc;

use regscrape_extract::{CompanyDetailRecord, SearchResultEntry};
use tracing::debug;

use crate::api::Lookup;
use crate::config::{BrowserSettings, ServiceConfig};
use crate::driver::BrowserDriver;
use crate::error::ServiceError;
use crate::flows::{self, Suggestion};

/// Starts a browser for one lookup.
pub trait Launch: Send + Sync + 'static {
    type Driver: BrowserDriver + 'static;

    fn launch(&self, settings: &BrowserSettings) -> Result<Self::Driver, ServiceError>;
}

type ConfigFn = dyn Fn(&str) -> ServiceConfig + Send + Sync;

/// Lookup service backed by a browser launcher.
///
/// Requests share nothing: each one resolves its configuration, launches a
/// browser, runs one flow, and drops the browser.
pub struct RegistryService<L: Launch> {
    launcher: Arc<L>,
    config_fn: Arc<ConfigFn>,
}

impl<L: Launch> Clone for RegistryService<L> {
    fn clone(&self) -> Self {
        Self {
            launcher: Arc::clone(&self.launcher),
            config_fn: Arc::clone(&self.config_fn),
        }
    }
}

impl<L: Launch> RegistryService<L> {
    /// Service reading its configuration from the environment per request.
    pub fn new(launcher: L) -> Self {
        Self::with_config_fn(launcher, ServiceConfig::from_env)
    }

    /// Service resolving configuration through `config_fn`.
    pub fn with_config_fn<F>(launcher: L, config_fn: F) -> Self
    where
        F: Fn(&str) -> ServiceConfig + Send + Sync + 'static,
    {
        Self {
            launcher: Arc::new(launcher),
            config_fn: Arc::new(config_fn),
        }
    }

    pub fn config_for(&self, jurisdiction: &str) -> ServiceConfig {
        (self.config_fn)(jurisdiction)
    }

    async fn run<T, F>(&self, jurisdiction: &str, flow: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn BrowserDriver, &ServiceConfig) -> Result<T, ServiceError> + Send + 'static,
    {
        let config = self.config_for(jurisdiction);
        let launcher = Arc::clone(&self.launcher);
        debug!(jurisdiction = %config.jurisdiction, "starting lookup");
        tokio::task::spawn_blocking(move || {
            let driver = launcher.launch(&config.browser)?;
            flow(&driver, &config)
        })
        .await
        .map_err(|e| ServiceError::browser("Join", jurisdiction, Some(e.into())))?
    }
}

impl<L: Launch> Lookup for RegistryService<L> {
    async fn search(
        &self,
        jurisdiction: &str,
        query: &str,
    ) -> Result<Vec<SearchResultEntry>, ServiceError> {
        let query = query.to_string();
        self.run(jurisdiction, move |driver, config| {
            flows::search_company(driver, config, &query)
        })
        .await
    }

    async fn autocomplete(
        &self,
        jurisdiction: &str,
        query: &str,
    ) -> Result<Vec<Suggestion>, ServiceError> {
        let query = query.to_string();
        self.run(jurisdiction, move |driver, config| {
            flows::autocomplete(driver, config, &query)
        })
        .await
    }

    async fn complete_info(
        &self,
        jurisdiction: &str,
        url: &str,
    ) -> Result<CompanyDetailRecord, ServiceError> {
        let url = url.to_string();
        self.run(jurisdiction, move |driver, config| {
            flows::complete_info(driver, config, &url)
        })
        .await
    }
}
