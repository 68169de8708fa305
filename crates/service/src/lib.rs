// ABOUTME: Lookup service for company registries: browser-driven flows, persistence, and API handlers.
// ABOUTME: Re-exports the service surface built on top of the regscrape-extract engine.

//! Company-registry lookup service.
//!
//! The service drives a registry website through a [`BrowserDriver`],
//! hands rendered HTML to [`regscrape_extract`], persists a snapshot of each
//! lookup, and exposes handlers in [`api`] that [`server`] serves over HTTP.

pub mod api;
pub mod chrome;
pub mod config;
pub mod driver;
pub mod error;
pub mod flows;
pub mod persist;
pub mod server;
pub mod service;

pub use crate::api::{
    handle_autocomplete, handle_complete_info, handle_search, health, ApiResponse,
    CompanySummary, InfoRequest, Lookup, SearchRequest,
};
pub use crate::chrome::{ChromeDriver, ChromeLauncher};
pub use crate::config::{
    endpoints, normalize_jurisdiction, port_from_env, port_from_lookup, BrowserSettings,
    Endpoints, PageSelectors, ServiceConfig, Waits, DEFAULT_JURISDICTION, DEFAULT_PORT,
};
pub use crate::driver::{accept_cookies_if_present, BrowserDriver, LiveRows};
pub use crate::error::{ErrorCode, ServiceError};
pub use crate::flows::{autocomplete, complete_info, search_company, Suggestion};
pub use crate::persist::{output_folder, sanitize_filename, save_json};
pub use crate::server::{router, serve};
pub use crate::service::{Launch, RegistryService};
