// ABOUTME: Transport-agnostic request handlers for search, autocomplete, complete info, and health.
// ABOUTME: Handlers validate input, call a Lookup, and map outcomes to a status code plus JSON body.

use std::future::Future;

use regscrape_extract::{CompanyDetailRecord, SearchResultEntry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::config::normalize_jurisdiction;
use crate::error::ServiceError;
use crate::flows::Suggestion;

/// The lookups the handlers depend on.
pub trait Lookup: Send + Sync {
    fn search(
        &self,
        jurisdiction: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResultEntry>, ServiceError>> + Send;

    fn autocomplete(
        &self,
        jurisdiction: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Suggestion>, ServiceError>> + Send;

    fn complete_info(
        &self,
        jurisdiction: &str,
        url: &str,
    ) -> impl Future<Output = Result<CompanyDetailRecord, ServiceError>> + Send;
}

/// Body of search and autocomplete requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub jurisdiction_code: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_number: Option<String>,
}

impl SearchRequest {
    /// First non-blank of `company_name` and `company_number`, trimmed.
    pub fn query(&self) -> Option<String> {
        [&self.company_name, &self.company_number]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn jurisdiction(&self) -> String {
        normalize_jurisdiction(self.jurisdiction_code.as_deref())
    }
}

/// Body of complete-info requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRequest {
    #[serde(default)]
    pub jurisdiction_code: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One search hit in the response shape clients consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub jurisdiction_code: String,
    pub company_name: String,
    pub company_number: String,
    pub address: String,
    pub status: String,
    pub url: String,
}

impl CompanySummary {
    pub fn from_entry(jurisdiction: &str, entry: SearchResultEntry) -> Self {
        Self {
            jurisdiction_code: jurisdiction.to_string(),
            company_name: entry.name,
            company_number: entry.registry_code,
            address: entry.address,
            status: entry.status,
            url: entry.url,
        }
    }
}

/// A handler outcome: HTTP-style status and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn missing_query() -> ApiResponse {
    ApiResponse::new(
        400,
        json!({
            "error": "At least one of \"company_name\" or \"company_number\" is required.",
            "example": {
                "jurisdiction_code": "ee",
                "company_name": "Acme OÜ",
                "company_number": "12345678",
            },
        }),
    )
}

fn failure(message: &str, err: &ServiceError) -> ApiResponse {
    error!(error = %err, "{}", message);
    ApiResponse::new(
        500,
        json!({
            "error": message,
            "details": err.to_string(),
        }),
    )
}

fn to_body<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| json!({ "error": err.to_string() }))
}

pub async fn handle_search<L: Lookup>(lookup: &L, req: &SearchRequest) -> ApiResponse {
    let Some(query) = req.query() else {
        return missing_query();
    };
    let jurisdiction = req.jurisdiction();
    info!(%jurisdiction, %query, "search request");

    match lookup.search(&jurisdiction, &query).await {
        Ok(results) if results.is_empty() => ApiResponse::new(
            404,
            json!({ "error": "No companies found.", "query": query }),
        ),
        Ok(results) => {
            let summaries: Vec<CompanySummary> = results
                .into_iter()
                .map(|entry| CompanySummary::from_entry(&jurisdiction, entry))
                .collect();
            ApiResponse::ok(to_body(&summaries))
        }
        Err(err) => failure("Failed to search company.", &err),
    }
}

pub async fn handle_autocomplete<L: Lookup>(
    lookup: &L,
    req: &SearchRequest,
) -> ApiResponse {
    let Some(query) = req.query() else {
        return missing_query();
    };
    let jurisdiction = req.jurisdiction();
    info!(%jurisdiction, %query, "autocomplete request");

    match lookup.autocomplete(&jurisdiction, &query).await {
        Ok(suggestions) if suggestions.is_empty() => ApiResponse::new(
            404,
            json!({ "error": "No autocomplete suggestions found.", "query": query }),
        ),
        Ok(suggestions) => ApiResponse::ok(json!({
            "jurisdiction_code": jurisdiction,
            "query": query,
            "suggestions": to_body(&suggestions),
        })),
        Err(err) => failure("Failed to get suggestions.", &err),
    }
}

/// Checks that `raw` is a non-blank absolute http(s) URL.
fn validate_url(raw: Option<&str>) -> Result<String, ServiceError> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(ServiceError::invalid_request("CompleteInfo", "url", None));
    }
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(raw.to_string()),
        Ok(parsed) => Err(ServiceError::invalid_request(
            "CompleteInfo",
            raw,
            Some(anyhow::anyhow!("unsupported scheme {}", parsed.scheme())),
        )),
        Err(e) => Err(ServiceError::invalid_request("CompleteInfo", raw, Some(e.into()))),
    }
}

pub async fn handle_complete_info<L: Lookup>(lookup: &L, req: &InfoRequest) -> ApiResponse {
    let url = match validate_url(req.url.as_deref()) {
        Ok(url) => url,
        Err(err) => {
            return ApiResponse::new(
                400,
                json!({
                    "error": "\"url\" is required and must be a non-empty string.",
                    "details": err.to_string(),
                }),
            )
        }
    };
    let jurisdiction = normalize_jurisdiction(req.jurisdiction_code.as_deref());
    info!(%jurisdiction, %url, "complete info request");

    match lookup.complete_info(&jurisdiction, &url).await {
        Ok(record) => ApiResponse::ok(to_body(&record)),
        Err(err) => failure("Failed to retrieve company info.", &err),
    }
}

/// Liveness payload with the current UTC time.
pub fn health() -> ApiResponse {
    ApiResponse::ok(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
