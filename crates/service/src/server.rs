// ABOUTME: HTTP front end: an axum router mapping the registry routes onto the API handlers.
// ABOUTME: Request bodies are JSON; each ApiResponse becomes its status code plus a JSON body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{
    handle_autocomplete, handle_complete_info, handle_search, health, ApiResponse, InfoRequest,
    Lookup, SearchRequest,
};
use crate::error::ServiceError;

pub const SEARCH_ROUTE: &str = "/getCompanyByNameOrNumber";
pub const AUTOCOMPLETE_ROUTE: &str = "/getAutocompleteSuggestions";
pub const COMPLETE_INFO_ROUTE: &str = "/getCompleteInfo";
pub const HEALTH_ROUTE: &str = "/health";

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

/// Decodes a JSON body; an empty or malformed body reads as an empty
/// request, which the handlers reject with 400.
fn decode<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|err| {
        warn!(error = %err, "unreadable request body");
        T::default()
    })
}

async fn search_route<L: Lookup + 'static>(State(lookup): State<Arc<L>>, body: Bytes) -> ApiResponse {
    let req: SearchRequest = decode(&body);
    handle_search(lookup.as_ref(), &req).await
}

async fn autocomplete_route<L: Lookup + 'static>(
    State(lookup): State<Arc<L>>,
    body: Bytes,
) -> ApiResponse {
    let req: SearchRequest = decode(&body);
    handle_autocomplete(lookup.as_ref(), &req).await
}

async fn complete_info_route<L: Lookup + 'static>(
    State(lookup): State<Arc<L>>,
    body: Bytes,
) -> ApiResponse {
    let req: InfoRequest = decode(&body);
    handle_complete_info(lookup.as_ref(), &req).await
}

async fn health_route() -> ApiResponse {
    health()
}

/// Router serving the three lookup routes and the health check.
pub fn router<L: Lookup + 'static>(lookup: Arc<L>) -> Router {
    Router::new()
        .route(SEARCH_ROUTE, post(search_route::<L>))
        .route(AUTOCOMPLETE_ROUTE, post(autocomplete_route::<L>))
        .route(COMPLETE_INFO_ROUTE, post(complete_info_route::<L>))
        .route(HEALTH_ROUTE, get(health_route))
        .with_state(lookup)
}

/// Serves `lookup` on all interfaces at `port` until the process stops.
pub async fn serve<L: Lookup + 'static>(lookup: L, port: u16) -> Result<(), ServiceError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServiceError::server("Bind", addr.to_string(), Some(e.into())))?;
    info!(%addr, "listening");
    for route in [SEARCH_ROUTE, AUTOCOMPLETE_ROUTE, COMPLETE_INFO_ROUTE] {
        info!("  POST http://localhost:{}{}", port, route);
    }
    info!("  GET  http://localhost:{}{}", port, HEALTH_ROUTE);

    axum::serve(listener, router(Arc::new(lookup)))
        .await
        .map_err(|e| ServiceError::server("Serve", addr.to_string(), Some(e.into())))
}
