// HTTP trigger for the scrape job

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue};
use axum::http::{HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tourscout_core::data::Database;
use tourscout_core::scrape::{ScrapeOptions, run_scrape};
use tourscout_scanner::Fetcher;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Shared state for the HTTP handlers.
pub struct AppState {
    pub db: Mutex<Database>,
    pub fetcher: Fetcher,
    pub options: ScrapeOptions,
}

impl AppState {
    pub fn new(db: Database, fetcher: Fetcher, options: ScrapeOptions) -> Self {
        Self {
            db: Mutex::new(db),
            fetcher,
            options,
        }
    }
}

/// Optional trigger body. Only logged.
#[derive(Debug, Default, Deserialize)]
pub struct TriggerRequest {
    #[serde(default)]
    pub manual_trigger: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    pub message: String,
    pub total_items: usize,
    pub sites: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("content-type"),
        ]);

    Router::new()
        .route(
            "/scrape-tourism-data",
            get(scrape_handler).post(scrape_handler).options(preflight),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("tourscout listening on http://{}", addr);

    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn scrape_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let trigger = parse_trigger(&body);
    info!(
        manual_trigger = ?trigger.manual_trigger,
        timestamp = ?trigger.timestamp,
        "Starting tourism data scraping"
    );

    match run_scrape(&state.db, &state.fetcher, &state.options, None).await {
        Ok(summary) => {
            let response = ScrapeResponse {
                success: true,
                message: summary.message(),
                total_items: summary.total_items,
                sites: summary.sites,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Scraping error: {}", e);
            let body = ErrorBody {
                success: false,
                error: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Malformed or empty bodies fall back to an empty trigger.
pub fn parse_trigger(body: &[u8]) -> TriggerRequest {
    if body.iter().all(u8::is_ascii_whitespace) {
        return TriggerRequest::default();
    }
    serde_json::from_slice(body).unwrap_or_default()
}
