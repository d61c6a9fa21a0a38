//! HTTP Endpoints
//!
//! Read-only dashboard API over the event log.

use axum::{
    extract::{Json, Query, State},
    http::{HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use leadlog_agent::{summarize, EventFilter, Summary};
use leadlog_core::Event;

use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::ServerError;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        .route("/api/summary", get(get_summary))
        .route("/api/events", get(list_events))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty or all invalid, allows localhost:3000 only
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        }
        return cors.allow_origin(HeaderValue::from_static(DEFAULT_CORS_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    cors.allow_origin(parsed_origins)
}

/// Comma-separated label filters, e.g. `?intent=pricing,support&sentiment=negative`
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub intent: Option<String>,
    pub sentiment: Option<String>,
}

/// Dashboard summary of the event log
async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, ServerError> {
    let filter = EventFilter::parse(query.intent.as_deref(), query.sentiment.as_deref())?;
    let events = state.store.load().await;
    Ok(Json(summarize(&events, &filter)))
}

/// Raw event log in arrival order
async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.store.load().await)
}

/// Health check
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let event_count = state.store.load().await.len();

    let chat_backend = match &state.backend {
        Some(backend) => {
            let available = backend.is_available().await;
            serde_json::json!({
                "status": if available { "ok" } else { "unavailable" },
                "model": backend.model_name(),
            })
        },
        None => serde_json::json!({ "status": "not_configured" }),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "data_file": state.config.storage.data_file,
            "event_count": event_count,
            "chat_backend": chat_backend,
        })),
    )
}
