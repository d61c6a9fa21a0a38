//! Prometheus metrics
//!
//! Counters are recorded where events happen (ingestion, chat); this module
//! installs the recorder. Serve mode renders it at `/metrics`, chat mode runs a
//! standalone scrape listener.

use std::net::SocketAddr;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;
use crate::ServerError;

/// Install the global Prometheus recorder. Call once per process.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;
    describe_metrics();
    Ok(handle)
}

/// Install the global recorder behind its own HTTP listener on `addr`.
///
/// Must be called inside a Tokio runtime; the listener runs as a task.
pub fn init_metrics_listener(addr: SocketAddr) -> Result<(), ServerError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;
    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    metrics::describe_counter!(
        "leadlog_events_ingested_total",
        "Messages classified and written to the event log"
    );
    metrics::describe_counter!(
        "leadlog_ingest_failures_total",
        "Messages rejected or not persisted, by reason"
    );
    metrics::describe_counter!(
        "leadlog_chat_failures_total",
        "Chat backend calls answered with the offline reply"
    );
    metrics::describe_histogram!("leadlog_lead_score", "Lead score of ingested messages");
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            "metrics disabled\n".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use leadlog_agent::IngestionPipeline;
    use leadlog_persistence::InMemoryEventStore;

    #[test]
    fn test_ingestion_is_counted_by_prometheus_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let pipeline = IngestionPipeline::new(Arc::new(InMemoryEventStore::new()));
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                pipeline.ingest("Can we book a demo? Looks great", &at).await.unwrap();
                pipeline.ingest("Can we book a demo? Looks great", &at).await.unwrap();
                assert!(pipeline.ingest("   ", &at).await.is_err());
            })
        });

        let rendered = handle.render();
        let ingested = rendered
            .lines()
            .find(|line| line.starts_with("leadlog_events_ingested_total{"))
            .unwrap();
        assert!(ingested.contains("intent=\"demo_request\""));
        assert!(ingested.contains("sentiment=\"positive\""));
        assert!(ingested.ends_with(" 2"));

        assert!(rendered
            .lines()
            .any(|line| line.starts_with("leadlog_ingest_failures_total{reason=\"empty_input\"} 1")));
        assert!(rendered.contains("leadlog_lead_score"));
    }
}
