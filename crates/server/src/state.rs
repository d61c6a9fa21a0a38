//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use leadlog_config::Settings;
use leadlog_llm::LlmBackend;
use leadlog_persistence::EventStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// Event log read by the dashboard endpoints
    pub store: Arc<dyn EventStore>,
    /// Chat backend, queried by the health check only
    pub backend: Option<Arc<dyn LlmBackend>>,
    /// Prometheus recorder handle; `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Settings, store: Arc<dyn EventStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            backend: None,
            metrics: None,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
