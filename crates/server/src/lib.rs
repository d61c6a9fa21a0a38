//! leadlog server
//!
//! Provides the `leadlog` binary surfaces: the interactive chat loop, the
//! text summary report and the HTTP dashboard API.

pub mod cli;
pub mod http;
pub mod metrics;
pub mod repl;
pub mod report;
pub mod state;

pub use cli::{Cli, Commands};
pub use http::create_router;
pub use metrics::{init_metrics, init_metrics_listener};
pub use repl::run_repl;
pub use report::SummaryReport;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use leadlog_agent::AgentError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Agent(AgentError::EmptyInput) => StatusCode::BAD_REQUEST,
            ServerError::Agent(AgentError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Metrics(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<leadlog_core::Error> for ServerError {
    fn from(err: leadlog_core::Error) -> Self {
        ServerError::InvalidRequest(err.to_string())
    }
}
