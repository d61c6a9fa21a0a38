//! Lead signal agent
//!
//! Features:
//! - Keyword-rule intent and sentiment classification
//! - Lead scoring with a recommended next action
//! - Ingestion of messages into the event log
//! - Dashboard aggregation over the log
//! - Interactive chat session that logs every message before replying

pub mod analytics;
pub mod classifier;
pub mod ingestion;
pub mod lead_scoring;
pub mod session;

pub use analytics::{
    intent_distribution, score_histogram, sentiment_breakdown, summarize, EventFilter,
    LabelCount, ScoreBin, Summary, HISTOGRAM_BINS,
};
pub use classifier::{classify_intent, classify_sentiment};
pub use ingestion::{IngestionPipeline, MessageSignals};
pub use lead_scoring::{lead_score, recommended_action};
pub use leadlog_core::RecommendedAction;
pub use session::{is_exit_command, ChatSession, TurnOutcome, OFFLINE_REPLY_PREFIX};

use leadlog_persistence::PersistenceError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    /// Message is empty after trimming whitespace
    #[error("Message is empty")]
    EmptyInput,

    #[error("Event store error: {0}")]
    Store(#[from] PersistenceError),
}
