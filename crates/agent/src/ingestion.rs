//! Message ingestion: classify, score, persist
//!
//! Every non-blank message becomes exactly one [`Event`] in the store. The
//! event is only returned once the append has been committed.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use leadlog_core::{Event, Intent, LeadScore, RecommendedAction, Sentiment};
use leadlog_persistence::EventStore;

use crate::classifier::{classify_intent, classify_sentiment};
use crate::lead_scoring::lead_score;
use crate::AgentError;

/// Labels and score derived from a message, before anything is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSignals {
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub lead_score: LeadScore,
    pub action: RecommendedAction,
}

impl MessageSignals {
    pub fn derive(message: &str) -> Self {
        let intent = classify_intent(message);
        let sentiment = classify_sentiment(message);
        let lead_score = lead_score(intent, sentiment);
        Self {
            intent,
            sentiment,
            lead_score,
            action: RecommendedAction::from_score(lead_score),
        }
    }
}

/// Turns raw messages into persisted events
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn EventStore>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Ingest a message stamped with `now`.
    ///
    /// The message is stored as given; only the blank check trims it.
    pub async fn ingest<Tz>(&self, message: &str, now: &DateTime<Tz>) -> Result<Event, AgentError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if message.trim().is_empty() {
            metrics::counter!("leadlog_ingest_failures_total", "reason" => "empty_input")
                .increment(1);
            return Err(AgentError::EmptyInput);
        }

        let signals = MessageSignals::derive(message);
        let event = Event::new(
            now,
            message,
            signals.intent,
            signals.sentiment,
            signals.lead_score,
        );

        if let Err(e) = self.store.append(&event).await {
            tracing::error!(error = %e, "Failed to persist event");
            metrics::counter!("leadlog_ingest_failures_total", "reason" => "store_write")
                .increment(1);
            return Err(e.into());
        }

        tracing::info!(
            intent = %event.intent,
            sentiment = %event.sentiment,
            lead_score = event.lead_score.value(),
            "Message ingested"
        );
        metrics::counter!(
            "leadlog_events_ingested_total",
            "intent" => event.intent.as_str(),
            "sentiment" => event.sentiment.as_str()
        )
        .increment(1);
        metrics::histogram!("leadlog_lead_score").record(f64::from(event.lead_score.value()));

        Ok(event)
    }

    /// Ingest a message stamped with the current UTC time.
    ///
    /// UTC keeps stored timestamps non-decreasing across DST changes.
    pub async fn ingest_now(&self, message: &str) -> Result<Event, AgentError> {
        self.ingest(message, &Utc::now()).await
    }
}
