//! Integration tests for the ingest -> store -> summarize flow
//!
//! These tests run against the JSON file store in a temporary directory.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use leadlog_agent::{summarize, AgentError, EventFilter, IngestionPipeline};
use leadlog_core::{Intent, RecommendedAction, Sentiment};
use leadlog_persistence::{EventStore, JsonFileEventStore};

fn file_pipeline(dir: &TempDir) -> (IngestionPipeline, Arc<JsonFileEventStore>) {
    let store = Arc::new(JsonFileEventStore::new(dir.path().join("data.json")));
    (IngestionPipeline::new(store.clone()), store)
}

/// Demo request with enthusiasm goes straight to sales
#[tokio::test]
async fn test_demo_request_example() {
    let dir = TempDir::new().unwrap();
    let (pipeline, store) = file_pipeline(&dir);

    let event = pipeline
        .ingest_now("I want to book a demo, this tool is amazing!")
        .await
        .unwrap();

    assert_eq!(event.intent, Intent::DemoRequest);
    assert_eq!(event.sentiment, Sentiment::Positive);
    assert_eq!(event.lead_score.value(), 100);
    assert_eq!(event.recommended_action, RecommendedAction::AssignToSales);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["intent"], "demo_request");
    assert_eq!(json[0]["sentiment"], "positive");
    assert_eq!(json[0]["lead_score"], 100);
    assert_eq!(
        json[0]["recommended_action"],
        "Assign to sales immediately and offer a quick demo slot."
    );
}

/// Empty input leaves the log untouched
#[tokio::test]
async fn test_empty_input_does_not_grow_log() {
    let dir = TempDir::new().unwrap();
    let (pipeline, store) = file_pipeline(&dir);

    pipeline.ingest_now("hello").await.unwrap();
    let before = store.load().await.len();

    let err = pipeline.ingest_now("").await.unwrap_err();
    assert!(matches!(err, AgentError::EmptyInput));
    assert_eq!(store.load().await.len(), before);
}

/// N ingests survive a restart in arrival order
#[tokio::test]
async fn test_log_round_trip_across_restart() {
    let dir = TempDir::new().unwrap();
    let messages = [
        "How much is the monthly subscription?",
        "Can we schedule a call next week?",
        "Login page shows an error",
        "I want a refund",
        "Just saying hi",
        "Thanks for the help, but I need to cancel",
    ];

    let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    {
        let (pipeline, _store) = file_pipeline(&dir);
        for (i, message) in messages.iter().enumerate() {
            pipeline
                .ingest(message, &(start + Duration::seconds(i as i64)))
                .await
                .unwrap();
        }
    }

    let (_pipeline, store) = file_pipeline(&dir);
    let events = store.load().await;
    assert_eq!(events.len(), messages.len());
    for (event, message) in events.iter().zip(messages) {
        assert_eq!(event.message, message);
    }
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let intents: Vec<Intent> = events.iter().map(|e| e.intent).collect();
    assert_eq!(
        intents,
        vec![
            Intent::Pricing,
            Intent::DemoRequest,
            Intent::Support,
            Intent::Complaint,
            Intent::GeneralEnquiry,
            Intent::Complaint,
        ]
    );
    assert_eq!(events[5].sentiment, Sentiment::Positive);
}

/// Filters change breakdowns, never the headline numbers
#[tokio::test]
async fn test_summary_over_persisted_log() {
    let dir = TempDir::new().unwrap();
    let (pipeline, store) = file_pipeline(&dir);
    for message in [
        "What does the yearly plan cost?",
        "Book a demo please, looks great",
        "The app is not working",
        "Cancel my account",
    ] {
        pipeline.ingest_now(message).await.unwrap();
    }

    let events = store.load().await;
    let all = summarize(&events, &EventFilter::new());
    let negative = summarize(&events, &EventFilter::new().with_sentiments([Sentiment::Negative]));

    assert_eq!(all.total_count, 4);
    assert_eq!(negative.total_count, all.total_count);
    assert_eq!(negative.average_lead_score, all.average_lead_score);
    assert_eq!(negative.positive_sentiment_count, 1);
    assert_eq!(negative.filtered_events.len(), 1);
    assert_eq!(negative.filtered_events[0].intent, Intent::Support);
    // 75 + 100 + 20 + 10
    assert_eq!(all.average_lead_score_display(), "51.25");
}

/// Missing and corrupt logs read as empty and accept new events
#[tokio::test]
async fn test_missing_and_corrupt_logs_recover() {
    let dir = TempDir::new().unwrap();
    let (pipeline, store) = file_pipeline(&dir);
    assert!(store.load().await.is_empty());

    std::fs::write(store.path(), "[{\"timestamp\": ").unwrap();
    assert!(store.load().await.is_empty());

    pipeline.ingest_now("pricing for teams?").await.unwrap();
    assert_eq!(store.load().await.len(), 1);
    let backups = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|entry| {
            let name = entry.as_ref().unwrap().file_name();
            name.to_string_lossy().starts_with("data.json.corrupt-")
        })
        .count();
    assert_eq!(backups, 1);
}
