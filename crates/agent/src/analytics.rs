//! Event log aggregation for the dashboard
//!
//! Headline metrics always describe the whole log. The breakdowns and the
//! event list only cover events that pass the [`EventFilter`].

use std::collections::HashSet;

use serde::Serialize;

use leadlog_core::{Event, Intent, Sentiment};

/// Number of lead score histogram bins, each 10 points wide
pub const HISTOGRAM_BINS: usize = 10;

/// Intent/sentiment selection; an empty set does not restrict its dimension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub intents: HashSet<Intent>,
    pub sentiments: HashSet<Sentiment>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intents(mut self, intents: impl IntoIterator<Item = Intent>) -> Self {
        self.intents.extend(intents);
        self
    }

    pub fn with_sentiments(mut self, sentiments: impl IntoIterator<Item = Sentiment>) -> Self {
        self.sentiments.extend(sentiments);
        self
    }

    /// Build a filter from comma-separated label lists, e.g. `"pricing,support"`.
    ///
    /// Blank entries are skipped; unknown labels are an error.
    pub fn parse(intents: Option<&str>, sentiments: Option<&str>) -> leadlog_core::Result<Self> {
        Ok(Self {
            intents: parse_labels(intents)?,
            sentiments: parse_labels(sentiments)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.sentiments.is_empty()
    }

    pub fn matches(&self, event: &Event) -> bool {
        (self.intents.is_empty() || self.intents.contains(&event.intent))
            && (self.sentiments.is_empty() || self.sentiments.contains(&event.sentiment))
    }
}

fn parse_labels<L>(list: Option<&str>) -> leadlog_core::Result<HashSet<L>>
where
    L: std::str::FromStr<Err = leadlog_core::Error> + Eq + std::hash::Hash,
{
    list.unwrap_or_default()
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Occurrences of one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelCount<L> {
    pub label: L,
    pub count: usize,
}

/// One histogram bucket; `upper` is exclusive except for the last bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBin {
    pub lower: u8,
    pub upper: u8,
    pub count: usize,
}

/// Dashboard view of the event log
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub unique_intent_count: usize,
    /// Unrounded mean over the whole log; 0.0 when empty
    pub average_lead_score: f64,
    pub positive_sentiment_count: usize,
    /// Filter options: distinct labels in the whole log, first-seen order
    pub available_intents: Vec<Intent>,
    pub available_sentiments: Vec<Sentiment>,
    pub intent_distribution: Vec<LabelCount<Intent>>,
    pub sentiment_breakdown: Vec<LabelCount<Sentiment>>,
    pub score_histogram: Vec<ScoreBin>,
    pub filtered_events: Vec<Event>,
}

impl Summary {
    /// Average lead score rounded to two decimals
    pub fn average_lead_score_display(&self) -> String {
        format!("{:.2}", self.average_lead_score)
    }
}

/// Aggregate `events` (in log order) under `filter`
pub fn summarize(events: &[Event], filter: &EventFilter) -> Summary {
    let available_intents = distinct(events.iter().map(|e| e.intent));
    let available_sentiments = distinct(events.iter().map(|e| e.sentiment));

    let average_lead_score = if events.is_empty() {
        0.0
    } else {
        let total: u64 = events.iter().map(|e| u64::from(e.lead_score.value())).sum();
        total as f64 / events.len() as f64
    };

    let filtered_events: Vec<Event> = events.iter().filter(|e| filter.matches(e)).cloned().collect();

    Summary {
        total_count: events.len(),
        unique_intent_count: available_intents.len(),
        average_lead_score,
        positive_sentiment_count: events
            .iter()
            .filter(|e| e.sentiment == Sentiment::Positive)
            .count(),
        available_intents,
        available_sentiments,
        intent_distribution: intent_distribution(&filtered_events),
        sentiment_breakdown: sentiment_breakdown(&filtered_events),
        score_histogram: score_histogram(&filtered_events),
        filtered_events,
    }
}

/// Intent counts, most frequent first
pub fn intent_distribution(events: &[Event]) -> Vec<LabelCount<Intent>> {
    count_labels(events.iter().map(|e| e.intent))
}

/// Sentiment counts, most frequent first
pub fn sentiment_breakdown(events: &[Event]) -> Vec<LabelCount<Sentiment>> {
    count_labels(events.iter().map(|e| e.sentiment))
}

/// Lead score histogram over [0, 100]; 100 falls in the last bin
pub fn score_histogram(events: &[Event]) -> Vec<ScoreBin> {
    let mut bins: Vec<ScoreBin> = (0..HISTOGRAM_BINS)
        .map(|i| ScoreBin {
            lower: (i * 10) as u8,
            upper: ((i + 1) * 10) as u8,
            count: 0,
        })
        .collect();

    for event in events {
        let index = (usize::from(event.lead_score.value()) / 10).min(HISTOGRAM_BINS - 1);
        bins[index].count += 1;
    }

    bins
}

fn distinct<L: PartialEq>(labels: impl Iterator<Item = L>) -> Vec<L> {
    let mut seen = Vec::new();
    for label in labels {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

// Stable sort keeps first-appearance order among equal counts
fn count_labels<L: PartialEq + Copy>(labels: impl Iterator<Item = L>) -> Vec<LabelCount<L>> {
    let mut counts: Vec<LabelCount<L>> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|c| c.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount { label, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
