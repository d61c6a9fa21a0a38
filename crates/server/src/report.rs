//! Text rendering of the dashboard summary for `leadlog summary`

use std::fmt;

use leadlog_agent::{ScoreBin, Summary, HISTOGRAM_BINS};

const BAR_WIDTH: usize = 40;
const MESSAGE_PREVIEW_CHARS: usize = 60;

/// Display adapter printing a [`Summary`] as plain-text tables
pub struct SummaryReport<'a>(pub &'a Summary);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;

        writeln!(f, "Lead signals")?;
        writeln!(f, "  Total messages      {}", summary.total_count)?;
        writeln!(f, "  Unique intents      {}", summary.unique_intent_count)?;
        writeln!(f, "  Avg lead score      {}", summary.average_lead_score_display())?;
        writeln!(f, "  Positive messages   {}", summary.positive_sentiment_count)?;

        if summary.total_count == 0 {
            writeln!(f)?;
            return writeln!(f, "No events logged yet.");
        }

        writeln!(f)?;
        writeln!(f, "Intent distribution")?;
        for entry in &summary.intent_distribution {
            writeln!(f, "  {:<16} {:>5}", entry.label.as_str(), entry.count)?;
        }

        writeln!(f)?;
        writeln!(f, "Sentiment breakdown")?;
        for entry in &summary.sentiment_breakdown {
            writeln!(f, "  {:<16} {:>5}", entry.label.as_str(), entry.count)?;
        }

        writeln!(f)?;
        writeln!(f, "Lead score histogram")?;
        let peak = summary.score_histogram.iter().map(|b| b.count).max().unwrap_or(0);
        for (i, bin) in summary.score_histogram.iter().enumerate() {
            writeln!(
                f,
                "  {:<8} {:>5} {}",
                bin_label(bin, i + 1 == HISTOGRAM_BINS),
                bin.count,
                bar(bin.count, peak)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Events ({} shown)", summary.filtered_events.len())?;
        writeln!(
            f,
            "  {:<26} {:<16} {:<9} {:>5}  message",
            "timestamp", "intent", "sentiment", "score"
        )?;
        for event in &summary.filtered_events {
            writeln!(
                f,
                "  {:<26} {:<16} {:<9} {:>5}  {}",
                event.timestamp,
                event.intent.as_str(),
                event.sentiment.as_str(),
                event.lead_score.value(),
                preview(&event.message)
            )?;
        }

        Ok(())
    }
}

fn bin_label(bin: &ScoreBin, last: bool) -> String {
    if last {
        format!("{}-{}", bin.lower, bin.upper)
    } else {
        format!("{}-{}", bin.lower, bin.upper - 1)
    }
}

fn bar(count: usize, peak: usize) -> String {
    if peak == 0 {
        return String::new();
    }
    "#".repeat((count * BAR_WIDTH).div_ceil(peak))
}

fn preview(message: &str) -> String {
    let flat = message.trim().replace(['\n', '\r'], " ");
    if flat.chars().count() <= MESSAGE_PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(MESSAGE_PREVIEW_CHARS - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leadlog_agent::{summarize, EventFilter};
    use leadlog_core::{Event, Intent, LeadScore, Sentiment};

    fn event(intent: Intent, sentiment: Sentiment, score: i32, message: &str) -> Event {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Event::new(&at, message, intent, sentiment, LeadScore::clamped(score))
    }

    #[test]
    fn test_empty_report() {
        let text = SummaryReport(&summarize(&[], &EventFilter::new())).to_string();
        assert!(text.contains("Total messages      0"));
        assert!(text.contains("Avg lead score      0.00"));
        assert!(text.contains("No events logged yet."));
    }

    #[test]
    fn test_report_sections() {
        let events = vec![
            event(Intent::DemoRequest, Sentiment::Positive, 100, "book a demo"),
            event(Intent::Pricing, Sentiment::Neutral, 75, "price?\nthanks"),
        ];
        let text = SummaryReport(&summarize(&events, &EventFilter::new())).to_string();

        assert!(text.contains("Avg lead score      87.50"));
        assert!(text.contains("demo_request"));
        assert!(text.contains("90-100"));
        assert!(text.contains("0-9"));
        assert!(text.contains("Events (2 shown)"));
        assert!(text.contains("price? thanks"));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "a".repeat(100);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), MESSAGE_PREVIEW_CHARS);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_bar_scales_to_peak() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(4, 4).len(), BAR_WIDTH);
        assert_eq!(bar(1, 4).len(), BAR_WIDTH / 4);
    }
}
