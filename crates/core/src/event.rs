//! Event record and label types
//!
//! One [`Event`] is written per processed customer message. The label enums
//! serialize to the snake_case strings stored in the log, and [`LeadScore`]
//! refuses values outside 0..=100 when a log is read back.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Timestamp layout used in the event log (`2024-05-01 09:30:12.123456`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Customer intent behind a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Pricing,
    DemoRequest,
    Support,
    Complaint,
    GeneralEnquiry,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Pricing,
        Intent::DemoRequest,
        Intent::Support,
        Intent::Complaint,
        Intent::GeneralEnquiry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pricing => "pricing",
            Self::DemoRequest => "demo_request",
            Self::Support => "support",
            Self::Complaint => "complaint",
            Self::GeneralEnquiry => "general_enquiry",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidLabel {
                kind: "intent",
                value: s.to_string(),
            })
    }
}

/// Emotional polarity of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidLabel {
                kind: "sentiment",
                value: s.to_string(),
            })
    }
}

/// Sales-readiness score, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct LeadScore(u8);

impl LeadScore {
    pub const MIN: LeadScore = LeadScore(0);
    pub const MAX: LeadScore = LeadScore(100);

    /// Build a score from an unbounded intermediate, clamping into range
    pub fn clamped(raw: i32) -> Self {
        Self(raw.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for LeadScore {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if (0..=100).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(Error::ScoreOutOfRange(raw))
        }
    }
}

impl From<LeadScore> for u8 {
    fn from(score: LeadScore) -> Self {
        score.0
    }
}

impl fmt::Display for LeadScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Follow-up tier, a total function of the lead score.
///
/// Stored as its display text, so the log reads the same as before the
/// tiers had names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecommendedAction {
    /// 80 and above
    AssignToSales,
    /// 60..=79
    SendPricing,
    /// 40..=59
    ShareSupport,
    /// 20..=39
    Nurture,
    /// below 20
    LowPriority,
}

impl RecommendedAction {
    pub const ALL: [RecommendedAction; 5] = [
        RecommendedAction::AssignToSales,
        RecommendedAction::SendPricing,
        RecommendedAction::ShareSupport,
        RecommendedAction::Nurture,
        RecommendedAction::LowPriority,
    ];

    pub fn from_score(score: LeadScore) -> Self {
        match score.value() {
            80.. => Self::AssignToSales,
            60..=79 => Self::SendPricing,
            40..=59 => Self::ShareSupport,
            20..=39 => Self::Nurture,
            _ => Self::LowPriority,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssignToSales => "Assign to sales immediately and offer a quick demo slot.",
            Self::SendPricing => {
                "Send pricing details and a relevant case study. Offer a short call."
            },
            Self::ShareSupport => "Share support resources and follow up if unresolved.",
            Self::Nurture => "Add to nurture and monitor engagement.",
            Self::LowPriority => "Low priority. No immediate follow-up.",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RecommendedAction {
    type Error = Error;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == text)
            .ok_or(Error::UnknownAction(text))
    }
}

impl From<RecommendedAction> for String {
    fn from(action: RecommendedAction) -> Self {
        action.as_str().to_string()
    }
}

/// One classified customer message as stored in the event log
///
/// Reading a record checks that `recommended_action` is the tier of
/// `lead_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord")]
pub struct Event {
    pub timestamp: String,
    /// Original input, untrimmed
    pub message: String,
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub lead_score: LeadScore,
    pub recommended_action: RecommendedAction,
}

/// Unchecked wire shape of [`Event`]
#[derive(Deserialize)]
struct EventRecord {
    timestamp: String,
    message: String,
    intent: Intent,
    sentiment: Sentiment,
    lead_score: LeadScore,
    recommended_action: RecommendedAction,
}

impl TryFrom<EventRecord> for Event {
    type Error = Error;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let expected = RecommendedAction::from_score(record.lead_score);
        if record.recommended_action != expected {
            return Err(Error::ActionMismatch {
                score: record.lead_score.value(),
                action: record.recommended_action.as_str(),
            });
        }
        Ok(Self {
            timestamp: record.timestamp,
            message: record.message,
            intent: record.intent,
            sentiment: record.sentiment,
            lead_score: record.lead_score,
            recommended_action: record.recommended_action,
        })
    }
}

impl Event {
    /// Build a record; the recommended action follows from `lead_score`
    pub fn new<Tz>(
        at: &DateTime<Tz>,
        message: impl Into<String>,
        intent: Intent,
        sentiment: Sentiment,
        lead_score: LeadScore,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            message: message.into(),
            intent,
            sentiment,
            lead_score,
            recommended_action: RecommendedAction::from_score(lead_score),
        }
    }
}
