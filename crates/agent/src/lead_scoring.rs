//! Lead scoring and next-action recommendation
//!
//! Score = intent base + sentiment adjustment, clamped to 0..=100:
//!
//! | intent | base |
//! |---|---|
//! | demo_request | 90 |
//! | pricing | 75 |
//! | support | 40 |
//! | general_enquiry | 30 |
//! | complaint | 10 |
//!
//! Positive sentiment adds 10, negative subtracts 20. The score then picks
//! one of five [`RecommendedAction`] tiers.

use leadlog_core::{Intent, LeadScore, RecommendedAction, Sentiment};

pub fn base_score(intent: Intent) -> i32 {
    match intent {
        Intent::DemoRequest => 90,
        Intent::Pricing => 75,
        Intent::Support => 40,
        Intent::GeneralEnquiry => 30,
        Intent::Complaint => 10,
    }
}

pub fn sentiment_adjustment(sentiment: Sentiment) -> i32 {
    match sentiment {
        Sentiment::Positive => 10,
        Sentiment::Negative => -20,
        Sentiment::Neutral => 0,
    }
}

/// Sales-readiness of a message with the given labels
pub fn lead_score(intent: Intent, sentiment: Sentiment) -> LeadScore {
    LeadScore::clamped(base_score(intent) + sentiment_adjustment(sentiment))
}

/// Display text of the follow-up tier for `score`
pub fn recommended_action(score: LeadScore) -> &'static str {
    RecommendedAction::from_score(score).as_str()
}
