//! Keyword-rule intent and sentiment classification
//!
//! Both classifiers lower-case the message and walk an ordered rule table;
//! the first rule with any keyword contained in the message wins. Matching is
//! plain substring containment, so "plan" also fires on "planning".
//!
//! The keyword lists are a frozen contract: lead scores already in the log
//! were derived from them, and changing a list changes historical meaning.

use leadlog_core::{Intent, Sentiment};

const PRICING_KEYWORDS: &[&str] = &[
    "price", "cost", "pricing", "plan", "subscription", "monthly", "yearly",
];

const DEMO_KEYWORDS: &[&str] = &["demo", "book", "schedule", "call", "meeting", "trial"];

const SUPPORT_KEYWORDS: &[&str] = &[
    "error", "issue", "problem", "not working", "can't log in", "cannot log in", "bug",
];

const COMPLAINT_KEYWORDS: &[&str] = &[
    "cancel", "refund", "leaving", "stop using", "unhappy", "not happy",
];

const POSITIVE_KEYWORDS: &[&str] = &[
    "love", "great", "amazing", "awesome", "perfect", "thanks", "thank you",
];

const NEGATIVE_EMOTION_KEYWORDS: &[&str] = &[
    "angry", "upset", "hate", "terrible", "horrible", "worst", "not happy", "unhappy",
];

const NEGATIVE_PROBLEM_KEYWORDS: &[&str] = &[
    "not working", "error", "issue", "problem", "can't", "cannot",
];

/// Intent rules, evaluated top to bottom
const INTENT_RULES: &[(Intent, &[&str])] = &[
    (Intent::Pricing, PRICING_KEYWORDS),
    (Intent::DemoRequest, DEMO_KEYWORDS),
    (Intent::Support, SUPPORT_KEYWORDS),
    (Intent::Complaint, COMPLAINT_KEYWORDS),
];

/// Sentiment rules, evaluated top to bottom.
///
/// The two negative groups overlap on purpose; each stays its own rule.
const SENTIMENT_RULES: &[(Sentiment, &[&str])] = &[
    (Sentiment::Positive, POSITIVE_KEYWORDS),
    (Sentiment::Negative, NEGATIVE_EMOTION_KEYWORDS),
    (Sentiment::Negative, NEGATIVE_PROBLEM_KEYWORDS),
];

fn first_match<L: Copy>(lowered: &str, rules: &[(L, &[&str])]) -> Option<L> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(label, _)| *label)
}

/// Classify the purpose of a message; defaults to general enquiry
pub fn classify_intent(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    first_match(&lowered, INTENT_RULES).unwrap_or(Intent::GeneralEnquiry)
}

/// Classify the polarity of a message; defaults to neutral
pub fn classify_sentiment(message: &str) -> Sentiment {
    let lowered = message.to_lowercase();
    first_match(&lowered, SENTIMENT_RULES).unwrap_or(Sentiment::Neutral)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_each_rule() {
        assert_eq!(classify_intent("How much does the Pro plan cost?"), Intent::Pricing);
        assert_eq!(classify_intent("Can we schedule a meeting?"), Intent::DemoRequest);
        assert_eq!(classify_intent("I found a bug in the editor"), Intent::Support);
        assert_eq!(classify_intent("I want a refund"), Intent::Complaint);
        assert_eq!(classify_intent("Hello there"), Intent::GeneralEnquiry);
    }

    #[test]
    fn test_intent_case_insensitive() {
        assert_eq!(classify_intent("PRICING PLEASE"), Intent::Pricing);
        assert_eq!(classify_intent("I Can't Log In"), Intent::Support);
    }

    #[test]
    fn test_intent_rule_order() {
        // pricing is checked before demo_request
        assert_eq!(classify_intent("Book a call about pricing"), Intent::Pricing);
        // demo_request before support
        assert_eq!(classify_intent("Schedule a call about this error"), Intent::DemoRequest);
        // support before complaint
        assert_eq!(classify_intent("Not working, I want to cancel"), Intent::Support);
    }

    #[test]
    fn test_intent_substring_matching() {
        // "plan" inside "planning" still counts
        assert_eq!(classify_intent("We are planning ahead"), Intent::Pricing);
        // "call" inside "recall"
        assert_eq!(classify_intent("I recall nothing"), Intent::DemoRequest);
    }

    #[test]
    fn test_sentiment_each_rule() {
        assert_eq!(classify_sentiment("This is awesome"), Sentiment::Positive);
        assert_eq!(classify_sentiment("Thank you so much"), Sentiment::Positive);
        assert_eq!(classify_sentiment("I am so upset"), Sentiment::Negative);
        assert_eq!(classify_sentiment("The export is not working"), Sentiment::Negative);
        assert_eq!(classify_sentiment("I cannot find the settings"), Sentiment::Negative);
        assert_eq!(classify_sentiment("What time is it"), Sentiment::Neutral);
    }

    #[test]
    fn test_positive_wins_over_negative() {
        assert_eq!(classify_sentiment("I love it but the export is terrible"), Sentiment::Positive);
        assert_eq!(classify_sentiment("Thanks, but there is an error"), Sentiment::Positive);
    }

    #[test]
    fn test_thanks_and_cancel() {
        let message = "Thanks for the help, but I need to cancel";
        assert_eq!(classify_sentiment(message), Sentiment::Positive);
        assert_eq!(classify_intent(message), Intent::Complaint);
    }

    #[test]
    fn test_unhappy_hits_complaint_and_negative() {
        assert_eq!(classify_intent("I'm unhappy with this"), Intent::Complaint);
        assert_eq!(classify_sentiment("I'm unhappy with this"), Sentiment::Negative);
    }

    #[test]
    fn test_deterministic() {
        let messages = [
            "",
            "I want to book a demo, this tool is amazing!",
            "refund now, worst product ever",
            "¿Cuál es el precio?",
        ];
        for message in messages {
            assert_eq!(classify_intent(message), classify_intent(message));
            assert_eq!(classify_sentiment(message), classify_sentiment(message));
        }
    }

    #[test]
    fn test_empty_message_defaults() {
        assert_eq!(classify_intent(""), Intent::GeneralEnquiry);
        assert_eq!(classify_sentiment(""), Sentiment::Neutral);
    }
}
