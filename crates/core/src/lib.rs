//! Core types for the lead signal pipeline
//!
//! This crate provides the types shared by every other crate:
//! - Intent and sentiment labels
//! - The bounded lead score and its recommended action
//! - The persisted event record
//! - Error types

pub mod error;
pub mod event;

pub use error::{Error, Result};
pub use event::{Event, Intent, LeadScore, RecommendedAction, Sentiment, TIMESTAMP_FORMAT};
