//! Error types for core value parsing

use thiserror::Error;

/// Core errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown {kind} label: {value:?}")]
    InvalidLabel { kind: &'static str, value: String },

    #[error("Lead score out of range 0..=100: {0}")]
    ScoreOutOfRange(i64),

    #[error("Unknown recommended action: {0:?}")]
    UnknownAction(String),

    #[error("Recommended action {action:?} does not match lead score {score}")]
    ActionMismatch { score: u8, action: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
