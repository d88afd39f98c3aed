//! Error types for the weight engine.

use thiserror::Error;

/// Errors returned by table mutations, draws and rehydration.
///
/// Every failing operation leaves the table untouched, so all of these
/// are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LotteryError {
    #[error("Invalid name: names must contain a non-whitespace character")]
    InvalidName,

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    #[error("Entrant not found: {0}")]
    NotFound(String),

    #[error("Weight {0} is outside [0, 100]")]
    WeightOutOfRange(f64),

    #[error("Pool is empty: add an entrant before drawing")]
    EmptyPool,

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl LotteryError {
    /// Creates a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Creates an invalid-record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
