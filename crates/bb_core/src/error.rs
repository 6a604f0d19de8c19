//! Error taxonomy for the basketball simulation engine.
//!
//! Every fallible operation in this crate returns `Result<T>` with
//! [`BbError`] as its error type, including conditions that "should never
//! happen" given a valid roster — those are reported as
//! [`BbError::InvariantViolation`] rather than reached via `panic!`/`assert!`,
//! so a season driver can log and retry a game with a reseeded RNG instead of
//! aborting the whole run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BbError {
    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    #[error("invalid attributes for player {player}: {reason}")]
    InvalidAttributes { player: String, reason: String },

    #[error("rating out of range: {field} = {value} (expected {min}..={max})")]
    RatingOutOfRange { field: String, value: f64, min: f64, max: f64 },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("point reconciliation failed to converge for team {team} after {iterations} iterations")]
    ReconciliationFailed { team: String, iterations: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BbError {
    /// Whether a season driver may reasonably retry the operation that
    /// produced this error with a freshly reseeded RNG, rather than abort
    /// the whole season.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BbError::InvariantViolation(_) | BbError::ReconciliationFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, BbError>;
