use thiserror::Error;

use crate::{database::store::StoreError, model::volatility::SolverError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMatchReason {
    #[error("a match needs at least 2 distinct participants, found {0}")]
    TooFewParticipants(usize),

    #[error("participant '{0}' is listed more than once")]
    DuplicateParticipant(String),

    #[error("participant '{name}' has rank {rank}, expected 1..={participants}")]
    RankOutOfRange { name: String, rank: u32, participants: usize }
}

#[derive(Debug, Error)]
pub enum RatingError {
    #[error("invalid match on {date}: {reason}")]
    InvalidMatch {
        date: chrono::NaiveDate,
        reason: InvalidMatchReason
    },

    #[error("no rating record for participant '{0}'")]
    UnknownParticipant(String),

    #[error("player names must not be empty")]
    EmptyName,

    #[error("volatility update for '{participant}' failed: {source}")]
    SolverNonConvergence {
        participant: String,
        #[source]
        source: SolverError
    },

    #[error("performance variance for '{participant}' is not finite and positive")]
    IllConditioned { participant: String },

    #[error("'{name}' has out of bounds {field}: {value}")]
    OutOfBoundsInput {
        name: String,
        field: &'static str,
        value: f64
    },

    #[error(transparent)]
    Store(#[from] StoreError)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} bounds are inverted or invalid: min {min}, max {max}")]
    InvalidBounds { name: &'static str, min: f64, max: f64 },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("rd spread damping must lie in (0, 1], got {0}")]
    InvalidDamping(f64),

    #[error("the volatility solver needs at least one iteration")]
    ZeroIterations
}
