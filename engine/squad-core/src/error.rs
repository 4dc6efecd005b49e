//! Error types for squad operations

use crate::money::Money;
use crate::types::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure category shared by every engine crate.
///
/// The web layer maps these onto HTTP status codes; the engine itself never
/// deals with transport concerns beyond exposing the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InsufficientBudget,
    Formation,
    StaleOffer,
    NotFound,
    ExpiredOffer,
    Forbidden,
    TransferWindowClosed,
}

impl ErrorKind {
    /// Suggested HTTP status for the web layer
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::InsufficientBudget => 402,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::StaleOffer => 409,
            ErrorKind::ExpiredOffer => 410,
            ErrorKind::Formation => 422,
            ErrorKind::TransferWindowClosed => 423,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SquadError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid formation: {}", violations.join("; "))]
    Formation { violations: Vec<String> },

    #[error("Insufficient budget: required {required}, available {available}")]
    InsufficientBudget { required: Money, available: Money },

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),
}

impl SquadError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SquadError::Validation(_) => ErrorKind::Validation,
            SquadError::Formation { .. } => ErrorKind::Formation,
            SquadError::InsufficientBudget { .. } => ErrorKind::InsufficientBudget,
            SquadError::PlayerNotFound(_) | SquadError::TeamNotFound(_) => ErrorKind::NotFound,
        }
    }
}
