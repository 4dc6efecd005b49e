//! Error types for the scoring engine

use squad_core::{ErrorKind, MatchdayId, PlayerId, SquadError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Stats for player {player_id} on matchday {matchday} are already recorded with different values")]
    ConflictingStats { player_id: PlayerId, matchday: MatchdayId },

    #[error("Player not found in catalog: {0}")]
    UnknownPlayer(PlayerId),

    #[error(transparent)]
    Squad(#[from] SquadError),
}

impl ScoringError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::Validation(_) | ScoringError::ConflictingStats { .. } => {
                ErrorKind::Validation
            }
            ScoringError::UnknownPlayer(_) => ErrorKind::NotFound,
            ScoringError::Squad(err) => err.kind(),
        }
    }
}
