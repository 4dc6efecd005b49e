//! Error types for the league service

use squad_core::{ErrorKind, LeagueId, MatchdayId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeagueError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("League not found: {0}")]
    LeagueNotFound(LeagueId),

    #[error("Invalid join code")]
    InvalidJoinCode,

    #[error("League {league_id} is full ({max_participants} participants)")]
    LeagueFull { league_id: LeagueId, max_participants: u32 },

    #[error("User {user_id} is already a member of league {league_id}")]
    AlreadyMember { league_id: LeagueId, user_id: UserId },

    #[error("User {user_id} is not a member of league {league_id}")]
    NotMember { league_id: LeagueId, user_id: UserId },

    #[error("Matchday {matchday} already applied to league {league_id}")]
    MatchdayAlreadyApplied { league_id: LeagueId, matchday: MatchdayId },

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl LeagueError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LeagueError::Validation(_)
            | LeagueError::LeagueFull { .. }
            | LeagueError::AlreadyMember { .. }
            | LeagueError::MatchdayAlreadyApplied { .. } => ErrorKind::Validation,
            LeagueError::LeagueNotFound(_) | LeagueError::InvalidJoinCode => ErrorKind::NotFound,
            LeagueError::NotMember { .. } | LeagueError::Forbidden(_) => ErrorKind::Forbidden,
        }
    }
}
