//! Leagues and their participants

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_core::{LeagueId, MatchdayId, TeamId, UserId};
use std::collections::BTreeSet;

const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random upper-case alphanumeric join code
pub fn generate_join_code(rng: &mut impl Rng, length: usize) -> String {
    (0..length)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

/// A fantasy team taking part in a league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTeam {
    pub user_id: UserId,
    pub team_id: TeamId,

    /// Name shown on this league's leaderboard
    pub display_name: String,

    /// Points earned since joining
    #[serde(default)]
    pub points: Decimal,

    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator: UserId,
    pub is_private: bool,

    /// Present on private leagues only
    pub join_code: Option<String>,

    pub max_participants: u32,
    pub participants: Vec<LeagueTeam>,

    #[serde(default)]
    pub applied_matchdays: BTreeSet<MatchdayId>,
    pub created_at: DateTime<Utc>,
}

impl League {
    pub fn participant_count(&self) -> u32 {
        self.participants.len() as u32
    }

    pub fn is_full(&self) -> bool {
        self.participant_count() >= self.max_participants
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    pub fn participant(&self, user_id: UserId) -> Option<&LeagueTeam> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    /// Case-insensitive join code match
    pub fn matches_code(&self, code: &str) -> bool {
        self.join_code
            .as_deref()
            .is_some_and(|join_code| join_code.eq_ignore_ascii_case(code.trim()))
    }
}
