//! League leaderboard

use crate::league::League;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_core::{LeagueId, TeamId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub team_id: TeamId,
    pub display_name: String,
    pub points: Decimal,
    pub is_viewer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub league_id: LeagueId,
    pub league_name: String,
    pub participants: u32,
    pub max_participants: u32,
    pub entries: Vec<LeaderboardEntry>,
    pub viewer_rank: Option<u32>,
}

impl Leaderboard {
    /// Rank by points descending, then display name ascending. Equal points
    /// share a rank and the next rank skips (1, 1, 3).
    pub fn build(league: &League, viewer: Option<UserId>) -> Self {
        let mut sorted: Vec<_> = league.participants.iter().collect();
        sorted.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(sorted.len());
        for (index, participant) in sorted.into_iter().enumerate() {
            let rank = match entries.last() {
                Some(previous) if previous.points == participant.points => previous.rank,
                _ => index as u32 + 1,
            };
            entries.push(LeaderboardEntry {
                rank,
                user_id: participant.user_id,
                team_id: participant.team_id,
                display_name: participant.display_name.clone(),
                points: participant.points,
                is_viewer: viewer == Some(participant.user_id),
            });
        }

        let viewer_rank = entries.iter().find(|entry| entry.is_viewer).map(|entry| entry.rank);

        Self {
            league_id: league.id,
            league_name: league.name.clone(),
            participants: league.participant_count(),
            max_participants: league.max_participants,
            entries,
            viewer_rank,
        }
    }
}
