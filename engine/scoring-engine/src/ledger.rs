//! Score ledger: per (team, matchday) scores and running totals

use rust_decimal::Decimal;
use squad_core::{MatchdayId, TeamId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    scores: BTreeMap<(TeamId, MatchdayId), Decimal>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a team's matchday score, replacing any earlier value, and
    /// return the team's new running total
    pub fn record(&mut self, team_id: TeamId, matchday: MatchdayId, points: Decimal) -> Decimal {
        self.scores.insert((team_id, matchday), points);
        self.total(team_id)
    }

    pub fn get(&self, team_id: TeamId, matchday: MatchdayId) -> Option<Decimal> {
        self.scores.get(&(team_id, matchday)).copied()
    }

    /// Running total before `matchday`
    pub fn total_before(&self, team_id: TeamId, matchday: MatchdayId) -> Decimal {
        self.history(team_id)
            .filter(|(md, _)| *md < matchday)
            .map(|(_, points)| points)
            .sum()
    }

    pub fn total(&self, team_id: TeamId) -> Decimal {
        self.history(team_id).map(|(_, points)| points).sum()
    }

    /// Matchday scores for a team in matchday order
    pub fn history(&self, team_id: TeamId) -> impl Iterator<Item = (MatchdayId, Decimal)> + '_ {
        self.scores
            .range((team_id, MatchdayId(u32::MIN))..=(team_id, MatchdayId(u32::MAX)))
            .map(|((_, matchday), points)| (*matchday, *points))
    }
}
