//! Team aggregator
//!
//! Rolls player scores up into a fantasy team's matchday score. Only starters
//! count; the captain's score is multiplied; a starter with no score for the
//! matchday contributes nothing.

use crate::config::ScoringConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_core::{FantasyTeam, MatchdayId, PlayerId, RosterEntry, TeamId};
use std::collections::HashMap;

/// What one starter added to the team score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContribution {
    pub player_id: PlayerId,
    pub base_points: Decimal,
    pub multiplier: u32,
    pub points: Decimal,
}

/// A team's score for one matchday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMatchdayScore {
    pub team_id: TeamId,
    pub matchday: MatchdayId,
    pub points: Decimal,
    pub running_total: Decimal,
    pub contributions: Vec<PlayerContribution>,
}

#[derive(Debug, Clone)]
pub struct TeamAggregator {
    captain_multiplier: u32,
    vice_captain_fallback: bool,
}

impl Default for TeamAggregator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl TeamAggregator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            captain_multiplier: config.captain_multiplier,
            vice_captain_fallback: config.vice_captain_fallback,
        }
    }

    /// Starter whose score is multiplied this matchday, if any
    fn armband(&self, roster: &[RosterEntry], scores: &HashMap<PlayerId, Decimal>) -> Option<PlayerId> {
        let starters = || roster.iter().filter(|entry| entry.is_starter);
        let captain = starters().find(|entry| entry.is_captain).map(|entry| entry.player_id);

        match captain {
            Some(id) if scores.contains_key(&id) => Some(id),
            Some(_) if self.vice_captain_fallback => starters()
                .find(|entry| entry.is_vice_captain)
                .map(|entry| entry.player_id)
                .filter(|id| scores.contains_key(id)),
            other => other,
        }
    }

    /// Score one roster for a matchday
    pub fn aggregate_roster(
        &self,
        team_id: TeamId,
        matchday: MatchdayId,
        roster: &[RosterEntry],
        scores: &HashMap<PlayerId, Decimal>,
        previous_total: Decimal,
    ) -> TeamMatchdayScore {
        let armband = self.armband(roster, scores);

        let contributions: Vec<PlayerContribution> = roster
            .iter()
            .filter(|entry| entry.is_starter)
            .map(|entry| {
                let base_points = scores.get(&entry.player_id).copied().unwrap_or_default();
                let multiplier = if armband == Some(entry.player_id) { self.captain_multiplier } else { 1 };
                PlayerContribution {
                    player_id: entry.player_id,
                    base_points,
                    multiplier,
                    points: base_points * Decimal::from(multiplier),
                }
            })
            .collect();

        let points: Decimal = contributions.iter().map(|c| c.points).sum();

        TeamMatchdayScore {
            team_id,
            matchday,
            points,
            running_total: previous_total + points,
            contributions,
        }
    }

    /// Score a team, using its current `total_points` as the previous total
    pub fn aggregate(
        &self,
        team: &FantasyTeam,
        matchday: MatchdayId,
        scores: &HashMap<PlayerId, Decimal>,
    ) -> TeamMatchdayScore {
        self.aggregate_roster(team.id, matchday, &team.roster, scores, team.total_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_core::{Money, Position};

    fn entry(id: i64, is_starter: bool) -> RosterEntry {
        RosterEntry {
            player_id: PlayerId(id),
            position: Position::Midfielder,
            price: Money::from_millions(5),
            is_starter,
            is_captain: false,
            is_vice_captain: false,
        }
    }

    fn scores(pairs: &[(i64, i64)]) -> HashMap<PlayerId, Decimal> {
        pairs.iter().map(|(id, pts)| (PlayerId(*id), Decimal::from(*pts))).collect()
    }

    #[test]
    fn test_captain_doubled_bench_ignored() {
        let mut roster = vec![entry(1, true), entry(2, true), entry(3, false)];
        roster[1].is_captain = true;

        let result = TeamAggregator::default().aggregate_roster(
            TeamId(1),
            MatchdayId(1),
            &roster,
            &scores(&[(1, 3), (2, 5), (3, 10)]),
            Decimal::from(20),
        );

        assert_eq!(result.points, Decimal::from(13));
        assert_eq!(result.running_total, Decimal::from(33));
        assert_eq!(result.contributions.len(), 2);
    }

    #[test]
    fn test_no_captain_no_multiplier_missing_players_zero() {
        let roster = vec![entry(1, true), entry(2, true)];
        let result = TeamAggregator::default().aggregate_roster(
            TeamId(1),
            MatchdayId(1),
            &roster,
            &scores(&[(1, 4)]),
            Decimal::ZERO,
        );
        assert_eq!(result.points, Decimal::from(4));
    }

    #[test]
    fn test_absent_captain_no_fallback_by_default() {
        let mut roster = vec![entry(1, true), entry(2, true)];
        roster[0].is_captain = true;
        roster[1].is_vice_captain = true;

        let data = scores(&[(2, 6)]);
        let strict = TeamAggregator::default()
            .aggregate_roster(TeamId(1), MatchdayId(1), &roster, &data, Decimal::ZERO);
        assert_eq!(strict.points, Decimal::from(6));

        let config = ScoringConfig { vice_captain_fallback: true, ..ScoringConfig::default() };
        let fallback = TeamAggregator::new(&config)
            .aggregate_roster(TeamId(1), MatchdayId(1), &roster, &data, Decimal::ZERO);
        assert_eq!(fallback.points, Decimal::from(12));
    }

    #[test]
    fn test_fallback_needs_a_captain() {
        let mut roster = vec![entry(1, true), entry(2, true)];
        roster[1].is_vice_captain = true;

        let config = ScoringConfig { vice_captain_fallback: true, ..ScoringConfig::default() };
        let result = TeamAggregator::new(&config).aggregate_roster(
            TeamId(1),
            MatchdayId(1),
            &roster,
            &scores(&[(1, 3), (2, 6)]),
            Decimal::ZERO,
        );
        assert_eq!(result.points, Decimal::from(9));
    }

    #[test]
    fn test_negative_captain_score_doubles() {
        let mut roster = vec![entry(1, true)];
        roster[0].is_captain = true;
        let result = TeamAggregator::default().aggregate_roster(
            TeamId(1),
            MatchdayId(1),
            &roster,
            &scores(&[(1, -3)]),
            Decimal::from(10),
        );
        assert_eq!(result.points, Decimal::from(-6));
        assert_eq!(result.running_total, Decimal::from(4));
    }
}
