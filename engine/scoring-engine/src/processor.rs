//! Matchday processor
//!
//! Drives one scoring pass: score every recorded player for the matchday,
//! aggregate each fantasy team, and update running totals.

use crate::aggregator::{TeamAggregator, TeamMatchdayScore};
use crate::book::StatsBook;
use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::ledger::ScoreLedger;
use crate::scorer::{MatchdayScorer, PlayerScore};
use crate::stats::PlayerMatchdayStats;
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_core::{FantasyTeam, MatchdayId, Player, PlayerId, Position};
use std::collections::HashMap;
use tracing::info;

/// Output of one matchday pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchdaySummary {
    pub matchday: MatchdayId,
    pub player_scores: Vec<PlayerScore>,
    pub team_scores: Vec<TeamMatchdayScore>,
}

impl MatchdaySummary {
    pub fn player_points(&self) -> HashMap<PlayerId, Decimal> {
        self.player_scores.iter().map(|score| (score.player_id, score.points)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct MatchdayProcessor {
    scorer: MatchdayScorer,
    aggregator: TeamAggregator,
    book: StatsBook,
    ledger: ScoreLedger,
}

impl MatchdayProcessor {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: TeamAggregator::new(&config),
            scorer: MatchdayScorer::new(config.rules),
            book: StatsBook::new(),
            ledger: ScoreLedger::new(),
        })
    }

    pub fn book(&self) -> &StatsBook {
        &self.book
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// Record raw stats; returns how many records were new
    pub fn ingest(&mut self, batch: impl IntoIterator<Item = PlayerMatchdayStats>) -> Result<usize> {
        self.book.record_all(batch)
    }

    /// Score every player with recorded stats for `matchday`
    pub fn score_players(
        &self,
        matchday: MatchdayId,
        positions: &HashMap<PlayerId, Position>,
    ) -> Result<Vec<PlayerScore>> {
        self.book
            .matchday(matchday)
            .map(|stats| {
                let position = positions
                    .get(&stats.player_id)
                    .ok_or(ScoringError::UnknownPlayer(stats.player_id))?;
                self.scorer.score(stats, *position)
            })
            .collect()
    }

    /// Score the matchday and update each team's running total
    pub fn process(
        &mut self,
        matchday: MatchdayId,
        players: &[Player],
        teams: &mut [FantasyTeam],
    ) -> Result<MatchdaySummary> {
        let positions: HashMap<PlayerId, Position> =
            players.iter().map(|player| (player.id, player.position)).collect();

        let player_scores = self.score_players(matchday, &positions)?;
        let points: HashMap<PlayerId, Decimal> =
            player_scores.iter().map(|score| (score.player_id, score.points)).collect();

        let mut team_scores = Vec::with_capacity(teams.len());
        for team in teams.iter_mut() {
            let previous = self.ledger.total_before(team.id, matchday);
            let mut score =
                self.aggregator.aggregate_roster(team.id, matchday, &team.roster, &points, previous);

            score.running_total = self.ledger.record(team.id, matchday, score.points);
            team.total_points = score.running_total;
            team_scores.push(score);
        }

        info!(
            "Processed matchday {}: {} players scored, {} teams updated",
            matchday,
            player_scores.len(),
            team_scores.len()
        );

        Ok(MatchdaySummary { matchday, player_scores, team_scores })
    }
}
