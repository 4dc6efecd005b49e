//! Matchday scorer
//!
//! Turns one player's raw matchday counters into a point total with a
//! per-rule breakdown. Scoring is pure: the same stats and position always
//! produce the same score.

use crate::rules::ScoringRules;
use crate::stats::PlayerMatchdayStats;
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_core::{MatchdayId, PlayerId, Position};
use tracing::debug;

/// Scoring rule that produced a component of a player's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    Participation,
    Goals,
    Assists,
    CleanSheet,
    Saves,
    YellowCards,
    RedCards,
    OwnGoals,
    PenaltiesMissed,
    PenaltiesSaved,
    RecoveriesBonus,
    ClearancesBonus,
    ShotsOnTargetBonus,
    DribblesBonus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub rule: ScoreRule,
    pub points: Decimal,
}

/// A player's score for one matchday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub matchday: MatchdayId,
    pub position: Position,
    pub points: Decimal,

    /// Non-zero components only
    pub breakdown: Vec<ScoreComponent>,
}

impl PlayerScore {
    pub fn component(&self, rule: ScoreRule) -> Decimal {
        self.breakdown
            .iter()
            .filter(|component| component.rule == rule)
            .map(|component| component.points)
            .sum()
    }
}

/// Number of full blocks of `size` in `count`; a non-positive block size scores nothing
fn per_block(count: i32, size: i32) -> Decimal {
    Decimal::from(count.checked_div(size).filter(|_| size > 0).unwrap_or(0))
}

#[derive(Debug, Clone, Default)]
pub struct MatchdayScorer {
    rules: ScoringRules,
}

impl MatchdayScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Score a player whose position arrives as a feed code ("GK", "DEF", ...)
    pub fn score_for_code(&self, stats: &PlayerMatchdayStats, position_code: &str) -> Result<PlayerScore> {
        let position = position_code.parse::<Position>()?;
        self.score(stats, position)
    }

    /// Total points only
    pub fn points(&self, stats: &PlayerMatchdayStats, position: Position) -> Result<Decimal> {
        Ok(self.score(stats, position)?.points)
    }

    pub fn score(&self, stats: &PlayerMatchdayStats, position: Position) -> Result<PlayerScore> {
        stats.validate()?;

        let rules = &self.rules;
        let is_keeper = position == Position::Goalkeeper;
        let mut breakdown = Vec::new();
        let mut add = |rule: ScoreRule, points: Decimal| {
            if !points.is_zero() {
                breakdown.push(ScoreComponent { rule, points });
            }
        };

        let participation = if stats.minutes_played >= rules.full_participation_minutes {
            rules.full_participation
        } else if stats.minutes_played > 0 {
            rules.partial_participation
        } else {
            Decimal::ZERO
        };
        add(ScoreRule::Participation, participation);

        add(ScoreRule::Goals, Decimal::from(stats.goals) * rules.goal_weight(position));
        add(ScoreRule::Assists, Decimal::from(stats.assists) * rules.assist);

        if stats.clean_sheet && matches!(position, Position::Goalkeeper | Position::Defender) {
            add(ScoreRule::CleanSheet, rules.clean_sheet);
        }

        if is_keeper {
            add(
                ScoreRule::Saves,
                per_block(stats.saves, rules.saves_per_point) * rules.save_points,
            );
            add(ScoreRule::PenaltiesSaved, Decimal::from(stats.penalties_saved) * rules.penalty_saved);
        }

        add(ScoreRule::YellowCards, Decimal::from(stats.yellow_cards) * rules.yellow_card);
        add(ScoreRule::RedCards, Decimal::from(stats.red_cards) * rules.red_card);
        add(ScoreRule::OwnGoals, Decimal::from(stats.own_goals) * rules.own_goal);
        add(ScoreRule::PenaltiesMissed, Decimal::from(stats.penalties_missed) * rules.penalty_missed);

        if let Some(bonuses) = &rules.bonuses {
            add(ScoreRule::RecoveriesBonus, per_block(stats.recoveries, bonuses.recoveries_per_point));
            add(ScoreRule::ClearancesBonus, per_block(stats.clearances, bonuses.clearances_per_point));
            add(
                ScoreRule::ShotsOnTargetBonus,
                per_block(stats.shots_on_target, bonuses.shots_on_target_per_point),
            );
            add(
                ScoreRule::DribblesBonus,
                per_block(stats.successful_dribbles, bonuses.dribbles_per_point),
            );
        }

        let points: Decimal = breakdown.iter().map(|component| component.points).sum();

        debug!(
            "Scored player {} ({}) on matchday {}: {}",
            stats.player_id, position, stats.matchday, points
        );

        Ok(PlayerScore {
            player_id: stats.player_id,
            matchday: stats.matchday,
            position,
            points,
            breakdown,
        })
    }
}
