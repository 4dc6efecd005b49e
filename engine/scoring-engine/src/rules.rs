//! Scoring rules table

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_core::Position;

/// Point values per match event. `Default` is the standard table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Minutes needed for full participation points
    pub full_participation_minutes: i32,
    pub full_participation: Decimal,
    pub partial_participation: Decimal,

    pub goal_goalkeeper: Decimal,
    pub goal_defender: Decimal,
    pub goal_midfielder: Decimal,
    pub goal_forward: Decimal,

    pub assist: Decimal,

    /// Awarded to goalkeepers and defenders only
    pub clean_sheet: Decimal,

    /// Goalkeepers earn `save_points` for every full block of `saves_per_point` saves
    pub saves_per_point: i32,
    pub save_points: Decimal,

    pub yellow_card: Decimal,
    pub red_card: Decimal,
    pub own_goal: Decimal,
    pub penalty_missed: Decimal,

    /// Goalkeepers only
    pub penalty_saved: Decimal,

    #[serde(default)]
    pub bonuses: Option<BonusRules>,
}

/// Threshold bonuses for defensive and attacking work. One point per full block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRules {
    pub recoveries_per_point: i32,
    pub clearances_per_point: i32,
    pub shots_on_target_per_point: i32,
    pub dribbles_per_point: i32,
}

impl Default for BonusRules {
    fn default() -> Self {
        Self {
            recoveries_per_point: 5,
            clearances_per_point: 3,
            shots_on_target_per_point: 2,
            dribbles_per_point: 2,
        }
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            full_participation_minutes: 60,
            full_participation: Decimal::ONE,
            partial_participation: Decimal::new(5, 1),
            goal_goalkeeper: Decimal::from(6),
            goal_defender: Decimal::from(6),
            goal_midfielder: Decimal::from(5),
            goal_forward: Decimal::from(4),
            assist: Decimal::from(3),
            clean_sheet: Decimal::from(4),
            saves_per_point: 3,
            save_points: Decimal::ONE,
            yellow_card: Decimal::from(-1),
            red_card: Decimal::from(-3),
            own_goal: Decimal::from(-2),
            penalty_missed: Decimal::from(-2),
            penalty_saved: Decimal::from(5),
            bonuses: None,
        }
    }
}

impl ScoringRules {
    /// Standard table plus the threshold bonuses
    pub fn extended() -> Self {
        Self {
            bonuses: Some(BonusRules::default()),
            ..Self::default()
        }
    }

    pub fn goal_weight(&self, position: Position) -> Decimal {
        match position {
            Position::Goalkeeper => self.goal_goalkeeper,
            Position::Defender => self.goal_defender,
            Position::Midfielder => self.goal_midfielder,
            Position::Forward => self.goal_forward,
        }
    }

    /// Check the divisors are usable
    pub fn validate(&self) -> crate::Result<()> {
        if self.saves_per_point <= 0 {
            return Err(crate::ScoringError::validation("saves_per_point must be positive"));
        }
        if self.full_participation_minutes <= 0 {
            return Err(crate::ScoringError::validation(
                "full_participation_minutes must be positive",
            ));
        }
        if let Some(bonuses) = &self.bonuses {
            let divisors = [
                ("recoveries_per_point", bonuses.recoveries_per_point),
                ("clearances_per_point", bonuses.clearances_per_point),
                ("shots_on_target_per_point", bonuses.shots_on_target_per_point),
                ("dribbles_per_point", bonuses.dribbles_per_point),
            ];
            if let Some((name, _)) = divisors.iter().find(|(_, value)| *value <= 0) {
                return Err(crate::ScoringError::validation(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }
}
