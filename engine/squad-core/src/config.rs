//! Formation and squad-size rules

use crate::player::Position;
use serde::{Deserialize, Serialize};

/// Inclusive bounds on the number of starters at one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLimit {
    pub min: usize,
    pub max: usize,
}

impl PositionLimit {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Formation rules applied by the formation validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationRules {
    pub goalkeepers: PositionLimit,
    pub defenders: PositionLimit,
    pub midfielders: PositionLimit,
    pub forwards: PositionLimit,

    /// Exact number of starters in a matchday line-up
    pub starting_xi: usize,

    /// Squad cap, starters and bench combined
    pub max_squad_size: usize,
}

impl Default for FormationRules {
    fn default() -> Self {
        Self {
            goalkeepers: PositionLimit::new(1, 1),
            defenders: PositionLimit::new(3, 5),
            midfielders: PositionLimit::new(2, 5),
            forwards: PositionLimit::new(1, 3),
            starting_xi: 11,
            max_squad_size: 15,
        }
    }
}

impl FormationRules {
    pub fn limit_for(&self, position: Position) -> PositionLimit {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    /// Load overrides from environment variables
    pub fn from_env() -> Result<Self, crate::SquadError> {
        let mut rules = Self::default();

        if let Ok(size) = std::env::var("SQUAD_MAX_SIZE") {
            rules.max_squad_size = size
                .parse()
                .map_err(|_| crate::SquadError::validation("Invalid SQUAD_MAX_SIZE"))?;
        }

        rules.validate()?;
        Ok(rules)
    }

    /// Check the rules are internally satisfiable
    pub fn validate(&self) -> Result<(), crate::SquadError> {
        let mut min_total = 0;
        let mut max_total = 0;
        for position in Position::ALL {
            let limit = self.limit_for(position);
            if limit.min > limit.max {
                return Err(crate::SquadError::validation(format!(
                    "{} limit has min {} above max {}",
                    position, limit.min, limit.max
                )));
            }
            min_total += limit.min;
            max_total += limit.max;
        }

        if self.starting_xi < min_total || self.starting_xi > max_total {
            return Err(crate::SquadError::validation(format!(
                "Starting XI of {} cannot satisfy position limits ({}..={})",
                self.starting_xi, min_total, max_total
            )));
        }

        if self.max_squad_size < self.starting_xi {
            return Err(crate::SquadError::validation(format!(
                "Squad cap {} is below starting XI size {}",
                self.max_squad_size, self.starting_xi
            )));
        }

        Ok(())
    }
}
