//! Formation validator
//!
//! Checks a roster's starting XI against the position limits and the squad
//! cap. Every violation is collected so callers can report them all at once.

use crate::config::FormationRules;
use crate::error::SquadError;
use crate::player::Position;
use crate::team::RosterEntry;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Starter counts per position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCounts {
    #[serde(rename = "GK")]
    pub goalkeepers: usize,
    #[serde(rename = "DEF")]
    pub defenders: usize,
    #[serde(rename = "MID")]
    pub midfielders: usize,
    #[serde(rename = "FWD")]
    pub forwards: usize,
}

impl PositionCounts {
    pub fn get(&self, position: Position) -> usize {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    fn increment(&mut self, position: Position) {
        match position {
            Position::Goalkeeper => self.goalkeepers += 1,
            Position::Defender => self.defenders += 1,
            Position::Midfielder => self.midfielders += 1,
            Position::Forward => self.forwards += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.goalkeepers + self.defenders + self.midfielders + self.forwards
    }
}

/// Result of validating a roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationReport {
    pub is_valid: bool,
    pub violations: Vec<String>,
    pub counts: PositionCounts,
    pub squad_size: usize,
}

impl FormationReport {
    /// Convert an invalid report into a formation error
    pub fn into_result(self) -> Result<PositionCounts> {
        if self.is_valid {
            Ok(self.counts)
        } else {
            Err(SquadError::Formation { violations: self.violations })
        }
    }
}

/// Validates rosters against a set of formation rules
#[derive(Debug, Clone, Default)]
pub struct FormationValidator {
    rules: FormationRules,
}

impl FormationValidator {
    pub fn new(rules: FormationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FormationRules {
        &self.rules
    }

    /// Validate a roster, collecting every violation
    pub fn validate(&self, roster: &[RosterEntry]) -> FormationReport {
        let mut counts = PositionCounts::default();
        for entry in roster.iter().filter(|entry| entry.is_starter) {
            counts.increment(entry.position);
        }

        let mut violations = Vec::new();

        for position in Position::ALL {
            let limit = self.rules.limit_for(position);
            let count = counts.get(position);
            if limit.min == limit.max {
                if count != limit.min {
                    violations.push(format!(
                        "Must have exactly {} {} starter(s), found {}",
                        limit.min, position, count
                    ));
                }
            } else if count < limit.min || count > limit.max {
                violations.push(format!(
                    "{} starters must be between {} and {}, found {}",
                    position, limit.min, limit.max, count
                ));
            }
        }

        if counts.total() != self.rules.starting_xi {
            violations.push(format!(
                "Starting XI must have exactly {} players, found {}",
                self.rules.starting_xi,
                counts.total()
            ));
        }

        if roster.len() > self.rules.max_squad_size {
            violations.push(format!(
                "Squad size cannot exceed {} players, found {}",
                self.rules.max_squad_size,
                roster.len()
            ));
        }

        FormationReport {
            is_valid: violations.is_empty(),
            violations,
            counts,
            squad_size: roster.len(),
        }
    }

    /// Validate and fail with `SquadError::Formation` on any violation
    pub fn ensure_valid(&self, roster: &[RosterEntry]) -> Result<()> {
        let report = self.validate(roster);
        if !report.is_valid {
            tracing::warn!("Formation rejected: {}", report.violations.join("; "));
        }
        report.into_result().map(|_| ())
    }

    /// Whether another player fits under the squad cap
    pub fn has_room(&self, roster: &[RosterEntry]) -> bool {
        roster.len() < self.rules.max_squad_size
    }
}
