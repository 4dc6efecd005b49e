//! Configuration for the scoring engine

use crate::rules::ScoringRules;
use serde::{Deserialize, Serialize};

/// Scoring engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rules: ScoringRules,

    /// Give the vice-captain the captain's multiplier when the captain has no
    /// score for the matchday. Off by default.
    pub vice_captain_fallback: bool,

    /// Captain multiplier
    pub captain_multiplier: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rules: ScoringRules::default(),
            vice_captain_fallback: false,
            captain_multiplier: 2,
        }
    }
}

impl ScoringConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, crate::ScoringError> {
        let mut config = Self::default();

        let bonuses = std::env::var("SCORING_BONUSES_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|_| crate::ScoringError::validation("Invalid SCORING_BONUSES_ENABLED"))?;
        if bonuses {
            config.rules = ScoringRules::extended();
        }

        config.vice_captain_fallback = std::env::var("SCORING_VICE_CAPTAIN_FALLBACK")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|_| crate::ScoringError::validation("Invalid SCORING_VICE_CAPTAIN_FALLBACK"))?;

        config.captain_multiplier = std::env::var("SCORING_CAPTAIN_MULTIPLIER")
            .unwrap_or_else(|_| "2".to_string())
            .parse::<u32>()
            .map_err(|_| crate::ScoringError::validation("Invalid SCORING_CAPTAIN_MULTIPLIER"))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), crate::ScoringError> {
        if self.captain_multiplier == 0 {
            return Err(crate::ScoringError::validation("captain_multiplier must be at least 1"));
        }
        self.rules.validate()
    }
}
