//! Configuration for the league service

use serde::{Deserialize, Serialize};

/// League service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Participant cap used when a league is created without one
    pub default_max_participants: u32,

    /// Smallest cap a league may have
    pub min_participants: u32,

    /// Largest cap a league may have
    pub max_participants_limit: u32,

    pub join_code_length: usize,

    /// Fixed seed for join codes; random when unset
    #[serde(default)]
    pub join_code_seed: Option<u64>,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            default_max_participants: 20,
            min_participants: 2,
            max_participants_limit: 100,
            join_code_length: 8,
            join_code_seed: None,
        }
    }
}

impl LeagueConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, crate::LeagueError> {
        let default_max_participants = std::env::var("LEAGUE_DEFAULT_MAX_PARTICIPANTS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u32>()
            .map_err(|_| crate::LeagueError::validation("Invalid LEAGUE_DEFAULT_MAX_PARTICIPANTS"))?;

        let max_participants_limit = std::env::var("LEAGUE_MAX_PARTICIPANTS_LIMIT")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u32>()
            .map_err(|_| crate::LeagueError::validation("Invalid LEAGUE_MAX_PARTICIPANTS_LIMIT"))?;

        let join_code_seed = match std::env::var("LEAGUE_JOIN_CODE_SEED") {
            Ok(seed) => Some(
                seed.parse::<u64>()
                    .map_err(|_| crate::LeagueError::validation("Invalid LEAGUE_JOIN_CODE_SEED"))?,
            ),
            Err(_) => None,
        };

        let config = Self {
            default_max_participants,
            max_participants_limit,
            join_code_seed,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), crate::LeagueError> {
        if self.min_participants < 2 {
            return Err(crate::LeagueError::validation("min_participants must be at least 2"));
        }
        if self.max_participants_limit < self.min_participants {
            return Err(crate::LeagueError::validation(
                "max_participants_limit must not be below min_participants",
            ));
        }
        if !(self.min_participants..=self.max_participants_limit).contains(&self.default_max_participants) {
            return Err(crate::LeagueError::validation(format!(
                "default_max_participants must be between {} and {}",
                self.min_participants, self.max_participants_limit
            )));
        }
        if self.join_code_length < 4 {
            return Err(crate::LeagueError::validation("join_code_length must be at least 4"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LeagueConfig::default();
        assert_eq!(config.default_max_participants, 20);
        assert_eq!(config.join_code_length, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_cap_must_fit_limits() {
        let config = LeagueConfig { default_max_participants: 150, ..LeagueConfig::default() };
        assert!(config.validate().is_err());
    }
}
