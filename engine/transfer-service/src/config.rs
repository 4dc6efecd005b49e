//! Configuration for the transfer service

use serde::{Deserialize, Serialize};
use squad_core::FormationRules;

/// Transfer service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// How long an offer stays open
    pub offer_ttl_hours: i64,

    /// Whether the window starts open
    pub window_open: bool,

    pub formation: FormationRules,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            offer_ttl_hours: 7 * 24,
            window_open: true,
            formation: FormationRules::default(),
        }
    }
}

impl TransferConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, crate::TransferError> {
        let offer_ttl_hours = std::env::var("TRANSFER_OFFER_TTL_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse::<i64>()
            .map_err(|_| crate::TransferError::validation("Invalid TRANSFER_OFFER_TTL_HOURS"))?;

        let window_open = std::env::var("TRANSFER_WINDOW_OPEN")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| crate::TransferError::validation("Invalid TRANSFER_WINDOW_OPEN"))?;

        let config = Self {
            offer_ttl_hours,
            window_open,
            formation: FormationRules::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), crate::TransferError> {
        if self.offer_ttl_hours <= 0 {
            return Err(crate::TransferError::validation("offer_ttl_hours must be positive"));
        }
        self.formation.validate()?;
        Ok(())
    }

    pub fn offer_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.offer_ttl_hours)
    }
}
