//! Transfer history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use squad_core::{Money, OfferId, PlayerId, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    FreeAgent,
    MoneyOffer,
    PlayerExchange,
}

/// One team's side of a settled transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub team_id: TeamId,
    pub kind: TransferKind,
    pub player_in: Option<PlayerId>,
    pub player_out: Option<PlayerId>,

    /// Positive when the team paid, negative when it received money
    pub cost: Money,

    pub counterparty: Option<TeamId>,
    pub offer_id: Option<OfferId>,
    pub recorded_at: DateTime<Utc>,
}

impl TransferRecord {
    pub fn is_free(&self) -> bool {
        self.cost.is_zero() || self.cost.is_negative()
    }
}
