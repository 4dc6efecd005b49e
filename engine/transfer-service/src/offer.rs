//! Transfer offers between teams

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use squad_core::{Money, OfferId, PlayerId, TeamId};

/// Offer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Expired,
}

impl OfferStatus {
    pub fn is_terminal(self) -> bool {
        self != OfferStatus::Pending
    }
}

/// What the sending team gives for the requested player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfferTerms {
    /// Pay cash, optionally releasing `player_out` to make room
    Money {
        amount: Money,
        #[serde(default)]
        player_out: Option<PlayerId>,
    },
    /// Swap one of the sender's players for the requested one
    PlayerExchange { player_offered: PlayerId },
}

impl OfferTerms {
    pub fn money(&self) -> Option<Money> {
        match self {
            OfferTerms::Money { amount, .. } => Some(*amount),
            OfferTerms::PlayerExchange { .. } => None,
        }
    }

    /// Player leaving the sender's roster, if any
    pub fn sender_outgoing(&self) -> Option<PlayerId> {
        match self {
            OfferTerms::Money { player_out, .. } => *player_out,
            OfferTerms::PlayerExchange { player_offered } => Some(*player_offered),
        }
    }
}

/// Request to open an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub from_team: TeamId,
    pub to_team: TeamId,
    pub player_requested: PlayerId,
    pub terms: OfferTerms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOffer {
    pub id: OfferId,
    pub from_team: TeamId,
    pub to_team: TeamId,
    pub player_requested: PlayerId,
    pub terms: OfferTerms,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,

    /// Accepted offer that invalidated this one
    #[serde(default)]
    pub superseded_by: Option<OfferId>,
}

impl TransferOffer {
    pub fn new(id: OfferId, request: OfferRequest, created_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            from_team: request.from_team,
            to_team: request.to_team,
            player_requested: request.player_requested,
            terms: request.terms,
            status: OfferStatus::Pending,
            created_at,
            expires_at,
            responded_at: None,
            superseded_by: None,
        }
    }

    /// A pending offer past its expiry counts as expired even before the
    /// status is persisted
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == OfferStatus::Expired
            || (self.status == OfferStatus::Pending && self.expires_at <= now)
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == OfferStatus::Pending && self.expires_at > now
    }

    /// Status as seen at `now`
    pub fn effective_status(&self, now: DateTime<Utc>) -> OfferStatus {
        if self.is_expired(now) {
            OfferStatus::Expired
        } else {
            self.status
        }
    }

    /// Every player that changes team if this offer settles
    pub fn moved_players(&self) -> Vec<PlayerId> {
        let mut players = vec![self.player_requested];
        players.extend(self.terms.sender_outgoing());
        players
    }

    pub fn references_any(&self, players: &[PlayerId]) -> bool {
        self.moved_players().iter().any(|player| players.contains(player))
    }

    pub(crate) fn close(&mut self, status: OfferStatus, now: DateTime<Utc>) {
        self.status = status;
        self.responded_at = Some(now);
    }
}
