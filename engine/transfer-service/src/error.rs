//! Error types for the transfer service

use squad_core::{ErrorKind, Money, OfferId, PlayerId, SquadError, TeamId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient budget: required {required}, available {available}")]
    InsufficientBudget { required: Money, available: Money },

    #[error("Invalid formation: {}", violations.join("; "))]
    Formation { violations: Vec<String> },

    #[error("Offer {offer_id} is stale: {reason}")]
    StaleOffer { offer_id: OfferId, reason: String },

    #[error("Offer {0} has expired")]
    ExpiredOffer(OfferId),

    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Transfer window is closed: {0}")]
    WindowClosed(String),
}

impl TransferError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn stale(offer_id: OfferId, reason: impl Into<String>) -> Self {
        Self::StaleOffer { offer_id, reason: reason.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::Validation(_) => ErrorKind::Validation,
            TransferError::InsufficientBudget { .. } => ErrorKind::InsufficientBudget,
            TransferError::Formation { .. } => ErrorKind::Formation,
            TransferError::StaleOffer { .. } => ErrorKind::StaleOffer,
            TransferError::ExpiredOffer(_) => ErrorKind::ExpiredOffer,
            TransferError::OfferNotFound(_)
            | TransferError::TeamNotFound(_)
            | TransferError::PlayerNotFound(_) => ErrorKind::NotFound,
            TransferError::Forbidden(_) => ErrorKind::Forbidden,
            TransferError::WindowClosed(_) => ErrorKind::TransferWindowClosed,
        }
    }
}

impl From<SquadError> for TransferError {
    fn from(err: SquadError) -> Self {
        match err {
            SquadError::Validation(msg) => TransferError::Validation(msg),
            SquadError::Formation { violations } => TransferError::Formation { violations },
            SquadError::InsufficientBudget { required, available } => {
                TransferError::InsufficientBudget { required, available }
            }
            SquadError::PlayerNotFound(id) => TransferError::PlayerNotFound(id),
            SquadError::TeamNotFound(id) => TransferError::TeamNotFound(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squad_errors_keep_their_kind() {
        let formation: TransferError =
            SquadError::Formation { violations: vec!["Must have exactly 1 GK starter(s), found 0".into()] }.into();
        assert_eq!(formation.kind(), ErrorKind::Formation);
        assert_eq!(formation.kind().http_status(), 422);

        let budget: TransferError = SquadError::InsufficientBudget {
            required: Money::from_millions(9),
            available: Money::from_millions(2),
        }
        .into();
        assert_eq!(budget.kind().http_status(), 402);
    }

    #[test]
    fn test_offer_error_statuses() {
        assert_eq!(TransferError::stale(OfferId(1), "player moved").kind().http_status(), 409);
        assert_eq!(TransferError::ExpiredOffer(OfferId(1)).kind().http_status(), 410);
        assert_eq!(TransferError::WindowClosed("matchday live".into()).kind().http_status(), 423);
        assert_eq!(TransferError::forbidden("not yours").kind().http_status(), 403);
    }
}
