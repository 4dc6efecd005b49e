//! Transfer service - free-agent signings and offers between teams
//!
//! Validation and settlement are plain functions over [`MarketState`];
//! [`TransferService`] runs each of them as one transaction against a
//! [`MarketStore`], so a rejected transfer never leaves partial changes.

pub mod config;
pub mod error;
pub mod free_agent;
pub mod history;
pub mod offer;
pub mod service;
pub mod settlement;
pub mod store;
pub mod window;

#[cfg(test)]
mod testing;

pub use config::TransferConfig;
pub use error::TransferError;
pub use free_agent::{CostBreakdown, FreeAgentRequest, PlayerFilter};
pub use history::{TransferKind, TransferRecord};
pub use offer::{OfferRequest, OfferStatus, OfferTerms, TransferOffer};
pub use service::TransferService;
pub use settlement::OfferSettlement;
pub use store::{InMemoryMarketStore, MarketState, MarketStore};
pub use window::TransferWindow;

// Result type alias
pub type Result<T> = std::result::Result<T, TransferError>;
