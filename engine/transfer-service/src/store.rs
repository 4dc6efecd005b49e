//! Market state and transactional store
//!
//! Settlement runs inside [`MarketStore::write`]: the closure gets a working
//! copy of the state, and the copy replaces the stored state only when the
//! closure returns `Ok`. A failed settlement leaves nothing behind.

use crate::error::TransferError;
use crate::history::TransferRecord;
use crate::offer::TransferOffer;
use crate::window::TransferWindow;
use crate::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use squad_core::{FantasyTeam, OfferId, Player, PlayerId, TeamId};
use std::collections::BTreeMap;

/// Everything one league's transfer market needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketState {
    pub players: BTreeMap<PlayerId, Player>,
    pub teams: BTreeMap<TeamId, FantasyTeam>,
    pub offers: BTreeMap<OfferId, TransferOffer>,
    pub history: Vec<TransferRecord>,
    pub window: TransferWindow,
    next_offer_id: u64,
}

impl MarketState {
    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players.get(&id).ok_or(TransferError::PlayerNotFound(id))
    }

    pub fn team(&self, id: TeamId) -> Result<&FantasyTeam> {
        self.teams.get(&id).ok_or(TransferError::TeamNotFound(id))
    }

    pub fn team_mut(&mut self, id: TeamId) -> Result<&mut FantasyTeam> {
        self.teams.get_mut(&id).ok_or(TransferError::TeamNotFound(id))
    }

    pub fn offer(&self, id: OfferId) -> Result<&TransferOffer> {
        self.offers.get(&id).ok_or(TransferError::OfferNotFound(id))
    }

    pub fn offer_mut(&mut self, id: OfferId) -> Result<&mut TransferOffer> {
        self.offers.get_mut(&id).ok_or(TransferError::OfferNotFound(id))
    }

    /// Team currently holding `player`, if any
    pub fn owner_of(&self, player: PlayerId) -> Option<TeamId> {
        self.teams.values().find(|team| team.contains(player)).map(|team| team.id)
    }

    pub(crate) fn allocate_offer_id(&mut self) -> OfferId {
        self.next_offer_id += 1;
        OfferId(self.next_offer_id)
    }

    pub(crate) fn insert_offer(&mut self, offer: TransferOffer) {
        self.next_offer_id = self.next_offer_id.max(offer.id.0);
        self.offers.insert(offer.id, offer);
    }
}

/// Transactional access to market state
pub trait MarketStore: Send + Sync {
    /// Run `f` against a consistent snapshot
    fn read<R>(&self, f: impl FnOnce(&MarketState) -> R) -> R;

    /// Run `f` as one all-or-nothing transaction
    fn write<R>(&self, f: impl FnOnce(&mut MarketState) -> Result<R>) -> Result<R>;
}

/// In-memory store guarded by a mutex
#[derive(Debug, Default)]
pub struct InMemoryMarketStore {
    state: Mutex<MarketState>,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MarketState) -> Self {
        Self { state: Mutex::new(state) }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> MarketState {
        self.state.lock().clone()
    }
}

impl MarketStore for InMemoryMarketStore {
    fn read<R>(&self, f: impl FnOnce(&MarketState) -> R) -> R {
        let state = self.state.lock();
        f(&state)
    }

    fn write<R>(&self, f: impl FnOnce(&mut MarketState) -> Result<R>) -> Result<R> {
        let mut state = self.state.lock();
        let mut working = state.clone();
        let result = f(&mut working)?;
        *state = working;
        Ok(result)
    }
}
