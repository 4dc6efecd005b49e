//! Transfer service
//!
//! Wraps the market store and runs every mutating operation as a single
//! store transaction.

use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::free_agent::{self, CostBreakdown, FreeAgentRequest, PlayerFilter};
use crate::history::TransferRecord;
use crate::offer::{OfferRequest, TransferOffer};
use crate::settlement::{self, OfferSettlement};
use crate::store::{InMemoryMarketStore, MarketStore};
use crate::window::TransferWindow;
use crate::Result;
use chrono::{DateTime, Utc};
use squad_core::{
    FantasyTeam, FormationValidator, Money, OfferId, Player, PlayerId, SquadGenerator, TeamId, UserId,
};
use std::collections::HashSet;
use tracing::{info, warn};

pub struct TransferService<S: MarketStore = InMemoryMarketStore> {
    store: S,
    config: TransferConfig,
    validator: FormationValidator,
}

impl TransferService<InMemoryMarketStore> {
    /// Service backed by an empty in-memory store
    pub fn in_memory(config: TransferConfig) -> Result<Self> {
        Self::new(InMemoryMarketStore::new(), config)
    }
}

impl<S: MarketStore> TransferService<S> {
    pub fn new(store: S, config: TransferConfig) -> Result<Self> {
        config.validate()?;
        let service = Self {
            validator: FormationValidator::new(config.formation.clone()),
            store,
            config,
        };
        if !service.config.window_open {
            service.lock_window("Transfer window closed")?;
        }
        Ok(service)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Add or replace catalog players
    pub fn register_players(&self, players: impl IntoIterator<Item = Player>) -> Result<usize> {
        let players: Vec<Player> = players.into_iter().collect();
        self.store.write(|state| {
            let count = players.len();
            for player in players {
                state.players.insert(player.id, player);
            }
            Ok(count)
        })
    }

    /// Add a team whose players are all in the catalog and unowned
    pub fn register_team(&self, team: FantasyTeam) -> Result<()> {
        self.store.write(|state| {
            if state.teams.contains_key(&team.id) {
                return Err(TransferError::validation(format!("Team {} already exists", team.id)));
            }
            for entry in &team.roster {
                state.player(entry.player_id)?;
                if let Some(owner) = state.owner_of(entry.player_id) {
                    return Err(TransferError::validation(format!(
                        "Player {} is already owned by team {}",
                        entry.player_id, owner
                    )));
                }
            }
            if team.squad_size() > self.config.formation.max_squad_size {
                return Err(TransferError::validation(format!(
                    "Squad size cannot exceed {} players",
                    self.config.formation.max_squad_size
                )));
            }
            team.check_invariants()?;
            state.teams.insert(team.id, team);
            Ok(())
        })
    }

    /// Create a team with a generated starting XI drawn from the free agents
    pub fn draft_team(
        &self,
        team_id: TeamId,
        owner: UserId,
        name: &str,
        budget: Money,
        seed: u64,
    ) -> Result<FantasyTeam> {
        let team = self.store.write(|state| {
            if state.teams.contains_key(&team_id) {
                return Err(TransferError::validation(format!("Team {} already exists", team_id)));
            }
            let owned: HashSet<PlayerId> = state
                .teams
                .values()
                .flat_map(|team| team.roster.iter().map(|entry| entry.player_id))
                .collect();
            let pool: Vec<Player> = state.players.values().cloned().collect();

            let mut team = FantasyTeam::new(team_id, owner, name, budget);
            team.roster = SquadGenerator::with_seed(seed).generate(&pool, &owned, budget)?;
            self.validator.ensure_valid(&team.roster)?;
            state.teams.insert(team.id, team.clone());
            Ok(team)
        })?;

        info!("Drafted team {} for user {}: {} spent of {}", team.id, owner, team.spent(), budget);
        Ok(team)
    }

    pub fn team(&self, team_id: TeamId) -> Result<FantasyTeam> {
        self.store.read(|state| state.team(team_id).cloned())
    }

    pub fn offer(&self, offer_id: OfferId) -> Result<TransferOffer> {
        self.store.read(|state| state.offer(offer_id).cloned())
    }

    pub fn lock_window(&self, reason: &str) -> Result<()> {
        self.store.write(|state| {
            state.window = TransferWindow::locked(reason);
            Ok(())
        })?;
        info!("Transfer window locked: {}", reason);
        Ok(())
    }

    pub fn open_window(&self) -> Result<()> {
        self.store.write(|state| {
            state.window = TransferWindow::open();
            Ok(())
        })?;
        info!("Transfer window opened");
        Ok(())
    }

    pub fn available_players(&self, filter: &PlayerFilter) -> Vec<Player> {
        self.store.read(|state| free_agent::available_players(state, filter))
    }

    /// Cost breakdown for a free-agent transfer, without applying it
    pub fn preview_free_agent(&self, user: UserId, request: &FreeAgentRequest) -> Result<CostBreakdown> {
        self.store.read(|state| {
            ensure_team_owner(state.team(request.team_id)?, user)?;
            free_agent::plan(state, &self.validator, request).map(|(_, breakdown)| breakdown)
        })
    }

    pub fn free_agent_transfer(
        &self,
        user: UserId,
        request: &FreeAgentRequest,
        now: DateTime<Utc>,
    ) -> Result<TransferRecord> {
        let result = self.store.write(|state| {
            ensure_team_owner(state.team(request.team_id)?, user)?;
            state.window.ensure_open()?;
            free_agent::execute(state, &self.validator, request, now)
        });

        match &result {
            Ok(record) => info!(
                "Team {} signed free agent {} (released {:?}) for {}",
                record.team_id, request.player_in, request.player_out, record.cost
            ),
            Err(err) => warn!("Free-agent transfer for team {} rejected: {}", request.team_id, err),
        }
        result
    }

    pub fn create_offer(&self, user: UserId, request: OfferRequest, now: DateTime<Utc>) -> Result<TransferOffer> {
        let result = self.store.write(|state| {
            settlement::create_offer(state, &self.config, &self.validator, user, request, now)
        });

        match &result {
            Ok(offer) => info!(
                "Offer {} created: team {} -> team {} for player {}",
                offer.id, offer.from_team, offer.to_team, offer.player_requested
            ),
            Err(err) => warn!("Offer creation by user {} rejected: {}", user, err),
        }
        result
    }

    pub fn accept_offer(&self, user: UserId, offer_id: OfferId, now: DateTime<Utc>) -> Result<OfferSettlement> {
        let result = self
            .store
            .write(|state| settlement::accept_offer(state, &self.validator, user, offer_id, now));

        match &result {
            Ok(settled) => info!(
                "Offer {} accepted; {} competing offer(s) invalidated",
                offer_id,
                settled.invalidated.len()
            ),
            Err(err) => warn!("Accepting offer {} failed: {}", offer_id, err),
        }
        result
    }

    pub fn reject_offer(&self, user: UserId, offer_id: OfferId, now: DateTime<Utc>) -> Result<TransferOffer> {
        let offer = self.store.write(|state| settlement::reject_offer(state, user, offer_id, now))?;
        info!("Offer {} rejected", offer_id);
        Ok(offer)
    }

    pub fn cancel_offer(&self, user: UserId, offer_id: OfferId, now: DateTime<Utc>) -> Result<TransferOffer> {
        let offer = self.store.write(|state| settlement::cancel_offer(state, user, offer_id, now))?;
        info!("Offer {} cancelled", offer_id);
        Ok(offer)
    }

    /// Persist `expired` on lapsed offers
    pub fn expire_offers(&self, now: DateTime<Utc>) -> Result<Vec<OfferId>> {
        let expired = self.store.write(|state| Ok(settlement::expire_offers(state, now)))?;
        if !expired.is_empty() {
            info!("Expired {} offer(s)", expired.len());
        }
        Ok(expired)
    }

    pub fn offers_for_team(&self, team_id: TeamId) -> Vec<TransferOffer> {
        self.store.read(|state| settlement::offers_for_team(state, team_id))
    }

    /// Transfer history of a team, oldest first
    pub fn history(&self, team_id: TeamId) -> Vec<TransferRecord> {
        self.store.read(|state| {
            state.history.iter().filter(|record| record.team_id == team_id).cloned().collect()
        })
    }
}

fn ensure_team_owner(team: &FantasyTeam, user: UserId) -> Result<()> {
    if team.owner == user {
        Ok(())
    } else {
        Err(TransferError::forbidden(format!("User {} does not own team {}", user, team.id)))
    }
}
