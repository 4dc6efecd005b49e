//! Free-agent transfers
//!
//! A team signs an unowned player, optionally releasing one of its own.
//! Net cost is the incoming price minus the released player's acquisition
//! price.

use crate::error::TransferError;
use crate::history::{TransferKind, TransferRecord};
use crate::store::MarketState;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use squad_core::{FantasyTeam, FormationValidator, Money, Player, PlayerId, Position, RosterEntry, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeAgentRequest {
    pub team_id: TeamId,
    pub player_in: PlayerId,
    #[serde(default)]
    pub player_out: Option<PlayerId>,
}

/// Money side of a free-agent transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub player_in_price: Money,
    pub player_out_price: Money,
    pub net_cost: Money,
    pub current_budget: Money,
    pub budget_after_transfer: Money,
}

/// Filter for listing free agents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFilter {
    pub position: Option<Position>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,

    /// Case-insensitive match on name or club
    pub search: Option<String>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        if self.position.is_some_and(|position| position != player.position) {
            return false;
        }
        if self.min_price.is_some_and(|min| player.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| player.price > max) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                player.name.to_lowercase().contains(&term) || player.club.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Active, unowned players matching `filter`, most expensive first
pub fn available_players(state: &MarketState, filter: &PlayerFilter) -> Vec<Player> {
    let mut players: Vec<Player> = state
        .players
        .values()
        .filter(|player| player.is_active && state.owner_of(player.id).is_none())
        .filter(|player| filter.matches(player))
        .cloned()
        .collect();
    players.sort_by(|a, b| b.price.cmp(&a.price).then_with(|| a.name.cmp(&b.name)));
    players
}

/// Validate a request and build the resulting team without touching state
pub fn plan(
    state: &MarketState,
    validator: &FormationValidator,
    request: &FreeAgentRequest,
) -> Result<(FantasyTeam, CostBreakdown)> {
    let team = state.team(request.team_id)?;
    let player_in = state.player(request.player_in)?;

    if !player_in.is_active {
        return Err(TransferError::validation(format!("{} is not available for transfer", player_in.name)));
    }
    if let Some(owner) = state.owner_of(player_in.id) {
        return Err(TransferError::validation(format!(
            "{} is already owned by team {}",
            player_in.name, owner
        )));
    }

    let player_out_price = match request.player_out {
        Some(out) => {
            team.entry(out)
                .ok_or_else(|| {
                    TransferError::validation(format!("Player {} is not in team {}", out, team.id))
                })?
                .price
        }
        None if !validator.has_room(&team.roster) => {
            return Err(TransferError::validation(format!(
                "Squad is full ({} players); choose a player to release",
                team.squad_size()
            )));
        }
        None => Money::ZERO,
    };

    let current_budget = team.remaining_budget();
    let net_cost = player_in.price - player_out_price;
    if net_cost > current_budget {
        return Err(TransferError::InsufficientBudget { required: net_cost, available: current_budget });
    }

    let mut updated = team.clone();
    match request.player_out {
        Some(out) => {
            updated.replace_player(out, RosterEntry::starter(player_in))?;
        }
        None => {
            let entry = if updated.starters().count() < validator.rules().starting_xi {
                RosterEntry::starter(player_in)
            } else {
                RosterEntry::bench(player_in)
            };
            updated.add_player(entry)?;
        }
    }

    validator.ensure_valid(&updated.roster)?;
    updated.check_invariants()?;

    let breakdown = CostBreakdown {
        player_in_price: player_in.price,
        player_out_price,
        net_cost,
        current_budget,
        budget_after_transfer: current_budget - net_cost,
    };
    Ok((updated, breakdown))
}

/// Validate and apply a free-agent transfer to `state`
pub fn execute(
    state: &mut MarketState,
    validator: &FormationValidator,
    request: &FreeAgentRequest,
    now: DateTime<Utc>,
) -> Result<TransferRecord> {
    let (updated, breakdown) = plan(state, validator, request)?;
    state.teams.insert(updated.id, updated);

    let record = TransferRecord {
        team_id: request.team_id,
        kind: TransferKind::FreeAgent,
        player_in: Some(request.player_in),
        player_out: request.player_out,
        cost: breakdown.net_cost,
        counterparty: None,
        offer_id: None,
        recorded_at: now,
    };
    state.history.push(record.clone());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{market, player_id};
    use squad_core::ErrorKind;

    fn validator() -> FormationValidator {
        FormationValidator::default()
    }

    #[test]
    fn test_swap_same_position() {
        let mut state = market();
        let out = player_id(1, Position::Forward, 0);
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(900), player_out: Some(out) };
        let before = state.team(TeamId(1)).unwrap().spent();
        let out_price = state.team(TeamId(1)).unwrap().entry(out).unwrap().price;

        let record = execute(&mut state, &validator(), &request, Utc::now()).unwrap();

        let team = state.team(TeamId(1)).unwrap();
        assert!(team.contains(PlayerId(900)));
        assert!(!team.contains(out));
        assert!(team.entry(PlayerId(900)).unwrap().is_starter);
        assert_eq!(team.spent(), before - out_price + state.player(PlayerId(900)).unwrap().price);
        assert!(validator().validate(&team.roster).is_valid);
        assert_eq!(record.kind, TransferKind::FreeAgent);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_swap_on_team_restored_from_json() {
        let mut state = market();
        let json = serde_json::to_string(state.team(TeamId(1)).unwrap()).unwrap();
        let restored: FantasyTeam = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, state.team(TeamId(1)).unwrap());
        state.teams.insert(restored.id, restored);

        let out = player_id(1, Position::Forward, 1);
        let old_spent = state.team(TeamId(1)).unwrap().spent();
        let out_price = state.team(TeamId(1)).unwrap().entry(out).unwrap().price;
        let in_price = state.player(PlayerId(900)).unwrap().price;
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(900), player_out: Some(out) };

        execute(&mut state, &validator(), &request, Utc::now()).unwrap();

        let team = state.team(TeamId(1)).unwrap();
        assert!(validator().validate(&team.roster).is_valid);
        assert_eq!(team.spent(), old_spent - out_price + in_price);
        assert_eq!(team.remaining_budget(), team.total_budget - team.spent());
    }

    #[test]
    fn test_addition_goes_to_bench_when_xi_full() {
        let mut state = market();
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(901), player_out: None };

        execute(&mut state, &validator(), &request, Utc::now()).unwrap();
        let team = state.team(TeamId(1)).unwrap();
        assert!(!team.entry(PlayerId(901)).unwrap().is_starter);
        assert_eq!(team.squad_size(), 14);
    }

    #[test]
    fn test_over_budget_rejected_and_state_unchanged() {
        let mut state = market();
        let out = player_id(1, Position::Forward, 1);
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(904), player_out: Some(out) };
        let before = state.clone();

        for _ in 0..2 {
            let err = execute(&mut state, &validator(), &request, Utc::now()).unwrap_err();
            assert_eq!(
                err,
                TransferError::InsufficientBudget {
                    required: Money::from_millions(55),
                    available: Money::from_millions(35),
                }
            );
        }
        assert_eq!(state.teams, before.teams);
    }

    #[test]
    fn test_inactive_player_rejected() {
        let state = market();
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(905), player_out: None };
        let err = plan(&state, &validator(), &request).unwrap_err();
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn test_owned_player_rejected() {
        let mut state = market();
        let owned_elsewhere = player_id(2, Position::Forward, 0);
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: owned_elsewhere, player_out: None };

        let err = execute(&mut state, &validator(), &request, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unknown_player_not_found() {
        let state = market();
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(12345), player_out: None };
        let err = plan(&state, &validator(), &request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_position_mismatch_is_formation_error() {
        let mut state = market();
        // Replace the only goalkeeper with a forward
        let keeper = player_id(1, Position::Goalkeeper, 0);
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(900), player_out: Some(keeper) };

        let before = state.clone();
        let err = execute(&mut state, &validator(), &request, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Formation);
        assert_eq!(state.team(TeamId(1)).unwrap(), before.team(TeamId(1)).unwrap());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_preview_breakdown() {
        let state = market();
        let out = player_id(1, Position::Forward, 1);
        let request = FreeAgentRequest { team_id: TeamId(1), player_in: PlayerId(900), player_out: Some(out) };

        let (_, cost) = plan(&state, &validator(), &request).unwrap();
        assert_eq!(cost.net_cost, cost.player_in_price - cost.player_out_price);
        assert_eq!(cost.budget_after_transfer, cost.current_budget - cost.net_cost);
    }

    #[test]
    fn test_filter() {
        let state = market();
        let forwards = available_players(
            &state,
            &PlayerFilter { position: Some(Position::Forward), ..PlayerFilter::default() },
        );
        assert!(forwards.iter().all(|p| p.position == Position::Forward));
        assert!(forwards.iter().all(|p| state.owner_of(p.id).is_none()));
        assert!(forwards.windows(2).all(|w| w[0].price >= w[1].price));

        let search = available_players(
            &state,
            &PlayerFilter { search: Some("free".into()), ..PlayerFilter::default() },
        );
        assert!(!search.is_empty());
    }
}
