//! Offer lifecycle and settlement
//!
//! Offers move `pending -> {accepted, rejected, cancelled, expired}`. Accepting
//! re-validates everything against current state, settles both teams, and
//! rejects every other pending offer that names a player who just moved.
//! Competing offers that already lapsed are marked expired instead.

use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::history::{TransferKind, TransferRecord};
use crate::offer::{OfferRequest, OfferStatus, OfferTerms, TransferOffer};
use crate::store::MarketState;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use squad_core::{FantasyTeam, FormationValidator, OfferId, RosterEntry, TeamId, UserId};

/// Outcome of an accepted offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSettlement {
    pub offer: TransferOffer,
    pub from_team: FantasyTeam,
    pub to_team: FantasyTeam,
    pub invalidated: Vec<OfferId>,
    pub records: Vec<TransferRecord>,
}

fn ensure_owner(team: &FantasyTeam, user: UserId) -> Result<()> {
    if team.owner == user {
        Ok(())
    } else {
        Err(TransferError::forbidden(format!("User {} does not own team {}", user, team.id)))
    }
}

/// Pending and not yet past expiry
fn ensure_open(offer: &TransferOffer, now: DateTime<Utc>) -> Result<()> {
    if offer.status != OfferStatus::Pending {
        return Err(TransferError::stale(offer.id, format!("offer is already {:?}", offer.status).to_lowercase()));
    }
    if offer.is_expired(now) {
        return Err(TransferError::ExpiredOffer(offer.id));
    }
    Ok(())
}

/// Validate and store a new pending offer
pub fn create_offer(
    state: &mut MarketState,
    config: &TransferConfig,
    validator: &FormationValidator,
    user: UserId,
    request: OfferRequest,
    now: DateTime<Utc>,
) -> Result<TransferOffer> {
    state.window.ensure_open()?;

    if request.from_team == request.to_team {
        return Err(TransferError::validation("Cannot make an offer to your own team"));
    }
    let from_team = state.team(request.from_team)?;
    let to_team = state.team(request.to_team)?;
    ensure_owner(from_team, user)?;

    let requested = state.player(request.player_requested)?;
    if !to_team.contains(requested.id) {
        return Err(TransferError::validation(format!(
            "{} is not in team {}",
            requested.name, to_team.name
        )));
    }

    let duplicate = state.offers.values().any(|offer| {
        offer.is_open(now)
            && offer.from_team == request.from_team
            && offer.to_team == request.to_team
            && offer.player_requested == request.player_requested
    });
    if duplicate {
        return Err(TransferError::validation(format!(
            "A pending offer for {} already exists",
            requested.name
        )));
    }

    match &request.terms {
        OfferTerms::Money { amount, player_out } => {
            if !amount.is_positive() {
                return Err(TransferError::validation("Offered money must be greater than zero"));
            }
            let available = from_team.remaining_budget();
            if *amount > available {
                return Err(TransferError::InsufficientBudget { required: *amount, available });
            }
            match player_out {
                Some(out) if !from_team.contains(*out) => {
                    return Err(TransferError::validation(format!(
                        "Player {} is not in team {}",
                        out, from_team.name
                    )));
                }
                None if !validator.has_room(&from_team.roster) => {
                    return Err(TransferError::validation(format!(
                        "Squad is full ({} players); choose a player to release",
                        from_team.squad_size()
                    )));
                }
                _ => {}
            }
        }
        OfferTerms::PlayerExchange { player_offered } => {
            if !from_team.contains(*player_offered) {
                return Err(TransferError::validation(format!(
                    "Player {} is not in team {}",
                    player_offered, from_team.name
                )));
            }
        }
    }

    let id = state.allocate_offer_id();
    let offer = TransferOffer::new(id, request, now, now + config.offer_ttl());
    state.insert_offer(offer.clone());
    Ok(offer)
}

/// Prefix violations with the team they belong to
fn check_team(validator: &FormationValidator, team: &FantasyTeam) -> Result<()> {
    let report = validator.validate(&team.roster);
    if !report.is_valid {
        return Err(TransferError::Formation {
            violations: report
                .violations
                .into_iter()
                .map(|violation| format!("{}: {}", team.name, violation))
                .collect(),
        });
    }
    team.check_invariants()?;
    Ok(())
}

/// Build both teams as they would look after `offer` settles
fn settle_teams(
    state: &MarketState,
    validator: &FormationValidator,
    offer: &TransferOffer,
) -> Result<(FantasyTeam, FantasyTeam)> {
    let mut buyer = state.team(offer.from_team)?.clone();
    let mut seller = state.team(offer.to_team)?.clone();

    let requested_entry = seller
        .entry(offer.player_requested)
        .cloned()
        .ok_or_else(|| TransferError::stale(offer.id, format!("player {} has left team {}", offer.player_requested, seller.id)))?;

    if let Some(outgoing) = offer.terms.sender_outgoing() {
        if !buyer.contains(outgoing) {
            return Err(TransferError::stale(
                offer.id,
                format!("player {} has left team {}", outgoing, buyer.id),
            ));
        }
    }

    match &offer.terms {
        OfferTerms::Money { amount, player_out } => {
            match player_out {
                Some(out) => {
                    buyer.replace_player(*out, requested_entry)?;
                }
                None => {
                    let mut entry = requested_entry;
                    entry.is_starter = buyer.starters().count() < validator.rules().starting_xi;
                    buyer.add_player(entry)?;
                }
            }
            seller.remove_player(offer.player_requested)?;
            seller.fill_starting_xi(validator.rules());

            buyer.total_budget -= *amount;
            seller.total_budget += *amount;
        }
        OfferTerms::PlayerExchange { player_offered } => {
            let offered_entry: RosterEntry = buyer
                .entry(*player_offered)
                .cloned()
                .ok_or_else(|| TransferError::stale(offer.id, format!("player {} has left team {}", player_offered, buyer.id)))?;

            buyer.replace_player(*player_offered, requested_entry)?;
            seller.replace_player(offer.player_requested, offered_entry)?;
        }
    }

    check_team(validator, &buyer)?;
    check_team(validator, &seller)?;
    Ok((buyer, seller))
}

fn settlement_records(offer: &TransferOffer, now: DateTime<Utc>) -> Vec<TransferRecord> {
    let (kind, money) = match &offer.terms {
        OfferTerms::Money { amount, .. } => (TransferKind::MoneyOffer, *amount),
        OfferTerms::PlayerExchange { .. } => (TransferKind::PlayerExchange, squad_core::Money::ZERO),
    };
    let sender_out = offer.terms.sender_outgoing();
    let seller_in = match offer.terms {
        OfferTerms::PlayerExchange { player_offered } => Some(player_offered),
        OfferTerms::Money { .. } => None,
    };

    vec![
        TransferRecord {
            team_id: offer.from_team,
            kind,
            player_in: Some(offer.player_requested),
            player_out: sender_out,
            cost: money,
            counterparty: Some(offer.to_team),
            offer_id: Some(offer.id),
            recorded_at: now,
        },
        TransferRecord {
            team_id: offer.to_team,
            kind,
            player_in: seller_in,
            player_out: Some(offer.player_requested),
            cost: -money,
            counterparty: Some(offer.from_team),
            offer_id: Some(offer.id),
            recorded_at: now,
        },
    ]
}

/// Accept an offer as the owner of the receiving team
pub fn accept_offer(
    state: &mut MarketState,
    validator: &FormationValidator,
    user: UserId,
    offer_id: OfferId,
    now: DateTime<Utc>,
) -> Result<OfferSettlement> {
    let offer = state.offer(offer_id)?.clone();
    ensure_owner(state.team(offer.to_team)?, user)?;
    ensure_open(&offer, now)?;
    state.window.ensure_open()?;

    let (buyer, seller) = settle_teams(state, validator, &offer)?;

    state.teams.insert(buyer.id, buyer.clone());
    state.teams.insert(seller.id, seller.clone());

    let moved = offer.moved_players();
    let mut invalidated = Vec::new();
    for other in state.offers.values_mut() {
        if other.id == offer.id || other.status != OfferStatus::Pending || !other.references_any(&moved) {
            continue;
        }
        // A lapsed offer was never live competition
        if other.is_expired(now) {
            other.status = OfferStatus::Expired;
            continue;
        }
        other.close(OfferStatus::Rejected, now);
        other.superseded_by = Some(offer.id);
        invalidated.push(other.id);
    }

    let accepted = state.offer_mut(offer_id)?;
    accepted.close(OfferStatus::Accepted, now);
    let accepted = accepted.clone();

    let records = settlement_records(&accepted, now);
    state.history.extend(records.iter().cloned());

    Ok(OfferSettlement { offer: accepted, from_team: buyer, to_team: seller, invalidated, records })
}

/// Reject an offer as the owner of the receiving team
pub fn reject_offer(state: &mut MarketState, user: UserId, offer_id: OfferId, now: DateTime<Utc>) -> Result<TransferOffer> {
    let to_team = state.offer(offer_id)?.to_team;
    ensure_owner(state.team(to_team)?, user)?;
    close_open_offer(state, offer_id, OfferStatus::Rejected, now)
}

/// Withdraw an offer as the owner of the sending team
pub fn cancel_offer(state: &mut MarketState, user: UserId, offer_id: OfferId, now: DateTime<Utc>) -> Result<TransferOffer> {
    let from_team = state.offer(offer_id)?.from_team;
    ensure_owner(state.team(from_team)?, user)?;
    close_open_offer(state, offer_id, OfferStatus::Cancelled, now)
}

fn close_open_offer(
    state: &mut MarketState,
    offer_id: OfferId,
    status: OfferStatus,
    now: DateTime<Utc>,
) -> Result<TransferOffer> {
    let offer = state.offer_mut(offer_id)?;
    ensure_open(offer, now)?;
    offer.close(status, now);
    Ok(offer.clone())
}

/// Persist `expired` on every lapsed pending offer
pub fn expire_offers(state: &mut MarketState, now: DateTime<Utc>) -> Vec<OfferId> {
    state
        .offers
        .values_mut()
        .filter(|offer| offer.status == OfferStatus::Pending && offer.expires_at <= now)
        .map(|offer| {
            offer.status = OfferStatus::Expired;
            offer.id
        })
        .collect()
}

/// Offers sent or received by a team, newest first
pub fn offers_for_team(state: &MarketState, team_id: TeamId) -> Vec<TransferOffer> {
    let mut offers: Vec<TransferOffer> = state
        .offers
        .values()
        .filter(|offer| offer.from_team == team_id || offer.to_team == team_id)
        .cloned()
        .collect();
    offers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    offers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bench_id, market, player_id};
    use chrono::Duration;
    use squad_core::{ErrorKind, Money, PlayerId, Position};

    fn validator() -> FormationValidator {
        FormationValidator::default()
    }

    fn money_offer(amount_millions: i64, player_out: Option<PlayerId>) -> OfferRequest {
        OfferRequest {
            from_team: TeamId(1),
            to_team: TeamId(2),
            player_requested: player_id(2, Position::Forward, 1),
            terms: OfferTerms::Money { amount: Money::from_millions(amount_millions), player_out },
        }
    }

    fn create(state: &mut MarketState, request: OfferRequest, now: DateTime<Utc>) -> Result<TransferOffer> {
        create_offer(state, &TransferConfig::default(), &validator(), UserId(1), request, now)
    }

    #[test]
    fn test_money_offer_settles_both_sides() {
        let mut state = market();
        let now = Utc::now();
        let out = player_id(1, Position::Forward, 1);
        let offer = create(&mut state, money_offer(3, Some(out)), now).unwrap();
        assert_eq!(offer.expires_at, now + Duration::days(7));

        let settlement = accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap();

        let buyer = state.team(TeamId(1)).unwrap();
        let seller = state.team(TeamId(2)).unwrap();
        assert!(buyer.contains(player_id(2, Position::Forward, 1)));
        assert!(!buyer.contains(out));
        assert!(!seller.contains(player_id(2, Position::Forward, 1)));
        assert_eq!(buyer.total_budget, Money::from_millions(97));
        assert_eq!(seller.total_budget, Money::from_millions(103));
        assert_eq!(settlement.offer.status, OfferStatus::Accepted);
        assert_eq!(settlement.records.len(), 2);
        assert_eq!(settlement.records[1].cost, -Money::from_millions(3));
    }

    #[test]
    fn test_seller_without_cover_fails_formation() {
        let mut state = market();
        let seller = state.team_mut(TeamId(2)).unwrap();
        seller.remove_player(bench_id(2, 0)).unwrap();
        seller.remove_player(bench_id(2, 1)).unwrap();

        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();
        let before = state.clone();

        let err = accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Formation);
        assert!(err.to_string().contains("Team 2"));
        assert_eq!(state.teams, before.teams);
        assert_eq!(state.offer(offer.id).unwrap().status, OfferStatus::Pending);
    }

    #[test]
    fn test_seller_auto_promotes_bench() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(2, Some(player_id(1, Position::Forward, 1))), now).unwrap();
        accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap();

        let seller = state.team(TeamId(2)).unwrap();
        assert!(seller.entry(bench_id(2, 0)).unwrap().is_starter);
        assert!(!seller.entry(bench_id(2, 1)).unwrap().is_starter);
        assert_eq!(seller.starters().count(), 11);
    }

    #[test]
    fn test_player_exchange_inherits_slots() {
        let mut state = market();
        let now = Utc::now();
        let offered = player_id(1, Position::Forward, 1);
        let request = OfferRequest {
            from_team: TeamId(1),
            to_team: TeamId(2),
            player_requested: player_id(2, Position::Forward, 1),
            terms: OfferTerms::PlayerExchange { player_offered: offered },
        };
        let offer = create(&mut state, request, now).unwrap();
        let settlement = accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap();

        assert!(state.team(TeamId(2)).unwrap().entry(offered).unwrap().is_starter);
        assert_eq!(state.team(TeamId(1)).unwrap().total_budget, Money::from_millions(100));
        assert!(settlement.records.iter().all(|record| record.is_free()));
    }

    #[test]
    fn test_competing_offers_invalidated() {
        let mut state = market();
        let now = Utc::now();
        let requested = player_id(2, Position::Forward, 1);

        let first = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();

        // A third team also bids for the same striker
        let mut rival = state.team(TeamId(1)).unwrap().clone();
        rival.id = TeamId(3);
        rival.owner = UserId(3);
        rival.name = "Team 3".into();
        rival.roster.clear();
        state.teams.insert(rival.id, rival);
        let rival_request = OfferRequest {
            from_team: TeamId(3),
            to_team: TeamId(2),
            player_requested: requested,
            terms: OfferTerms::Money { amount: Money::from_millions(1), player_out: None },
        };
        let second =
            create_offer(&mut state, &TransferConfig::default(), &validator(), UserId(3), rival_request, now).unwrap();

        let settlement = accept_offer(&mut state, &validator(), UserId(2), first.id, now).unwrap();
        assert_eq!(settlement.invalidated, vec![second.id]);

        let second = state.offer(second.id).unwrap().clone();
        assert_eq!(second.status, OfferStatus::Rejected);
        assert_eq!(second.superseded_by, Some(first.id));

        // Settling it now is stale, not a double spend
        let err = accept_offer(&mut state, &validator(), UserId(2), second.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleOffer);
    }

    #[test]
    fn test_accepting_twice_is_stale() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();
        accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap();

        let err = accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleOffer);
    }

    #[test]
    fn test_expired_offer_cannot_be_accepted() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();
        let later = now + Duration::days(8);

        let err = accept_offer(&mut state, &validator(), UserId(2), offer.id, later).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpiredOffer);
        let err = reject_offer(&mut state, UserId(2), offer.id, later).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpiredOffer);

        assert_eq!(expire_offers(&mut state, later), vec![offer.id]);
        assert_eq!(state.offer(offer.id).unwrap().status, OfferStatus::Expired);
        assert!(expire_offers(&mut state, later).is_empty());
    }

    #[test]
    fn test_accept_after_sweep_is_stale() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();
        let later = now + Duration::days(8);
        expire_offers(&mut state, later);

        let err = accept_offer(&mut state, &validator(), UserId(2), offer.id, later).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleOffer);
        assert_eq!(state.offer(offer.id).unwrap().status, OfferStatus::Expired);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_lapsed_competitor_expires_instead_of_superseded() {
        let mut state = market();
        let start = Utc::now();
        let requested = player_id(2, Position::Forward, 1);

        let mut rival = state.team(TeamId(1)).unwrap().clone();
        rival.id = TeamId(3);
        rival.owner = UserId(3);
        rival.name = "Team 3".into();
        rival.roster.clear();
        state.teams.insert(rival.id, rival);
        let rival_request = OfferRequest {
            from_team: TeamId(3),
            to_team: TeamId(2),
            player_requested: requested,
            terms: OfferTerms::Money { amount: Money::from_millions(1), player_out: None },
        };
        let lapsed =
            create_offer(&mut state, &TransferConfig::default(), &validator(), UserId(3), rival_request, start)
                .unwrap();

        // The winning offer is made two days later, so it is still open on day eight
        let first = create(
            &mut state,
            money_offer(3, Some(player_id(1, Position::Forward, 1))),
            start + Duration::days(2),
        )
        .unwrap();
        let now = start + Duration::days(8);

        let settlement = accept_offer(&mut state, &validator(), UserId(2), first.id, now).unwrap();
        assert!(settlement.invalidated.is_empty());

        let lapsed = state.offer(lapsed.id).unwrap();
        assert_eq!(lapsed.status, OfferStatus::Expired);
        assert_eq!(lapsed.superseded_by, None);
        assert_eq!(lapsed.responded_at, None);
    }

    #[test]
    fn test_only_recipient_accepts_and_only_sender_cancels() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();

        let err = accept_offer(&mut state, &validator(), UserId(1), offer.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = cancel_offer(&mut state, UserId(2), offer.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let cancelled = cancel_offer(&mut state, UserId(1), offer.id, now).unwrap();
        assert_eq!(cancelled.status, OfferStatus::Cancelled);
        let err = reject_offer(&mut state, UserId(2), offer.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleOffer);
    }

    #[test]
    fn test_reject_has_no_roster_effect() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, None), now).unwrap();
        let teams = state.teams.clone();

        let rejected = reject_offer(&mut state, UserId(2), offer.id, now).unwrap();
        assert_eq!(rejected.status, OfferStatus::Rejected);
        assert_eq!(rejected.responded_at, Some(now));
        assert_eq!(state.teams, teams);
    }

    #[test]
    fn test_creation_rules() {
        let mut state = market();
        let now = Utc::now();

        let err = create(&mut state, money_offer(0, None), now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = create(&mut state, money_offer(46, None), now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBudget);

        let mut own = money_offer(3, None);
        own.to_team = TeamId(1);
        assert_eq!(create(&mut state, own, now).unwrap_err().kind(), ErrorKind::Validation);

        let mut not_theirs = money_offer(3, None);
        not_theirs.player_requested = player_id(1, Position::Forward, 1);
        assert_eq!(create(&mut state, not_theirs, now).unwrap_err().kind(), ErrorKind::Validation);

        create(&mut state, money_offer(3, None), now).unwrap();
        let err = create(&mut state, money_offer(4, None), now).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let err = create_offer(
            &mut state,
            &TransferConfig::default(),
            &validator(),
            UserId(2),
            money_offer(3, None),
            now,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_full_squad_needs_player_out() {
        let mut state = market();
        let team = state.team_mut(TeamId(1)).unwrap();
        for id in 0..2 {
            let extra = squad_core::Player::new(
                PlayerId(970 + id),
                "Reserve",
                "Club",
                Position::Midfielder,
                Money::from_millions(1),
            );
            team.add_player(RosterEntry::bench(&extra)).unwrap();
        }
        let err = create(&mut state, money_offer(3, None), Utc::now()).unwrap_err();
        assert!(err.to_string().contains("Squad is full"));
    }

    #[test]
    fn test_stale_when_requested_player_moved() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();
        state
            .team_mut(TeamId(2))
            .unwrap()
            .remove_player(player_id(2, Position::Forward, 1))
            .unwrap();

        let err = accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleOffer);
    }

    #[test]
    fn test_locked_window_blocks_acceptance() {
        let mut state = market();
        let now = Utc::now();
        let offer = create(&mut state, money_offer(3, Some(player_id(1, Position::Forward, 1))), now).unwrap();
        state.window = crate::window::TransferWindow::locked("Matchday live");

        let err = accept_offer(&mut state, &validator(), UserId(2), offer.id, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferWindowClosed);
        assert_eq!(offers_for_team(&state, TeamId(2)).len(), 1);
    }
}
