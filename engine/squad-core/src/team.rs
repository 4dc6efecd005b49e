//! Fantasy team rosters, budgets and captaincy

use crate::config::FormationRules;
use crate::error::SquadError;
use crate::money::Money;
use crate::player::{Player, Position};
use crate::types::{PlayerId, TeamId, UserId};
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One player on a fantasy roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,

    /// Position the player occupies in the team
    pub position: Position,

    /// Price paid when the player joined; counts against the budget
    pub price: Money,

    #[serde(default)]
    pub is_starter: bool,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

impl RosterEntry {
    /// Entry for a player joining the starting XI
    pub fn starter(player: &Player) -> Self {
        Self {
            player_id: player.id,
            position: player.position,
            price: player.price,
            is_starter: true,
            is_captain: false,
            is_vice_captain: false,
        }
    }

    /// Entry for a player joining the bench
    pub fn bench(player: &Player) -> Self {
        Self { is_starter: false, ..Self::starter(player) }
    }
}

/// A user's fantasy team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FantasyTeam {
    pub id: TeamId,
    pub owner: UserId,
    pub name: String,
    pub total_budget: Money,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
    #[serde(default)]
    pub total_points: Decimal,
}

impl FantasyTeam {
    /// Create an empty team
    pub fn new(id: TeamId, owner: UserId, name: impl Into<String>, total_budget: Money) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            total_budget,
            roster: Vec::new(),
            total_points: Decimal::ZERO,
        }
    }

    /// Sum of acquisition prices of everyone on the roster
    pub fn spent(&self) -> Money {
        self.roster.iter().map(|entry| entry.price).sum()
    }

    pub fn remaining_budget(&self) -> Money {
        self.total_budget - self.spent()
    }

    pub fn squad_size(&self) -> usize {
        self.roster.len()
    }

    pub fn starters(&self) -> impl Iterator<Item = &RosterEntry> {
        self.roster.iter().filter(|entry| entry.is_starter)
    }

    pub fn bench(&self) -> impl Iterator<Item = &RosterEntry> {
        self.roster.iter().filter(|entry| !entry.is_starter)
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.roster.iter().any(|entry| entry.player_id == player_id)
    }

    pub fn entry(&self, player_id: PlayerId) -> Option<&RosterEntry> {
        self.roster.iter().find(|entry| entry.player_id == player_id)
    }

    fn entry_mut(&mut self, player_id: PlayerId) -> Option<&mut RosterEntry> {
        self.roster.iter_mut().find(|entry| entry.player_id == player_id)
    }

    pub fn captain(&self) -> Option<PlayerId> {
        self.roster.iter().find(|entry| entry.is_captain).map(|entry| entry.player_id)
    }

    pub fn vice_captain(&self) -> Option<PlayerId> {
        self.roster.iter().find(|entry| entry.is_vice_captain).map(|entry| entry.player_id)
    }

    /// Append a player to the roster.
    ///
    /// Only identity is checked here; squad cap and formation are enforced by
    /// the formation validator before a mutated team is persisted.
    pub fn add_player(&mut self, mut entry: RosterEntry) -> Result<()> {
        if self.contains(entry.player_id) {
            return Err(SquadError::validation(format!(
                "Player {} is already in team {}",
                entry.player_id, self.id
            )));
        }
        entry.is_captain = false;
        entry.is_vice_captain = false;
        self.roster.push(entry);
        Ok(())
    }

    /// Remove a player and return their entry
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<RosterEntry> {
        let index = self
            .roster
            .iter()
            .position(|entry| entry.player_id == player_id)
            .ok_or(SquadError::PlayerNotFound(player_id))?;
        Ok(self.roster.remove(index))
    }

    /// Swap `outgoing` for `incoming`, which takes over the starter slot.
    /// Captaincy does not carry over.
    pub fn replace_player(&mut self, outgoing: PlayerId, mut incoming: RosterEntry) -> Result<RosterEntry> {
        if self.contains(incoming.player_id) {
            return Err(SquadError::validation(format!(
                "Player {} is already in team {}",
                incoming.player_id, self.id
            )));
        }
        let index = self
            .roster
            .iter()
            .position(|entry| entry.player_id == outgoing)
            .ok_or(SquadError::PlayerNotFound(outgoing))?;

        incoming.is_starter = self.roster[index].is_starter;
        incoming.is_captain = false;
        incoming.is_vice_captain = false;
        Ok(std::mem::replace(&mut self.roster[index], incoming))
    }

    /// Designate the captain. The captain must be a starter and differ from the vice-captain.
    pub fn set_captain(&mut self, player_id: PlayerId) -> Result<()> {
        let entry = self.entry(player_id).ok_or(SquadError::PlayerNotFound(player_id))?;
        if !entry.is_starter {
            return Err(SquadError::validation("Captain must be in the starting XI"));
        }
        if entry.is_vice_captain {
            return Err(SquadError::validation("Captain and vice-captain must be different players"));
        }

        for entry in &mut self.roster {
            entry.is_captain = entry.player_id == player_id;
        }
        Ok(())
    }

    /// Designate the vice-captain under the same rules as the captain
    pub fn set_vice_captain(&mut self, player_id: PlayerId) -> Result<()> {
        let entry = self.entry(player_id).ok_or(SquadError::PlayerNotFound(player_id))?;
        if !entry.is_starter {
            return Err(SquadError::validation("Vice-captain must be in the starting XI"));
        }
        if entry.is_captain {
            return Err(SquadError::validation("Captain and vice-captain must be different players"));
        }

        for entry in &mut self.roster {
            entry.is_vice_captain = entry.player_id == player_id;
        }
        Ok(())
    }

    /// Pick the starting XI. Everyone else moves to the bench; captaincy is
    /// dropped from players that leave the XI.
    pub fn set_lineup(&mut self, starters: &[PlayerId]) -> Result<()> {
        let wanted: HashSet<PlayerId> = starters.iter().copied().collect();
        if wanted.len() != starters.len() {
            return Err(SquadError::validation("Line-up lists a player more than once"));
        }
        if let Some(missing) = wanted.iter().find(|id| !self.contains(**id)) {
            return Err(SquadError::PlayerNotFound(*missing));
        }

        for entry in &mut self.roster {
            entry.is_starter = wanted.contains(&entry.player_id);
            if !entry.is_starter {
                entry.is_captain = false;
                entry.is_vice_captain = false;
            }
        }
        Ok(())
    }

    /// Promote bench players until the XI is full again.
    ///
    /// Positions below their minimum are filled first, then any position
    /// still under its maximum. Returns the promoted players.
    pub fn fill_starting_xi(&mut self, rules: &FormationRules) -> Vec<PlayerId> {
        let mut promoted = Vec::new();

        while self.starters().count() < rules.starting_xi {
            let counts = |team: &FantasyTeam, position: Position| {
                team.starters().filter(|entry| entry.position == position).count()
            };

            let below_min = self.bench().find(|entry| {
                counts(self, entry.position) < rules.limit_for(entry.position).min
            });
            let below_max = self.bench().find(|entry| {
                counts(self, entry.position) < rules.limit_for(entry.position).max
            });

            let Some(candidate) = below_min.or(below_max).map(|entry| entry.player_id) else {
                break;
            };

            if let Some(entry) = self.entry_mut(candidate) {
                entry.is_starter = true;
            }
            promoted.push(candidate);
        }

        if !promoted.is_empty() {
            tracing::debug!("Promoted {:?} from the bench of team {}", promoted, self.id);
        }
        promoted
    }

    /// Check the roster invariants that do not depend on formation shape:
    /// unique players, budget, and captaincy.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.roster {
            if !seen.insert(entry.player_id) {
                return Err(SquadError::validation(format!(
                    "Player {} appears twice in team {}",
                    entry.player_id, self.id
                )));
            }
        }

        if self.spent() > self.total_budget {
            return Err(SquadError::InsufficientBudget {
                required: self.spent(),
                available: self.total_budget,
            });
        }

        let captains = self.roster.iter().filter(|entry| entry.is_captain).count();
        let vices = self.roster.iter().filter(|entry| entry.is_vice_captain).count();
        if captains > 1 || vices > 1 {
            return Err(SquadError::validation("At most one captain and one vice-captain allowed"));
        }
        if self.roster.iter().any(|entry| entry.is_captain && entry.is_vice_captain) {
            return Err(SquadError::validation("Captain and vice-captain must be different players"));
        }

        Ok(())
    }
}
