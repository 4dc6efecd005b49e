//! Initial squad generator
//!
//! Builds a starting XI for a new team from unowned players. Candidates are
//! shuffled with a seeded RNG, then each slot takes the first candidate that
//! still leaves enough budget to fill the remaining slots at their cheapest.

use crate::error::SquadError;
use crate::money::Money;
use crate::player::{Player, Position};
use crate::team::RosterEntry;
use crate::types::PlayerId;
use crate::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

/// Default 1-4-4-2 shape
pub const DEFAULT_SHAPE: [(Position, usize); 4] = [
    (Position::Goalkeeper, 1),
    (Position::Defender, 4),
    (Position::Midfielder, 4),
    (Position::Forward, 2),
];

#[derive(Debug, Clone)]
pub struct SquadGenerator {
    shape: Vec<(Position, usize)>,
    rng: StdRng,
}

impl SquadGenerator {
    /// Generator with the default shape and a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            shape: DEFAULT_SHAPE.to_vec(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_shape(mut self, shape: Vec<(Position, usize)>) -> Self {
        self.shape = shape;
        self
    }

    /// Pick a squad from `pool`, skipping inactive and already-owned players.
    /// Every generated player is a starter; the two most expensive picks get
    /// the captain and vice-captain armbands.
    pub fn generate(
        &mut self,
        pool: &[Player],
        owned: &HashSet<PlayerId>,
        budget: Money,
    ) -> Result<Vec<RosterEntry>> {
        let mut candidates: Vec<&Player> = pool
            .iter()
            .filter(|player| player.is_active && !owned.contains(&player.id))
            .collect();
        candidates.shuffle(&mut self.rng);

        for (position, needed) in &self.shape {
            let available = candidates.iter().filter(|p| p.position == *position).count();
            if available < *needed {
                return Err(SquadError::validation(format!(
                    "Not enough free {} players: need {}, found {}",
                    position, needed, available
                )));
            }
        }

        let mut picked: Vec<&Player> = Vec::new();
        let mut remaining = budget;

        for (slot_position, needed) in self.shape.clone() {
            for _ in 0..needed {
                let choice = candidates.iter().copied().find(|candidate| {
                    candidate.position == slot_position
                        && !picked.iter().any(|p| p.id == candidate.id)
                        && candidate.price + self.reserve_after(&candidates, &picked, candidate)
                            <= remaining
                });

                let Some(choice) = choice else {
                    return Err(SquadError::validation(format!(
                        "Cannot build a squad within a budget of {}",
                        budget
                    )));
                };
                remaining -= choice.price;
                picked.push(choice);
            }
        }

        let mut entries: Vec<RosterEntry> = picked.iter().map(|p| RosterEntry::starter(p)).collect();

        let mut by_price: Vec<usize> = (0..entries.len()).collect();
        by_price.sort_by(|a, b| entries[*b].price.cmp(&entries[*a].price));
        if let Some(captain) = by_price.first() {
            entries[*captain].is_captain = true;
        }
        if let Some(vice) = by_price.get(1) {
            entries[*vice].is_vice_captain = true;
        }

        tracing::debug!(
            "Generated squad of {} players, {} left of {}",
            entries.len(),
            remaining,
            budget
        );
        Ok(entries)
    }

    /// Cheapest possible cost of the slots still open once `candidate` is taken
    fn reserve_after(&self, candidates: &[&Player], picked: &[&Player], candidate: &Player) -> Money {
        let mut reserve = Money::ZERO;

        for (position, needed) in &self.shape {
            let already = picked.iter().filter(|p| p.position == *position).count()
                + usize::from(candidate.position == *position);
            let open = needed.saturating_sub(already);
            if open == 0 {
                continue;
            }

            let mut prices: Vec<Money> = candidates
                .iter()
                .filter(|p| {
                    p.position == *position
                        && p.id != candidate.id
                        && !picked.iter().any(|q| q.id == p.id)
                })
                .map(|p| p.price)
                .collect();
            prices.sort();
            reserve += prices.into_iter().take(open).sum::<Money>();
        }

        reserve
    }
}
