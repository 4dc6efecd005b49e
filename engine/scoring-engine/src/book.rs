//! Stats book
//!
//! Holds recorded matchday statistics. A record is immutable once accepted
//! for its (player, matchday) pair.

use crate::error::ScoringError;
use crate::stats::PlayerMatchdayStats;
use crate::Result;
use squad_core::{MatchdayId, PlayerId};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    /// Identical record already present
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct StatsBook {
    records: BTreeMap<(MatchdayId, PlayerId), PlayerMatchdayStats>,
}

impl StatsBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record stats. Re-submitting identical stats is a no-op; different
    /// stats for an already-recorded pair are rejected.
    pub fn record(&mut self, stats: PlayerMatchdayStats) -> Result<RecordOutcome> {
        stats.validate()?;

        let key = (stats.matchday, stats.player_id);
        match self.records.get(&key) {
            Some(existing) if *existing == stats => Ok(RecordOutcome::Unchanged),
            Some(_) => {
                warn!(
                    "Rejected conflicting stats for player {} on matchday {}",
                    stats.player_id, stats.matchday
                );
                Err(ScoringError::ConflictingStats {
                    player_id: stats.player_id,
                    matchday: stats.matchday,
                })
            }
            None => {
                self.records.insert(key, stats);
                Ok(RecordOutcome::Inserted)
            }
        }
    }

    /// Record a batch, stopping at the first failure. Returns how many were new.
    pub fn record_all(&mut self, batch: impl IntoIterator<Item = PlayerMatchdayStats>) -> Result<usize> {
        let mut inserted = 0;
        for stats in batch {
            if self.record(stats)? == RecordOutcome::Inserted {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    pub fn get(&self, player_id: PlayerId, matchday: MatchdayId) -> Option<&PlayerMatchdayStats> {
        self.records.get(&(matchday, player_id))
    }

    /// All records for a matchday, ordered by player id
    pub fn matchday(&self, matchday: MatchdayId) -> impl Iterator<Item = &PlayerMatchdayStats> {
        self.records
            .range((matchday, PlayerId(i64::MIN))..=(matchday, PlayerId(i64::MAX)))
            .map(|(_, stats)| stats)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
