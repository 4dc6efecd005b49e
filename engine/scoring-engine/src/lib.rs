//! Scoring engine - matchday player scoring and team aggregation
//!
//! Raw per-matchday statistics are recorded in the [`StatsBook`], scored per
//! player by the [`MatchdayScorer`] and rolled up into fantasy team scores by
//! the [`TeamAggregator`]. The [`MatchdayProcessor`] drives the whole pass and
//! keeps running totals in the [`ScoreLedger`].

pub mod aggregator;
pub mod book;
pub mod config;
pub mod error;
pub mod ledger;
pub mod processor;
pub mod rules;
pub mod scorer;
pub mod stats;

pub use aggregator::{PlayerContribution, TeamAggregator, TeamMatchdayScore};
pub use book::{RecordOutcome, StatsBook};
pub use config::ScoringConfig;
pub use error::ScoringError;
pub use ledger::ScoreLedger;
pub use processor::{MatchdayProcessor, MatchdaySummary};
pub use rules::{BonusRules, ScoringRules};
pub use scorer::{MatchdayScorer, PlayerScore, ScoreComponent, ScoreRule};
pub use stats::PlayerMatchdayStats;

// Result type alias
pub type Result<T> = std::result::Result<T, ScoringError>;
