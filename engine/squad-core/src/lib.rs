//! Squad core - players, budgets, rosters and formation rules
//!
//! This crate holds the shared domain types of the fantasy league engine:
//! player catalog entries, the `Money` budget type, fantasy team rosters with
//! captaincy, and the formation validator that gates every roster mutation.

pub mod config;
pub mod error;
pub mod formation;
pub mod generator;
pub mod money;
pub mod player;
pub mod team;
pub mod types;

pub use config::FormationRules;
pub use error::{ErrorKind, SquadError};
pub use formation::{FormationReport, FormationValidator, PositionCounts};
pub use generator::SquadGenerator;
pub use money::Money;
pub use player::{Player, Position, SeasonStats};
pub use team::{FantasyTeam, RosterEntry};
pub use types::{LeagueId, MatchdayId, OfferId, PlayerId, TeamId, UserId};

// Result type alias
pub type Result<T> = std::result::Result<T, SquadError>;
