//! League service - leagues, membership and leaderboards
//!
//! Leagues group fantasy teams. Private leagues are joined with an
//! eight-character code; public leagues by id. Matchday team scores feed
//! league points, which drive the leaderboard.

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod league;
pub mod service;

pub use config::LeagueConfig;
pub use error::LeagueError;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use league::{League, LeagueTeam};
pub use service::{LeagueService, LeagueUpdate, Membership, NewLeague};

// Result type alias
pub type Result<T> = std::result::Result<T, LeagueError>;
