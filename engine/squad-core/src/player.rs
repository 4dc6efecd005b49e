//! Player catalog entries

use crate::error::SquadError;
use crate::money::Money;
use crate::types::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-pitch position. Fixed when the player is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] =
        [Position::Goalkeeper, Position::Defender, Position::Midfielder, Position::Forward];

    /// Short code used by the data feed and the UI
    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = SquadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GK" => Ok(Position::Goalkeeper),
            "DEF" => Ok(Position::Defender),
            "MID" => Ok(Position::Midfielder),
            "FWD" => Ok(Position::Forward),
            other => Err(SquadError::validation(format!(
                "Unknown position code '{}'. Use one of GK, DEF, MID, FWD",
                other
            ))),
        }
    }
}

/// Cumulative season statistics kept on the catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonStats {
    pub goals: u32,
    pub assists: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub minutes_played: u32,
    pub clean_sheets: u32,
}

/// A real-world footballer that fantasy teams can own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub club: String,
    pub position: Position,
    pub price: Money,
    #[serde(default)]
    pub season_stats: SeasonStats,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Player {
    /// Create a new active player with empty season stats
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        club: impl Into<String>,
        position: Position,
        price: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            club: club.into(),
            position,
            price,
            season_stats: SeasonStats::default(),
            is_active: true,
        }
    }
}
