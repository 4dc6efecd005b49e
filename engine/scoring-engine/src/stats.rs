//! Raw per-matchday player statistics

use serde::{Deserialize, Serialize};
use squad_core::{MatchdayId, PlayerId};

/// Event counters for one player in one matchday.
///
/// Counters are signed so that malformed feeds deserialize and can be
/// rejected by [`PlayerMatchdayStats::validate`] with a useful message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatchdayStats {
    pub player_id: PlayerId,
    pub matchday: MatchdayId,

    #[serde(default)]
    pub minutes_played: i32,
    #[serde(default)]
    pub goals: i32,
    #[serde(default)]
    pub assists: i32,
    #[serde(default)]
    pub clean_sheet: bool,
    #[serde(default)]
    pub saves: i32,
    #[serde(default)]
    pub yellow_cards: i32,
    #[serde(default)]
    pub red_cards: i32,
    #[serde(default)]
    pub own_goals: i32,
    #[serde(default)]
    pub penalties_missed: i32,
    #[serde(default)]
    pub penalties_saved: i32,

    #[serde(default)]
    pub clearances: i32,
    #[serde(default)]
    pub recoveries: i32,
    #[serde(default)]
    pub shots_on_target: i32,
    #[serde(default)]
    pub successful_dribbles: i32,
}

impl PlayerMatchdayStats {
    /// Empty record; every counter zero
    pub fn new(player_id: PlayerId, matchday: MatchdayId) -> Self {
        Self {
            player_id,
            matchday,
            minutes_played: 0,
            goals: 0,
            assists: 0,
            clean_sheet: false,
            saves: 0,
            yellow_cards: 0,
            red_cards: 0,
            own_goals: 0,
            penalties_missed: 0,
            penalties_saved: 0,
            clearances: 0,
            recoveries: 0,
            shots_on_target: 0,
            successful_dribbles: 0,
        }
    }

    fn counters(&self) -> [(&'static str, i32); 13] {
        [
            ("minutes_played", self.minutes_played),
            ("goals", self.goals),
            ("assists", self.assists),
            ("saves", self.saves),
            ("yellow_cards", self.yellow_cards),
            ("red_cards", self.red_cards),
            ("own_goals", self.own_goals),
            ("penalties_missed", self.penalties_missed),
            ("penalties_saved", self.penalties_saved),
            ("clearances", self.clearances),
            ("recoveries", self.recoveries),
            ("shots_on_target", self.shots_on_target),
            ("successful_dribbles", self.successful_dribbles),
        ]
    }

    /// Reject negative counters
    pub fn validate(&self) -> crate::Result<()> {
        let negative: Vec<String> = self
            .counters()
            .iter()
            .filter(|(_, value)| *value < 0)
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect();

        if negative.is_empty() {
            Ok(())
        } else {
            Err(crate::ScoringError::validation(format!(
                "Negative counters for player {} on matchday {}: {}",
                self.player_id,
                self.matchday,
                negative.join(", ")
            )))
        }
    }
}
