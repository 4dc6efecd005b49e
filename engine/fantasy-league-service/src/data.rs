//! JSON data files produced by the scraper and consumed by the jobs

use anyhow::{Context, Result};
use scoring_engine::PlayerMatchdayStats;
use serde::de::DeserializeOwned;
use serde::Serialize;
use squad_core::{FantasyTeam, MatchdayId, Player};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Everything a job needs: catalog, rosters and raw stats
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub players: Vec<Player>,
    pub teams: Vec<FantasyTeam>,
    pub stats: Vec<PlayerMatchdayStats>,
}

impl Dataset {
    /// Load players and teams, plus stats when a path is given
    pub async fn load(players: &Path, teams: &Path, stats: Option<&Path>) -> Result<Self> {
        let players: Vec<Player> = read_json(players).await?;
        let teams: Vec<FantasyTeam> = read_json(teams).await?;
        let stats: Vec<PlayerMatchdayStats> = match stats {
            Some(path) => read_json(path).await?,
            None => Vec::new(),
        };

        info!(
            "Loaded {} players, {} teams and {} stat lines",
            players.len(),
            teams.len(),
            stats.len()
        );
        Ok(Self { players, teams, stats })
    }

    /// Matchdays present in the stats, ascending
    pub fn matchdays(&self) -> Vec<MatchdayId> {
        let days: BTreeSet<MatchdayId> = self.stats.iter().map(|line| line.matchday).collect();
        days.into_iter().collect()
    }
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Invalid JSON in {:?}", path))
}

pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("Failed to serialize output")?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let players = dir.path().join("players.json");
        let teams = dir.path().join("teams.json");
        let stats = dir.path().join("stats.json");

        tokio::fs::write(
            &players,
            r#"[{"id": 1, "name": "Keeper", "club": "Club", "position": "GK", "price": 4500}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(
            &teams,
            r#"[{"id": 7, "owner": 3, "name": "Rovers", "total_budget": 100000,
                "roster": [{"player_id": 1, "position": "GK", "price": 4500, "is_starter": true}]}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(
            &stats,
            r#"[{"player_id": 1, "matchday": 2, "minutes_played": 90, "saves": 4},
                {"player_id": 1, "matchday": 1, "minutes_played": 90}]"#,
        )
        .await
        .unwrap();

        let data = Dataset::load(&players, &teams, Some(&stats)).await.unwrap();
        assert_eq!(data.players.len(), 1);
        assert!(data.players[0].is_active);
        assert_eq!(data.teams[0].roster.len(), 1);
        assert_eq!(data.stats[0].saves, 4);
        assert_eq!(data.matchdays(), vec![MatchdayId(1), MatchdayId(2)]);
    }

    #[tokio::test]
    async fn test_unknown_position_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let players = dir.path().join("players.json");
        tokio::fs::write(
            &players,
            r#"[{"id": 1, "name": "Who", "club": "Club", "position": "SW", "price": 4500}]"#,
        )
        .await
        .unwrap();

        let result: Result<Vec<Player>> = read_json(&players).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.json");

        tokio_test::block_on(write_json(&path, &vec![MatchdayId(3)])).unwrap();
        let read: Vec<MatchdayId> = tokio_test::block_on(read_json(&path)).unwrap();
        assert_eq!(read, vec![MatchdayId(3)]);
    }
}
