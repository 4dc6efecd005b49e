//! Command line interface

use crate::config::ServiceConfig;
use crate::data::{write_json, Dataset};
use crate::jobs;
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use squad_core::{MatchdayId, Money, PlayerId, TeamId, UserId};
use std::path::PathBuf;
use transfer_service::FreeAgentRequest;

/// Fantasy league scoring, formations and standings
#[derive(Parser)]
#[command(name = "fantasy-league")]
#[command(about = "Score matchdays and check squads from scraped JSON data")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding players.json, teams.json and stats.json
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one matchday, or the whole season when none is given
    Score {
        #[arg(short, long)]
        matchday: Option<u32>,
    },

    /// Check every team's starting XI and squad size
    Formation,

    /// Rank all teams on season points
    Leaderboard {
        #[arg(long, default_value = "Season")]
        name: String,

        /// Highlight this user's position
        #[arg(long)]
        viewer: Option<i64>,
    },

    /// Show the cost of signing a free agent
    Preview {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        team: i64,
        #[arg(long)]
        player_in: i64,
        #[arg(long)]
        player_out: Option<i64>,
    },

    /// Generate a new squad from unowned players
    Draft {
        #[arg(long)]
        team: i64,
        #[arg(long)]
        owner: i64,
        #[arg(long)]
        name: String,
        /// Budget in millions
        #[arg(long, default_value = "100")]
        budget: Decimal,
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Print the scoring rules table
    Rules,

    /// Print the effective configuration
    Config,
}

/// Run a command against the configured data directory
pub async fn run(command: Commands, config: &ServiceConfig, output: Option<PathBuf>) -> Result<()> {
    let paths = &config.data;
    let dataset = |with_stats: bool| {
        let players = paths.players_path();
        let teams = paths.teams_path();
        let stats = with_stats.then(|| paths.stats_path());
        async move { Dataset::load(&players, &teams, stats.as_deref()).await }
    };

    match command {
        Commands::Score { matchday } => {
            let mut data = dataset(true).await?;
            match matchday {
                Some(day) => {
                    let summary = jobs::score_matchday(config, &mut data, MatchdayId(day))?;
                    emit(&summary, output).await
                }
                None => {
                    let summaries = jobs::score_season(config, &mut data)?;
                    emit(&summaries, output).await
                }
            }
        }
        Commands::Formation => {
            let data = dataset(false).await?;
            emit(&jobs::formation_reports(config, &data.teams), output).await
        }
        Commands::Leaderboard { name, viewer } => {
            let mut data = dataset(true).await?;
            let board = jobs::season_leaderboard(config, &mut data, &name, viewer.map(UserId), Utc::now())?;
            emit(&board, output).await
        }
        Commands::Preview { user, team, player_in, player_out } => {
            let data = dataset(false).await?;
            let request = FreeAgentRequest {
                team_id: TeamId(team),
                player_in: PlayerId(player_in),
                player_out: player_out.map(PlayerId),
            };
            emit(&jobs::preview_transfer(config, &data, UserId(user), &request)?, output).await
        }
        Commands::Draft { team, owner, name, budget, seed } => {
            let data = dataset(false).await?;
            let budget = Money::from_decimal_millions(budget);
            let team = jobs::draft(config, &data, TeamId(team), UserId(owner), &name, budget, seed)?;
            emit(&team, output).await
        }
        Commands::Rules => emit(&config.scoring.rules, output).await,
        Commands::Config => emit(config, output).await,
    }
}

async fn emit<T: Serialize>(value: &T, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => write_json(&path, value).await,
        None => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
    }
}
