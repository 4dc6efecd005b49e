//! Batch jobs run by the command-line service
//!
//! Each job builds the engine components it needs from [`ServiceConfig`],
//! runs against a loaded [`Dataset`] and returns a serializable report.

use crate::config::ServiceConfig;
use crate::data::Dataset;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use league_service::{Leaderboard, LeagueService, Membership, NewLeague};
use rust_decimal::Decimal;
use scoring_engine::{MatchdayProcessor, MatchdaySummary};
use serde::{Deserialize, Serialize};
use squad_core::{FantasyTeam, FormationReport, FormationValidator, MatchdayId, Money, TeamId, UserId};
use std::collections::HashMap;
use tracing::{info, warn};
use transfer_service::{CostBreakdown, FreeAgentRequest, TransferService};

/// Formation check result for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamFormation {
    pub team_id: TeamId,
    pub name: String,
    pub report: FormationReport,
}

/// Score every matchday up to and including `matchday`, so running totals
/// include earlier rounds. Team totals in `data` are updated in place.
pub fn score_matchday(config: &ServiceConfig, data: &mut Dataset, matchday: MatchdayId) -> Result<MatchdaySummary> {
    let mut processor = ingest(config, data)?;

    let earlier: Vec<MatchdayId> = data.matchdays().into_iter().filter(|day| *day < matchday).collect();
    for day in earlier {
        processor.process(day, &data.players, &mut data.teams)?;
    }

    let summary = processor.process(matchday, &data.players, &mut data.teams)?;
    if summary.player_scores.is_empty() {
        warn!("No stats recorded for matchday {}", matchday);
    }
    Ok(summary)
}

/// Score every matchday present in the stats, in order
pub fn score_season(config: &ServiceConfig, data: &mut Dataset) -> Result<Vec<MatchdaySummary>> {
    let mut processor = ingest(config, data)?;

    let mut summaries = Vec::new();
    for day in data.matchdays() {
        summaries.push(processor.process(day, &data.players, &mut data.teams)?);
    }
    Ok(summaries)
}

fn ingest(config: &ServiceConfig, data: &Dataset) -> Result<MatchdayProcessor> {
    let mut processor =
        MatchdayProcessor::new(config.scoring.clone()).context("Invalid scoring configuration")?;
    let recorded = processor.ingest(data.stats.iter().cloned()).context("Failed to record matchday stats")?;
    info!("Recorded {} stat lines ({} duplicates ignored)", recorded, data.stats.len() - recorded);
    Ok(processor)
}

/// Check every team's line-up against the formation rules
pub fn formation_reports(config: &ServiceConfig, teams: &[FantasyTeam]) -> Vec<TeamFormation> {
    let validator = FormationValidator::new(config.transfers.formation.clone());
    teams
        .iter()
        .map(|team| TeamFormation {
            team_id: team.id,
            name: team.name.clone(),
            report: validator.validate(&team.roster),
        })
        .collect()
}

/// Put every team in one public league, apply each matchday and rank them
pub fn season_leaderboard(
    config: &ServiceConfig,
    data: &mut Dataset,
    league_name: &str,
    viewer: Option<UserId>,
    now: DateTime<Utc>,
) -> Result<Leaderboard> {
    let summaries = score_season(config, data)?;

    let mut teams = data.teams.iter();
    let first = teams.next().ok_or_else(|| anyhow!("No teams to rank"))?;

    let leagues = LeagueService::new(config.leagues.clone()).context("Invalid league configuration")?;
    let capacity = (data.teams.len() as u32).max(config.leagues.min_participants);
    let league = leagues.create_league(
        membership(first),
        NewLeague {
            name: league_name.to_string(),
            description: None,
            is_private: false,
            max_participants: Some(capacity),
        },
        now,
    )?;

    for team in teams {
        leagues
            .join_by_id(league.id, membership(team), now)
            .with_context(|| format!("Team {} could not join the league", team.id))?;
    }

    for summary in &summaries {
        let scores: HashMap<TeamId, Decimal> =
            summary.team_scores.iter().map(|score| (score.team_id, score.points)).collect();
        leagues.apply_matchday(league.id, summary.matchday, &scores)?;
    }

    Ok(leagues.leaderboard(league.id, viewer)?)
}

fn membership(team: &FantasyTeam) -> Membership {
    Membership { user_id: team.owner, team_id: team.id, display_name: team.name.clone() }
}

fn market(config: &ServiceConfig, data: &Dataset) -> Result<TransferService> {
    let service = TransferService::in_memory(config.transfers.clone()).context("Invalid transfer configuration")?;
    service.register_players(data.players.iter().cloned())?;
    for team in &data.teams {
        service
            .register_team(team.clone())
            .with_context(|| format!("Team {} is not a valid squad", team.id))?;
    }
    Ok(service)
}

/// Cost of a free-agent transfer without executing it
pub fn preview_transfer(
    config: &ServiceConfig,
    data: &Dataset,
    user: UserId,
    request: &FreeAgentRequest,
) -> Result<CostBreakdown> {
    let service = market(config, data)?;
    Ok(service.preview_free_agent(user, request)?)
}

/// Draft a new team from the players nobody owns
pub fn draft(
    config: &ServiceConfig,
    data: &Dataset,
    team_id: TeamId,
    owner: UserId,
    name: &str,
    budget: Money,
    seed: u64,
) -> Result<FantasyTeam> {
    let service = market(config, data)?;
    Ok(service.draft_team(team_id, owner, name, budget, seed)?)
}
