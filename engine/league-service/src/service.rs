//! League service
//!
//! In-memory league registry. Every operation takes the registry lock once,
//! so membership changes and matchday updates are atomic per call.

use crate::config::LeagueConfig;
use crate::error::LeagueError;
use crate::leaderboard::Leaderboard;
use crate::league::{generate_join_code, League, LeagueTeam};
use crate::Result;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_core::{LeagueId, MatchdayId, TeamId, UserId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, warn};

const JOIN_CODE_ATTEMPTS: usize = 32;

/// Who is joining and with which team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub team_id: TeamId,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeague {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

/// Settings the creator may change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub max_participants: Option<u32>,
}

#[derive(Debug, Default)]
struct Registry {
    leagues: BTreeMap<LeagueId, League>,
    next_id: i64,
}

impl Registry {
    fn league(&self, id: LeagueId) -> Result<&League> {
        self.leagues.get(&id).ok_or(LeagueError::LeagueNotFound(id))
    }

    fn league_mut(&mut self, id: LeagueId) -> Result<&mut League> {
        self.leagues.get_mut(&id).ok_or(LeagueError::LeagueNotFound(id))
    }
}

pub struct LeagueService {
    config: LeagueConfig,
    registry: RwLock<Registry>,
    rng: Mutex<StdRng>,
}

impl LeagueService {
    pub fn new(config: LeagueConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.join_code_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            registry: RwLock::new(Registry::default()),
            rng: Mutex::new(rng),
        })
    }

    fn check_capacity(&self, max_participants: u32) -> Result<()> {
        let range = self.config.min_participants..=self.config.max_participants_limit;
        if range.contains(&max_participants) {
            Ok(())
        } else {
            Err(LeagueError::validation(format!(
                "max_participants must be between {} and {}",
                range.start(),
                range.end()
            )))
        }
    }

    fn unique_join_code(&self, registry: &Registry) -> Result<String> {
        let mut rng = self.rng.lock();
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let code = generate_join_code(&mut *rng, self.config.join_code_length);
            if !registry.leagues.values().any(|league| league.matches_code(&code)) {
                return Ok(code);
            }
        }
        Err(LeagueError::validation("Could not allocate a unique join code"))
    }

    /// Create a league; the creator joins it with their team
    pub fn create_league(&self, creator: Membership, request: NewLeague, now: DateTime<Utc>) -> Result<League> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(LeagueError::validation("League name cannot be empty"));
        }
        let max_participants = request.max_participants.unwrap_or(self.config.default_max_participants);
        self.check_capacity(max_participants)?;

        let mut registry = self.registry.write();
        let duplicate = registry
            .leagues
            .values()
            .any(|league| league.creator == creator.user_id && league.name.eq_ignore_ascii_case(&name));
        if duplicate {
            return Err(LeagueError::validation("You already have a league with this name"));
        }

        let join_code = if request.is_private { Some(self.unique_join_code(&registry)?) } else { None };

        registry.next_id += 1;
        let league = League {
            id: LeagueId(registry.next_id),
            name,
            description: request.description,
            creator: creator.user_id,
            is_private: request.is_private,
            join_code,
            max_participants,
            participants: vec![LeagueTeam {
                user_id: creator.user_id,
                team_id: creator.team_id,
                display_name: creator.display_name,
                points: Decimal::ZERO,
                joined_at: now,
            }],
            applied_matchdays: BTreeSet::new(),
            created_at: now,
        };
        registry.leagues.insert(league.id, league.clone());

        info!(
            "User {} created {} league '{}' ({})",
            league.creator,
            if league.is_private { "private" } else { "public" },
            league.name,
            league.id
        );
        Ok(league)
    }

    fn join(registry: &mut Registry, league_id: LeagueId, member: Membership, now: DateTime<Utc>) -> Result<League> {
        let league = registry.league_mut(league_id)?;
        if league.is_member(member.user_id) {
            return Err(LeagueError::AlreadyMember { league_id, user_id: member.user_id });
        }
        if league.is_full() {
            return Err(LeagueError::LeagueFull { league_id, max_participants: league.max_participants });
        }

        league.participants.push(LeagueTeam {
            user_id: member.user_id,
            team_id: member.team_id,
            display_name: member.display_name,
            points: Decimal::ZERO,
            joined_at: now,
        });
        info!("User {} joined league '{}'", member.user_id, league.name);
        Ok(league.clone())
    }

    /// Join a private league with its join code
    pub fn join_by_code(&self, code: &str, member: Membership, now: DateTime<Utc>) -> Result<League> {
        let mut registry = self.registry.write();
        let league_id = registry
            .leagues
            .values()
            .find(|league| league.matches_code(code))
            .map(|league| league.id)
            .ok_or(LeagueError::InvalidJoinCode)?;
        Self::join(&mut registry, league_id, member, now)
    }

    /// Join a public league by id
    pub fn join_by_id(&self, league_id: LeagueId, member: Membership, now: DateTime<Utc>) -> Result<League> {
        let mut registry = self.registry.write();
        if registry.league(league_id)?.is_private {
            return Err(LeagueError::Forbidden("Private leagues can only be joined with a join code".into()));
        }
        Self::join(&mut registry, league_id, member, now)
    }

    /// Leave a league. Returns the league as it stands afterwards, or `None`
    /// when the last participant left and the league was deleted.
    pub fn leave(&self, league_id: LeagueId, user_id: UserId) -> Result<Option<League>> {
        let mut registry = self.registry.write();
        let league = registry.league_mut(league_id)?;
        if !league.is_member(user_id) {
            return Err(LeagueError::NotMember { league_id, user_id });
        }

        league.participants.retain(|p| p.user_id != user_id);

        if league.participants.is_empty() {
            registry.leagues.remove(&league_id);
            info!("League {} deleted after its last participant left", league_id);
            return Ok(None);
        }

        if league.creator == user_id {
            league.creator = league.participants[0].user_id;
            info!("Ownership of league {} passed to user {}", league_id, league.creator);
        }
        info!("User {} left league {}", user_id, league_id);
        Ok(Some(league.clone()))
    }

    /// Change league settings; creator only
    pub fn update_league(&self, league_id: LeagueId, user_id: UserId, update: LeagueUpdate) -> Result<League> {
        if let Some(max) = update.max_participants {
            self.check_capacity(max)?;
        }

        let mut registry = self.registry.write();
        let league = registry.league(league_id)?;
        if league.creator != user_id {
            return Err(LeagueError::Forbidden("Only the league creator can update settings".into()));
        }
        if let Some(max) = update.max_participants {
            if max < league.participant_count() {
                return Err(LeagueError::validation(format!(
                    "Cannot reduce max participants below current count ({})",
                    league.participant_count()
                )));
            }
        }
        let name = match update.name {
            Some(name) if name.trim().is_empty() => {
                return Err(LeagueError::validation("League name cannot be empty"));
            }
            Some(name) => {
                let name = name.trim().to_string();
                let taken = registry.leagues.values().any(|other| {
                    other.id != league_id && other.creator == user_id && other.name.eq_ignore_ascii_case(&name)
                });
                if taken {
                    return Err(LeagueError::validation("You already have a league with this name"));
                }
                Some(name)
            }
            None => None,
        };

        let league = registry.league_mut(league_id)?;
        if let Some(name) = name {
            league.name = name;
        }
        if let Some(description) = update.description {
            league.description = Some(description);
        }
        if let Some(max) = update.max_participants {
            league.max_participants = max;
        }
        info!("League {} updated by user {}", league_id, user_id);
        Ok(league.clone())
    }

    pub fn update_max_participants(&self, league_id: LeagueId, user_id: UserId, max: u32) -> Result<League> {
        self.update_league(league_id, user_id, LeagueUpdate { max_participants: Some(max), ..LeagueUpdate::default() })
    }

    /// Add each participant's team score for `matchday` to their league points.
    /// Teams missing from `scores` earn nothing. A matchday applies once.
    pub fn apply_matchday(
        &self,
        league_id: LeagueId,
        matchday: MatchdayId,
        scores: &HashMap<TeamId, Decimal>,
    ) -> Result<League> {
        let mut registry = self.registry.write();
        let league = registry.league_mut(league_id)?;
        if !league.applied_matchdays.insert(matchday) {
            warn!("Matchday {} already applied to league {}", matchday, league_id);
            return Err(LeagueError::MatchdayAlreadyApplied { league_id, matchday });
        }

        for participant in &mut league.participants {
            participant.points += scores.get(&participant.team_id).copied().unwrap_or_default();
        }
        info!("Applied matchday {} to league '{}'", matchday, league.name);
        Ok(league.clone())
    }

    /// Apply a matchday to every league that has not seen it yet.
    /// Returns the ids of the leagues that were updated.
    pub fn apply_matchday_everywhere(&self, matchday: MatchdayId, scores: &HashMap<TeamId, Decimal>) -> Vec<LeagueId> {
        let ids: Vec<LeagueId> = self.registry.read().leagues.keys().copied().collect();
        ids.into_iter()
            .filter(|id| self.apply_matchday(*id, matchday, scores).is_ok())
            .collect()
    }

    /// Ranked standings. A viewer, when given, must be a participant.
    pub fn leaderboard(&self, league_id: LeagueId, viewer: Option<UserId>) -> Result<Leaderboard> {
        let registry = self.registry.read();
        let league = registry.league(league_id)?;
        if let Some(user_id) = viewer {
            if !league.is_member(user_id) {
                return Err(LeagueError::NotMember { league_id, user_id });
            }
        }
        Ok(Leaderboard::build(league, viewer))
    }

    pub fn league(&self, league_id: LeagueId) -> Result<League> {
        self.registry.read().league(league_id).cloned()
    }

    pub fn user_leagues(&self, user_id: UserId) -> Vec<League> {
        self.registry
            .read()
            .leagues
            .values()
            .filter(|league| league.is_member(user_id))
            .cloned()
            .collect()
    }

    /// Public leagues with a free slot
    pub fn public_leagues(&self) -> Vec<League> {
        self.registry
            .read()
            .leagues
            .values()
            .filter(|league| !league.is_private && !league.is_full())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_core::ErrorKind;

    fn service() -> LeagueService {
        LeagueService::new(LeagueConfig { join_code_seed: Some(42), ..LeagueConfig::default() }).unwrap()
    }

    fn member(user: i64, name: &str) -> Membership {
        Membership { user_id: UserId(user), team_id: TeamId(user * 10), display_name: name.to_string() }
    }

    fn new_league(name: &str, is_private: bool, max: Option<u32>) -> NewLeague {
        NewLeague { name: name.to_string(), description: None, is_private, max_participants: max }
    }

    #[test]
    fn test_create_private_league() {
        let service = service();
        let league = service.create_league(member(1, "Ana"), new_league("Office", true, None), Utc::now()).unwrap();

        assert_eq!(league.max_participants, 20);
        assert_eq!(league.participant_count(), 1);
        let code = league.join_code.clone().unwrap();
        assert_eq!(code.len(), 8);

        let joined = service.join_by_code(&code.to_lowercase(), member(2, "Ben"), Utc::now()).unwrap();
        assert_eq!(joined.participant_count(), 2);
    }

    #[test]
    fn test_public_league_has_no_code() {
        let service = service();
        let league = service.create_league(member(1, "Ana"), new_league("Open", false, Some(2)), Utc::now()).unwrap();
        assert!(league.join_code.is_none());

        service.join_by_id(league.id, member(2, "Ben"), Utc::now()).unwrap();
        let err = service.join_by_id(league.id, member(3, "Cy"), Utc::now()).unwrap_err();
        assert!(matches!(err, LeagueError::LeagueFull { .. }));
        assert!(service.public_leagues().is_empty());
    }

    #[test]
    fn test_create_rules() {
        let service = service();
        let now = Utc::now();
        assert!(service.create_league(member(1, "Ana"), new_league("  ", false, None), now).is_err());
        assert!(service.create_league(member(1, "Ana"), new_league("Tiny", false, Some(1)), now).is_err());
        assert!(service.create_league(member(1, "Ana"), new_league("Huge", false, Some(101)), now).is_err());

        service.create_league(member(1, "Ana"), new_league("Office", false, None), now).unwrap();
        let err = service.create_league(member(1, "Ana"), new_league("office", true, None), now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // Another creator may reuse the name
        assert!(service.create_league(member(2, "Ben"), new_league("Office", false, None), now).is_ok());
    }

    #[test]
    fn test_join_rules() {
        let service = service();
        let now = Utc::now();
        let private = service.create_league(member(1, "Ana"), new_league("Secret", true, None), now).unwrap();

        let err = service.join_by_id(private.id, member(2, "Ben"), now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = service.join_by_code("NOPE0000", member(2, "Ben"), now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let code = private.join_code.unwrap();
        let err = service.join_by_code(&code, member(1, "Ana"), now).unwrap_err();
        assert!(matches!(err, LeagueError::AlreadyMember { .. }));
    }

    #[test]
    fn test_creator_leaving_passes_ownership_then_deletes() {
        let service = service();
        let now = Utc::now();
        let league = service.create_league(member(1, "Ana"), new_league("Club", false, None), now).unwrap();
        service.join_by_id(league.id, member(2, "Ben"), now).unwrap();

        let after = service.leave(league.id, UserId(1)).unwrap().unwrap();
        assert_eq!(after.creator, UserId(2));

        assert_eq!(service.leave(league.id, UserId(2)).unwrap(), None);
        assert_eq!(service.league(league.id).unwrap_err(), LeagueError::LeagueNotFound(league.id));
    }

    #[test]
    fn test_update_max_participants() {
        let service = service();
        let now = Utc::now();
        let league = service.create_league(member(1, "Ana"), new_league("Club", false, Some(5)), now).unwrap();
        service.join_by_id(league.id, member(2, "Ben"), now).unwrap();
        service.join_by_id(league.id, member(3, "Cy"), now).unwrap();

        assert!(service.update_max_participants(league.id, UserId(1), 2).is_err());
        let err = service.update_max_participants(league.id, UserId(2), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(service.update_max_participants(league.id, UserId(1), 3).unwrap().max_participants, 3);
    }

    #[test]
    fn test_matchday_points_and_leaderboard() {
        let service = service();
        let now = Utc::now();
        let league = service.create_league(member(1, "Cy"), new_league("Club", false, None), now).unwrap();
        service.join_by_id(league.id, member(2, "Ana"), now).unwrap();
        service.join_by_id(league.id, member(3, "Ben"), now).unwrap();

        let scores: HashMap<TeamId, Decimal> = [
            (TeamId(10), Decimal::from(50)),
            (TeamId(20), Decimal::new(625, 1)),
            (TeamId(30), Decimal::from(50)),
        ]
        .into_iter()
        .collect();
        service.apply_matchday(league.id, MatchdayId(1), &scores).unwrap();
        let err = service.apply_matchday(league.id, MatchdayId(1), &scores).unwrap_err();
        assert!(matches!(err, LeagueError::MatchdayAlreadyApplied { .. }));

        let board = service.leaderboard(league.id, Some(UserId(1))).unwrap();
        let names: Vec<&str> = board.entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben", "Cy"]);
        let ranks: Vec<u32> = board.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2]);
        assert_eq!(board.viewer_rank, Some(2));

        let err = service.leaderboard(league.id, Some(UserId(9))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_apply_matchday_everywhere_skips_applied() {
        let service = service();
        let now = Utc::now();
        let a = service.create_league(member(1, "Ana"), new_league("A", false, None), now).unwrap();
        let b = service.create_league(member(1, "Ana"), new_league("B", false, None), now).unwrap();
        let scores: HashMap<TeamId, Decimal> = [(TeamId(10), Decimal::from(7))].into_iter().collect();

        service.apply_matchday(a.id, MatchdayId(1), &scores).unwrap();
        assert_eq!(service.apply_matchday_everywhere(MatchdayId(1), &scores), vec![b.id]);
        assert_eq!(service.user_leagues(UserId(1)).len(), 2);
    }
}
