//! Shared fixtures for transfer tests

use crate::store::MarketState;
use squad_core::{FantasyTeam, Money, Player, PlayerId, Position, RosterEntry, TeamId, UserId};

/// Id of a rostered player: `index`-th starter at `position` in team `team`
pub fn player_id(team: i64, position: Position, index: i64) -> PlayerId {
    let offset = match position {
        Position::Goalkeeper => 0,
        Position::Defender => 1,
        Position::Midfielder => 5,
        Position::Forward => 9,
    };
    PlayerId(team * 100 + offset + index)
}

/// Bench players: index 0 is a forward, index 1 a defender
pub fn bench_id(team: i64, index: i64) -> PlayerId {
    PlayerId(team * 100 + 50 + index)
}

fn squad(team: i64) -> Vec<Player> {
    let shape = [
        (Position::Goalkeeper, 1),
        (Position::Defender, 4),
        (Position::Midfielder, 4),
        (Position::Forward, 2),
    ];
    shape
        .iter()
        .flat_map(|(position, count)| {
            (0..*count).map(move |index| {
                Player::new(
                    player_id(team, *position, index),
                    format!("T{} {} {}", team, position, index),
                    format!("Club {}", team),
                    *position,
                    Money::from_millions(5),
                )
            })
        })
        .collect()
}

/// Two teams with full 1-4-4-2 XIs and a bench FWD and DEF (65M spent of 100M),
/// plus a pool of free agents
pub fn market() -> MarketState {
    let mut state = MarketState::default();

    for (team_id, owner) in [(1, 1), (2, 2)] {
        let players = squad(team_id);
        let mut team = FantasyTeam::new(TeamId(team_id), UserId(owner), format!("Team {}", team_id), Money::from_millions(100));
        for player in &players {
            team.add_player(RosterEntry::starter(player)).expect("fixture roster");
        }
        let bench = [
            Player::new(bench_id(team_id, 0), format!("T{} bench FWD", team_id), format!("Club {}", team_id), Position::Forward, Money::from_millions(5)),
            Player::new(bench_id(team_id, 1), format!("T{} bench DEF", team_id), format!("Club {}", team_id), Position::Defender, Money::from_millions(5)),
        ];
        for player in &bench {
            team.add_player(RosterEntry::bench(player)).expect("fixture bench");
        }
        team.set_captain(player_id(team_id, Position::Forward, 0)).expect("fixture captain");
        team.set_vice_captain(player_id(team_id, Position::Midfielder, 0)).expect("fixture vice");

        for player in players.into_iter().chain(bench) {
            state.players.insert(player.id, player);
        }
        state.teams.insert(team.id, team);
    }

    let mut free_agents = vec![
        Player::new(PlayerId(900), "Free Striker", "Rovers", Position::Forward, Money::from_millions(8)),
        Player::new(PlayerId(901), "Free Midfielder", "Rovers", Position::Midfielder, Money::from_millions(6)),
        Player::new(PlayerId(902), "Free Keeper", "Athletic", Position::Goalkeeper, Money::from_thousands(4500)),
        Player::new(PlayerId(903), "Free Defender", "Athletic", Position::Defender, Money::from_millions(5)),
        Player::new(PlayerId(904), "Superstar", "United", Position::Forward, Money::from_millions(60)),
        Player::new(PlayerId(905), "Retired Legend", "United", Position::Forward, Money::from_millions(3)),
    ];
    free_agents[5].is_active = false;
    for player in free_agents {
        state.players.insert(player.id, player);
    }

    state
}
