//! Shared helpers for integration tests.
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use washer_toss_bracket::{
    check_round_complete, draw_teams, generate_bracket, submit_score, Bracket, GameMatch,
    MatchId, Player, TeamId, Tournament, MAX_LOSSES,
};

/// Tournament with `teams * 2` players, teams drawn with a fixed seed and the bracket generated.
pub fn started(teams: usize, seed: u64) -> Tournament {
    let players: Vec<Player> = (0..teams * 2).map(|i| Player::new(format!("P{i}"))).collect();
    let mut t = Tournament::with_players(players);
    draw_teams(&mut t, &mut StdRng::seed_from_u64(seed)).unwrap();
    generate_bracket(&mut t).unwrap();
    t
}

pub fn team_ids(t: &Tournament) -> Vec<TeamId> {
    t.teams.iter().map(|team| team.id).collect()
}

/// The open match between `a` and `b`.
pub fn open_match(t: &Tournament, a: TeamId, b: TeamId) -> &GameMatch {
    t.matches
        .iter()
        .find(|m| m.is_open() && m.involves(a) && m.involves(b))
        .unwrap_or_else(|| panic!("no open match between {a} and {b}"))
}

/// Play the open match between `winner` and `loser` with the given scores.
pub fn play(t: &mut Tournament, winner: TeamId, loser: TeamId, high: u32, low: u32) -> MatchId {
    let m = open_match(t, winner, loser);
    let id = m.id.clone();
    let (s1, s2) = if m.team1 == winner { (high, low) } else { (low, high) };
    submit_score(t, &id, s1, s2).unwrap();
    id
}

pub fn open_matches(t: &Tournament, bracket: Bracket) -> Vec<&GameMatch> {
    t.matches
        .iter()
        .filter(|m| m.bracket == bracket && m.is_open())
        .collect()
}

/// Loss bookkeeping invariants that must hold after every submission.
pub fn assert_team_invariants(t: &Tournament) {
    for team in &t.teams {
        assert!(team.losses <= MAX_LOSSES, "{} has {} losses", team.id, team.losses);
        assert_eq!(
            team.eliminated,
            team.losses == MAX_LOSSES,
            "eliminated flag out of sync for {}",
            team.id
        );
        assert_eq!(
            team.score_differential,
            team.total_score as i64 - team.total_opponent_score as i64
        );
    }
    for team in &t.teams {
        let open = t.matches.iter().filter(|m| m.is_open() && m.involves(team.id)).count();
        assert!(open <= 1, "{} is scheduled in {open} open matches", team.id);
    }
    for m in t.matches.iter().filter(|m| m.completed) {
        assert_ne!(m.team1_score, m.team2_score);
    }
}

/// Running the completion check again must not create anything.
pub fn assert_idempotent(t: &mut Tournament) {
    let before = t.matches.len();
    let (w, l) = (t.winners_round, t.losers_round);
    check_round_complete(t).unwrap();
    assert_eq!(t.matches.len(), before);
    assert_eq!((t.winners_round, t.losers_round), (w, l));
}
