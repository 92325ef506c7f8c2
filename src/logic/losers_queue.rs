//! Losers-bracket queue: pairs teams waiting in the losers bracket and holds back byes.

use crate::logic::matchmaking::create_round_matches;
use crate::models::{Bracket, MatchId, TeamBracket, TeamId, Tournament, TournamentError};

/// Push newly demoted teams into the losers bracket.
///
/// The pool is every team waiting in the losers bracket (queued byes first, then other idle
/// losers-bracket teams, then `newly_demoted`). With fewer than two teams nothing is created.
/// With an odd pool the last team is held back in `losers_queue` and the rest are paired into
/// the current losers round, or into a new one if the current round is already finished.
///
/// Calling it again without new results changes nothing.
pub fn enqueue_losers(
    tournament: &mut Tournament,
    newly_demoted: &[TeamId],
) -> Result<Vec<MatchId>, TournamentError> {
    let mut pool = losers_pool(tournament, newly_demoted);
    if pool.len() < 2 {
        if let Some(id) = pool.first() {
            log::debug!("Team {id} waits in the losers bracket");
        }
        tournament.losers_queue = pool;
        return Ok(Vec::new());
    }

    let held = if pool.len() % 2 == 1 { pool.pop() } else { None };
    let round = target_round(tournament);
    if round != tournament.losers_round {
        tournament.losers_round = round;
        tournament.sync_current_round();
        log::info!("Losers round {round} started");
    }
    let created = create_round_matches(tournament, &pool, round, Bracket::Losers)?;
    if let Some(id) = held {
        log::debug!("Team {id} gets a bye in losers round {round}");
    }
    tournament.losers_queue = held.into_iter().collect();
    Ok(created)
}

/// Queued byes that are still waiting (not eliminated, not scheduled).
pub fn queued_byes(tournament: &Tournament) -> Vec<TeamId> {
    tournament
        .losers_queue
        .iter()
        .copied()
        .filter(|&id| is_waiting(tournament, id))
        .collect()
}

fn losers_pool(tournament: &Tournament, newly_demoted: &[TeamId]) -> Vec<TeamId> {
    let idle = tournament
        .active_teams(TeamBracket::Losers)
        .into_iter()
        .filter(|id| !newly_demoted.contains(id));

    let mut pool: Vec<TeamId> = Vec::new();
    for id in tournament
        .losers_queue
        .iter()
        .copied()
        .chain(idle)
        .chain(newly_demoted.iter().copied())
    {
        if is_waiting(tournament, id) && !pool.contains(&id) {
            pool.push(id);
        }
    }
    pool
}

/// Active losers-bracket team with no unplayed losers match.
fn is_waiting(tournament: &Tournament, id: TeamId) -> bool {
    tournament.team(id).is_some_and(|t| {
        t.is_active() && t.bracket == TeamBracket::Losers
    }) && !tournament.in_open_match(id, Bracket::Losers)
}

/// The current losers round while it is empty or still being played, else the next one.
fn target_round(tournament: &Tournament) -> u32 {
    let current = tournament.round_matches(Bracket::Losers, tournament.losers_round);
    if current.is_empty() || current.iter().any(|m| m.is_open()) {
        tournament.losers_round
    } else {
        tournament.losers_round + 1
    }
}
