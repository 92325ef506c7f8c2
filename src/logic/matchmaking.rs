//! Match factory: pair teams into the matches of one bracket round.

use crate::models::{Bracket, GameMatch, MatchId, TeamId, Tournament, TournamentError};
use std::cmp::Reverse;

/// Pair `teams` into matches for `round` of `bracket` and append them to the tournament.
///
/// 1. Round 1 keeps the given order (the random draw).
/// 2. Later rounds stable-sort by score differential, highest first, so teams of similar
///    form meet.
/// 3. Walk the sequence two at a time. An odd team left over is not paired; the caller
///    decides where it waits.
///
/// Returns the ids of the created matches.
pub fn create_round_matches(
    tournament: &mut Tournament,
    teams: &[TeamId],
    round: u32,
    bracket: Bracket,
) -> Result<Vec<MatchId>, TournamentError> {
    let mut ordered: Vec<(TeamId, i64)> = teams
        .iter()
        .map(|&id| Ok((id, tournament.expect_team(id)?.score_differential)))
        .collect::<Result<_, TournamentError>>()?;
    if round > 1 {
        ordered.sort_by_key(|&(_, diff)| Reverse(diff));
    }

    // Indexes continue after matches already in this bracket round.
    let existing = tournament.round_matches(bracket, round).len();
    let created: Vec<GameMatch> = ordered
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let id = MatchId::new(bracket, round, existing + i + 1);
            GameMatch::new(id, round, bracket, pair[0].0, pair[1].0)
        })
        .collect();

    if ordered.len() % 2 == 1 {
        if let Some((left_out, _)) = ordered.last() {
            log::debug!("{bracket} round {round}: team {left_out} left unpaired");
        }
    }
    for m in &created {
        log::debug!("Created match {} ({} vs {})", m.id, m.team1, m.team2);
    }

    let ids = created.iter().map(|m| m.id.clone()).collect();
    tournament.matches.extend(created);
    Ok(ids)
}
