//! Round completion: advance the winners and losers brackets, set up the grand final,
//! and crown the champion.
//!
//! Everything here reads completed-match state only, so running it again without a new
//! result creates nothing.

use crate::logic::losers_queue::{enqueue_losers, queued_byes};
use crate::logic::matchmaking::create_round_matches;
use crate::models::{
    Bracket, GameMatch, MatchId, TeamBracket, TeamId, Tournament, TournamentError,
};

/// Check both brackets for a finished round and build whatever comes next.
pub fn check_round_complete(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.is_complete() {
        return Ok(());
    }
    progress_winners(tournament)?;
    if !tournament.is_complete() {
        progress_losers(tournament)?;
    }
    tournament.sync_current_round();
    Ok(())
}

/// Winner of the latest losers round when that round is a single completed match and no
/// bye is still queued.
pub fn losers_champion(tournament: &Tournament) -> Option<TeamId> {
    if !queued_byes(tournament).is_empty() {
        return None;
    }
    let last_round = tournament
        .matches
        .iter()
        .filter(|m| m.bracket == Bracket::Losers)
        .map(|m| m.round)
        .max()?;
    match tournament.round_matches(Bracket::Losers, last_round).as_slice() {
        [only] if only.completed => only.winner,
        _ => None,
    }
}

fn progress_winners(tournament: &mut Tournament) -> Result<(), TournamentError> {
    // The winners line is finished once a grand final exists.
    if !tournament.grand_finals().is_empty() {
        return Ok(());
    }
    let round = tournament.winners_round;
    let Some((round_winners, round_losers)) = finished_round(tournament, Bracket::Winners, round)?
    else {
        return Ok(());
    };

    let mut demoted = Vec::new();
    for id in round_losers {
        if tournament.expect_team(id)?.is_active() {
            demoted.push(id);
        }
    }

    // Teams that sat this round out on a bye advance alongside the winners.
    let mut advancing = round_winners;
    for id in tournament.active_teams(TeamBracket::Winners) {
        if !advancing.contains(&id) {
            advancing.push(id);
        }
    }

    match advancing.as_slice() {
        [] => Err(TournamentError::invariant(format!(
            "winners round {round} finished with no team advancing"
        ))),
        [champion] => settle_winners_champion(tournament, *champion, &demoted),
        _ => {
            tournament.winners_round += 1;
            let next = tournament.winners_round;
            let created = create_round_matches(tournament, &advancing, next, Bracket::Winners)?;
            log::info!("Winners round {next} started with {} matches", created.len());
            if !demoted.is_empty() {
                enqueue_losers(tournament, &demoted)?;
            }
            Ok(())
        }
    }
}

/// Pair the winners champion with the losers side, or crown it if nobody is left there.
fn settle_winners_champion(
    tournament: &mut Tournament,
    champion: TeamId,
    demoted: &[TeamId],
) -> Result<(), TournamentError> {
    if let Some(challenger) = losers_champion(tournament) {
        if tournament.expect_team(challenger)?.is_active() {
            create_grand_final(tournament, champion, challenger);
            return Ok(());
        }
    }

    let remaining = tournament.active_teams(TeamBracket::Losers);
    match remaining.as_slice() {
        [] => {
            tournament.crown(champion);
            log::info!("Team {champion} wins: no team left in the losers bracket");
        }
        // The sole losers-bracket team is the champion of that bracket by default.
        [sole] => create_grand_final(tournament, champion, *sole),
        _ => {
            enqueue_losers(tournament, demoted)?;
            log::debug!(
                "Winners champion {champion} waits for {} losers-bracket teams",
                remaining.len()
            );
        }
    }
    Ok(())
}

fn progress_losers(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let round = tournament.losers_round;
    let Some((round_winners, _)) = finished_round(tournament, Bracket::Losers, round)? else {
        return Ok(());
    };

    let mut advancing: Vec<TeamId> = Vec::new();
    for id in round_winners {
        if tournament.expect_team(id)?.is_active() && !advancing.contains(&id) {
            advancing.push(id);
        }
    }

    if advancing.len() > 1 {
        enqueue_losers(tournament, &advancing)?;
    } else if let [candidate] = advancing.as_slice() {
        log::debug!("Team {candidate} leads the losers bracket after round {round}");
    }
    Ok(())
}

/// Winners and losers of a bracket round, if it has matches and all are completed.
fn finished_round(
    tournament: &Tournament,
    bracket: Bracket,
    round: u32,
) -> Result<Option<(Vec<TeamId>, Vec<TeamId>)>, TournamentError> {
    let matches = tournament.round_matches(bracket, round);
    if matches.is_empty() || matches.iter().any(|m| m.is_open()) {
        return Ok(None);
    }
    let mut winners = Vec::with_capacity(matches.len());
    let mut losers = Vec::with_capacity(matches.len());
    for m in matches {
        let (Some(w), Some(l)) = (m.winner, m.loser) else {
            return Err(TournamentError::invariant(format!(
                "completed match {} has no result",
                m.id
            )));
        };
        winners.push(w);
        losers.push(l);
    }
    Ok(Some((winners, losers)))
}

/// Grand final: winners-bracket champion (team 1) against the losers-bracket champion.
fn create_grand_final(tournament: &mut Tournament, champion: TeamId, challenger: TeamId) {
    let id = push_grand_final(tournament, champion, challenger);
    log::info!("Grand final {id} scheduled");
}

/// Bracket reset after the unbeaten finalist's first loss. The losers-bracket team is listed first.
pub(crate) fn create_bracket_reset(
    tournament: &mut Tournament,
    losers_champion: TeamId,
    winners_champion: TeamId,
) {
    let id = push_grand_final(tournament, losers_champion, winners_champion);
    log::info!("Bracket reset: deciding match {id} scheduled");
}

fn push_grand_final(tournament: &mut Tournament, team1: TeamId, team2: TeamId) -> MatchId {
    tournament.sync_current_round();
    let round = tournament.current_round + 1;
    let index = tournament.round_matches(Bracket::GrandFinal, round).len() + 1;
    let id = MatchId::new(Bracket::GrandFinal, round, index);
    tournament.matches.push(GameMatch::new(
        id.clone(),
        round,
        Bracket::GrandFinal,
        team1,
        team2,
    ));
    tournament
        .losers_queue
        .retain(|&queued| queued != team1 && queued != team2);
    id
}
