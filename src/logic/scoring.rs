//! Score submission: record a result, apply double-elimination rules, then advance the brackets.

use crate::logic::progression::{check_round_complete, create_bracket_reset};
use crate::models::{
    Bracket, MatchId, TeamBracket, Tournament, TournamentError, TournamentState, ValidationError,
    MAX_LOSSES,
};

/// Parse one entered score. Scores are whole, non-negative numbers.
pub fn parse_score(input: &str) -> Result<u32, ValidationError> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidScore(input.to_string()))
}

/// Submit the final score of an open match.
///
/// Everything is validated before anything changes: an unknown or finished match, or a tie,
/// leaves the tournament untouched. On success:
/// 1. The higher score wins; both teams' score totals are updated.
/// 2. The loser takes a loss. In a regular match two losses eliminate, a first loss moves a
///    winners-bracket team to the losers bracket.
/// 3. In the first grand final, a first loss for the winners-bracket finalist schedules the
///    bracket reset. Any other grand-final result ends the tournament.
/// 4. Round completion runs for both brackets.
pub fn submit_score(
    tournament: &mut Tournament,
    match_id: &MatchId,
    team1_score: u32,
    team2_score: u32,
) -> Result<(), TournamentError> {
    let idx = tournament
        .matches
        .iter()
        .position(|m| &m.id == match_id)
        .ok_or_else(|| ValidationError::MatchNotFound(match_id.clone()))?;
    if tournament.matches[idx].completed {
        return Err(ValidationError::MatchAlreadyCompleted(match_id.clone()).into());
    }
    if team1_score == team2_score {
        return Err(ValidationError::TiedScore(team1_score).into());
    }
    if tournament.state != TournamentState::InProgress {
        return Err(TournamentError::InvalidState);
    }
    let (team1, team2, bracket) = {
        let m = &tournament.matches[idx];
        (m.team1, m.team2, m.bracket)
    };
    tournament.expect_team(team1)?;
    tournament.expect_team(team2)?;

    tournament.matches[idx].complete(team1_score, team2_score);
    tournament.expect_team_mut(team1)?.record_scores(team1_score, team2_score);
    tournament.expect_team_mut(team2)?.record_scores(team2_score, team1_score);
    let (winner, loser) = if team1_score > team2_score {
        (team1, team2)
    } else {
        (team2, team1)
    };
    log::info!("Match {match_id}: {team1_score}-{team2_score}, team {winner} wins");

    match bracket {
        Bracket::GrandFinal => {
            let is_first_final = tournament.grand_finals().len() == 1;
            let team = tournament.expect_team_mut(loser)?;
            let losses = team.add_loss();
            let unbeaten_finalist = team.bracket == TeamBracket::Winners && losses == 1;
            if is_first_final && unbeaten_finalist {
                create_bracket_reset(tournament, winner, loser);
            } else {
                if losses >= MAX_LOSSES {
                    team.eliminate();
                }
                tournament.crown(winner);
                log::info!("Team {winner} wins the tournament");
            }
        }
        Bracket::Winners | Bracket::Losers => {
            let team = tournament.expect_team_mut(loser)?;
            let losses = team.add_loss();
            if losses >= MAX_LOSSES {
                team.eliminate();
                log::info!("Team {loser} eliminated");
            } else if team.bracket == TeamBracket::Winners {
                team.demote();
                log::debug!("Team {loser} drops to the losers bracket");
            }
        }
    }

    check_round_complete(tournament)
}
