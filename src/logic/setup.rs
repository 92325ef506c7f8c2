//! Setup phase: random team draw and seeding the first winners round.

use crate::logic::matchmaking::create_round_matches;
use crate::models::{
    Bracket, Player, SetupError, Team, TeamId, Tournament, TournamentError, TournamentState,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Check the roster can be split into two-person teams: at least 4 players, even count.
pub fn validate_roster(players: &[Player]) -> Result<(), SetupError> {
    let count = players.len();
    if count < 4 {
        return Err(SetupError::NotEnoughPlayers { count });
    }
    if count % 2 != 0 {
        return Err(SetupError::OddPlayerCount { count });
    }
    Ok(())
}

/// Shuffle the roster and pair consecutive players into fresh winners-bracket teams.
pub fn form_teams<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Result<Vec<Team>, SetupError> {
    validate_roster(players)?;
    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);
    Ok(shuffled
        .chunks_exact(2)
        .map(|pair| Team::new(pair[0].clone(), pair[1].clone()))
        .collect())
}

/// Draw teams from the tournament roster (Registration or TeamsFormed).
///
/// Re-drawing discards the previous teams entirely. Not allowed once the bracket exists.
pub fn draw_teams<R: Rng + ?Sized>(tournament: &mut Tournament, rng: &mut R) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::Registration | TournamentState::TeamsFormed => {}
        TournamentState::InProgress | TournamentState::Completed => {
            return Err(SetupError::BracketStarted.into())
        }
    }
    tournament.teams = form_teams(&tournament.players, rng)?;
    tournament.matches.clear();
    tournament.losers_queue.clear();
    tournament.state = TournamentState::TeamsFormed;
    log::info!(
        "Formed {} teams from {} players",
        tournament.teams.len(),
        tournament.players.len()
    );
    Ok(())
}

/// Confirm the drawn teams: reset round counters and create winners round 1 in draw order.
pub fn generate_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::TeamsFormed {
        return Err(TournamentError::InvalidState);
    }
    if tournament.teams.len() < 2 {
        return Err(SetupError::NoTeams.into());
    }
    tournament.matches.clear();
    tournament.losers_queue.clear();
    tournament.winners_round = 1;
    tournament.losers_round = 1;
    tournament.current_round = 1;
    tournament.winner = None;

    let seeded: Vec<TeamId> = tournament.teams.iter().map(|t| t.id).collect();
    let created = create_round_matches(tournament, &seeded, 1, Bracket::Winners)?;
    tournament.state = TournamentState::InProgress;
    log::info!("Bracket generated: {} winners round 1 matches", created.len());
    Ok(())
}
