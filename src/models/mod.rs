//! Data structures for the washer toss tournament: players, teams, matches, tournament state.

mod error;
mod game;
mod player;
mod team;
mod tournament;

pub use error::{SetupError, TournamentError, ValidationError};
pub use game::{Bracket, GameMatch, MatchId};
pub use player::{Player, PlayerId};
pub use team::{Team, TeamBracket, TeamId, MAX_LOSSES};
pub use tournament::{Tournament, TournamentId, TournamentState};
