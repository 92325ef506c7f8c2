//! Error taxonomy for roster setup, score submission and corrupted state.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use crate::storage::StorageError;

/// Problems with the roster or with forming teams. Fixed by correcting the roster.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SetupError {
    #[error("Need at least 4 players (have {count})")]
    NotEnoughPlayers { count: usize },
    #[error("Need an even number of players (have {count})")]
    OddPlayerCount { count: usize },
    #[error("A player named {0:?} is already registered")]
    DuplicatePlayerName(String),
    #[error("Player name cannot be empty")]
    EmptyName,
    #[error("Player not found")]
    PlayerNotFound(PlayerId),
    #[error("The roster cannot change once teams are formed")]
    RosterLocked,
    #[error("Teams cannot be re-drawn once the bracket has started")]
    BracketStarted,
    #[error("Form teams before generating the bracket")]
    NoTeams,
}

/// Rejected score submissions. Nothing is mutated when one of these is returned.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    #[error("Match {0} already has a result")]
    MatchAlreadyCompleted(MatchId),
    #[error("{0:?} is not a valid score")]
    InvalidScore(String),
    #[error("Scores cannot be tied ({0}-{0})")]
    TiedScore(u32),
    #[error("No match is open for score entry")]
    NoScoreEntry,
}

/// Errors that can occur during tournament operations.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Tournament is not in a phase that allows this action.
    #[error("Invalid state for this action")]
    InvalidState,
    /// Internal bookkeeping disagrees with itself. Only reachable on corrupted state.
    #[error("Tournament state is inconsistent: {0}")]
    InvariantViolation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TournamentError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("invariant violation: {message}");
        TournamentError::InvariantViolation(message)
    }
}
