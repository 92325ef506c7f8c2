//! Washer toss tournament: double-elimination bracket engine for two-player teams.

pub mod engine;
pub mod logic;
pub mod models;
pub mod report;
pub mod storage;

pub use engine::{MatchFilter, RoundGroup, TournamentEngine};
pub use logic::{
    check_round_complete, create_round_matches, draw_teams, enqueue_losers, form_teams,
    generate_bracket, losers_champion, parse_score, queued_byes, submit_score, validate_roster,
};
pub use models::{
    Bracket, GameMatch, MatchId, Player, PlayerId, SetupError, Team, TeamBracket, TeamId,
    Tournament, TournamentError, TournamentId, TournamentState, ValidationError, MAX_LOSSES,
};
pub use storage::{JsonFileStore, MemoryStore, StorageError, TournamentStore};
