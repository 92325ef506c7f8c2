//! Tournament business logic: team draw, match factory, scoring, bracket progression, byes.

mod losers_queue;
mod matchmaking;
mod progression;
mod scoring;
mod setup;

pub use losers_queue::{enqueue_losers, queued_byes};
pub use matchmaking::create_round_matches;
pub use progression::{check_round_complete, losers_champion};
pub use scoring::{parse_score, submit_score};
pub use setup::{draw_teams, form_teams, generate_bracket, validate_roster};
