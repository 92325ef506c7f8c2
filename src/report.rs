//! Read-only views for display and export.

use crate::models::{Team, TeamBracket, Tournament};
use serde::Serialize;
use std::io::Write;

/// Winners-bracket round label for a bracket of `team_count` teams.
pub fn winners_round_name(round: u32, team_count: usize) -> String {
    let total_rounds = (team_count.max(1) as f64).log2().ceil() as u32;
    match total_rounds.checked_sub(round) {
        Some(0) => "Winners Final".to_string(),
        Some(1) => "Winners Semi-Final".to_string(),
        Some(2) => "Winners Quarter-Final".to_string(),
        _ => format!("Winners Round {round}"),
    }
}

#[derive(Debug, Serialize)]
struct StandingRow<'a> {
    team: String,
    player1: &'a str,
    player2: &'a str,
    bracket: &'static str,
    losses: u32,
    eliminated: bool,
    champion: bool,
    matches_played: u32,
    total_score: u64,
    total_opponent_score: u64,
    score_differential: i64,
}

impl<'a> StandingRow<'a> {
    fn new(team: &'a Team, champion: bool) -> Self {
        Self {
            team: team.display_name(),
            player1: &team.player1.name,
            player2: &team.player2.name,
            bracket: match team.bracket {
                TeamBracket::Winners => "winners",
                TeamBracket::Losers => "losers",
            },
            losses: team.losses,
            eliminated: team.eliminated,
            champion,
            matches_played: team.matches_played,
            total_score: team.total_score,
            total_opponent_score: team.total_opponent_score,
            score_differential: team.score_differential,
        }
    }
}

/// Teams ordered champion first, then fewest losses, then best differential.
pub fn standings(tournament: &Tournament) -> Vec<&Team> {
    let mut teams: Vec<&Team> = tournament.teams.iter().collect();
    teams.sort_by_key(|t| {
        (
            tournament.winner != Some(t.id),
            t.losses,
            std::cmp::Reverse(t.score_differential),
        )
    });
    teams
}

/// Write the standings as CSV with a header row.
pub fn write_standings_csv<W: Write>(tournament: &Tournament, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for team in standings(tournament) {
        wtr.serialize(StandingRow::new(team, tournament.winner == Some(team.id)))?;
    }
    wtr.flush()?;
    Ok(())
}
