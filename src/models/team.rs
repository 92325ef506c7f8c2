//! Two-player team and the bracket it currently plays in.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Losses after which a team is out of the tournament.
pub const MAX_LOSSES: u32 = 2;

/// Bracket a team currently belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamBracket {
    #[default]
    Winners,
    Losers,
}

/// A fixed pair of players plus their running record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub player1: Player,
    pub player2: Player,
    pub bracket: TeamBracket,
    pub losses: u32,
    pub eliminated: bool,
    pub total_score: u64,
    pub total_opponent_score: u64,
    pub score_differential: i64,
    pub matches_played: u32,
}

impl Team {
    /// New team in the winners bracket with a clean record.
    pub fn new(player1: Player, player2: Player) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1,
            player2,
            bracket: TeamBracket::Winners,
            losses: 0,
            eliminated: false,
            total_score: 0,
            total_opponent_score: 0,
            score_differential: 0,
            matches_played: 0,
        }
    }

    /// "Name & Name", as shown on the bracket.
    pub fn display_name(&self) -> String {
        format!("{} & {}", self.player1.name, self.player2.name)
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    /// Accumulate one completed match into the score totals.
    pub fn record_scores(&mut self, own: u32, opponent: u32) {
        self.total_score += u64::from(own);
        self.total_opponent_score += u64::from(opponent);
        self.score_differential = self.total_score as i64 - self.total_opponent_score as i64;
        self.matches_played += 1;
    }

    /// Record a loss. Returns the new loss count.
    pub fn add_loss(&mut self) -> u32 {
        self.losses += 1;
        self.losses
    }

    /// First-loss demotion from the winners bracket.
    pub fn demote(&mut self) {
        self.bracket = TeamBracket::Losers;
    }

    pub fn eliminate(&mut self) {
        self.eliminated = true;
    }
}
