//! Match (game) and the bracket it is played in.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bracket {
    Winners,
    Losers,
    GrandFinal,
}

impl Bracket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bracket::Winners => "winners",
            Bracket::Losers => "losers",
            Bracket::GrandFinal => "grand-final",
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a match: `bracket-round-index`, unique within a tournament.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(bracket: Bracket, round: u32, index: usize) -> Self {
        Self(format!("{bracket}-{round}-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MatchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single match between two teams. Scores, winner and loser are set once, on completion.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub round: u32,
    pub bracket: Bracket,
    pub team1: TeamId,
    pub team2: TeamId,
    /// None until played.
    pub team1_score: Option<u32>,
    pub team2_score: Option<u32>,
    pub winner: Option<TeamId>,
    pub loser: Option<TeamId>,
    pub completed: bool,
}

impl GameMatch {
    pub fn new(id: MatchId, round: u32, bracket: Bracket, team1: TeamId, team2: TeamId) -> Self {
        Self {
            id,
            round,
            bracket,
            team1,
            team2,
            team1_score: None,
            team2_score: None,
            winner: None,
            loser: None,
            completed: false,
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team1 == team || self.team2 == team
    }

    pub fn is_open(&self) -> bool {
        !self.completed
    }

    /// Fix the result. Caller guarantees `team1_score != team2_score` and that the match is open.
    pub(crate) fn complete(&mut self, team1_score: u32, team2_score: u32) {
        let (winner, loser) = if team1_score > team2_score {
            (self.team1, self.team2)
        } else {
            (self.team2, self.team1)
        };
        self.team1_score = Some(team1_score);
        self.team2_score = Some(team2_score);
        self.winner = Some(winner);
        self.loser = Some(loser);
        self.completed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn match_id_format() {
        assert_eq!(MatchId::new(Bracket::Losers, 3, 2).as_str(), "losers-3-2");
        assert_eq!(MatchId::new(Bracket::GrandFinal, 4, 1).as_str(), "grand-final-4-1");
    }

    #[test]
    fn higher_score_wins() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut m = GameMatch::new(MatchId::new(Bracket::Winners, 1, 1), 1, Bracket::Winners, a, b);
        m.complete(7, 21);
        assert_eq!(m.winner, Some(b));
        assert_eq!(m.loser, Some(a));
        assert!(m.completed);
    }
}
