//! Tournament and TournamentState.

use crate::models::error::{SetupError, TournamentError};
use crate::models::game::{Bracket, GameMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use crate::models::team::{Team, TeamBracket, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Adding and removing players.
    #[default]
    Registration,
    /// Teams drawn; may still be re-shuffled.
    TeamsFormed,
    /// Bracket generated; accepting scores.
    InProgress,
    /// Champion decided.
    Completed,
}

/// Full tournament state: roster, teams, matches, round counters and champion.
///
/// `matches` is append-only; the only change to an existing match is its one-time completion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub matches: Vec<GameMatch>,
    pub winners_round: u32,
    pub losers_round: u32,
    /// `max(winners_round, losers_round)`, for display only.
    pub current_round: u32,
    /// Losers-bracket teams held back by a bye, oldest first.
    #[serde(default)]
    pub losers_queue: Vec<TeamId>,
    /// Set only once the tournament is over.
    pub winner: Option<TeamId>,
    pub state: TournamentState,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}

impl Tournament {
    /// Create an empty tournament in Registration.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            players: Vec::new(),
            teams: Vec::new(),
            matches: Vec::new(),
            winners_round: 1,
            losers_round: 1,
            current_round: 1,
            losers_queue: Vec::new(),
            winner: None,
            state: TournamentState::Registration,
        }
    }

    /// Create a tournament with an initial roster. Still in Registration.
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::new()
        }
    }

    /// Add a player. Names must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        if self.state != TournamentState::Registration {
            return Err(SetupError::RosterLocked.into());
        }
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(SetupError::EmptyName.into());
        }
        if self.players.iter().any(|p| p.has_name(name)) {
            return Err(SetupError::DuplicatePlayerName(name.to_string()).into());
        }
        let player = Player::new(name);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id (Registration only).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Registration {
            return Err(SetupError::RosterLocked.into());
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(SetupError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    /// Clear everything: roster, teams, matches, counters and champion.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    /// Team lookup for ids taken from our own matches; a miss means corrupted state.
    pub(crate) fn expect_team(&self, id: TeamId) -> Result<&Team, TournamentError> {
        self.team(id)
            .ok_or_else(|| TournamentError::invariant(format!("unknown team {id}")))
    }

    pub(crate) fn expect_team_mut(&mut self, id: TeamId) -> Result<&mut Team, TournamentError> {
        self.team_mut(id)
            .ok_or_else(|| TournamentError::invariant(format!("unknown team {id}")))
    }

    pub fn get_match(&self, id: &MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| &m.id == id)
    }

    /// Matches of one bracket and round, in creation order.
    pub fn round_matches(&self, bracket: Bracket, round: u32) -> Vec<&GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.bracket == bracket && m.round == round)
            .collect()
    }

    /// Whether the team is scheduled in an unplayed match of the given bracket.
    pub fn in_open_match(&self, team: TeamId, bracket: Bracket) -> bool {
        self.matches
            .iter()
            .any(|m| m.bracket == bracket && m.is_open() && m.involves(team))
    }

    /// Non-eliminated teams currently in the given bracket, in team order.
    pub fn active_teams(&self, bracket: TeamBracket) -> Vec<TeamId> {
        self.teams
            .iter()
            .filter(|t| t.is_active() && t.bracket == bracket)
            .map(|t| t.id)
            .collect()
    }

    pub fn grand_finals(&self) -> Vec<&GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.bracket == Bracket::GrandFinal)
            .collect()
    }

    pub fn champion(&self) -> Option<&Team> {
        self.winner.and_then(|id| self.team(id))
    }

    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    /// Declare the champion and close the tournament.
    pub(crate) fn crown(&mut self, team: TeamId) {
        self.winner = Some(team);
        self.state = TournamentState::Completed;
    }

    pub(crate) fn sync_current_round(&mut self) {
        self.current_round = self.winners_round.max(self.losers_round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_case_insensitive() {
        let mut t = Tournament::new();
        t.add_player("Briggs").unwrap();
        assert!(matches!(
            t.add_player("  bRIGGS "),
            Err(TournamentError::Setup(SetupError::DuplicatePlayerName(_)))
        ));
        assert_eq!(t.players.len(), 1);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut t = Tournament::new();
        assert!(matches!(
            t.add_player("   "),
            Err(TournamentError::Setup(SetupError::EmptyName))
        ));
    }

    #[test]
    fn roster_locked_after_registration() {
        let mut t = Tournament::new();
        let id = t.add_player("Joy").unwrap();
        t.state = TournamentState::TeamsFormed;
        assert!(matches!(
            t.add_player("Dale"),
            Err(TournamentError::Setup(SetupError::RosterLocked))
        ));
        assert!(matches!(
            t.remove_player(id),
            Err(TournamentError::Setup(SetupError::RosterLocked))
        ));
    }
}
