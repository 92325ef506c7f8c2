//! Command and query surface over one tournament, saving after every change.

use crate::logic::{draw_teams, generate_bracket, parse_score, submit_score};
use crate::models::{
    Bracket, GameMatch, MatchId, PlayerId, Team, TeamId, Tournament, TournamentError,
    TournamentState, ValidationError,
};
use crate::storage::TournamentStore;
use rand::Rng;
use serde::Deserialize;

/// Optional bracket/round restriction for [`TournamentEngine::list_matches`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct MatchFilter {
    pub bracket: Option<Bracket>,
    pub round: Option<u32>,
}

impl MatchFilter {
    pub fn bracket(bracket: Bracket) -> Self {
        Self {
            bracket: Some(bracket),
            round: None,
        }
    }

    pub fn round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn matches(&self, m: &GameMatch) -> bool {
        self.bracket.map_or(true, |b| m.bracket == b) && self.round.map_or(true, |r| m.round == r)
    }
}

/// Matches of one `(bracket, round)` pair, for bracket display.
#[derive(Clone, Debug)]
pub struct RoundGroup<'a> {
    pub bracket: Bracket,
    pub round: u32,
    pub matches: Vec<&'a GameMatch>,
}

/// Owns the tournament state and its store. One command runs at a time.
pub struct TournamentEngine<S: TournamentStore> {
    tournament: Tournament,
    store: S,
    /// Match whose score is being entered, if any.
    current_match: Option<MatchId>,
}

impl<S: TournamentStore> TournamentEngine<S> {
    /// Resume the saved tournament, or start an empty one.
    pub fn open(store: S) -> Result<Self, TournamentError> {
        let tournament = match store.load()? {
            Some(saved) => saved,
            None => Tournament::new(),
        };
        Ok(Self {
            tournament,
            store,
            current_match: None,
        })
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> TournamentState {
        self.tournament.state
    }

    /// Run `command` on a copy of the tournament and keep the copy only once it is saved.
    fn commit<T>(
        &mut self,
        command: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let mut next = self.tournament.clone();
        let out = command(&mut next)?;
        if let Err(e) = self.store.save(&next) {
            log::error!("Could not save tournament {}: {e}", next.id);
            return Err(e.into());
        }
        self.tournament = next;
        Ok(out)
    }

    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, TournamentError> {
        self.commit(|t| t.add_player(name))
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        self.commit(|t| t.remove_player(id))
    }

    /// Randomly pair the roster into teams. Calling it again re-draws.
    pub fn form_teams(&mut self) -> Result<&[Team], TournamentError> {
        self.form_teams_with(&mut rand::thread_rng())
    }

    pub fn form_teams_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&[Team], TournamentError> {
        self.commit(|t| draw_teams(t, rng))?;
        Ok(&self.tournament.teams)
    }

    /// Re-draw already formed teams.
    pub fn shuffle_teams(&mut self) -> Result<&[Team], TournamentError> {
        if self.tournament.state != TournamentState::TeamsFormed {
            return Err(TournamentError::InvalidState);
        }
        self.form_teams()
    }

    /// Confirm the teams and create winners round 1.
    pub fn generate_bracket(&mut self) -> Result<(), TournamentError> {
        self.commit(generate_bracket)
    }

    /// Select an open match for score entry.
    pub fn open_score_entry(&mut self, id: &MatchId) -> Result<&GameMatch, TournamentError> {
        let m = self
            .tournament
            .get_match(id)
            .ok_or_else(|| ValidationError::MatchNotFound(id.clone()))?;
        if m.completed {
            return Err(ValidationError::MatchAlreadyCompleted(id.clone()).into());
        }
        self.current_match = Some(id.clone());
        Ok(m)
    }

    /// Drop the score entry in progress. Nothing else changes.
    pub fn cancel_score_entry(&mut self) {
        self.current_match = None;
    }

    pub fn current_score_entry(&self) -> Option<&GameMatch> {
        self.current_match
            .as_ref()
            .and_then(|id| self.tournament.get_match(id))
    }

    /// Submit typed-in scores for the match opened with [`Self::open_score_entry`].
    pub fn submit_score_entry(&mut self, team1: &str, team2: &str) -> Result<(), TournamentError> {
        let id = self
            .current_match
            .clone()
            .ok_or(ValidationError::NoScoreEntry)?;
        let team1 = parse_score(team1)?;
        let team2 = parse_score(team2)?;
        self.submit_score(&id, team1, team2)
    }

    pub fn submit_score(
        &mut self,
        id: &MatchId,
        team1_score: u32,
        team2_score: u32,
    ) -> Result<(), TournamentError> {
        self.commit(|t| submit_score(t, id, team1_score, team2_score))?;
        if self.current_match.as_ref() == Some(id) {
            self.current_match = None;
        }
        Ok(())
    }

    /// Clear roster, teams, matches, counters and champion.
    pub fn reset_tournament(&mut self) -> Result<(), TournamentError> {
        self.commit(|t| {
            t.reset();
            Ok(())
        })?;
        self.current_match = None;
        log::info!("Tournament reset");
        Ok(())
    }

    pub fn list_matches(&self, filter: &MatchFilter) -> Vec<&GameMatch> {
        self.tournament
            .matches
            .iter()
            .filter(|m| filter.matches(m))
            .collect()
    }

    /// Matches grouped by bracket (winners, losers, grand final) and ascending round.
    pub fn rounds(&self) -> Vec<RoundGroup<'_>> {
        let mut keys: Vec<(Bracket, u32)> = self
            .tournament
            .matches
            .iter()
            .map(|m| (m.bracket, m.round))
            .collect();
        keys.sort();
        keys.dedup();
        keys.into_iter()
            .map(|(bracket, round)| RoundGroup {
                bracket,
                round,
                matches: self.tournament.round_matches(bracket, round),
            })
            .collect()
    }

    pub fn champion(&self) -> Option<&Team> {
        self.tournament.champion()
    }

    pub fn is_complete(&self) -> bool {
        self.tournament.is_complete()
    }

    pub fn teams(&self) -> &[Team] {
        &self.tournament.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.tournament.team(id)
    }
}
