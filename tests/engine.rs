//! Integration tests for the engine facade: commands, score entry, queries, persistence.

use rand::rngs::StdRng;
use rand::SeedableRng;
use washer_toss_bracket::{
    Bracket, JsonFileStore, MatchFilter, MemoryStore, SetupError, StorageError, Tournament,
    TournamentEngine, TournamentError, TournamentState, TournamentStore, ValidationError,
};

const NAMES: [&str; 8] = ["Briggs", "Justin", "Jen", "Matt", "Chanie", "Joy", "Dale", "Jean"];

fn engine_with_bracket(players: usize) -> TournamentEngine<MemoryStore> {
    let mut engine = TournamentEngine::open(MemoryStore::new()).unwrap();
    for name in &NAMES[..players] {
        engine.add_player(name).unwrap();
    }
    engine.form_teams_with(&mut StdRng::seed_from_u64(5)).unwrap();
    engine.generate_bracket().unwrap();
    engine
}

#[test]
fn form_teams_requires_even_roster_of_four() {
    let mut engine = TournamentEngine::open(MemoryStore::new()).unwrap();
    for name in &NAMES[..3] {
        engine.add_player(name).unwrap();
    }
    assert!(matches!(
        engine.form_teams(),
        Err(TournamentError::Setup(SetupError::NotEnoughPlayers { count: 3 }))
    ));
    engine.add_player("Dale").unwrap();
    engine.add_player("Jean").unwrap();
    assert!(matches!(
        engine.form_teams(),
        Err(TournamentError::Setup(SetupError::OddPlayerCount { count: 5 }))
    ));
    assert!(engine.teams().is_empty());
}

#[test]
fn shuffle_redraws_until_bracket_starts() {
    let mut engine = TournamentEngine::open(MemoryStore::new()).unwrap();
    for name in NAMES {
        engine.add_player(name).unwrap();
    }
    assert!(matches!(engine.shuffle_teams(), Err(TournamentError::InvalidState)));
    engine.form_teams().unwrap();
    let first: Vec<_> = engine.teams().iter().map(|t| t.id).collect();
    engine.shuffle_teams().unwrap();
    assert_eq!(engine.teams().len(), 4);
    assert!(engine.teams().iter().all(|t| !first.contains(&t.id)));

    engine.generate_bracket().unwrap();
    assert!(matches!(
        engine.form_teams(),
        Err(TournamentError::Setup(SetupError::BracketStarted))
    ));
}

#[test]
fn every_command_is_saved() {
    let engine = engine_with_bracket(8);
    // 8 players + form teams + generate bracket
    assert_eq!(engine.store().save_count(), 10);
}

#[test]
fn rejected_commands_are_not_saved() {
    let mut engine = engine_with_bracket(4);
    let before = engine.store().save_count();
    let id = engine.list_matches(&MatchFilter::default())[0].id.clone();
    assert!(engine.submit_score(&id, 3, 3).is_err());
    assert!(engine.add_player("Late").is_err());
    assert_eq!(engine.store().save_count(), before);
}

#[test]
fn score_entry_can_be_cancelled_without_changes() {
    let mut engine = engine_with_bracket(8);
    let id = engine.list_matches(&MatchFilter::bracket(Bracket::Winners))[0].id.clone();

    engine.open_score_entry(&id).unwrap();
    assert_eq!(engine.current_score_entry().map(|m| m.id.clone()), Some(id.clone()));
    engine.cancel_score_entry();
    assert!(engine.current_score_entry().is_none());
    assert!(matches!(
        engine.submit_score_entry("10", "4"),
        Err(TournamentError::Validation(ValidationError::NoScoreEntry))
    ));
    assert!(engine.list_matches(&MatchFilter::default()).iter().all(|m| !m.completed));
}

#[test]
fn score_entry_validates_text_then_submits() {
    let mut engine = engine_with_bracket(8);
    let id = engine.list_matches(&MatchFilter::default())[0].id.clone();
    engine.open_score_entry(&id).unwrap();

    assert!(matches!(
        engine.submit_score_entry("ten", "4"),
        Err(TournamentError::Validation(ValidationError::InvalidScore(_)))
    ));
    assert!(matches!(
        engine.submit_score_entry("7", " 7"),
        Err(TournamentError::Validation(ValidationError::TiedScore(7)))
    ));
    // Failed attempts keep the entry open.
    assert!(engine.current_score_entry().is_some());

    engine.submit_score_entry("21", "13").unwrap();
    assert!(engine.current_score_entry().is_none());
    let played = engine.tournament().get_match(&id).unwrap();
    assert!(played.completed);
    assert_eq!((played.team1_score, played.team2_score), (Some(21), Some(13)));
    assert!(matches!(
        engine.open_score_entry(&id),
        Err(TournamentError::Validation(ValidationError::MatchAlreadyCompleted(_)))
    ));
}

#[test]
fn list_matches_filters_by_bracket_and_round() {
    let mut engine = engine_with_bracket(8);
    let round_one: Vec<_> = engine
        .list_matches(&MatchFilter::bracket(Bracket::Winners).round(1))
        .iter()
        .map(|m| (m.id.clone(), m.team1))
        .collect();
    assert_eq!(round_one.len(), 2);
    for (id, team1) in &round_one {
        engine.submit_score(id, 10, 0).unwrap();
        assert_eq!(engine.team(*team1).unwrap().score_differential, 10);
    }
    assert_eq!(engine.list_matches(&MatchFilter::bracket(Bracket::Winners).round(2)).len(), 1);
    assert_eq!(engine.list_matches(&MatchFilter::bracket(Bracket::Losers)).len(), 1);
    assert_eq!(engine.list_matches(&MatchFilter::default()).len(), 4);

    let groups: Vec<_> = engine
        .rounds()
        .iter()
        .map(|g| (g.bracket, g.round, g.matches.len()))
        .collect();
    assert_eq!(
        groups,
        vec![(Bracket::Winners, 1, 2), (Bracket::Winners, 2, 1), (Bracket::Losers, 1, 1)]
    );
}

#[test]
fn reset_clears_everything() {
    let mut engine = engine_with_bracket(4);
    let id = engine.list_matches(&MatchFilter::default())[0].id.clone();
    engine.submit_score(&id, 5, 9).unwrap();

    engine.reset_tournament().unwrap();
    let t = engine.tournament();
    assert!(t.teams.is_empty());
    assert!(t.matches.is_empty());
    assert!(t.players.is_empty());
    assert!(t.winner.is_none());
    assert_eq!(t.state, TournamentState::Registration);
    assert!(engine.champion().is_none());
    assert!(!engine.is_complete());
    // A fresh team draw is required before any match exists.
    assert!(matches!(engine.generate_bracket(), Err(TournamentError::InvalidState)));
}

#[test]
fn resumes_from_saved_state_verbatim() {
    let mut engine = engine_with_bracket(8);
    let ids: Vec<_> = engine
        .list_matches(&MatchFilter::default())
        .iter()
        .map(|m| m.id.clone())
        .collect();
    for id in &ids {
        engine.submit_score(id, 11, 7).unwrap();
    }
    let saved = engine.tournament().clone();

    let resumed = TournamentEngine::open(MemoryStore::with_snapshot(saved.clone())).unwrap();
    let t = resumed.tournament();
    assert_eq!(t.id, saved.id);
    assert_eq!(t.matches, saved.matches);
    assert_eq!(t.teams, saved.teams);
    assert_eq!(
        (t.winners_round, t.losers_round, t.current_round),
        (saved.winners_round, saved.losers_round, saved.current_round)
    );
}

#[test]
fn json_store_round_trips_a_tournament_in_progress() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tournament.json");

    let mut engine = TournamentEngine::open(JsonFileStore::new(&path)).unwrap();
    assert!(engine.tournament().players.is_empty());
    for name in NAMES {
        engine.add_player(name).unwrap();
    }
    engine.form_teams_with(&mut StdRng::seed_from_u64(8)).unwrap();
    engine.generate_bracket().unwrap();
    let id = engine.list_matches(&MatchFilter::default())[0].id.clone();
    engine.submit_score(&id, 4, 12).unwrap();
    let expected = engine.tournament().clone();
    drop(engine);

    let mut resumed = TournamentEngine::open(JsonFileStore::new(&path)).unwrap();
    assert_eq!(resumed.tournament().matches, expected.matches);
    assert_eq!(resumed.tournament().teams, expected.teams);
    assert_eq!(resumed.state(), TournamentState::InProgress);

    // The resumed engine keeps playing from where it stopped.
    let next = resumed
        .list_matches(&MatchFilter::default())
        .into_iter()
        .find(|m| !m.completed)
        .map(|m| m.id.clone())
        .unwrap();
    resumed.submit_score(&next, 10, 2).unwrap();
}

#[test]
fn json_store_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tournament.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        TournamentEngine::open(JsonFileStore::new(&path)),
        Err(TournamentError::Storage(_))
    ));
}

/// Accepts a fixed number of saves, then reports a full disk.
struct FullDiskStore {
    saves_left: usize,
}

impl TournamentStore for FullDiskStore {
    fn save(&mut self, _tournament: &Tournament) -> Result<(), StorageError> {
        if self.saves_left == 0 {
            return Err(StorageError::Io {
                path: "tournament.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.saves_left -= 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<Tournament>, StorageError> {
        Ok(None)
    }
}

#[test]
fn failed_save_leaves_state_untouched() {
    // 4 players + form teams + generate bracket, then the disk fills up.
    let mut engine = TournamentEngine::open(FullDiskStore { saves_left: 6 }).unwrap();
    for name in &NAMES[..4] {
        engine.add_player(name).unwrap();
    }
    engine.form_teams_with(&mut StdRng::seed_from_u64(5)).unwrap();
    engine.generate_bracket().unwrap();
    let before = engine.tournament().clone();

    let id = engine.list_matches(&MatchFilter::default())[0].id.clone();
    engine.open_score_entry(&id).unwrap();
    assert!(matches!(
        engine.submit_score_entry("10", "3"),
        Err(TournamentError::Storage(_))
    ));
    assert_eq!(engine.tournament().matches, before.matches);
    assert_eq!(engine.tournament().teams, before.teams);
    assert!(engine.current_score_entry().is_some());

    // A retry hits the same storage error rather than a stale "already completed".
    assert!(matches!(
        engine.submit_score(&id, 10, 3),
        Err(TournamentError::Storage(_))
    ));
    assert!(matches!(engine.add_player("Late"), Err(TournamentError::Setup(_))));
    assert!(matches!(engine.reset_tournament(), Err(TournamentError::Storage(_))));
    assert_eq!(engine.state(), TournamentState::InProgress);
    assert_eq!(engine.tournament().players.len(), 4);
}
