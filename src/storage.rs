//! Persistence: snapshot the whole tournament after each command and restore it at startup.

use crate::models::Tournament;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to (de)serialize tournament: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the engine keeps its state between runs.
pub trait TournamentStore {
    fn save(&mut self, tournament: &Tournament) -> Result<(), StorageError>;

    /// The last saved tournament, or None when nothing was saved yet.
    fn load(&self) -> Result<Option<Tournament>, StorageError>;
}

/// On-disk record: the state verbatim plus when it was written.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    saved_at: DateTime<Utc>,
    tournament: Tournament,
}

/// Pretty-printed JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TournamentStore for JsonFileStore {
    fn save(&mut self, tournament: &Tournament) -> Result<(), StorageError> {
        let snapshot = Snapshot {
            saved_at: Utc::now(),
            tournament: tournament.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        // Write then rename so a crash never leaves half a file behind.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        log::debug!("Saved tournament {} to {}", tournament.id, self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<Tournament>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        log::info!(
            "Loaded tournament {} saved at {}",
            snapshot.tournament.id,
            snapshot.saved_at
        );
        Ok(Some(snapshot.tournament))
    }
}

/// Keeps the last snapshot in memory. Useful for tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    saved: Option<Tournament>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, as if it had been saved earlier.
    pub fn with_snapshot(tournament: Tournament) -> Self {
        Self {
            saved: Some(tournament),
            saves: 0,
        }
    }

    /// Number of times `save` was called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl TournamentStore for MemoryStore {
    fn save(&mut self, tournament: &Tournament) -> Result<(), StorageError> {
        self.saved = Some(tournament.clone());
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<Tournament>, StorageError> {
        Ok(self.saved.clone())
    }
}
