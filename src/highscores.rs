//! High score persistence
//!
//! The engine only sees the `HighScoreStore` trait. `HighScoreTable` is a
//! ready-made store keeping one best score per game, serializable to JSON.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GameKind;

/// Failure of an external persistence or reward call
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted high score per game identity
pub trait HighScoreStore {
    fn read(&self, game: GameKind) -> Result<u64, PersistError>;
    fn write(&mut self, game: GameKind, score: u64) -> Result<(), PersistError>;
}

/// Shared handle, so the host can keep reading a store it handed to a session
impl<S: HighScoreStore + ?Sized> HighScoreStore for Rc<RefCell<S>> {
    fn read(&self, game: GameKind) -> Result<u64, PersistError> {
        self.borrow().read(game)
    }

    fn write(&mut self, game: GameKind, score: u64) -> Result<(), PersistError> {
        self.borrow_mut().write(game, score)
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// Best score per game, keyed by `GameKind::as_str`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreTable {
    pub entries: BTreeMap<String, HighScoreEntry>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, game: GameKind) -> Option<&HighScoreEntry> {
        self.entries.get(game.as_str())
    }

    /// Record a score if it beats the stored one. Returns whether it did.
    pub fn record(&mut self, game: GameKind, score: u64, timestamp: u64) -> bool {
        let best = self.get(game).map(|e| e.score).unwrap_or(0);
        if score <= best {
            return false;
        }
        self.entries
            .insert(game.as_str().to_string(), HighScoreEntry { score, timestamp });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl HighScoreStore for HighScoreTable {
    fn read(&self, game: GameKind) -> Result<u64, PersistError> {
        Ok(self.get(game).map(|e| e.score).unwrap_or(0))
    }

    fn write(&mut self, game: GameKind, score: u64) -> Result<(), PersistError> {
        self.record(game, score, now_ms());
        Ok(())
    }
}

/// Table backed by a JSON file, rewritten on every new high score
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: HighScoreTable,
}

impl JsonFileStore {
    /// Open a store; a missing file starts an empty table
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref().to_path_buf();
        let table = match std::fs::read_to_string(&path) {
            Ok(json) => {
                let table = HighScoreTable::from_json(&json)?;
                log::info!("Loaded {} high scores from {}", table.entries.len(), path.display());
                table
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                HighScoreTable::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, table })
    }

    pub fn table(&self) -> &HighScoreTable {
        &self.table
    }

    fn save(&self) -> Result<(), PersistError> {
        let json = self.table.to_json()?;
        std::fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", self.table.entries.len());
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn read(&self, game: GameKind) -> Result<u64, PersistError> {
        self.table.read(game)
    }

    fn write(&mut self, game: GameKind, score: u64) -> Result<(), PersistError> {
        if self.table.record(game, score, now_ms()) {
            self.save()?;
        }
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
