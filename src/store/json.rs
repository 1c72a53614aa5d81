//! JSON-file-backed record store
//!
//! Stand-in for the club's spreadsheet backend: the whole store is one JSON
//! document holding both tables. All operations run against an in-memory
//! working copy; `persist` writes the document back to disk.

use crate::error::{RatingError, Result};
use crate::store::{InMemoryRecordStore, MatchRecord, PlayerRecord, RecordStore, StoreSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Record store persisted as a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryRecordStore,
}

impl JsonFileStore {
    /// Open a store file, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| RatingError::StorageError {
                message: format!("failed to read {}: {e}", path.display()),
            })?;
            serde_json::from_str(&contents).map_err(|e| RatingError::StorageError {
                message: format!("failed to parse {}: {e}", path.display()),
            })?
        } else {
            info!(path = %path.display(), "store file not found, starting empty");
            StoreSnapshot::default()
        };
        Ok(Self {
            path,
            inner: InMemoryRecordStore::from_snapshot(snapshot),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    fn find_player(&self, player_id: &str) -> Result<Option<PlayerRecord>> {
        self.inner.find_player(player_id)
    }

    fn all_players(&self) -> Result<Vec<PlayerRecord>> {
        self.inner.all_players()
    }

    fn add_player(&self, record: PlayerRecord) -> Result<()> {
        self.inner.add_player(record)
    }

    fn update_player(&self, record: PlayerRecord) -> Result<()> {
        self.inner.update_player(record)
    }

    fn base_rating(&self, player_id: &str) -> Result<f64> {
        self.inner.base_rating(player_id)
    }

    fn record_game(&self, player_id: &str, entry: &str) -> Result<()> {
        self.inner.record_game(player_id, entry)
    }

    fn pending_matches(&self) -> Result<Vec<MatchRecord>> {
        self.inner.pending_matches()
    }

    fn clear_matches(&self) -> Result<()> {
        self.inner.clear_matches()
    }

    fn sync_base_ratings(&self) -> Result<()> {
        self.inner.sync_base_ratings()
    }

    fn round_ratings(&self) -> Result<()> {
        self.inner.round_ratings()
    }

    fn player_count(&self) -> Result<usize> {
        self.inner.player_count()
    }

    fn persist(&self) -> Result<()> {
        let snapshot = self.inner.snapshot()?;
        let contents =
            serde_json::to_string_pretty(&snapshot).map_err(|e| RatingError::StorageError {
                message: format!("failed to serialize store: {e}"),
            })?;
        fs::write(&self.path, contents).map_err(|e| RatingError::StorageError {
            message: format!("failed to write {}: {e}", self.path.display()),
        })?;
        Ok(())
    }
}
