//! In-memory record store implementation

use crate::error::{RatingError, Result};
use crate::store::{
    parse_game_entry, parse_game_notation, GameRow, MatchRecord, PlayerRecord, RecordStore,
    StoreSnapshot,
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory record store
///
/// Used directly in tests and as the working state of the file-backed store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    data: RwLock<StoreSnapshot>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
        }
    }

    /// Clone out the current contents of both tables.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreSnapshot>> {
        self.data.read().map_err(|_| {
            RatingError::StorageError {
                message: "failed to acquire store read lock".to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreSnapshot>> {
        self.data.write().map_err(|_| {
            RatingError::StorageError {
                message: "failed to acquire store write lock".to_string(),
            }
            .into()
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn find_player(&self, player_id: &str) -> Result<Option<PlayerRecord>> {
        Ok(self.read()?.players.get(player_id).cloned())
    }

    fn all_players(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.read()?.players.values().cloned().collect())
    }

    fn add_player(&self, record: PlayerRecord) -> Result<()> {
        let mut data = self.write()?;
        if data.players.contains_key(&record.id) {
            return Err(RatingError::StorageError {
                message: format!("player {} already exists", record.id),
            }
            .into());
        }
        data.games.insert(
            record.id.clone(),
            GameRow {
                base_rating: record.rating,
                games: String::new(),
            },
        );
        data.players.insert(record.id.clone(), record);
        Ok(())
    }

    fn update_player(&self, record: PlayerRecord) -> Result<()> {
        let mut data = self.write()?;
        if !data.players.contains_key(&record.id) {
            return Err(RatingError::PlayerNotFound {
                player_id: record.id,
            }
            .into());
        }
        data.players.insert(record.id.clone(), record);
        Ok(())
    }

    fn base_rating(&self, player_id: &str) -> Result<f64> {
        self.read()?
            .games
            .get(player_id)
            .map(|row| row.base_rating)
            .ok_or_else(|| {
                RatingError::PlayerNotFound {
                    player_id: player_id.to_string(),
                }
                .into()
            })
    }

    fn record_game(&self, player_id: &str, entry: &str) -> Result<()> {
        // reject garbage before it reaches the games column
        parse_game_entry(player_id, entry)?;
        let mut data = self.write()?;
        let row = data.games.get_mut(player_id).ok_or_else(|| {
            RatingError::PlayerNotFound {
                player_id: player_id.to_string(),
            }
        })?;
        if row.games.is_empty() {
            row.games = entry.to_string();
        } else {
            row.games = format!("{}, {}", row.games, entry);
        }
        Ok(())
    }

    fn pending_matches(&self) -> Result<Vec<MatchRecord>> {
        let data = self.read()?;
        Ok(data
            .games
            .iter()
            .flat_map(|(player_id, row)| parse_game_notation(player_id, &row.games))
            .collect())
    }

    fn clear_matches(&self) -> Result<()> {
        let mut data = self.write()?;
        for row in data.games.values_mut() {
            row.games.clear();
        }
        Ok(())
    }

    fn sync_base_ratings(&self) -> Result<()> {
        let mut data = self.write()?;
        let rounded: Vec<(String, f64)> = data
            .players
            .values()
            .map(|record| (record.id.clone(), record.rating.round()))
            .collect();
        for (id, rating) in rounded {
            if let Some(record) = data.players.get_mut(&id) {
                record.set_rating(rating);
            }
            data.games
                .entry(id)
                .or_insert_with(|| GameRow {
                    base_rating: rating,
                    games: String::new(),
                })
                .base_rating = rating;
        }
        Ok(())
    }

    fn round_ratings(&self) -> Result<()> {
        let mut data = self.write()?;
        for record in data.players.values_mut() {
            if record.rating.fract() != 0.0 {
                let rounded = record.rating.round();
                record.set_rating(rounded);
            }
        }
        Ok(())
    }

    fn player_count(&self) -> Result<usize> {
        Ok(self.read()?.players.len())
    }

    fn persist(&self) -> Result<()> {
        Ok(())
    }
}
