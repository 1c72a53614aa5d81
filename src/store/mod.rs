//! Record storage interface and implementations
//!
//! Player and game records live in two tables, mirroring the club's
//! spreadsheet layout: a players table (name, current rating, grade) and a
//! games table (base rating plus the pending-games notation column). The
//! store is an explicit object handed to its consumers, never a process-wide
//! singleton, so tests can substitute an in-memory fake.

pub mod json;
pub mod memory;

use crate::error::{RatingError, Result};
use crate::types::{Grade, PlayerId, TournamentClass};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

// Re-export commonly used types
pub use json::JsonFileStore;
pub use memory::InMemoryRecordStore;

/// One row of the players table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub last_name: String,
    pub first_names: String,
    pub rating: f64,
    pub grade: Grade,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Create a record for a new player, deriving the grade from the rating.
    pub fn new(id: PlayerId, last_name: String, first_names: String, rating: f64) -> Self {
        let now = Utc::now();
        Self {
            id,
            last_name,
            first_names,
            rating,
            grade: Grade::from_rating(rating),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set a new rating and recompute the derived grade.
    pub fn set_rating(&mut self, rating: f64) {
        self.rating = rating;
        self.grade = Grade::from_rating(rating);
        self.updated_at = Utc::now();
    }
}

/// One row of the games table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    /// Rating snapshot the pending games were played at
    pub base_rating: f64,
    /// Comma-separated pending games, e.g. `"234+0a, 456+2b"`
    pub games: String,
}

/// A pending match parsed from the games notation
///
/// By convention the row player is the winner: an entry `456+2b` in player
/// 123's games column records that 123 beat 456 with two handicap stones in
/// a class B tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub winner_id: PlayerId,
    pub opponent_id: PlayerId,
    pub handicap: u8,
    pub class: TournamentClass,
}

/// Parse one games-column entry (`"<opponent>+<handicap><class>"`).
pub fn parse_game_entry(winner_id: &str, entry: &str) -> Result<MatchRecord> {
    let malformed = || RatingError::MalformedGameNotation {
        notation: entry.to_string(),
    };
    let (opponent, tail) = entry.split_once('+').ok_or_else(malformed)?;
    let tail = tail.trim();
    let mut chars = tail.chars();
    let handicap = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(malformed)? as u8;
    let class: TournamentClass = chars.as_str().parse().map_err(|_| malformed())?;
    Ok(MatchRecord {
        winner_id: winner_id.to_string(),
        opponent_id: opponent.trim().to_string(),
        handicap,
        class,
    })
}

/// Parse a whole games column, skipping malformed entries with a warning.
pub fn parse_game_notation(winner_id: &str, games: &str) -> Vec<MatchRecord> {
    games
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match parse_game_entry(winner_id, entry) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(player_id = winner_id, entry, %error, "skipping malformed game entry");
                None
            }
        })
        .collect()
}

/// Serializable snapshot of both tables
///
/// BTreeMaps keep enumeration deterministic: pending matches come out in
/// player-id order, then in listing order within a row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub players: BTreeMap<PlayerId, PlayerRecord>,
    pub games: BTreeMap<PlayerId, GameRow>,
}

/// Trait for record storage operations
pub trait RecordStore: Send + Sync {
    /// Look up a player row by id.
    fn find_player(&self, player_id: &str) -> Result<Option<PlayerRecord>>;

    /// All player rows, in id order.
    fn all_players(&self) -> Result<Vec<PlayerRecord>>;

    /// Insert a new player and seed their games row with the base rating.
    fn add_player(&self, record: PlayerRecord) -> Result<()>;

    /// Write back an updated player row.
    fn update_player(&self, record: PlayerRecord) -> Result<()>;

    /// The base rating from a player's games row.
    fn base_rating(&self, player_id: &str) -> Result<f64>;

    /// Append a game entry to a player's pending-games column.
    fn record_game(&self, player_id: &str, entry: &str) -> Result<()>;

    /// Parse all pending matches out of the games table.
    fn pending_matches(&self) -> Result<Vec<MatchRecord>>;

    /// Blank every games column after a completed batch run.
    fn clear_matches(&self) -> Result<()>;

    /// Round display ratings and copy them into the base-rating column.
    fn sync_base_ratings(&self) -> Result<()>;

    /// Round any fractional display ratings for publication.
    fn round_ratings(&self) -> Result<()>;

    /// Total number of player rows.
    fn player_count(&self) -> Result<usize>;

    /// Flush to the backing medium, if any.
    fn persist(&self) -> Result<()>;
}
