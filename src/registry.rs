//! Player registration
//!
//! New players get a random three-digit id (the format the club records have
//! always used), a grade derived from their starting rating, and a seeded
//! base rating in the games table.

use crate::error::{RatingError, Result};
use crate::store::{PlayerRecord, RecordStore};
use crate::types::{validate_rating, PlayerId};
use rand::Rng;
use tracing::info;

/// Registration request for a new player
#[derive(Debug, Clone)]
pub struct NewPlayer {
    /// Explicit id; a free random id is drawn when absent
    pub id: Option<PlayerId>,
    pub last_name: String,
    pub first_names: String,
    pub rating: f64,
}

/// Register a player and seed their base rating.
pub fn register_player(store: &dyn RecordStore, request: NewPlayer) -> Result<PlayerRecord> {
    validate_rating(request.rating)?;

    let id = match request.id {
        Some(id) => id,
        None => draw_free_id(store)?,
    };

    let record = PlayerRecord::new(id, request.last_name, request.first_names, request.rating);
    store.add_player(record.clone())?;
    info!(
        player_id = %record.id,
        rating = record.rating,
        grade = %record.grade,
        "registered player"
    );
    Ok(record)
}

/// Draw a random unused three-digit id.
fn draw_free_id(store: &dyn RecordStore) -> Result<PlayerId> {
    // 900 possible ids; bail out instead of looping forever once the space
    // is effectively exhausted.
    let mut rng = rand::thread_rng();
    for _ in 0..10_000 {
        let candidate = rng.gen_range(100..=999).to_string();
        if store.find_player(&candidate)?.is_none() {
            return Ok(candidate);
        }
    }
    Err(RatingError::StorageError {
        message: "no free player ids left".to_string(),
    }
    .into())
}
