//! Test fixtures shared by the integration tests

use goban_ratings::store::{InMemoryRecordStore, PlayerRecord, RecordStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Build a player record with placeholder names.
pub fn player(id: &str, rating: f64) -> PlayerRecord {
    PlayerRecord::new(
        id.to_string(),
        format!("Last{id}"),
        format!("First{id}"),
        rating,
    )
}

/// An in-memory store seeded with the given players.
pub fn seeded_store(players: &[(&str, f64)]) -> Arc<InMemoryRecordStore> {
    let store = Arc::new(InMemoryRecordStore::new());
    for (id, rating) in players {
        store
            .add_player(player(id, *rating))
            .expect("seeding player");
    }
    store
}

/// A unique path under the system temp directory for store files.
pub fn temp_store_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "goban-ratings-it-{tag}-{}-{nanos}.json",
        std::process::id()
    ))
}
