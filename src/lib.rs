//! Goban Ratings - EGF-style rating engine for a Go club
//!
//! This crate computes updated skill ratings for Go players after a match
//! using the European Go Federation formula, and maintains the club's
//! player and game records through a pluggable record store.

pub mod batch;
pub mod config;
pub mod error;
pub mod rating;
pub mod registry;
pub mod store;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use batch::{BatchReport, BatchRunner};
pub use rating::{EgfRatingCalculator, RatingCalculator};
pub use store::{InMemoryRecordStore, JsonFileStore, RecordStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
