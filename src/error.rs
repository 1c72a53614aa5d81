//! Error types for the rating service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("rating {rating} out of range [100, 2800)")]
    RatingOutOfRange { rating: f64 },

    #[error("handicap {handicap} out of range [0, 9]")]
    InvalidHandicap { handicap: u8 },

    #[error("tournament class weight {weight} is not one of 1.0, 0.75, 0.5")]
    InvalidTournamentClass { weight: f64 },

    #[error("winner rating {winner} matches neither player")]
    WinnerMismatch { winner: f64 },

    #[error("rating update invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("malformed game notation: {notation}")]
    MalformedGameNotation { notation: String },

    #[error("storage error: {message}")]
    StorageError { message: String },

    #[error("configuration error: {message}")]
    ConfigurationError { message: String },
}

impl RatingError {
    /// Whether this error represents a caller-side precondition violation,
    /// as opposed to an internal defect or storage failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RatingError::RatingOutOfRange { .. }
                | RatingError::InvalidHandicap { .. }
                | RatingError::InvalidTournamentClass { .. }
                | RatingError::WinnerMismatch { .. }
        )
    }
}
